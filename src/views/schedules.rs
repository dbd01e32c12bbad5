//! Schedule grouping projection
//!
//! Fetched shifts are regrouped per display name on every render pass; the
//! grouping is recomputed from scratch, never patched incrementally.

use crate::model::Schedule;
use indexmap::IndexMap;
use uuid::Uuid;

/// Display name for shifts with neither a roster link nor a custom name
pub const UNNAMED: &str = "Unnamed";

/// Message shown when the schedule collection is empty
pub const EMPTY_SCHEDULES: &str = "No schedules yet.";

/// Placeholder when a shift has no description
pub const NO_DESCRIPTION: &str = "No description";

/// One rendered shift card
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftView {
    pub id: Uuid,
    pub date: String,
    /// `HH:MM – HH:MM`, seconds stripped
    pub time_range: String,
    pub description: String,
}

/// All shifts for one display name
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeGroup {
    pub name: String,
    pub shifts: Vec<ShiftView>,
}

/// Group fetched shifts by employee display name
///
/// The display name is the custom name when set, otherwise [`UNNAMED`];
/// roster-linked shifts without a custom name also fall back to [`UNNAMED`]
/// since rows are not joined against the roster here. Groups come out in
/// lexicographic name order; shifts within a group keep the fetch order
/// (date then start time, per the page query).
pub fn group_schedules(schedules: &[Schedule]) -> Vec<EmployeeGroup> {
    let mut grouped: IndexMap<String, Vec<ShiftView>> = IndexMap::new();

    for schedule in schedules {
        let name = schedule
            .custom_employee_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNNAMED)
            .to_string();
        grouped.entry(name).or_default().push(shift_view(schedule));
    }

    grouped.sort_keys();
    grouped
        .into_iter()
        .map(|(name, shifts)| EmployeeGroup { name, shifts })
        .collect()
}

fn shift_view(schedule: &Schedule) -> ShiftView {
    ShiftView {
        id: schedule.id,
        date: schedule.date.to_string(),
        time_range: format!(
            "{} – {}",
            clip_to_minutes(&schedule.start_time),
            clip_to_minutes(&schedule.end_time)
        ),
        description: schedule
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(NO_DESCRIPTION)
            .to_string(),
    }
}

fn clip_to_minutes(time: &str) -> &str {
    time.get(..5).unwrap_or(time)
}
