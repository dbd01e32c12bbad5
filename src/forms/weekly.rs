//! Weekly bulk schedule generator
//!
//! One form entry produces a whole week of shifts: a week-start Monday plus a
//! dynamic list of employee blocks, each mapping the seven weekdays to an
//! optional {start, end} pair. Every fully-specified pair becomes one
//! schedule row dated `week_start + day_index` (Monday = 0); a day with only
//! one side set is treated as a day off and produces nothing. All qualifying
//! rows go to the backend in a single bulk insert.

use crate::backend::Backend;
use crate::core::{AppError, ValidationError};
use crate::forms::parse_date;
use crate::model::{Record, Schedule};
use chrono::{Datelike, Duration, NaiveDate};
use serde_json::{Value, json};

/// The seven weekdays in bulk-entry order; index is the day offset from the
/// week-start Monday
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Optional shift times for one weekday; both must be set to count
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayShift {
    pub start: String,
    pub end: String,
}

impl DayShift {
    /// A shift qualifies only when both ends are set
    fn is_complete(&self) -> bool {
        !self.start.is_empty() && !self.end.is_empty()
    }
}

/// One employee block: a name plus a shift slot per weekday
#[derive(Debug, Clone, Default)]
pub struct EmployeeWeek {
    pub name: String,
    pub shifts: [DayShift; 7],
}

/// The weekly bulk form
#[derive(Debug, Clone)]
pub struct WeeklyScheduleForm {
    /// Week-start date (a Monday), `YYYY-MM-DD`
    pub week_start: String,
    /// Employee blocks; at least one is always kept
    pub employees: Vec<EmployeeWeek>,
}

impl WeeklyScheduleForm {
    /// New form anchored to the most recent Monday relative to `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            week_start: most_recent_monday(today).to_string(),
            employees: vec![EmployeeWeek::default()],
        }
    }

    pub fn add_employee(&mut self) {
        self.employees.push(EmployeeWeek::default());
    }

    /// Remove an employee block; the last remaining block cannot be removed
    pub fn remove_employee(&mut self, index: usize) -> bool {
        if self.employees.len() > 1 && index < self.employees.len() {
            self.employees.remove(index);
            true
        } else {
            false
        }
    }

    /// Generate the persistence rows for every qualifying {employee, day}
    ///
    /// Rejects when any employee block has a blank name, and when nothing
    /// across all employees and days is fully specified.
    pub fn build_rows(&self) -> Result<Vec<Value>, ValidationError> {
        let week_start = parse_date("week start", &self.week_start)?;
        let mut rows = Vec::new();

        for employee in &self.employees {
            let name = employee.name.trim();
            if name.is_empty() {
                return Err(ValidationError::AllEmployeesNeedNames);
            }

            for (day_index, shift) in employee.shifts.iter().enumerate() {
                if !shift.is_complete() {
                    // Only one side set counts as a day off, silently
                    continue;
                }
                let date = week_start + Duration::days(day_index as i64);
                rows.push(json!({
                    "date": date,
                    "start_time": shift.start,
                    "end_time": shift.end,
                    "description": format!("Weekly shift for {name}"),
                    "custom_employee_name": name,
                    "employee_id": Value::Null,
                }));
            }
        }

        if rows.is_empty() {
            return Err(ValidationError::NoShiftsDefined);
        }
        Ok(rows)
    }

    /// Validate, generate, and submit every row in one bulk insert
    ///
    /// Returns the number of rows inserted.
    pub async fn submit(&self, backend: &dyn Backend) -> Result<usize, AppError> {
        let rows = self.build_rows()?;
        let count = rows.len();
        backend.insert(Schedule::collection(), rows).await?;
        Ok(count)
    }
}

/// The most recent Monday on or before `today`
pub fn most_recent_monday(today: NaiveDate) -> NaiveDate {
    today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
}
