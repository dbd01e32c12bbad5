//! Single-shift edit form
//!
//! This path is edit-only and always writes the assignee as free text: every
//! submit sets `custom_employee_name` and nulls `employee_id`, including for
//! shifts that previously referenced a roster employee. That replacement is
//! deliberate application behavior, not incidental — see the named test
//! below and the design notes.
//!
//! Unlike [`super::ScheduleForm`], times here are constrained to the fixed
//! [`time_options`] list.

use crate::backend::Backend;
use crate::core::{AppError, ValidationError};
use crate::forms::parse_date;
use crate::model::{Record, Schedule, time_options};
use serde_json::{Value, json};
use uuid::Uuid;

/// Edit an existing shift: employee name (free text), date, start/end time
/// (picked from the fixed option list), optional description
#[derive(Debug, Clone)]
pub struct EditScheduleForm {
    pub schedule_id: Uuid,
    pub employee_name: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub description: String,
}

impl EditScheduleForm {
    /// Prefill from the shift being edited
    ///
    /// Stored times may carry seconds (`09:00:00`); they are cut to `HH:MM`
    /// so they line up with the option list.
    pub fn prefill(schedule: &Schedule) -> Self {
        Self {
            schedule_id: schedule.id,
            employee_name: schedule.custom_employee_name.clone().unwrap_or_default(),
            date: schedule.date.to_string(),
            start_time: clip_to_minutes(&schedule.start_time),
            end_time: clip_to_minutes(&schedule.end_time),
            description: schedule.description.clone().unwrap_or_default(),
        }
    }

    fn validate(&self) -> Result<Value, ValidationError> {
        let name = self.employee_name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmployeeNameRequired);
        }
        let date = parse_date("date", &self.date)?;
        check_option("start time", &self.start_time)?;
        check_option("end time", &self.end_time)?;

        Ok(json!({
            "date": date,
            "start_time": self.start_time,
            "end_time": self.end_time,
            "description": self.description,
            "custom_employee_name": name,
            "employee_id": Value::Null,
        }))
    }

    /// Update the shift; any existing roster link is replaced by the name
    pub async fn submit(&self, backend: &dyn Backend) -> Result<(), AppError> {
        let row = self.validate()?;
        backend
            .update(Schedule::collection(), self.schedule_id, row)
            .await?;
        Ok(())
    }
}

fn clip_to_minutes(time: &str) -> String {
    time.get(..5).unwrap_or(time).to_string()
}

fn check_option(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    if time_options().iter().any(|option| option == value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidTime {
            field,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{InMemoryBackend, fetch_all};
    use crate::core::Query;
    use chrono::NaiveDate;

    fn stored_shift(employee_id: Option<Uuid>) -> Schedule {
        Schedule {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            start_time: "09:00:00".to_string(),
            end_time: "17:00:00".to_string(),
            description: Some("Front desk".to_string()),
            employee_id,
            custom_employee_name: employee_id.is_none().then(|| "Alice".to_string()),
        }
    }

    #[test]
    fn prefill_clips_seconds_to_match_options() {
        let form = EditScheduleForm::prefill(&stored_shift(None));
        assert_eq!(form.start_time, "09:00");
        assert_eq!(form.end_time, "17:00");
        assert_eq!(form.employee_name, "Alice");
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut form = EditScheduleForm::prefill(&stored_shift(None));
        form.employee_name = "  ".to_string();
        assert_eq!(
            form.validate().unwrap_err(),
            ValidationError::EmployeeNameRequired
        );
    }

    #[test]
    fn off_list_time_is_rejected() {
        let mut form = EditScheduleForm::prefill(&stored_shift(None));
        form.start_time = "09:10".to_string();
        assert!(matches!(
            form.validate().unwrap_err(),
            ValidationError::InvalidTime { field: "start time", .. }
        ));
    }

    #[tokio::test]
    async fn edit_replaces_employee_link_with_custom_name() {
        // Editing a shift that references a roster employee discards the
        // foreign key and stores the typed name instead. Intentional; do not
        // "fix" without direction.
        let backend = InMemoryBackend::new();
        let linked = stored_shift(Some(Uuid::new_v4()));
        backend
            .insert("schedules", vec![serde_json::to_value(&linked).unwrap()])
            .await
            .unwrap();

        let mut form = EditScheduleForm::prefill(&linked);
        form.schedule_id = linked.id;
        form.employee_name = "Alice".to_string();
        form.submit(&backend).await.unwrap();

        let shifts: Vec<Schedule> = fetch_all(&backend, &Query::new()).await.unwrap();
        assert_eq!(shifts.len(), 1);
        assert!(shifts[0].employee_id.is_none());
        assert_eq!(shifts[0].custom_employee_name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn edit_updates_fields_in_place() {
        let backend = InMemoryBackend::new();
        let shift = stored_shift(None);
        backend
            .insert("schedules", vec![serde_json::to_value(&shift).unwrap()])
            .await
            .unwrap();

        let mut form = EditScheduleForm::prefill(&shift);
        form.start_time = "10:00".to_string();
        form.description = "Late open".to_string();
        form.submit(&backend).await.unwrap();

        let shifts: Vec<Schedule> = fetch_all(&backend, &Query::new()).await.unwrap();
        assert_eq!(shifts[0].start_time, "10:00");
        assert_eq!(shifts[0].description.as_deref(), Some("Late open"));
        assert_eq!(shifts[0].id, shift.id);
    }
}
