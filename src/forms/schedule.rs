//! Single-shift form with a roster picker
//!
//! This entry path assumes a selectable roster of employee records: the
//! "assign to" choice resolves to either a `users` foreign key or, through
//! the "other" escape, a free-text name — exactly one of the two lands in
//! the row.

use crate::backend::{Backend, fetch_all};
use crate::core::{AppError, BackendError, Query, SortDirection, ValidationError};
use crate::forms::{check_time, parse_date};
use crate::model::{EmployeeUser, Record, Schedule};
use serde_json::{Value, json};
use uuid::Uuid;

/// Who the shift is assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmployeeChoice {
    /// Nothing selected yet
    #[default]
    Unselected,
    /// A roster employee (foreign key into `users`)
    Employee(Uuid),
    /// The "other" escape: free-text name
    Other,
}

/// Collects a single shift: date, start/end time (free-typed `HH:MM`),
/// optional description, and the assignee choice
#[derive(Debug, Clone, Default)]
pub struct ScheduleForm {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub description: String,
    pub choice: EmployeeChoice,
    pub custom_employee_name: String,
}

impl ScheduleForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the selectable roster: users with role "employee", by name
    pub async fn load_roster(backend: &dyn Backend) -> Result<Vec<EmployeeUser>, BackendError> {
        let query = Query::new()
            .filter("role", "employee")
            .order_by("name", SortDirection::Ascending);
        fetch_all(backend, &query).await
    }

    /// Prefill from an existing shift for editing
    pub fn prefill(schedule: &Schedule) -> Self {
        let (choice, custom_employee_name) = match (schedule.employee_id, &schedule.custom_employee_name) {
            (Some(id), _) => (EmployeeChoice::Employee(id), String::new()),
            (None, Some(name)) => (EmployeeChoice::Other, name.clone()),
            (None, None) => (EmployeeChoice::Unselected, String::new()),
        };
        Self {
            date: schedule.date.to_string(),
            start_time: schedule.start_time.clone(),
            end_time: schedule.end_time.clone(),
            description: schedule.description.clone().unwrap_or_default(),
            choice,
            custom_employee_name,
        }
    }

    /// Validate and translate to a persistence row
    ///
    /// The employee identity must resolve: a roster id, or a non-blank custom
    /// name through the "other" escape. The row carries the one that applies
    /// and nulls the other.
    fn validate(&self) -> Result<Value, ValidationError> {
        let date = parse_date("date", &self.date)?;
        check_time("start time", &self.start_time)?;
        check_time("end time", &self.end_time)?;

        let (employee_id, custom_employee_name) = match self.choice {
            EmployeeChoice::Employee(id) => (Some(id), None),
            EmployeeChoice::Other => {
                let name = self.custom_employee_name.trim();
                if name.is_empty() {
                    return Err(ValidationError::CustomEmployeeNameRequired);
                }
                (None, Some(name.to_string()))
            }
            EmployeeChoice::Unselected => return Err(ValidationError::EmployeeChoiceRequired),
        };

        Ok(json!({
            "date": date,
            "start_time": self.start_time,
            "end_time": self.end_time,
            "description": self.description,
            "employee_id": employee_id,
            "custom_employee_name": custom_employee_name,
        }))
    }

    /// Submit as a new shift (`editing` absent) or update-by-id
    pub async fn submit(
        &self,
        backend: &dyn Backend,
        editing: Option<Uuid>,
    ) -> Result<(), AppError> {
        let row = self.validate()?;
        match editing {
            Some(id) => backend.update(Schedule::collection(), id, row).await?,
            None => backend.insert(Schedule::collection(), vec![row]).await?,
        }
        Ok(())
    }
}
