//! Persisted record types and the fixed option lists the forms draw from

pub use crate::core::Record;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;

/// A supplier invoice row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub date: NaiveDate,
    pub supplier_name: String,
    pub quantity: u32,
    pub dollar_amount: f64,
}

impl Record for Invoice {
    fn collection() -> &'static str {
        "invoices"
    }

    fn id(&self) -> Uuid {
        self.id
    }
}

/// A work-shift row
///
/// The assignee is EITHER a foreign key into `users` (`employee_id`) OR a
/// free-text `custom_employee_name` — exactly one is populated on write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub date: NaiveDate,
    /// Time of day, `HH:MM` or `HH:MM:SS` as stored by the backend
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub employee_id: Option<Uuid>,
    #[serde(default)]
    pub custom_employee_name: Option<String>,
}

impl Record for Schedule {
    fn collection() -> &'static str {
        "schedules"
    }

    fn id(&self) -> Uuid {
        self.id
    }
}

/// A `users` row as seen by the roster picker (role = "employee")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeUser {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl Record for EmployeeUser {
    fn collection() -> &'static str {
        "users"
    }

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Fixed supplier suggestion list; "Other" opens the free-text escape
pub const SUPPLIERS: [&str; 13] = [
    "CoreMark",
    "Milk",
    "Pepsi Co",
    "Coca Cola Co",
    "SRP",
    "Prime",
    "Fritolay",
    "Bimbo",
    "Beer Store",
    "Lcbo",
    "BEER_WINE_3rd_Party",
    "Smokes",
    "Other",
];

/// The supplier choice that enables the free-text escape
pub const OTHER_SUPPLIER: &str = "Other";

static TIME_OPTIONS: LazyLock<Vec<String>> = LazyLock::new(|| {
    let mut options = Vec::with_capacity(48);
    for hour in 0..24u8 {
        for minute in [0u8, 30] {
            options.push(format!("{hour:02}:{minute:02}"));
        }
    }
    options
});

/// Static ordered list of selectable time-of-day strings for shift pickers
///
/// Half-hour steps over the full day, `00:00` through `23:30`.
pub fn time_options() -> &'static [String] {
    &TIME_OPTIONS
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn time_options_are_ordered_and_complete() {
        let options = time_options();
        assert_eq!(options.len(), 48);
        assert_eq!(options[0], "00:00");
        assert_eq!(options[17], "08:30");
        assert_eq!(options[47], "23:30");
        assert!(options.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn suppliers_end_with_other_escape() {
        assert_eq!(SUPPLIERS.last(), Some(&OTHER_SUPPLIER));
        assert!(SUPPLIERS.contains(&"Pepsi Co"));
    }

    #[test]
    fn invoice_row_roundtrip() {
        let row = json!({
            "id": Uuid::new_v4(),
            "date": "2024-01-01",
            "supplier_name": "Pepsi Co",
            "quantity": 10,
            "dollar_amount": 250.5
        });
        let invoice: Invoice = serde_json::from_value(row).unwrap();
        assert_eq!(invoice.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(invoice.quantity, 10);
        assert_eq!(invoice.dollar_amount, 250.5);
    }

    #[test]
    fn schedule_optional_fields_default_to_none() {
        let row = json!({
            "id": Uuid::new_v4(),
            "date": "2024-06-03",
            "start_time": "09:00:00",
            "end_time": "17:00:00"
        });
        let schedule: Schedule = serde_json::from_value(row).unwrap();
        assert!(schedule.description.is_none());
        assert!(schedule.employee_id.is_none());
        assert!(schedule.custom_employee_name.is_none());
    }
}
