//! Integration tests for the weekly bulk entry flow
//!
//! Full path: employer opens the weekly modal, fills employee blocks, and the
//! single bulk submit lands as grouped shifts on the page.

use opsboard::forms::{DayShift, EmployeeWeek};
use opsboard::pages::ScheduleModal;
use opsboard::prelude::*;

async fn employer_page() -> SchedulesPage {
    let backend = Arc::new(InMemoryBackend::new());
    backend.register_user("boss@example.com", "pw", "Boss", UserRole::Employer);
    let auth = AuthContext::new(backend.clone());
    auth.initialize().await;
    auth.sign_in("boss@example.com", "pw").await.unwrap();
    SchedulesPage::new(backend, auth)
}

fn week_for(names_and_days: &[(&str, &[usize])]) -> WeeklyScheduleForm {
    let employees = names_and_days
        .iter()
        .map(|(name, days)| {
            let mut employee = EmployeeWeek {
                name: name.to_string(),
                ..EmployeeWeek::default()
            };
            for &day in *days {
                employee.shifts[day] = DayShift {
                    start: "09:00".to_string(),
                    end: "17:00".to_string(),
                };
            }
            employee
        })
        .collect();
    WeeklyScheduleForm {
        week_start: "2024-06-03".to_string(),
        employees,
    }
}

#[tokio::test]
async fn bulk_submit_lands_as_grouped_shifts() {
    let page = employer_page().await;
    page.mount().await;
    assert!(page.open_weekly().await);

    // Alice works Monday and Wednesday, Bob works Friday
    let form = week_for(&[("Alice", &[0, 2]), ("Bob", &[4])]);
    let inserted = page.submit_weekly(&form).await.unwrap();
    assert_eq!(inserted, 3);
    assert!(matches!(page.modal().await, ScheduleModal::Closed));

    let vm = page.view_model().await;
    assert_eq!(vm.groups.len(), 2);
    assert_eq!(vm.groups[0].name, "Alice");
    assert_eq!(vm.groups[0].shifts[0].date, "2024-06-03");
    assert_eq!(vm.groups[0].shifts[1].date, "2024-06-05");
    assert_eq!(vm.groups[1].name, "Bob");
    assert_eq!(vm.groups[1].shifts[0].date, "2024-06-07");
    page.unmount().await;
}

#[tokio::test]
async fn rejected_week_leaves_modal_open_and_backend_untouched() {
    let page = employer_page().await;
    page.mount().await;
    assert!(page.open_weekly().await);

    let form = week_for(&[("Alice", &[])]);
    let err = page.submit_weekly(&form).await.unwrap_err();
    assert_eq!(err.to_string(), "At least one shift must be defined.");
    assert!(matches!(page.modal().await, ScheduleModal::Weekly));
    assert!(page.rows().await.is_empty());
    page.unmount().await;
}

#[tokio::test]
async fn blank_name_beats_missing_shifts() {
    let page = employer_page().await;
    page.mount().await;

    // Second employee has shifts but no name; the name error wins
    let form = week_for(&[("", &[0])]);
    let err = page.submit_weekly(&form).await.unwrap_err();
    assert_eq!(err.to_string(), "All employees must have a name.");
    page.unmount().await;
}

#[tokio::test]
async fn generated_shifts_carry_the_weekly_description() {
    let page = employer_page().await;
    page.mount().await;

    let form = week_for(&[("Alice", &[6])]);
    page.submit_weekly(&form).await.unwrap();

    let rows = page.rows().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date.to_string(), "2024-06-09");
    assert_eq!(rows[0].description.as_deref(), Some("Weekly shift for Alice"));
    assert!(rows[0].employee_id.is_none());
    page.unmount().await;
}
