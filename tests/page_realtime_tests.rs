//! Integration tests for the page lifecycle against the change feed
//!
//! These tests drive the full loop: mount a page, mutate the backend from
//! the outside, and verify the change feed pushes a refetch into the page
//! snapshot. Also covers the unmount guarantees (watcher stops, in-flight
//! results are dropped).

use opsboard::prelude::*;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Backend whose first fetch reads its rows, then stalls before returning,
/// so a newer fetch can start and finish underneath it
struct SlowFirstFetch {
    inner: InMemoryBackend,
    pending: AtomicBool,
}

impl SlowFirstFetch {
    fn new() -> Self {
        Self {
            inner: InMemoryBackend::new(),
            pending: AtomicBool::new(true),
        }
    }
}

#[async_trait]
impl Backend for SlowFirstFetch {
    async fn fetch(&self, collection: &str, query: &Query) -> Result<Vec<Value>, BackendError> {
        let rows = self.inner.fetch(collection, query).await?;
        if self.pending.swap(false, Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        Ok(rows)
    }

    async fn insert(&self, collection: &str, rows: Vec<Value>) -> Result<(), BackendError> {
        self.inner.insert(collection, rows).await
    }

    async fn update(&self, collection: &str, id: Uuid, patch: Value) -> Result<(), BackendError> {
        self.inner.update(collection, id, patch).await
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<(), BackendError> {
        self.inner.delete(collection, id).await
    }

    fn subscribe(&self, collection: &str) -> ChangeSubscription {
        self.inner.subscribe(collection)
    }

    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        self.inner.current_session().await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.inner.sign_in(email, password).await
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: UserRole,
    ) -> Result<Session, AuthError> {
        self.inner.sign_up(email, password, name, role).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.inner.sign_out().await
    }
}

fn invoice_row(date: &str, supplier: &str, amount: f64) -> serde_json::Value {
    json!({
        "date": date,
        "supplier_name": supplier,
        "quantity": 1,
        "dollar_amount": amount,
    })
}

fn shift_row(date: &str, start: &str, name: &str) -> serde_json::Value {
    json!({
        "date": date,
        "start_time": start,
        "end_time": "17:00",
        "description": "Weekly shift for Alice",
        "employee_id": null,
        "custom_employee_name": name,
    })
}

async fn settle() {
    // Give the watcher task a beat to receive the event and refetch
    tokio::time::sleep(Duration::from_millis(25)).await;
}

#[tokio::test]
async fn invoice_page_tracks_external_insert_update_delete() {
    let backend = Arc::new(InMemoryBackend::new());
    let page = InvoicesPage::new(backend.clone());
    page.mount().await;
    assert!(page.rows().await.is_empty());

    // Insert from outside the page
    backend
        .insert("invoices", vec![invoice_row("2024-01-01", "Milk", 250.5)])
        .await
        .unwrap();
    settle().await;
    let rows = page.view().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, "$250.50");
    let id = page.rows().await[0].id;

    // Update from outside
    backend
        .update("invoices", id, json!({"dollar_amount": 99.0}))
        .await
        .unwrap();
    settle().await;
    assert_eq!(page.view().await[0].amount, "$99.00");

    // Delete from outside
    backend.delete("invoices", id).await.unwrap();
    settle().await;
    assert!(page.rows().await.is_empty());

    page.unmount().await;
}

#[tokio::test]
async fn pages_only_react_to_their_own_collection() {
    let backend = Arc::new(InMemoryBackend::new());
    let page = InvoicesPage::new(backend.clone());
    page.mount().await;

    backend
        .insert("schedules", vec![shift_row("2024-06-03", "09:00", "Alice")])
        .await
        .unwrap();
    settle().await;

    // A schedule change never makes invoices appear
    assert!(page.rows().await.is_empty());
    page.unmount().await;
}

#[tokio::test]
async fn unmounted_page_keeps_its_last_snapshot() {
    let backend = Arc::new(InMemoryBackend::new());
    backend
        .insert("invoices", vec![invoice_row("2024-01-01", "Milk", 10.0)])
        .await
        .unwrap();

    let page = InvoicesPage::new(backend.clone());
    page.mount().await;
    assert_eq!(page.rows().await.len(), 1);
    page.unmount().await;

    backend
        .insert("invoices", vec![invoice_row("2024-02-01", "Pepsi Co", 20.0)])
        .await
        .unwrap();
    settle().await;

    assert_eq!(page.rows().await.len(), 1);
}

#[tokio::test]
async fn remount_resumes_tracking() {
    let backend = Arc::new(InMemoryBackend::new());
    let page = InvoicesPage::new(backend.clone());
    page.mount().await;
    page.unmount().await;

    page.mount().await;
    backend
        .insert("invoices", vec![invoice_row("2024-01-01", "Milk", 10.0)])
        .await
        .unwrap();
    settle().await;

    assert_eq!(page.rows().await.len(), 1);
    page.unmount().await;
}

#[tokio::test]
async fn schedule_page_regroups_on_every_change() {
    let backend = Arc::new(InMemoryBackend::new());
    backend.register_user("boss@example.com", "pw", "Boss", UserRole::Employer);
    let auth = AuthContext::new(backend.clone());
    auth.initialize().await;
    auth.sign_in("boss@example.com", "pw").await.unwrap();

    let page = SchedulesPage::new(backend.clone(), auth);
    page.mount().await;

    backend
        .insert(
            "schedules",
            vec![
                shift_row("2024-06-03", "09:00", "Zoe"),
                shift_row("2024-06-03", "09:00", "Alice"),
            ],
        )
        .await
        .unwrap();
    settle().await;

    let vm = page.view_model().await;
    assert_eq!(vm.groups.len(), 2);
    assert_eq!(vm.groups[0].name, "Alice");
    assert_eq!(vm.groups[1].name, "Zoe");

    // Renaming moves the shift between groups on the next refetch
    let zoe_shift = page
        .rows()
        .await
        .into_iter()
        .find(|s| s.custom_employee_name.as_deref() == Some("Zoe"))
        .unwrap();
    backend
        .update(
            "schedules",
            zoe_shift.id,
            json!({"custom_employee_name": "Alice"}),
        )
        .await
        .unwrap();
    settle().await;

    let vm = page.view_model().await;
    assert_eq!(vm.groups.len(), 1);
    assert_eq!(vm.groups[0].shifts.len(), 2);
    page.unmount().await;
}

#[tokio::test]
async fn overtaken_fetch_cannot_roll_back_a_newer_snapshot() {
    let backend = Arc::new(SlowFirstFetch::new());
    let page = InvoicesPage::new(backend.clone());

    // The slow fetch reads the still-empty collection, then stalls
    let slow = {
        let page = page.clone();
        tokio::spawn(async move { page.refetch().await })
    };
    tokio::time::sleep(Duration::from_millis(30)).await;

    // A row arrives and a newer refetch commits it while the slow one hangs
    backend
        .insert("invoices", vec![invoice_row("2024-01-01", "Milk", 250.5)])
        .await
        .unwrap();
    page.refetch().await;
    assert_eq!(page.rows().await.len(), 1);

    // The overtaken fetch lands with empty rows and must be discarded
    slow.await.unwrap();
    assert_eq!(page.rows().await.len(), 1);
}

#[tokio::test]
async fn overtaken_schedule_fetch_is_discarded_too() {
    let backend = Arc::new(SlowFirstFetch::new());
    backend
        .inner
        .register_user("boss@example.com", "pw", "Boss", UserRole::Employer);
    let auth = AuthContext::new(backend.clone());
    auth.initialize().await;
    auth.sign_in("boss@example.com", "pw").await.unwrap();

    let page = SchedulesPage::new(backend.clone(), auth);
    let slow = {
        let page = page.clone();
        tokio::spawn(async move { page.refetch().await })
    };
    tokio::time::sleep(Duration::from_millis(30)).await;

    backend
        .insert("schedules", vec![shift_row("2024-06-03", "09:00", "Alice")])
        .await
        .unwrap();
    page.refetch().await;
    assert_eq!(page.view_model().await.groups.len(), 1);

    slow.await.unwrap();
    assert_eq!(page.view_model().await.groups.len(), 1);
}
