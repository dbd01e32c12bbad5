//! Schedule page controller
//!
//! Same lifecycle as the invoice page, plus a role gate: the weekly entry
//! modal, the shift editor, and deletion are employer-only. The gate hides
//! the controls; the backend's row-level rules are the actual enforcement.

use crate::auth::AuthContext;
use crate::backend::{Backend, fetch_all};
use crate::core::{AppError, Query, SortDirection};
use crate::forms::{EditScheduleForm, WeeklyScheduleForm};
use crate::model::{Record, Schedule};
use crate::pages::PageState;
use crate::views::{EmployeeGroup, group_schedules};
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error};
use uuid::Uuid;

/// Which schedule dialog is open
#[derive(Debug, Clone, Default)]
pub enum ScheduleModal {
    #[default]
    Closed,
    /// Bulk weekly entry
    Weekly,
    /// Editing one existing shift
    EditShift(Schedule),
}

/// What the schedule page renders
#[derive(Debug, Clone)]
pub struct SchedulesViewModel {
    pub groups: Vec<EmployeeGroup>,
    pub loading: bool,
    /// Whether manage controls (add week, edit, delete) are shown
    pub can_manage: bool,
}

struct Inner {
    backend: Arc<dyn Backend>,
    auth: AuthContext,
    state: RwLock<PageState<Schedule>>,
    modal: RwLock<ScheduleModal>,
    epoch: AtomicU64,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

/// The schedule page: shifts grouped per employee, employer-only management
#[derive(Clone)]
pub struct SchedulesPage {
    inner: Arc<Inner>,
}

impl SchedulesPage {
    pub fn new(backend: Arc<dyn Backend>, auth: AuthContext) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                auth,
                state: RwLock::new(PageState::default()),
                modal: RwLock::new(ScheduleModal::Closed),
                epoch: AtomicU64::new(0),
                watcher: Mutex::new(None),
            }),
        }
    }

    /// Load the page: initial fetch plus a watcher that refetches on every
    /// schedule change event
    pub async fn mount(&self) {
        self.refetch().await;

        let page = self.clone();
        let mut sub = self.inner.backend.subscribe(Schedule::collection());
        let handle = tokio::spawn(async move {
            while let Some(envelope) = sub.next().await {
                let event = &envelope.event;
                debug!(action = ?event.action, row_id = %event.row_id, "schedule change, refetching");
                page.refetch().await;
            }
        });

        let mut watcher = self.inner.watcher.lock().await;
        if let Some(old) = watcher.replace(handle) {
            old.abort();
        }
    }

    /// Leave the page: stop the watcher and invalidate in-flight fetches
    pub async fn unmount(&self) {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.inner.watcher.lock().await.take() {
            handle.abort();
        }
    }

    /// Re-run the page query (date, then start time, ascending) and replace
    /// the snapshot
    ///
    /// Each refetch claims a new epoch, so only the newest in-flight fetch
    /// may commit; results overtaken by a newer refetch or an unmount are
    /// dropped, and errors keep the old rows.
    pub async fn refetch(&self) {
        let epoch = self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let query = Query::new()
            .order_by("date", SortDirection::Ascending)
            .order_by("start_time", SortDirection::Ascending);

        match fetch_all::<Schedule>(self.inner.backend.as_ref(), &query).await {
            Ok(rows) => {
                if self.inner.epoch.load(Ordering::SeqCst) != epoch {
                    debug!("dropping stale schedule fetch result");
                    return;
                }
                let mut state = self.inner.state.write().await;
                state.rows = rows;
                state.loading = false;
            }
            Err(e) => {
                error!(error = %e, "schedule fetch failed");
                self.inner.state.write().await.loading = false;
            }
        }
    }

    /// Snapshot projected for display: employee groups plus the role gate
    pub async fn view_model(&self) -> SchedulesViewModel {
        let state = self.inner.state.read().await;
        SchedulesViewModel {
            groups: group_schedules(&state.rows),
            loading: state.loading,
            can_manage: self.inner.auth.can_manage_schedules(),
        }
    }

    pub async fn rows(&self) -> Vec<Schedule> {
        self.inner.state.read().await.rows.clone()
    }

    pub async fn modal(&self) -> ScheduleModal {
        self.inner.modal.read().await.clone()
    }

    pub async fn close_modal(&self) {
        *self.inner.modal.write().await = ScheduleModal::Closed;
    }

    /// Open the weekly bulk entry modal; refused for non-employers
    pub async fn open_weekly(&self) -> bool {
        if !self.inner.auth.can_manage_schedules() {
            return false;
        }
        *self.inner.modal.write().await = ScheduleModal::Weekly;
        true
    }

    /// Open the shift editor; refused for non-employers
    pub async fn open_edit(&self, schedule: Schedule) -> bool {
        if !self.inner.auth.can_manage_schedules() {
            return false;
        }
        *self.inner.modal.write().await = ScheduleModal::EditShift(schedule);
        true
    }

    /// Fresh weekly form anchored to the current week's Monday
    pub fn weekly_form(&self) -> WeeklyScheduleForm {
        WeeklyScheduleForm::new(Utc::now().date_naive())
    }

    /// Editor form prefilled from the shift in the open modal, if any
    pub async fn edit_form(&self) -> Option<EditScheduleForm> {
        match &*self.inner.modal.read().await {
            ScheduleModal::EditShift(schedule) => Some(EditScheduleForm::prefill(schedule)),
            _ => None,
        }
    }

    /// Submit the weekly bulk form, close the modal, refetch
    ///
    /// Returns the number of shifts created. Errors propagate so the modal
    /// stays open with the message inline.
    pub async fn submit_weekly(&self, form: &WeeklyScheduleForm) -> Result<usize, AppError> {
        let inserted = form.submit(self.inner.backend.as_ref()).await?;
        self.close_modal().await;
        self.refetch().await;
        Ok(inserted)
    }

    /// Submit the shift editor, close the modal, refetch
    pub async fn submit_edit(&self, form: &EditScheduleForm) -> Result<(), AppError> {
        form.submit(self.inner.backend.as_ref()).await?;
        self.close_modal().await;
        self.refetch().await;
        Ok(())
    }

    /// Delete after the caller's confirmation step; no-op for non-employers
    ///
    /// Backend failures are logged, never surfaced.
    pub async fn delete_confirmed(&self, id: Uuid) {
        if !self.inner.auth.can_manage_schedules() {
            return;
        }
        if let Err(e) = self.inner.backend.delete(Schedule::collection(), id).await {
            error!(error = %e, schedule_id = %id, "schedule delete failed");
        }
        self.refetch().await;
    }
}
