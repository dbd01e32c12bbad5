//! Invoice page controller

use crate::backend::{Backend, fetch_all};
use crate::core::{AppError, Query, SortDirection};
use crate::forms::InvoiceForm;
use crate::model::{Invoice, Record};
use crate::pages::PageState;
use crate::views::{InvoiceRowView, invoice_rows};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error};
use uuid::Uuid;

/// Which invoice dialog is open
#[derive(Debug, Clone, Default)]
pub enum InvoiceModal {
    #[default]
    Closed,
    New,
    Edit(Invoice),
}

struct Inner {
    backend: Arc<dyn Backend>,
    state: RwLock<PageState<Invoice>>,
    modal: RwLock<InvoiceModal>,
    epoch: AtomicU64,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

/// The invoice list page: newest-first table, create/edit modal, live refetch
///
/// Clones share state, so the change-feed watcher can drive the same page the
/// caller holds.
#[derive(Clone)]
pub struct InvoicesPage {
    inner: Arc<Inner>,
}

impl InvoicesPage {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                state: RwLock::new(PageState::default()),
                modal: RwLock::new(InvoiceModal::Closed),
                epoch: AtomicU64::new(0),
                watcher: Mutex::new(None),
            }),
        }
    }

    /// Load the page: initial fetch plus a watcher that refetches on every
    /// invoice change event
    pub async fn mount(&self) {
        self.refetch().await;

        let page = self.clone();
        let mut sub = self.inner.backend.subscribe(Invoice::collection());
        let handle = tokio::spawn(async move {
            while let Some(envelope) = sub.next().await {
                let event = &envelope.event;
                debug!(action = ?event.action, row_id = %event.row_id, "invoice change, refetching");
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

    /// Re-run the page query and replace the snapshot
    ///
    /// Each refetch claims a new epoch, so only the newest in-flight fetch
    /// may commit: a result that lands after [`Self::unmount`] or after a
    /// newer refetch is dropped. Fetch errors are logged and the previous
    /// rows stay on screen.
    pub async fn refetch(&self) {
        let epoch = self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let query = Query::new().order_by("date", SortDirection::Descending);

        match fetch_all::<Invoice>(self.inner.backend.as_ref(), &query).await {
            Ok(rows) => {
                if self.inner.epoch.load(Ordering::SeqCst) != epoch {
                    debug!("dropping stale invoice fetch result");
                    return;
                }
                let mut state = self.inner.state.write().await;
                state.rows = rows;
                state.loading = false;
            }
            Err(e) => {
                error!(error = %e, "invoice fetch failed");
                self.inner.state.write().await.loading = false;
            }
        }
    }

    /// Current rows projected for display, newest first
    pub async fn view(&self) -> Vec<InvoiceRowView> {
        invoice_rows(&self.inner.state.read().await.rows)
    }

    pub async fn rows(&self) -> Vec<Invoice> {
        self.inner.state.read().await.rows.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.state.read().await.loading
    }

    pub async fn modal(&self) -> InvoiceModal {
        self.inner.modal.read().await.clone()
    }

    pub async fn open_new(&self) {
        *self.inner.modal.write().await = InvoiceModal::New;
    }

    pub async fn open_edit(&self, invoice: Invoice) {
        *self.inner.modal.write().await = InvoiceModal::Edit(invoice);
    }

    pub async fn close_modal(&self) {
        *self.inner.modal.write().await = InvoiceModal::Closed;
    }

    /// Form for the open modal: blank for `New`, prefilled for `Edit`
    pub async fn form(&self) -> InvoiceForm {
        match &*self.inner.modal.read().await {
            InvoiceModal::Edit(invoice) => InvoiceForm::prefill(invoice),
            _ => InvoiceForm::new(),
        }
    }

    /// Submit the open modal's form, then close it and refetch
    ///
    /// Validation and backend errors propagate so the caller keeps the modal
    /// open with the message shown inline.
    pub async fn submit(&self, form: &InvoiceForm) -> Result<(), AppError> {
        let editing = match &*self.inner.modal.read().await {
            InvoiceModal::Edit(invoice) => Some(invoice.id),
            _ => None,
        };
        form.submit(self.inner.backend.as_ref(), editing).await?;
        self.close_modal().await;
        self.refetch().await;
        Ok(())
    }

    /// Delete after the caller's confirmation step
    ///
    /// Failures are logged, never surfaced; the follow-up refetch converges
    /// the snapshot to whatever the backend holds.
    pub async fn delete_confirmed(&self, id: Uuid) {
        if let Err(e) = self.inner.backend.delete(Invoice::collection(), id).await {
            error!(error = %e, invoice_id = %id, "invoice delete failed");
        }
        self.refetch().await;
    }
}
