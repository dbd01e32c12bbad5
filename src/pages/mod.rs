//! Page controllers
//!
//! Each page owns a snapshot of fetched rows, a modal slot, and a change-feed
//! watcher. The data flow is deliberately coarse: any change event on the
//! page's collection triggers a full ordered refetch, and the snapshot is
//! replaced wholesale. No row-level patching from event payloads.
//!
//! A fetch epoch guards against stale responses: [`InvoicesPage::unmount`]
//! (and its schedules counterpart) bumps the epoch, and any fetch that
//! started under an older epoch discards its result instead of writing it.

pub mod invoices;
pub mod schedules;

pub use invoices::{InvoiceModal, InvoicesPage};
pub use schedules::{ScheduleModal, SchedulesPage};

/// Rows plus a loading flag, replaced wholesale on every refetch
#[derive(Debug, Clone)]
pub struct PageState<T> {
    pub rows: Vec<T>,
    pub loading: bool,
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            loading: true,
        }
    }
}
