//! Read-time view projections
//!
//! Pure functions from fetched records to display structures; nothing here
//! re-fetches, re-sorts beyond what is specified, or holds state.

pub mod invoices;
pub mod schedules;

pub use invoices::{EMPTY_INVOICES, InvoiceRowView, format_amount, invoice_rows};
pub use schedules::{
    EMPTY_SCHEDULES, EmployeeGroup, NO_DESCRIPTION, ShiftView, UNNAMED, group_schedules,
};
