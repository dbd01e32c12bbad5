//! Invoice table projection

use crate::model::Invoice;
use uuid::Uuid;

/// Message shown when the invoice collection is empty
pub const EMPTY_INVOICES: &str = "No invoices yet.";

/// One rendered table row
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceRowView {
    pub id: Uuid,
    pub date: String,
    pub supplier_name: String,
    pub quantity: u32,
    /// Two-decimal dollar display, e.g. `$250.50`
    pub amount: String,
}

/// Format a dollar amount for display
pub fn format_amount(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Project fetched invoices into table rows
///
/// Rows keep the fetch order (the query already sorts by date descending);
/// no client-side re-sort.
pub fn invoice_rows(invoices: &[Invoice]) -> Vec<InvoiceRowView> {
    invoices
        .iter()
        .map(|invoice| InvoiceRowView {
            id: invoice.id,
            date: invoice.date.to_string(),
            supplier_name: invoice.supplier_name.clone(),
            quantity: invoice.quantity,
            amount: format_amount(invoice.dollar_amount),
        })
        .collect()
}
