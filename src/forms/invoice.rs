//! Invoice create/update form

use crate::backend::Backend;
use crate::core::{AppError, ValidationError};
use crate::forms::parse_date;
use crate::model::{Invoice, OTHER_SUPPLIER, Record, SUPPLIERS};
use serde_json::{Value, json};
use uuid::Uuid;

/// Collects invoice input: date, supplier (fixed list plus an "Other"
/// free-text escape), quantity, and dollar amount
///
/// Quantity and amount arrive as the raw strings the inputs hold and are
/// converted to numeric types on submit.
#[derive(Debug, Clone, Default)]
pub struct InvoiceForm {
    pub date: String,
    /// One of [`SUPPLIERS`]; [`OTHER_SUPPLIER`] enables the custom field
    pub supplier_choice: String,
    pub custom_supplier: String,
    pub quantity: String,
    pub dollar_amount: String,
}

impl InvoiceForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill from an existing invoice for editing
    ///
    /// A supplier not on the fixed list maps back to "Other" with the custom
    /// field holding the stored name.
    pub fn prefill(invoice: &Invoice) -> Self {
        let (supplier_choice, custom_supplier) =
            if SUPPLIERS.contains(&invoice.supplier_name.as_str()) {
                (invoice.supplier_name.clone(), String::new())
            } else {
                (OTHER_SUPPLIER.to_string(), invoice.supplier_name.clone())
            };
        Self {
            date: invoice.date.to_string(),
            supplier_choice,
            custom_supplier,
            quantity: invoice.quantity.to_string(),
            dollar_amount: invoice.dollar_amount.to_string(),
        }
    }

    /// Resolve the final supplier string
    ///
    /// "Other" resolves to the typed custom value, which must be non-blank.
    fn resolved_supplier(&self) -> Result<String, ValidationError> {
        if self.supplier_choice.is_empty() {
            return Err(ValidationError::MissingField { field: "supplier" });
        }
        if self.supplier_choice == OTHER_SUPPLIER {
            if self.custom_supplier.trim().is_empty() {
                return Err(ValidationError::CustomSupplierRequired);
            }
            Ok(self.custom_supplier.clone())
        } else {
            Ok(self.supplier_choice.clone())
        }
    }

    /// Validate and translate to a persistence row
    fn validate(&self) -> Result<Value, ValidationError> {
        let supplier_name = self.resolved_supplier()?;
        let date = parse_date("date", &self.date)?;

        let quantity: u32 =
            self.quantity
                .trim()
                .parse()
                .map_err(|_| ValidationError::InvalidNumber {
                    field: "quantity",
                    value: self.quantity.clone(),
                })?;

        let dollar_amount: f64 =
            self.dollar_amount
                .trim()
                .parse()
                .ok()
                .filter(|v: &f64| v.is_finite() && *v >= 0.0)
                .ok_or_else(|| ValidationError::InvalidNumber {
                    field: "dollar amount",
                    value: self.dollar_amount.clone(),
                })?;

        Ok(json!({
            "date": date,
            "supplier_name": supplier_name,
            "quantity": quantity,
            "dollar_amount": dollar_amount,
        }))
    }

    /// Submit as a new invoice (`editing` absent) or update-by-id
    ///
    /// Backend failures come back with the backend's message so the caller
    /// can render it inline and keep the form populated.
    pub async fn submit(
        &self,
        backend: &dyn Backend,
        editing: Option<Uuid>,
    ) -> Result<(), AppError> {
        let row = self.validate()?;
        match editing {
            Some(id) => backend.update(Invoice::collection(), id, row).await?,
            None => backend.insert(Invoice::collection(), vec![row]).await?,
        }
        Ok(())
    }
}
