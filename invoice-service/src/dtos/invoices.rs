use crate::models::{Invoice, InvoiceStatus, LineItem};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn validate_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        Err(validation_error("positive", "must be greater than zero"))
    }
}

fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value >= Decimal::ZERO {
        Ok(())
    } else {
        Err(validation_error("non_negative", "must not be negative"))
    }
}

fn validate_fraction(value: &Decimal) -> Result<(), ValidationError> {
    if *value >= Decimal::ZERO && *value <= Decimal::ONE {
        Ok(())
    } else {
        Err(validation_error(
            "fraction",
            "tax rate must be a fraction between 0 and 1",
        ))
    }
}

/// Line item as submitted by the client. The line total is always derived
/// server-side, so there is no field for it here.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LineItemDto {
    #[validate(length(min = 1, max = 200, message = "Description must be 1 to 200 characters"))]
    pub description: String,
    #[validate(custom(function = "validate_positive"))]
    pub quantity: Decimal,
    #[validate(custom(function = "validate_non_negative"))]
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    #[validate(length(min = 1, message = "Customer id is required"))]
    pub customer_id: String,
    /// Issue date; defaults to today. Also selects the numbering sequence
    /// year.
    pub date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    #[validate(length(min = 1, message = "At least one line item is required"), nested)]
    pub items: Vec<LineItemDto>,
    /// Fraction (0.1 means 10%). Falls back to the tenant's configured
    /// default tax rate.
    #[validate(custom(function = "validate_fraction"))]
    pub tax_rate: Option<Decimal>,
    #[validate(custom(function = "validate_non_negative"))]
    pub discount: Option<Decimal>,
    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
    // Optional overrides for the sender snapshot; the business profile
    // fills whatever is not supplied.
    #[validate(length(max = 100))]
    pub sender_name: Option<String>,
    #[validate(length(max = 200))]
    pub sender_address: Option<String>,
    #[validate(length(max = 20))]
    pub sender_phone: Option<String>,
    #[validate(length(max = 100))]
    pub sender_email: Option<String>,
    #[validate(length(max = 100))]
    pub bill_to_name: Option<String>,
    #[validate(length(max = 200))]
    pub bill_to_address: Option<String>,
    #[validate(length(max = 20))]
    pub bill_to_phone: Option<String>,
    #[validate(length(max = 100))]
    pub bill_to_email: Option<String>,
}

/// Partial update. `invoice_number`, `date`, and the party snapshots are
/// immutable and have no fields here. Totals are recomputed whenever
/// `items` or `tax_rate` is supplied.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateInvoiceRequest {
    pub status: Option<InvoiceStatus>,
    pub due_date: Option<NaiveDate>,
    #[validate(length(min = 1, message = "At least one line item is required"), nested)]
    pub items: Option<Vec<LineItemDto>>,
    #[validate(custom(function = "validate_fraction"))]
    pub tax_rate: Option<Decimal>,
    #[validate(custom(function = "validate_non_negative"))]
    pub discount: Option<Decimal>,
    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub id: String,
    pub invoice_number: String,
    pub customer_id: String,
    pub customer_name: String,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub tax_rate: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub discount: Option<Decimal>,
    pub notes: Option<String>,
    pub sender_name: Option<String>,
    pub sender_address: Option<String>,
    pub sender_phone: Option<String>,
    pub sender_email: Option<String>,
    pub bill_to_name: Option<String>,
    pub bill_to_address: Option<String>,
    pub bill_to_phone: Option<String>,
    pub bill_to_email: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id,
            invoice_number: invoice.invoice_number,
            customer_id: invoice.customer_id,
            customer_name: invoice.customer_name,
            date: invoice.date,
            due_date: invoice.due_date,
            status: invoice.status,
            items: invoice.items,
            subtotal: invoice.subtotal,
            tax_rate: invoice.tax_rate,
            tax: invoice.tax,
            total: invoice.total,
            discount: invoice.discount,
            notes: invoice.notes,
            sender_name: invoice.sender_name,
            sender_address: invoice.sender_address,
            sender_phone: invoice.sender_phone,
            sender_email: invoice.sender_email,
            bill_to_name: invoice.bill_to_name,
            bill_to_address: invoice.bill_to_address,
            bill_to_phone: invoice.bill_to_phone,
            bill_to_email: invoice.bill_to_email,
            created_at: invoice.created_at.to_rfc3339(),
            updated_at: invoice.updated_at.to_rfc3339(),
        }
    }
}
