//! Invoice model for invoice-service.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Invoice lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::Pending
    }
}

/// Line item on an invoice. `total` is always derived from quantity and
/// unit price, never taken from the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total: Decimal,
}

/// Invoice document. Sender and bill-to fields are snapshots taken at
/// creation time and are not refreshed when the profile or customer
/// changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(rename = "_id")]
    pub id: String,
    pub tenant_id: String,
    pub invoice_number: String,
    pub customer_id: String,
    pub customer_name: String,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub items: Vec<LineItem>,
    pub subtotal: Decimal,
    /// Tax rate as a fraction (0.1 means 10%).
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
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}
