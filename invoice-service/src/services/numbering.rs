//! Invoice number allocation.
//!
//! Numbers follow `{prefix}-{year}-{seq}` where the sequence is at least
//! three digits and strictly increasing per year. Uniqueness is guaranteed
//! by the store's atomic counter increment, so two concurrent allocations
//! can never observe the same sequence value.

use crate::services::store::Store;
use service_core::error::AppError;
use std::sync::Arc;

/// Counter key for a given invoice year.
pub fn counter_key(year: i32) -> String {
    format!("invoice-{}", year)
}

/// Format a sequence value as a full invoice number. Sequences below 1000
/// are zero-padded to three digits; larger ones widen naturally.
pub fn format_invoice_number(prefix: &str, year: i32, seq: u64) -> String {
    format!("{}-{}-{:03}", prefix, year, seq)
}

#[derive(Clone)]
pub struct InvoiceNumberAllocator {
    store: Arc<dyn Store>,
}

impl InvoiceNumberAllocator {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Reserve the next invoice number for `year`. The underlying counter
    /// increment commits even if the caller later fails, so a crashed
    /// request burns a sequence value rather than risking a duplicate.
    #[tracing::instrument(skip(self))]
    pub async fn allocate(&self, prefix: &str, year: i32) -> Result<String, AppError> {
        let key = counter_key(year);
        let seq = self
            .store
            .increment_counter(&key)
            .await
            .map_err(|err| AppError::NumberingFailed(anyhow::anyhow!(err)))?;
        let number = format_invoice_number(prefix, year, seq);
        tracing::debug!(invoice_number = %number, "allocated invoice number");
        Ok(number)
    }
}
