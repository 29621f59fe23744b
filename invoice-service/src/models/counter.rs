//! Named sequence counter backing invoice number allocation.

use serde::{Deserialize, Serialize};

/// One counter per key (for invoice numbers: `invoice-{year}`). Counters
/// are created on first increment and only ever move forward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counter {
    pub key: String,
    pub seq: i64,
}
