pub mod billing;
pub mod metrics;
pub mod numbering;
pub mod pdf;
pub mod storage;
pub mod store;
