//! Tenant-scoped persistence behind the [`Store`] trait.
//!
//! Two backends: [`MemoryStore`] for local development and tests, and
//! [`MongoStore`] for deployments. Every read and write is scoped by
//! tenant id; counters are the one shared namespace because invoice
//! sequences are global per year.

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use crate::models::{BusinessProfile, Customer, Invoice};
use async_trait::async_trait;
use service_core::error::AppError;

#[async_trait]
pub trait Store: Send + Sync {
    async fn health_check(&self) -> Result<(), AppError>;

    /// Atomically increment the named counter and return the new value.
    /// The first increment of a fresh key returns 1.
    async fn increment_counter(&self, key: &str) -> Result<u64, AppError>;

    /// Fails with [`AppError::Conflict`] when the invoice number is
    /// already taken.
    async fn insert_invoice(&self, invoice: &Invoice) -> Result<(), AppError>;
    async fn get_invoice(&self, tenant_id: &str, id: &str) -> Result<Option<Invoice>, AppError>;
    /// Newest first.
    async fn list_invoices(&self, tenant_id: &str) -> Result<Vec<Invoice>, AppError>;
    async fn list_invoices_by_customer(
        &self,
        tenant_id: &str,
        customer_id: &str,
    ) -> Result<Vec<Invoice>, AppError>;
    async fn replace_invoice(&self, invoice: &Invoice) -> Result<(), AppError>;
    /// Returns false when no invoice matched.
    async fn delete_invoice(&self, tenant_id: &str, id: &str) -> Result<bool, AppError>;

    async fn insert_customer(&self, customer: &Customer) -> Result<(), AppError>;
    async fn get_customer(&self, tenant_id: &str, id: &str) -> Result<Option<Customer>, AppError>;
    /// Newest first.
    async fn list_customers(&self, tenant_id: &str) -> Result<Vec<Customer>, AppError>;
    async fn replace_customer(&self, customer: &Customer) -> Result<(), AppError>;
    async fn delete_customer(&self, tenant_id: &str, id: &str) -> Result<bool, AppError>;

    async fn get_business_profile(
        &self,
        tenant_id: &str,
    ) -> Result<Option<BusinessProfile>, AppError>;
    async fn upsert_business_profile(&self, profile: &BusinessProfile) -> Result<(), AppError>;
}
