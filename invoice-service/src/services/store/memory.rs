use crate::models::{BusinessProfile, Customer, Invoice};
use crate::services::store::Store;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use service_core::error::AppError;

/// In-process store backed by concurrent maps. Used when
/// `STORE_BACKEND=memory` and by the test suite; nothing survives a
/// restart.
#[derive(Default)]
pub struct MemoryStore {
    counters: DashMap<String, u64>,
    // Keyed by (tenant_id, entity id).
    invoices: DashMap<(String, String), Invoice>,
    customers: DashMap<(String, String), Customer>,
    profiles: DashMap<String, BusinessProfile>,
    // invoice_number -> invoice id, mirroring the unique index MongoStore
    // gets from the database.
    invoice_numbers: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn increment_counter(&self, key: &str) -> Result<u64, AppError> {
        // The entry guard locks the shard for this key, so the
        // read-modify-write is atomic.
        let mut entry = self.counters.entry(key.to_string()).or_insert(0);
        *entry += 1;
        Ok(*entry)
    }

    async fn insert_invoice(&self, invoice: &Invoice) -> Result<(), AppError> {
        match self.invoice_numbers.entry(invoice.invoice_number.clone()) {
            Entry::Occupied(_) => {
                return Err(AppError::Conflict(anyhow::anyhow!(
                    "Invoice number {} already exists",
                    invoice.invoice_number
                )));
            }
            Entry::Vacant(vacant) => {
                vacant.insert(invoice.id.clone());
            }
        }
        self.invoices.insert(
            (invoice.tenant_id.clone(), invoice.id.clone()),
            invoice.clone(),
        );
        Ok(())
    }

    async fn get_invoice(&self, tenant_id: &str, id: &str) -> Result<Option<Invoice>, AppError> {
        Ok(self
            .invoices
            .get(&(tenant_id.to_string(), id.to_string()))
            .map(|entry| entry.value().clone()))
    }

    async fn list_invoices(&self, tenant_id: &str) -> Result<Vec<Invoice>, AppError> {
        let mut invoices: Vec<Invoice> = self
            .invoices
            .iter()
            .filter(|entry| entry.key().0 == tenant_id)
            .map(|entry| entry.value().clone())
            .collect();
        invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(invoices)
    }

    async fn list_invoices_by_customer(
        &self,
        tenant_id: &str,
        customer_id: &str,
    ) -> Result<Vec<Invoice>, AppError> {
        let mut invoices: Vec<Invoice> = self
            .invoices
            .iter()
            .filter(|entry| entry.key().0 == tenant_id && entry.value().customer_id == customer_id)
            .map(|entry| entry.value().clone())
            .collect();
        invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(invoices)
    }

    async fn replace_invoice(&self, invoice: &Invoice) -> Result<(), AppError> {
        self.invoices.insert(
            (invoice.tenant_id.clone(), invoice.id.clone()),
            invoice.clone(),
        );
        Ok(())
    }

    async fn delete_invoice(&self, tenant_id: &str, id: &str) -> Result<bool, AppError> {
        let removed = self
            .invoices
            .remove(&(tenant_id.to_string(), id.to_string()));
        if let Some((_, invoice)) = &removed {
            self.invoice_numbers.remove(&invoice.invoice_number);
        }
        Ok(removed.is_some())
    }

    async fn insert_customer(&self, customer: &Customer) -> Result<(), AppError> {
        self.customers.insert(
            (customer.tenant_id.clone(), customer.id.clone()),
            customer.clone(),
        );
        Ok(())
    }

    async fn get_customer(&self, tenant_id: &str, id: &str) -> Result<Option<Customer>, AppError> {
        Ok(self
            .customers
            .get(&(tenant_id.to_string(), id.to_string()))
            .map(|entry| entry.value().clone()))
    }

    async fn list_customers(&self, tenant_id: &str) -> Result<Vec<Customer>, AppError> {
        let mut customers: Vec<Customer> = self
            .customers
            .iter()
            .filter(|entry| entry.key().0 == tenant_id)
            .map(|entry| entry.value().clone())
            .collect();
        customers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(customers)
    }

    async fn replace_customer(&self, customer: &Customer) -> Result<(), AppError> {
        self.customers.insert(
            (customer.tenant_id.clone(), customer.id.clone()),
            customer.clone(),
        );
        Ok(())
    }

    async fn delete_customer(&self, tenant_id: &str, id: &str) -> Result<bool, AppError> {
        Ok(self
            .customers
            .remove(&(tenant_id.to_string(), id.to_string()))
            .is_some())
    }

    async fn get_business_profile(
        &self,
        tenant_id: &str,
    ) -> Result<Option<BusinessProfile>, AppError> {
        Ok(self
            .profiles
            .get(tenant_id)
            .map(|entry| entry.value().clone()))
    }

    async fn upsert_business_profile(&self, profile: &BusinessProfile) -> Result<(), AppError> {
        self.profiles
            .insert(profile.tenant_id.clone(), profile.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Address, CustomerStatus, InvoiceStatus, LineItem};
    use chrono::{Duration, NaiveDate, Utc};
    use rust_decimal::Decimal;

    fn sample_invoice(tenant_id: &str, id: &str, number: &str) -> Invoice {
        Invoice {
            id: id.to_string(),
            tenant_id: tenant_id.to_string(),
            invoice_number: number.to_string(),
            customer_id: "cust-1".to_string(),
            customer_name: "Acme Corp".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2026, 4, 13).unwrap(),
            status: InvoiceStatus::Pending,
            items: vec![LineItem {
                description: "Consulting".to_string(),
                quantity: Decimal::ONE,
                unit_price: Decimal::new(2550, 2),
                total: Decimal::new(2550, 2),
            }],
            subtotal: Decimal::new(2550, 2),
            tax_rate: Decimal::new(1, 1),
            tax: Decimal::new(255, 2),
            total: Decimal::new(2805, 2),
            discount: None,
            notes: None,
            sender_name: None,
            sender_address: None,
            sender_phone: None,
            sender_email: None,
            bill_to_name: None,
            bill_to_address: None,
            bill_to_phone: None,
            bill_to_email: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_customer(tenant_id: &str, id: &str) -> Customer {
        Customer {
            id: id.to_string(),
            tenant_id: tenant_id.to_string(),
            name: "Acme Corp".to_string(),
            email: "billing@acme.test".to_string(),
            phone: None,
            address: Address {
                street: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                zip_code: "62704".to_string(),
                country: "USA".to_string(),
            },
            company: None,
            notes: None,
            status: CustomerStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn counter_starts_at_one_and_increments() {
        let store = MemoryStore::new();
        assert_eq!(store.increment_counter("invoice-2026").await.unwrap(), 1);
        assert_eq!(store.increment_counter("invoice-2026").await.unwrap(), 2);
        assert_eq!(store.increment_counter("invoice-2027").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_invoice_number_is_a_conflict() {
        let store = MemoryStore::new();
        store
            .insert_invoice(&sample_invoice("tenant-a", "inv-1", "INV-2026-001"))
            .await
            .unwrap();
        let err = store
            .insert_invoice(&sample_invoice("tenant-a", "inv-2", "INV-2026-001"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn deleting_an_invoice_releases_its_number() {
        let store = MemoryStore::new();
        store
            .insert_invoice(&sample_invoice("tenant-a", "inv-1", "INV-2026-001"))
            .await
            .unwrap();
        assert!(store.delete_invoice("tenant-a", "inv-1").await.unwrap());
        store
            .insert_invoice(&sample_invoice("tenant-a", "inv-2", "INV-2026-001"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn reads_are_tenant_scoped() {
        let store = MemoryStore::new();
        store
            .insert_invoice(&sample_invoice("tenant-a", "inv-1", "INV-2026-001"))
            .await
            .unwrap();
        assert!(store
            .get_invoice("tenant-b", "inv-1")
            .await
            .unwrap()
            .is_none());
        assert!(store.list_invoices("tenant-b").await.unwrap().is_empty());
        assert!(!store.delete_invoice("tenant-b", "inv-1").await.unwrap());
    }

    #[tokio::test]
    async fn lists_are_newest_first() {
        let store = MemoryStore::new();
        let mut older = sample_invoice("tenant-a", "inv-1", "INV-2026-001");
        older.created_at = Utc::now() - Duration::hours(2);
        let newer = sample_invoice("tenant-a", "inv-2", "INV-2026-002");
        store.insert_invoice(&older).await.unwrap();
        store.insert_invoice(&newer).await.unwrap();

        let listed = store.list_invoices("tenant-a").await.unwrap();
        assert_eq!(listed[0].id, "inv-2");
        assert_eq!(listed[1].id, "inv-1");
    }

    #[tokio::test]
    async fn customer_filter_matches_customer_id() {
        let store = MemoryStore::new();
        let mut for_other = sample_invoice("tenant-a", "inv-2", "INV-2026-002");
        for_other.customer_id = "cust-2".to_string();
        store
            .insert_invoice(&sample_invoice("tenant-a", "inv-1", "INV-2026-001"))
            .await
            .unwrap();
        store.insert_invoice(&for_other).await.unwrap();

        let listed = store
            .list_invoices_by_customer("tenant-a", "cust-1")
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "inv-1");
    }

    #[tokio::test]
    async fn customers_round_trip() {
        let store = MemoryStore::new();
        store
            .insert_customer(&sample_customer("tenant-a", "cust-1"))
            .await
            .unwrap();
        let fetched = store.get_customer("tenant-a", "cust-1").await.unwrap();
        assert_eq!(fetched.unwrap().name, "Acme Corp");
        assert!(store.delete_customer("tenant-a", "cust-1").await.unwrap());
        assert!(store
            .get_customer("tenant-a", "cust-1")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn business_profile_upsert_replaces() {
        let store = MemoryStore::new();
        let mut profile = BusinessProfile::default_for_tenant("tenant-a");
        store.upsert_business_profile(&profile).await.unwrap();
        profile.business_name = "Acme LLC".to_string();
        store.upsert_business_profile(&profile).await.unwrap();

        let fetched = store
            .get_business_profile("tenant-a")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.business_name, "Acme LLC");
    }
}
