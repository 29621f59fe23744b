use crate::models::{BusinessProfile, Counter, Customer, Invoice};
use crate::services::metrics::DB_OP_DURATION;
use crate::services::store::Store;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReplaceOptions, ReturnDocument},
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

fn is_duplicate_key_error(err: &mongodb::error::Error) -> bool {
    matches!(
        *err.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) if write_error.code == 11000
    )
}

/// MongoDB-backed store. Invoice number uniqueness and counter atomicity
/// are enforced by the database: a unique index on `invoice_number` and
/// `findOneAndUpdate` with `$inc` on the counters collection.
#[derive(Clone)]
pub struct MongoStore {
    client: MongoClient,
    db: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for invoice-service");

        let counter_key_index = IndexModel::builder()
            .keys(doc! { "key": 1 })
            .options(
                IndexOptions::builder()
                    .name("counter_key_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.counters()
            .create_index(counter_key_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create key index on counters collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created unique index on counters.key");

        // Sequences are global per year, so the number index is unique
        // across tenants.
        let invoice_number_index = IndexModel::builder()
            .keys(doc! { "invoice_number": 1 })
            .options(
                IndexOptions::builder()
                    .name("invoice_number_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.invoices()
            .create_index(invoice_number_index, None)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to create invoice_number index on invoices collection: {}",
                    e
                );
                AppError::from(e)
            })?;
        tracing::info!("Created unique index on invoices.invoice_number");

        let invoice_tenant_index = IndexModel::builder()
            .keys(doc! { "tenant_id": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("tenant_recency".to_string())
                    .build(),
            )
            .build();
        self.invoices()
            .create_index(invoice_tenant_index, None)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to create tenant index on invoices collection: {}",
                    e
                );
                AppError::from(e)
            })?;
        tracing::info!("Created index on invoices.(tenant_id, created_at)");

        let invoice_customer_index = IndexModel::builder()
            .keys(doc! { "tenant_id": 1, "customer_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("tenant_customer_lookup".to_string())
                    .build(),
            )
            .build();
        self.invoices()
            .create_index(invoice_customer_index, None)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to create customer index on invoices collection: {}",
                    e
                );
                AppError::from(e)
            })?;
        tracing::info!("Created index on invoices.(tenant_id, customer_id)");

        let customer_tenant_index = IndexModel::builder()
            .keys(doc! { "tenant_id": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("tenant_recency".to_string())
                    .build(),
            )
            .build();
        self.customers()
            .create_index(customer_tenant_index, None)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to create tenant index on customers collection: {}",
                    e
                );
                AppError::from(e)
            })?;
        tracing::info!("Created index on customers.(tenant_id, created_at)");

        Ok(())
    }

    fn counters(&self) -> Collection<Counter> {
        self.db.collection("counters")
    }

    fn invoices(&self) -> Collection<Invoice> {
        self.db.collection("invoices")
    }

    fn customers(&self) -> Collection<Customer> {
        self.db.collection("customers")
    }

    fn profiles(&self) -> Collection<BusinessProfile> {
        self.db.collection("business_profiles")
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    async fn increment_counter(&self, key: &str) -> Result<u64, AppError> {
        let _timer = DB_OP_DURATION
            .with_label_values(&["increment_counter"])
            .start_timer();
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();
        let counter = self
            .counters()
            .find_one_and_update(doc! { "key": key }, doc! { "$inc": { "seq": 1_i64 } }, options)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| {
                AppError::DatabaseError(anyhow::anyhow!(
                    "Counter upsert for {} returned no document",
                    key
                ))
            })?;
        Ok(counter.seq as u64)
    }

    async fn insert_invoice(&self, invoice: &Invoice) -> Result<(), AppError> {
        let _timer = DB_OP_DURATION
            .with_label_values(&["insert_invoice"])
            .start_timer();
        self.invoices()
            .insert_one(invoice, None)
            .await
            .map_err(|e| {
                if is_duplicate_key_error(&e) {
                    AppError::Conflict(anyhow::anyhow!(
                        "Invoice number {} already exists",
                        invoice.invoice_number
                    ))
                } else {
                    AppError::from(e)
                }
            })?;
        Ok(())
    }

    async fn get_invoice(&self, tenant_id: &str, id: &str) -> Result<Option<Invoice>, AppError> {
        let _timer = DB_OP_DURATION
            .with_label_values(&["get_invoice"])
            .start_timer();
        self.invoices()
            .find_one(doc! { "_id": id, "tenant_id": tenant_id }, None)
            .await
            .map_err(AppError::from)
    }

    async fn list_invoices(&self, tenant_id: &str) -> Result<Vec<Invoice>, AppError> {
        let _timer = DB_OP_DURATION
            .with_label_values(&["list_invoices"])
            .start_timer();
        let find_options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let mut cursor = self
            .invoices()
            .find(doc! { "tenant_id": tenant_id }, find_options)
            .await
            .map_err(AppError::from)?;
        let mut invoices = Vec::new();
        while let Some(invoice) = cursor.try_next().await.map_err(AppError::from)? {
            invoices.push(invoice);
        }
        Ok(invoices)
    }

    async fn list_invoices_by_customer(
        &self,
        tenant_id: &str,
        customer_id: &str,
    ) -> Result<Vec<Invoice>, AppError> {
        let _timer = DB_OP_DURATION
            .with_label_values(&["list_invoices_by_customer"])
            .start_timer();
        let find_options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let mut cursor = self
            .invoices()
            .find(
                doc! { "tenant_id": tenant_id, "customer_id": customer_id },
                find_options,
            )
            .await
            .map_err(AppError::from)?;
        let mut invoices = Vec::new();
        while let Some(invoice) = cursor.try_next().await.map_err(AppError::from)? {
            invoices.push(invoice);
        }
        Ok(invoices)
    }

    async fn replace_invoice(&self, invoice: &Invoice) -> Result<(), AppError> {
        let _timer = DB_OP_DURATION
            .with_label_values(&["replace_invoice"])
            .start_timer();
        self.invoices()
            .replace_one(
                doc! { "_id": &invoice.id, "tenant_id": &invoice.tenant_id },
                invoice,
                None,
            )
            .await
            .map_err(AppError::from)?;
        Ok(())
    }

    async fn delete_invoice(&self, tenant_id: &str, id: &str) -> Result<bool, AppError> {
        let _timer = DB_OP_DURATION
            .with_label_values(&["delete_invoice"])
            .start_timer();
        let result = self
            .invoices()
            .delete_one(doc! { "_id": id, "tenant_id": tenant_id }, None)
            .await
            .map_err(AppError::from)?;
        Ok(result.deleted_count > 0)
    }

    async fn insert_customer(&self, customer: &Customer) -> Result<(), AppError> {
        let _timer = DB_OP_DURATION
            .with_label_values(&["insert_customer"])
            .start_timer();
        self.customers()
            .insert_one(customer, None)
            .await
            .map_err(AppError::from)?;
        Ok(())
    }

    async fn get_customer(&self, tenant_id: &str, id: &str) -> Result<Option<Customer>, AppError> {
        let _timer = DB_OP_DURATION
            .with_label_values(&["get_customer"])
            .start_timer();
        self.customers()
            .find_one(doc! { "_id": id, "tenant_id": tenant_id }, None)
            .await
            .map_err(AppError::from)
    }

    async fn list_customers(&self, tenant_id: &str) -> Result<Vec<Customer>, AppError> {
        let _timer = DB_OP_DURATION
            .with_label_values(&["list_customers"])
            .start_timer();
        let find_options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let mut cursor = self
            .customers()
            .find(doc! { "tenant_id": tenant_id }, find_options)
            .await
            .map_err(AppError::from)?;
        let mut customers = Vec::new();
        while let Some(customer) = cursor.try_next().await.map_err(AppError::from)? {
            customers.push(customer);
        }
        Ok(customers)
    }

    async fn replace_customer(&self, customer: &Customer) -> Result<(), AppError> {
        let _timer = DB_OP_DURATION
            .with_label_values(&["replace_customer"])
            .start_timer();
        self.customers()
            .replace_one(
                doc! { "_id": &customer.id, "tenant_id": &customer.tenant_id },
                customer,
                None,
            )
            .await
            .map_err(AppError::from)?;
        Ok(())
    }

    async fn delete_customer(&self, tenant_id: &str, id: &str) -> Result<bool, AppError> {
        let _timer = DB_OP_DURATION
            .with_label_values(&["delete_customer"])
            .start_timer();
        let result = self
            .customers()
            .delete_one(doc! { "_id": id, "tenant_id": tenant_id }, None)
            .await
            .map_err(AppError::from)?;
        Ok(result.deleted_count > 0)
    }

    async fn get_business_profile(
        &self,
        tenant_id: &str,
    ) -> Result<Option<BusinessProfile>, AppError> {
        let _timer = DB_OP_DURATION
            .with_label_values(&["get_business_profile"])
            .start_timer();
        self.profiles()
            .find_one(doc! { "_id": tenant_id }, None)
            .await
            .map_err(AppError::from)
    }

    async fn upsert_business_profile(&self, profile: &BusinessProfile) -> Result<(), AppError> {
        let _timer = DB_OP_DURATION
            .with_label_values(&["upsert_business_profile"])
            .start_timer();
        let options = ReplaceOptions::builder().upsert(true).build();
        self.profiles()
            .replace_one(doc! { "_id": &profile.tenant_id }, profile, options)
            .await
            .map_err(AppError::from)?;
        Ok(())
    }
}
