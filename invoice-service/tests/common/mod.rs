use invoice_service::config::{InvoiceConfig, StorageConfig, StoreBackend, StoreConfig};
use invoice_service::startup::Application;
use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;

pub const TEST_TENANT_ID: &str = "test-tenant-1";
pub const TEST_USER_ID: &str = "test_user_123";

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    // Dropped with the app, removing the storage directory.
    _storage_dir: tempfile::TempDir,
}

impl TestApp {
    /// Spawn the service on a random port with the in-memory store, so no
    /// test needs MongoDB or any other external process.
    pub async fn spawn() -> Self {
        let storage_dir = tempfile::tempdir().expect("Failed to create storage dir");

        let config = InvoiceConfig {
            common: CoreConfig { port: 0 },
            store: StoreConfig {
                backend: StoreBackend::Memory,
                mongodb_uri: None,
                mongodb_database: "invoice_test".to_string(),
            },
            storage: StorageConfig {
                local_path: storage_dir.path().to_string_lossy().into_owned(),
            },
            otlp_endpoint: None,
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        TestApp {
            address,
            client: reqwest::Client::new(),
            _storage_dir: storage_dir,
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{}", self.address, path))
            .header("X-Tenant-ID", TEST_TENANT_ID)
            .header("X-User-ID", TEST_USER_ID)
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}{}", self.address, path))
            .header("X-Tenant-ID", TEST_TENANT_ID)
            .header("X-User-ID", TEST_USER_ID)
    }

    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .put(format!("{}{}", self.address, path))
            .header("X-Tenant-ID", TEST_TENANT_ID)
            .header("X-User-ID", TEST_USER_ID)
    }

    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .delete(format!("{}{}", self.address, path))
            .header("X-Tenant-ID", TEST_TENANT_ID)
            .header("X-User-ID", TEST_USER_ID)
    }

    /// Create a customer and return its id.
    pub async fn create_customer(&self, name: &str) -> String {
        let response = self
            .post("/api/customers")
            .json(&json!({
                "name": name,
                "email": "billing@acme.test",
                "phone": "555-0100",
                "address": {
                    "street": "1 Main St",
                    "city": "Springfield",
                    "state": "IL",
                    "zip_code": "62704"
                }
            }))
            .send()
            .await
            .expect("Failed to create customer");
        assert_eq!(response.status().as_u16(), 201);
        let body: Value = response.json().await.expect("Failed to parse JSON");
        body["id"].as_str().expect("Missing customer id").to_string()
    }

    /// Create an invoice for `customer_id` and return the response body.
    pub async fn create_invoice(&self, customer_id: &str, items: Value) -> Value {
        let response = self
            .post("/api/invoices")
            .json(&json!({
                "customer_id": customer_id,
                "items": items
            }))
            .send()
            .await
            .expect("Failed to create invoice");
        assert_eq!(response.status().as_u16(), 201);
        response.json().await.expect("Failed to parse JSON")
    }
}
