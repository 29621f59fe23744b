use crate::config::{InvoiceConfig, StoreBackend};
use crate::handlers;
use crate::middleware::metrics_middleware;
use crate::services::storage::{LocalStorage, Storage};
use crate::services::store::{MemoryStore, MongoStore, Store};
use axum::{
    routing::{get, put},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::security_headers_middleware;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: InvoiceConfig,
    pub store: Arc<dyn Store>,
    pub storage: Arc<dyn Storage>,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    pub async fn build(config: InvoiceConfig) -> Result<Self, AppError> {
        let store: Arc<dyn Store> = match config.store.backend {
            StoreBackend::Memory => {
                tracing::info!("Using in-memory store");
                Arc::new(MemoryStore::new())
            }
            StoreBackend::Mongodb => {
                let uri = config.store.mongodb_uri.as_deref().ok_or_else(|| {
                    AppError::ConfigError(anyhow::anyhow!(
                        "MONGODB_URI is required for the mongodb backend"
                    ))
                })?;
                let mongo = MongoStore::connect(uri, &config.store.mongodb_database)
                    .await
                    .map_err(|e| {
                        tracing::error!("Failed to connect to MongoDB: {}", e);
                        e
                    })?;
                mongo.initialize_indexes().await.map_err(|e| {
                    tracing::error!("Failed to initialize database indexes: {}", e);
                    e
                })?;
                Arc::new(mongo)
            }
        };

        let storage: Arc<dyn Storage> = Arc::new(
            LocalStorage::new(&config.storage.local_path)
                .await
                .map_err(|e| {
                    tracing::error!(
                        "Failed to initialize local storage at {}: {}",
                        config.storage.local_path,
                        e
                    );
                    e
                })?,
        );

        let state = AppState {
            config: config.clone(),
            store,
            storage,
        };

        let api = Router::new()
            .route(
                "/customers",
                get(handlers::list_customers).post(handlers::create_customer),
            )
            .route(
                "/customers/:id",
                get(handlers::get_customer)
                    .put(handlers::update_customer)
                    .delete(handlers::delete_customer),
            )
            .route(
                "/invoices",
                get(handlers::list_invoices).post(handlers::create_invoice),
            )
            .route(
                "/invoices/:id",
                get(handlers::get_invoice)
                    .put(handlers::update_invoice)
                    .delete(handlers::delete_invoice),
            )
            .route(
                "/invoices/customer/:customer_id",
                get(handlers::list_invoices_by_customer),
            )
            .route("/invoices/:id/pdf", get(handlers::download_invoice_pdf))
            .route(
                "/business-profile",
                get(handlers::get_business_profile).put(handlers::update_business_profile),
            )
            .route(
                "/business-profile/invoice-settings",
                put(handlers::update_invoice_settings),
            )
            .route("/business-profile/branding", put(handlers::update_branding))
            .route(
                "/business-profile/logo",
                get(handlers::get_logo).delete(handlers::delete_logo),
            );

        let app = Router::new()
            .route("/health", get(handlers::health_check))
            .route("/ready", get(handlers::readiness_check))
            .route("/metrics", get(handlers::metrics_endpoint))
            .nest("/api", api)
            .layer(axum::middleware::from_fn(metrics_middleware))
            .layer(axum::middleware::from_fn(security_headers_middleware))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
