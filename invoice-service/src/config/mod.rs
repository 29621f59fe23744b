use serde::Deserialize;
use service_core::config::{self as core_config, get_env, is_production};
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub store: StoreConfig,
    pub storage: StorageConfig,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub mongodb_uri: Option<String>,
    pub mongodb_database: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Mongodb,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub local_path: String,
}

impl InvoiceConfig {
    pub fn load() -> Result<Self, AppError> {
        // Common config handles .env and the APP__ prefix.
        let common = core_config::Config::load()?;
        let is_prod = is_production();

        let backend: StoreBackend = get_env("STORE_BACKEND", Some("memory"), is_prod)?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        // The connection string is only required when the mongodb backend
        // is selected.
        let mongodb_uri = if backend == StoreBackend::Mongodb {
            Some(get_env("MONGODB_URI", None, is_prod)?)
        } else {
            env::var("MONGODB_URI").ok()
        };

        Ok(InvoiceConfig {
            common,
            store: StoreConfig {
                backend,
                mongodb_uri,
                mongodb_database: get_env("MONGODB_DATABASE", Some("invoice_db"), is_prod)?,
            },
            storage: StorageConfig {
                local_path: get_env("STORAGE_LOCAL_PATH", Some("storage"), is_prod)?,
            },
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok(),
        })
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "mongodb" => Ok(StoreBackend::Mongodb),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}
