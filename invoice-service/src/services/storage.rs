//! Blob storage for uploaded branding assets.
//!
//! Logo bytes live outside the document store; the business profile only
//! carries [`LogoMetadata`](crate::models::LogoMetadata) with the storage
//! key, shaped `logos/{tenant_id}/{filename}`.

use async_trait::async_trait;
use service_core::error::AppError;
use std::path::PathBuf;
use tokio::fs;

#[async_trait]
pub trait Storage: Send + Sync {
    async fn upload(&self, key: &str, data: Vec<u8>) -> Result<(), AppError>;
    async fn download(&self, key: &str) -> Result<Vec<u8>, AppError>;
    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).await?;
        }
        Ok(Self { base_path })
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload(&self, key: &str, data: Vec<u8>) -> Result<(), AppError> {
        let path = self.base_path.join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, data).await?;
        Ok(())
    }

    async fn download(&self, key: &str) -> Result<Vec<u8>, AppError> {
        let path = self.base_path.join(key);
        let data = fs::read(path).await?;
        Ok(data)
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let path = self.base_path.join(key);
        if path.exists() {
            fs::remove_file(path).await?;
        }
        Ok(())
    }
}

/// Storage key for a tenant's logo upload.
pub fn logo_storage_key(tenant_id: &str, filename: &str) -> String {
    format!("logos/{}/{}", tenant_id, filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_download_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        let key = logo_storage_key("tenant-a", "logo.png");

        storage.upload(&key, b"png bytes".to_vec()).await.unwrap();
        assert_eq!(storage.download(&key).await.unwrap(), b"png bytes");

        storage.delete(&key).await.unwrap();
        assert!(storage.download(&key).await.is_err());
    }

    #[tokio::test]
    async fn delete_of_missing_key_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        storage.delete("logos/tenant-a/missing.png").await.unwrap();
    }

    #[test]
    fn storage_keys_are_tenant_scoped() {
        assert_eq!(
            logo_storage_key("tenant-a", "logo.png"),
            "logos/tenant-a/logo.png"
        );
    }
}
