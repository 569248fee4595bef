//! Storage service implementation using Apache OpenDAL.

use bytes::Bytes;
use opendal::{Builder, Operator, services};
use tracing::{debug, warn};

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;
use super::store::{ObjectAcl, ObjectMetadata, ObjectStore};

/// OpenDAL-backed object store.
#[derive(Debug, Clone)]
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        if config.provider.ignores_object_acl() {
            warn!(
                provider = config.provider.name(),
                bucket = config.provider.bucket(),
                "Per-object ACLs are not applied; bucket policy governs object visibility"
            );
        }
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => build(
                services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region),
            ),
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => build(
                services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container),
            ),
            StorageProvider::LocalFs { root } => build(
                services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                ),
            ),
            StorageProvider::Memory => build(services::Memory::default()),
        }
    }

    /// Check an object against config constraints before writing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the object is too large.
    pub fn validate_put(&self, key: &str, size: u64) -> Result<(), StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey("key must not be empty".to_string()));
        }

        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(
                size,
                self.config.max_file_size,
            ));
        }

        Ok(())
    }

    /// Check if an object exists in storage.
    pub async fn exists(&self, key: &str) -> bool {
        self.operator.stat(key).await.is_ok()
    }

    /// Read an object back in full.
    ///
    /// # Errors
    ///
    /// Returns an error if the object does not exist or cannot be read.
    pub async fn read(&self, key: &str) -> Result<Bytes, StorageError> {
        let buffer = self.operator.read(key).await.map_err(StorageError::from)?;
        Ok(buffer.to_bytes())
    }

    /// List the keys of every stored object, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot list the bucket.
    pub async fn list_keys(&self) -> Result<Vec<String>, StorageError> {
        let entries = self.operator.list("/").await.map_err(StorageError::from)?;
        let mut keys: Vec<String> = entries
            .into_iter()
            .filter(|entry| entry.metadata().is_file())
            .map(|entry| entry.path().trim_start_matches('/').to_string())
            .collect();
        keys.sort();
        Ok(keys)
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the bucket/container name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        self.config.provider.bucket()
    }
}

impl ObjectStore for StorageService {
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        metadata: &ObjectMetadata,
        acl: ObjectAcl,
    ) -> Result<(), StorageError> {
        self.validate_put(key, metadata.content_length)?;

        // OpenDAL has no canned-ACL write option; visibility follows the
        // bucket policy.
        debug!(
            key,
            content_length = metadata.content_length,
            content_type = metadata.content_type.as_deref(),
            acl = acl.as_canned(),
            provider = self.provider_name(),
            "Writing object"
        );

        let mut write = self.operator.write_with(key, body);
        if let Some(content_type) = metadata.content_type.as_deref() {
            write = write.content_type(content_type);
        }
        write.await.map_err(StorageError::from)?;

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        self.config.public_url(key)
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey("key must not be empty".to_string()));
        }

        debug!(key, provider = self.provider_name(), "Deleting object");
        self.operator.delete(key).await.map_err(StorageError::from)
    }
}

fn build<B: Builder>(builder: B) -> Result<Operator, StorageError> {
    Ok(Operator::new(builder)
        .map_err(|e| StorageError::configuration(e.to_string()))?
        .finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_service() -> StorageService {
        let config = StorageConfig::new(StorageProvider::Memory)
            .with_max_file_size(1024)
            .with_public_base_url("https://images.example.com/bucket");
        StorageService::from_config(config).expect("should create service")
    }

    #[test]
    fn test_from_config_local_fs() {
        let config = StorageConfig::new(StorageProvider::local_fs("./test_uploads"));
        let service = StorageService::from_config(config).expect("should create service");
        assert_eq!(service.provider_name(), "local");
    }

    #[test]
    fn test_validate_put_size() {
        let service = memory_service();

        assert!(service.validate_put("a.png", 512).is_ok());
        assert!(service.validate_put("a.png", 1024).is_ok());

        let err = service.validate_put("a.png", 2048).unwrap_err();
        assert!(matches!(
            err,
            StorageError::FileTooLarge {
                size: 2048,
                max: 1024
            }
        ));
    }

    #[test]
    fn test_validate_put_empty_key() {
        let service = memory_service();
        let err = service.validate_put("", 1).unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn test_put_then_read() {
        let service = memory_service();
        let body = Bytes::from_static(b"not really a png");
        let metadata = ObjectMetadata::new(body.len() as u64)
            .with_content_type(Some("image/png".to_string()));

        service
            .put_object("abc.png", body.clone(), &metadata, ObjectAcl::PublicRead)
            .await
            .expect("put should succeed");

        assert!(service.exists("abc.png").await);
        assert_eq!(service.read("abc.png").await.expect("read"), body);
    }

    #[tokio::test]
    async fn test_put_rejects_oversized_object_before_writing() {
        let service = memory_service();
        let body = Bytes::from(vec![0u8; 2048]);
        let metadata = ObjectMetadata::new(2048);

        let err = service
            .put_object("big.png", body, &metadata, ObjectAcl::Default)
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::FileTooLarge { .. }));
        assert!(!service.exists("big.png").await);
    }

    #[tokio::test]
    async fn test_list_keys() {
        let service = memory_service();
        assert!(service.list_keys().await.expect("list").is_empty());

        for key in ["b.png", "a.jpg"] {
            service
                .put_object(key, Bytes::from_static(b"abc"), &ObjectMetadata::new(3), ObjectAcl::Default)
                .await
                .expect("put should succeed");
        }

        assert_eq!(service.list_keys().await.expect("list"), vec!["a.jpg", "b.png"]);
    }

    #[tokio::test]
    async fn test_delete_missing_key_succeeds() {
        let service = memory_service();
        service
            .delete_object("abc123.png")
            .await
            .expect("deleting a missing key should succeed");
    }

    #[tokio::test]
    async fn test_delete_removes_object() {
        let service = memory_service();
        let metadata = ObjectMetadata::new(3);
        service
            .put_object("gone.png", Bytes::from_static(b"abc"), &metadata, ObjectAcl::Default)
            .await
            .expect("put should succeed");

        service.delete_object("gone.png").await.expect("delete");
        assert!(!service.exists("gone.png").await);
    }

    #[test]
    fn test_public_url() {
        let service = memory_service();
        assert_eq!(
            service.public_url("abc.png"),
            "https://images.example.com/bucket/abc.png"
        );
    }
}
