//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Object storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Upload behaviour.
    #[serde(default)]
    pub upload: UploadSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Object storage configuration.
///
/// Which fields are required depends on `provider`:
/// - `s3`: `endpoint`, `bucket`, `access_key_id`, `secret_access_key`, `region`
/// - `azure_blob`: `account`, `access_key`, `bucket` (container name)
/// - `local`: `root`
/// - `memory`: nothing
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Backend kind: `s3`, `azure_blob`, `local` or `memory`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// S3 endpoint URL.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Bucket (or Azure container) name.
    #[serde(default)]
    pub bucket: Option<String>,
    /// S3 region.
    #[serde(default = "default_region")]
    pub region: String,
    /// S3 access key ID.
    #[serde(default)]
    pub access_key_id: Option<String>,
    /// S3 secret access key.
    #[serde(default)]
    pub secret_access_key: Option<String>,
    /// Azure storage account name.
    #[serde(default)]
    pub account: Option<String>,
    /// Azure storage access key.
    #[serde(default)]
    pub access_key: Option<String>,
    /// Root directory for the local filesystem backend.
    #[serde(default = "default_root")]
    pub root: String,
    /// Base URL public object URLs are built from.
    #[serde(default)]
    pub public_base_url: Option<String>,
    /// Largest object accepted, in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: None,
            bucket: None,
            region: default_region(),
            access_key_id: None,
            secret_access_key: None,
            account: None,
            access_key: None,
            root: default_root(),
            public_base_url: None,
            max_file_size: default_max_file_size(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_region() -> String {
    "auto".to_string()
}

fn default_root() -> String {
    "./uploads".to_string()
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024 // 10 MiB
}

/// Upload behaviour.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    /// Images wider than this are scaled down to it on multi-file upload.
    #[serde(default = "default_resize_width")]
    pub resize_width: u32,
    /// Maximum request body size accepted by the upload routes, in bytes.
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            resize_width: default_resize_width(),
            body_limit: default_body_limit(),
        }
    }
}

fn default_resize_width() -> u32 {
    400
}

fn default_body_limit() -> usize {
    20 * 1024 * 1024 // 20 MiB
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("IMGUP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.provider, "local");
        assert_eq!(config.storage.root, "./uploads");
        assert_eq!(config.storage.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.upload.resize_width, 400);
        assert!(config.storage.bucket.is_none());
    }

    #[test]
    fn test_load_from_env() {
        temp_env::with_vars(
            [
                ("IMGUP__SERVER__PORT", Some("9090")),
                ("IMGUP__STORAGE__PROVIDER", Some("s3")),
                ("IMGUP__STORAGE__BUCKET", Some("images")),
                ("IMGUP__UPLOAD__RESIZE_WIDTH", Some("320")),
            ],
            || {
                let config = AppConfig::load().expect("config should load");
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.storage.provider, "s3");
                assert_eq!(config.storage.bucket.as_deref(), Some("images"));
                assert_eq!(config.storage.region, "auto");
                assert_eq!(config.upload.resize_width, 320);
            },
        );
    }
}
