//! Imgup API Server
//!
//! Main entry point for the image upload service.

use std::sync::Arc;

use anyhow::{Context, bail};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imgup_api::{AppState, create_router};
use imgup_core::storage::{StorageConfig, StorageProvider, StorageService};
use imgup_core::upload::UploadService;
use imgup_shared::{AppConfig, StorageSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "imgup=debug,imgup_api=debug,imgup_core=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Create storage service
    let storage = StorageService::from_config(storage_config(&config.storage)?)?;
    info!(
        provider = storage.provider_name(),
        bucket = storage.bucket(),
        "Storage configured"
    );

    // Create upload service
    let uploads =
        UploadService::new(Arc::new(storage)).with_resize_width(config.upload.resize_width);

    // Create application state
    let state = AppState {
        uploads: Arc::new(uploads),
        body_limit: config.upload.body_limit,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the storage config described by the `storage` settings section.
fn storage_config(settings: &StorageSettings) -> anyhow::Result<StorageConfig> {
    fn required<'a>(value: Option<&'a String>, name: &str) -> anyhow::Result<&'a String> {
        value.with_context(|| format!("storage.{name} is required"))
    }

    let provider = match settings.provider.as_str() {
        "s3" => StorageProvider::s3(
            required(settings.endpoint.as_ref(), "endpoint")?,
            required(settings.bucket.as_ref(), "bucket")?,
            required(settings.access_key_id.as_ref(), "access_key_id")?,
            required(settings.secret_access_key.as_ref(), "secret_access_key")?,
            settings.region.as_str(),
        ),
        "azure_blob" => StorageProvider::azure_blob(
            required(settings.account.as_ref(), "account")?,
            required(settings.access_key.as_ref(), "access_key")?,
            required(settings.bucket.as_ref(), "bucket")?,
        ),
        "local" => StorageProvider::local_fs(settings.root.as_str()),
        "memory" => StorageProvider::Memory,
        other => bail!("unknown storage provider: {other}"),
    };

    let mut config = StorageConfig::new(provider).with_max_file_size(settings.max_file_size);
    if let Some(url) = &settings.public_base_url {
        config = config.with_public_base_url(url.as_str());
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_s3() {
        let settings = StorageSettings {
            provider: "s3".to_string(),
            endpoint: Some("https://s3.amazonaws.com".to_string()),
            bucket: Some("images".to_string()),
            access_key_id: Some("ak".to_string()),
            secret_access_key: Some("sk".to_string()),
            ..StorageSettings::default()
        };

        let config = storage_config(&settings).expect("valid settings");
        assert_eq!(config.provider.name(), "s3");
        assert_eq!(config.provider.bucket(), "images");
        assert_eq!(
            config.public_url("a.png"),
            "https://s3.amazonaws.com/images/a.png"
        );
    }

    #[test]
    fn test_storage_config_s3_missing_bucket() {
        let settings = StorageSettings {
            provider: "s3".to_string(),
            endpoint: Some("https://s3.amazonaws.com".to_string()),
            ..StorageSettings::default()
        };

        let err = storage_config(&settings).unwrap_err();
        assert!(err.to_string().contains("storage.bucket"));
    }

    #[test]
    fn test_storage_config_defaults_to_local() {
        let config = storage_config(&StorageSettings::default()).expect("valid settings");
        assert_eq!(config.provider.name(), "local");
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
    }

    #[test]
    fn test_storage_config_public_base_url() {
        let settings = StorageSettings {
            provider: "memory".to_string(),
            public_base_url: Some("https://cdn.example.com".to_string()),
            ..StorageSettings::default()
        };

        let config = storage_config(&settings).expect("valid settings");
        assert_eq!(config.public_url("a.png"), "https://cdn.example.com/a.png");
    }

    #[test]
    fn test_storage_config_unknown_provider() {
        let settings = StorageSettings {
            provider: "ftp".to_string(),
            ..StorageSettings::default()
        };
        assert!(storage_config(&settings).is_err());
    }
}
