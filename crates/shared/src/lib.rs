//! Shared configuration and error types for Imgup.
//!
//! This crate provides common types used across all other crates:
//! - Application configuration (server, storage, upload settings)
//! - Caller-facing error classification with HTTP status codes

pub mod config;
pub mod error;

pub use config::{AppConfig, ServerConfig, StorageSettings, UploadSettings};
pub use error::AppError;
