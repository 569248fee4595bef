//! Image upload service.
//!
//! This module provides the upload flows built on top of [`crate::storage`]:
//! - Single-file upload, stored as-is
//! - Multi-file upload, non-images skipped and wide images scaled down
//! - Deletion by storage key
//!
//! Every stored object gets a fresh key made of a random UUID followed by the
//! original file extension.

mod error;
mod file;
mod key;
mod service;

pub use error::UploadError;
pub use file::UploadFile;
pub use key::{file_extension, generate_storage_key, generate_storage_key_with};
pub use service::UploadService;
