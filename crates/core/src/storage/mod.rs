//! Object storage for uploaded images using Apache OpenDAL.
//!
//! This module provides vendor-agnostic object storage with support for:
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3, DigitalOcean Spaces
//! - Azure Blob Storage
//! - Local filesystem (development only)
//! - In-process memory (tests and dry runs)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     ObjectStore (trait)                          │
//! │   put_object(key, bytes, meta, acl) │ public_url(key)            │
//! │   delete_object(key)                │                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │              StorageService (Apache OpenDAL Operator)            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod service;
mod store;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::StorageService;
pub use store::{ObjectAcl, ObjectMetadata, ObjectStore};
