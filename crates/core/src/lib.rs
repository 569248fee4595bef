//! Core upload logic for Imgup.
//!
//! This crate contains the upload rules with ZERO web dependencies.
//!
//! # Modules
//!
//! - `storage` - Object store seam and its OpenDAL implementation
//! - `imaging` - Content-type to format mapping and width-capped resizing
//! - `upload` - Storage key generation and the upload service

pub mod imaging;
pub mod storage;
pub mod upload;
