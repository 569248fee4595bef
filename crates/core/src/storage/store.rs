//! The object store seam the upload service writes through.

use std::future::Future;

use bytes::Bytes;

use super::error::StorageError;

/// Access control applied to a newly written object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectAcl {
    /// Leave the bucket default in place.
    #[default]
    Default,
    /// Anyone may read the object.
    PublicRead,
}

impl ObjectAcl {
    /// Canned ACL header value, if any.
    #[must_use]
    pub const fn as_canned(self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::PublicRead => Some("public-read"),
        }
    }
}

/// Metadata sent alongside an object body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// Body length in bytes.
    pub content_length: u64,
    /// MIME type of the body.
    pub content_type: Option<String>,
}

impl ObjectMetadata {
    /// Metadata for a body of `content_length` bytes with no content type.
    #[must_use]
    pub fn new(content_length: u64) -> Self {
        Self {
            content_length,
            content_type: None,
        }
    }

    /// Set the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }
}

/// Object storage operations consumed by the upload service.
///
/// Implementations must be safe to share across concurrent requests.
pub trait ObjectStore: Send + Sync {
    /// Write `body` under `key`.
    fn put_object(
        &self,
        key: &str,
        body: Bytes,
        metadata: &ObjectMetadata,
        acl: ObjectAcl,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Public URL the object under `key` is served from.
    fn public_url(&self, key: &str) -> String;

    /// Remove the object under `key`. Removing a missing key succeeds.
    fn delete_object(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}
