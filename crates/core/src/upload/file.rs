//! Incoming file payloads.

use std::fmt;
use std::io::Cursor;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt};

/// A file handed to the upload service.
///
/// The body is read exactly once; the reader is dropped together with the
/// file, on success and on failure alike.
pub struct UploadFile {
    original_name: Option<String>,
    content_type: Option<String>,
    reader: Box<dyn AsyncRead + Send + Unpin>,
}

impl UploadFile {
    /// File whose body is streamed from `reader`.
    pub fn new(
        original_name: Option<String>,
        content_type: Option<String>,
        reader: impl AsyncRead + Send + Unpin + 'static,
    ) -> Self {
        Self {
            original_name,
            content_type,
            reader: Box::new(reader),
        }
    }

    /// File whose body is already in memory.
    pub fn from_bytes(
        original_name: impl Into<String>,
        content_type: impl Into<String>,
        body: impl Into<Bytes>,
    ) -> Self {
        Self::new(
            Some(original_name.into()),
            Some(content_type.into()),
            Cursor::new(body.into()),
        )
    }

    /// Name the client gave the file.
    #[must_use]
    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    /// Declared MIME type.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Whether the declared content type mentions `image`.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("image"))
    }

    /// Drain the body into memory.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the body cannot be read.
    pub async fn read_all(&mut self) -> std::io::Result<Bytes> {
        let mut buf = Vec::new();
        self.reader.read_to_end(&mut buf).await?;
        Ok(Bytes::from(buf))
    }
}

impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("original_name", &self.original_name)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_all() {
        let mut file = UploadFile::from_bytes("a.png", "image/png", &b"abc"[..]);
        assert_eq!(file.read_all().await.expect("read"), Bytes::from_static(b"abc"));
    }

    #[test]
    fn test_is_image() {
        assert!(UploadFile::from_bytes("a.png", "image/png", Bytes::new()).is_image());
        assert!(UploadFile::from_bytes("a.svg", "image/svg+xml", Bytes::new()).is_image());
        assert!(!UploadFile::from_bytes("a.txt", "text/plain", Bytes::new()).is_image());
        assert!(!UploadFile::new(Some("a.png".into()), None, Cursor::new(Bytes::new())).is_image());
    }

    #[test]
    fn test_debug_omits_body() {
        let file = UploadFile::from_bytes("a.png", "image/png", Bytes::new());
        let debug = format!("{file:?}");
        assert!(debug.contains("a.png"));
        assert!(debug.contains("image/png"));
    }
}
