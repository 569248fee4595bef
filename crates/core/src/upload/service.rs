//! Upload service implementation.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, warn};

use super::error::UploadError;
use super::file::UploadFile;
use super::key::generate_storage_key;
use crate::imaging::{ImagePayload, ResizeError, content_subtype, resize_to_width};
use crate::storage::{ObjectAcl, ObjectMetadata, ObjectStore};

/// Uploads images to object storage and hands back their public URLs.
///
/// Holds no per-request state; one instance serves concurrent requests.
pub struct UploadService<S: ObjectStore> {
    store: Arc<S>,
    resize_width: u32,
}

impl<S: ObjectStore> UploadService<S> {
    /// Default width multi-file uploads are scaled down to.
    pub const DEFAULT_RESIZE_WIDTH: u32 = 400;

    /// Create a new upload service writing through `store`.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            resize_width: Self::DEFAULT_RESIZE_WIDTH,
        }
    }

    /// Set the width multi-file uploads are scaled down to.
    #[must_use]
    pub fn with_resize_width(mut self, width: u32) -> Self {
        self.resize_width = width;
        self
    }

    /// Width multi-file uploads are scaled down to.
    #[must_use]
    pub fn resize_width(&self) -> u32 {
        self.resize_width
    }

    /// Get the underlying object store.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Store one file as-is and return its public URL.
    ///
    /// The key is derived from the original name before the body is read,
    /// and nothing is written unless the body was read in full.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file name has no extension (`InvalidInput`)
    /// - The body cannot be read (`NeedImage`)
    /// - The storage write fails (`Storage`)
    pub async fn upload_single(&self, mut file: UploadFile) -> Result<String, UploadError> {
        info!(filename = file.original_name(), "upload_single started");

        let key = generate_storage_key(file.original_name().unwrap_or_default())?;
        let body = file.read_all().await.map_err(|e| {
            warn!(error = %e, "Failed to read uploaded file");
            UploadError::NeedImage(e)
        })?;

        let metadata = ObjectMetadata::new(body.len() as u64)
            .with_content_type(file.content_type().map(String::from));
        drop(file);

        self.store
            .put_object(&key, body, &metadata, ObjectAcl::Default)
            .await?;

        let url = self.store.public_url(&key);
        info!(key = %key, "upload_single finished");
        Ok(url)
    }

    /// Store every image among `files`, scaled down to the resize width, and
    /// return their public URLs in input order.
    ///
    /// Files whose content type does not mention `image` are skipped. Objects
    /// are written with public-read access. Processing stops at the first
    /// failing file; files stored before it stay in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A file name has no extension (`InvalidInput`)
    /// - Reading, resizing or storing a file fails (`FileUploadFailed`)
    pub async fn upload_many(&self, files: Vec<UploadFile>) -> Result<Vec<String>, UploadError> {
        info!(count = files.len(), "upload_many started");
        let mut urls = Vec::with_capacity(files.len());

        for file in files {
            if !file.is_image() {
                debug!(
                    filename = file.original_name(),
                    content_type = file.content_type(),
                    "Skipping non-image file"
                );
                continue;
            }

            urls.push(self.upload_resized(file).await?);
        }

        info!(uploaded = urls.len(), "upload_many finished");
        Ok(urls)
    }

    /// Delete the object stored under `key`.
    ///
    /// Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the storage call fails.
    pub async fn delete(&self, key: &str) -> Result<(), UploadError> {
        info!(key, "delete started");

        if key.is_empty() {
            return Err(UploadError::invalid_input("storage key must not be empty"));
        }

        self.store.delete_object(key).await?;
        info!(key, "delete finished");
        Ok(())
    }

    async fn upload_resized(&self, mut file: UploadFile) -> Result<String, UploadError> {
        let filename = file.original_name().unwrap_or_default().to_string();
        let content_type = file.content_type().unwrap_or_default().to_string();
        let format = content_subtype(&content_type).to_string();

        let key = generate_storage_key(&filename)?;
        let failed = |source: UploadError| {
            warn!(filename = %filename, error = %source, "File upload failed");
            UploadError::file_upload_failed(filename.clone(), source)
        };

        let body = file
            .read_all()
            .await
            .map_err(|e| failed(UploadError::NeedImage(e)))?;
        drop(file);

        let payload = self
            .resize(body, format, content_type)
            .await
            .map_err(|e| failed(e.into()))?;

        let metadata = ObjectMetadata::new(payload.content_length())
            .with_content_type(Some(payload.content_type.clone()));

        self.store
            .put_object(&key, payload.bytes, &metadata, ObjectAcl::PublicRead)
            .await
            .map_err(|e| failed(e.into()))?;

        debug!(key = %key, filename = %filename, "Stored resized image");
        Ok(self.store.public_url(&key))
    }

    async fn resize(
        &self,
        body: Bytes,
        format: String,
        content_type: String,
    ) -> Result<ImagePayload, ResizeError> {
        let width = self.resize_width;
        tokio::task::spawn_blocking(move || resize_to_width(body, &format, &content_type, width))
            .await
            .map_err(|e| ResizeError::Aborted(e.to_string()))?
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Mutex;

    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use proptest::prelude::*;

    use crate::storage::StorageError;

    #[derive(Default)]
    struct PutLog(Mutex<Vec<(String, Bytes)>>);

    impl ObjectStore for PutLog {
        async fn put_object(
            &self,
            key: &str,
            body: Bytes,
            _metadata: &ObjectMetadata,
            _acl: ObjectAcl,
        ) -> Result<(), StorageError> {
            self.0.lock().expect("lock").push((key.to_string(), body));
            Ok(())
        }

        fn public_url(&self, key: &str) -> String {
            format!("https://bucket.example.com/{key}")
        }

        async fn delete_object(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn png_of_width(width: u32) -> Bytes {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, 2, Rgb([1, 2, 3])))
            .write_to(&mut buf, ImageFormat::Png)
            .expect("encode fixture");
        Bytes::from(buf.into_inner())
    }

    // One URL per image-typed input, in input order; none for the rest.
    // Every input has its own width, so a reordering shows up in the
    // stored objects.
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]
        #[test]
        fn prop_urls_follow_image_input_order(kinds in prop::collection::vec(any::<bool>(), 0..8)) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("runtime");
            let store = Arc::new(PutLog::default());
            let service = UploadService::new(store.clone());

            let files = kinds
                .iter()
                .zip(1u32..)
                .map(|(is_image, width)| {
                    let body = png_of_width(width);
                    if *is_image {
                        UploadFile::from_bytes(format!("img{width}.png"), "image/png", body)
                    } else {
                        UploadFile::from_bytes(format!("doc{width}.pdf"), "application/pdf", body)
                    }
                })
                .collect();
            let expected_widths: Vec<u32> = kinds
                .iter()
                .zip(1u32..)
                .filter(|(is_image, _)| **is_image)
                .map(|(_, width)| width)
                .collect();

            let urls = runtime.block_on(service.upload_many(files)).expect("upload");
            let puts = store.0.lock().expect("lock").clone();

            prop_assert_eq!(urls.len(), expected_widths.len());
            prop_assert_eq!(urls.len(), puts.len());
            for ((url, (key, body)), width) in urls.iter().zip(&puts).zip(&expected_widths) {
                prop_assert_eq!(url, &format!("https://bucket.example.com/{key}"));
                prop_assert!(key.ends_with(".png"));
                let stored = image::load_from_memory(body).expect("stored image decodes");
                prop_assert_eq!(stored.width(), *width);
            }
        }
    }
}
