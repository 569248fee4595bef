//! Storage key generation.

use uuid::Uuid;

use super::error::UploadError;

/// Extension of `file_name`: everything from the last `.` on, dot included.
///
/// # Errors
///
/// Returns `InvalidInput` if the name has no `.`.
pub fn file_extension(file_name: &str) -> Result<&str, UploadError> {
    file_name
        .rfind('.')
        .map(|idx| &file_name[idx..])
        .ok_or_else(|| UploadError::invalid_input(format!("malformed file name ({file_name})")))
}

/// Fresh storage key for `file_name`: a random UUID plus the original
/// extension.
///
/// # Errors
///
/// Returns `InvalidInput` if the name has no extension.
pub fn generate_storage_key(file_name: &str) -> Result<String, UploadError> {
    generate_storage_key_with(file_name, Uuid::new_v4())
}

/// Storage key for `file_name` using `id` as the unique part.
///
/// # Errors
///
/// Returns `InvalidInput` if the name has no extension.
pub fn generate_storage_key_with(file_name: &str, id: Uuid) -> Result<String, UploadError> {
    let extension = file_extension(file_name)?;
    Ok(format!("{id}{extension}"))
}
