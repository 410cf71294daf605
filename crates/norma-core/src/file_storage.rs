//! Storage for uploaded documents.
//!
//! Business logic talks to the [`FileStorage`] trait so the local disk
//! backend can be swapped without touching services.
//!
//! # Example
//!
//! ```ignore
//! use norma_core::file_storage::{FileStorage, LocalFileStorage, stored_filename};
//!
//! let storage = LocalFileStorage::new(PathBuf::from("./uploads"), 16 * 1024 * 1024);
//! let key = stored_filename("Contract Draft.pdf", 7, Utc::now());
//!
//! storage.save(&key, &bytes).await?;
//! let content = storage.read(&key).await?;
//! storage.delete(&key).await?;
//! ```

use chrono::{DateTime, Utc};
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use tokio::fs;

use crate::errors::AppError;

/// Extensions accepted for upload, lowercase.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["pdf", "doc", "docx", "txt"];

type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

/// Abstract trait for document storage backends.
pub trait FileStorage: Send + Sync {
    /// Save file content under `key` and return the key.
    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String>;

    /// Read a stored file back.
    fn read<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Vec<u8>>;

    /// Delete a file. Missing files are not an error.
    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()>;
}

/// Error type for file storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// File exceeds maximum allowed size.
    InvalidFileSize { max_bytes: usize },

    /// Extension not in [`ALLOWED_EXTENSIONS`].
    InvalidExtension { received: String },

    /// I/O error (file system or similar).
    IoError(std::io::Error),

    NotFound,

    /// Invalid storage key format.
    InvalidKey(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFileSize { max_bytes } => {
                write!(f, "File exceeds maximum size of {} bytes", max_bytes)
            }
            Self::InvalidExtension { received } => {
                write!(
                    f,
                    "File type '{}' not allowed. Allowed types: {}",
                    received,
                    ALLOWED_EXTENSIONS.join(", ")
                )
            }
            Self::IoError(e) => write!(f, "I/O error: {}", e),
            Self::NotFound => write!(f, "File not found"),
            Self::InvalidKey(msg) => write!(f, "Invalid storage key: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound
        } else {
            Self::IoError(e)
        }
    }
}

impl StorageError {
    /// Maps storage failures onto HTTP errors.
    pub fn into_app_error(self) -> AppError {
        match self {
            Self::InvalidFileSize { .. } => AppError::payload_too_large(self.to_string()),
            Self::InvalidExtension { .. } => AppError::bad_request("File type not allowed"),
            Self::NotFound => AppError::not_found("Stored file not found"),
            Self::InvalidKey(_) | Self::IoError(_) => AppError::internal(self),
        }
    }
}

/// Lowercase extension of `filename` if it is allowed for upload.
pub fn allowed_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Longest stored file name, matching common filesystem `NAME_MAX`.
pub const MAX_STORED_NAME_LEN: usize = 255;

/// Reduces a client supplied file name to a safe ASCII form.
///
/// Path components are dropped, spaces become `_`, anything other than
/// ASCII alphanumerics, `.`, `-` and `_` is removed, runs of dots collapse
/// to one and leading dots are stripped.
pub fn secure_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let mut cleaned = String::with_capacity(base.len());
    for c in base.chars() {
        let c = if c.is_whitespace() { '_' } else { c };
        if !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')) {
            continue;
        }
        if c == '.' && cleaned.ends_with('.') {
            continue;
        }
        cleaned.push(c);
    }

    cleaned.trim_start_matches(['.', '_']).to_string()
}

/// Shortens `name` to at most `max` bytes, keeping its extension.
fn truncate_name(name: &str, max: usize) -> String {
    if name.len() <= max {
        return name.to_string();
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) if ext.len() + 1 < max => {
            let keep = max - ext.len() - 1;
            format!("{}.{}", &stem[..keep.min(stem.len())], ext)
        }
        _ => name[..max].to_string(),
    }
}

/// Storage key for an upload: `<YYYYmmddHHMMSS>_<user_id>_<secure name>`.
///
/// Names that sanitize down to nothing usable become `document.<ext>`.
/// The whole key is kept within [`MAX_STORED_NAME_LEN`] bytes.
pub fn stored_filename(original: &str, user_id: i64, at: DateTime<Utc>) -> String {
    let mut name = secure_filename(original);
    if allowed_extension(&name).is_none()
        && let Some(ext) = allowed_extension(original)
    {
        name = format!("document.{ext}");
    }

    let prefix = format!("{}_{}_", at.format("%Y%m%d%H%M%S"), user_id);
    let name = truncate_name(&name, MAX_STORED_NAME_LEN.saturating_sub(prefix.len()));
    format!("{prefix}{name}")
}

/// Stores documents in a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    base_dir: PathBuf,
    max_file_size: usize,
}

impl LocalFileStorage {
    pub fn new(base_dir: PathBuf, max_file_size: usize) -> Self {
        Self {
            base_dir,
            max_file_size,
        }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Validate storage key format to prevent path traversal.
    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty()
            || key.starts_with('/')
            || key.starts_with('\\')
            || key.split(['/', '\\']).any(|segment| segment == "..")
        {
            return Err(StorageError::InvalidKey(
                "Key must not be empty, contain a '..' segment, or start with a separator"
                    .to_string(),
            ));
        }

        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '/' || c == '.')
        {
            return Err(StorageError::InvalidKey(
                "Key contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }
}

impl FileStorage for LocalFileStorage {
    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String> {
        Box::pin(async move {
            Self::validate_key(key)?;

            if allowed_extension(key).is_none() {
                return Err(StorageError::InvalidExtension {
                    received: key.rsplit_once('.').map(|(_, e)| e).unwrap_or("").to_string(),
                });
            }

            if content.len() > self.max_file_size {
                return Err(StorageError::InvalidFileSize {
                    max_bytes: self.max_file_size,
                });
            }

            let file_path = self.base_dir.join(key);
            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).await?;
            }

            fs::write(&file_path, content).await?;

            Ok(key.to_string())
        })
    }

    fn read<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Vec<u8>> {
        Box::pin(async move {
            Self::validate_key(key)?;
            Ok(fs::read(self.base_dir.join(key)).await?)
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            Self::validate_key(key)?;

            match fs::remove_file(self.base_dir.join(key)).await {
                Ok(_) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::TimeZone;

    fn temp_storage(max: usize) -> (LocalFileStorage, PathBuf) {
        let dir = std::env::temp_dir().join(format!("norma-storage-{}", uuid::Uuid::new_v4()));
        (LocalFileStorage::new(dir.clone(), max), dir)
    }

    #[test]
    fn validate_key_accepts_valid_keys() {
        assert!(LocalFileStorage::validate_key("20240101120000_1_contract.pdf").is_ok());
        assert!(LocalFileStorage::validate_key("users/7/nda-v2.docx").is_ok());
    }

    #[test]
    fn validate_key_rejects_path_traversal() {
        assert!(LocalFileStorage::validate_key("../../../etc/passwd").is_err());
        assert!(LocalFileStorage::validate_key("..\\windows\\system32").is_err());
        assert!(LocalFileStorage::validate_key("/etc/passwd").is_err());
        assert!(LocalFileStorage::validate_key("").is_err());
    }

    #[test]
    fn allowed_extension_is_case_insensitive() {
        assert_eq!(allowed_extension("Report.PDF").as_deref(), Some("pdf"));
        assert_eq!(allowed_extension("notes.txt").as_deref(), Some("txt"));
        assert_eq!(allowed_extension("archive.tar.docx").as_deref(), Some("docx"));
        assert_eq!(allowed_extension("script.exe"), None);
        assert_eq!(allowed_extension("no_extension"), None);
    }

    #[test]
    fn secure_filename_strips_unsafe_parts() {
        assert_eq!(secure_filename("My Contract (v2).pdf"), "My_Contract_v2.pdf");
        assert_eq!(secure_filename("../../etc/passwd"), "passwd");
        assert_eq!(secure_filename("C:\\Users\\me\\nda.docx"), "nda.docx");
        assert_eq!(secure_filename(".hidden.txt"), "hidden.txt");
        assert_eq!(secure_filename("contrat_été.txt"), "contrat_t.txt");
    }

    #[test]
    fn stored_filename_layout() {
        let at = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(
            stored_filename("Lease Agreement.docx", 42, at),
            "20240506070809_42_Lease_Agreement.docx"
        );
        assert_eq!(
            stored_filename("合同.pdf", 42, at),
            "20240506070809_42_document.pdf"
        );
    }

    #[tokio::test]
    async fn save_read_delete_roundtrip() {
        let (storage, dir) = temp_storage(1024);

        storage.save("1_a.txt", b"hello").await.unwrap();
        assert_eq!(storage.read("1_a.txt").await.unwrap(), b"hello");

        storage.delete("1_a.txt").await.unwrap();
        assert!(matches!(
            storage.read("1_a.txt").await,
            Err(StorageError::NotFound)
        ));
        // second delete is a no-op
        storage.delete("1_a.txt").await.unwrap();

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn dot_runs_collapse_and_are_not_traversal() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(secure_filename("contract..v2.pdf"), "contract.v2.pdf");
        assert_eq!(
            stored_filename("contract..v2.pdf", 7, at),
            "20240101000000_7_contract.v2.pdf"
        );
        assert!(LocalFileStorage::validate_key("contract..v2.pdf").is_ok());
        assert!(LocalFileStorage::validate_key("users/../secret.txt").is_err());
    }

    #[test]
    fn long_names_are_truncated_keeping_extension() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let original = format!("{}.docx", "a".repeat(400));
        let key = stored_filename(&original, 123, at);

        assert_eq!(key.len(), MAX_STORED_NAME_LEN);
        assert!(key.starts_with("20240101000000_123_aaa"));
        assert!(key.ends_with("a.docx"));
        assert!(LocalFileStorage::validate_key(&key).is_ok());
    }

    #[tokio::test]
    async fn save_accepts_names_with_double_dots() {
        let (storage, dir) = temp_storage(1024);
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let key = stored_filename("contract..v2.pdf", 7, at);
        assert_eq!(storage.save(&key, b"hello").await.unwrap(), key);
        assert_eq!(storage.read(&key).await.unwrap(), b"hello");

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn save_enforces_size_and_type() {
        let (storage, dir) = temp_storage(4);

        assert!(matches!(
            storage.save("big.txt", b"too large").await,
            Err(StorageError::InvalidFileSize { max_bytes: 4 })
        ));
        assert!(matches!(
            storage.save("virus.exe", b"x").await,
            Err(StorageError::InvalidExtension { .. })
        ));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn storage_errors_map_to_http_status() {
        assert_eq!(
            StorageError::InvalidFileSize { max_bytes: 1 }.into_app_error().status,
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            StorageError::InvalidExtension { received: "exe".into() }
                .into_app_error()
                .status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            StorageError::NotFound.into_app_error().status,
            StatusCode::NOT_FOUND
        );
    }
}
