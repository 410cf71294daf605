use std::env;
use std::path::PathBuf;

use crate::env::parse_or;

/// 16 MiB.
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadConfig {
    /// Directory uploaded documents are written to.
    pub folder: PathBuf,
    /// Largest accepted upload in bytes.
    pub max_bytes: usize,
}

impl UploadConfig {
    pub fn from_env() -> Self {
        Self {
            folder: env::var("UPLOAD_FOLDER")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./uploads")),
            max_bytes: parse_or("MAX_CONTENT_LENGTH", DEFAULT_MAX_CONTENT_LENGTH),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::from("./uploads"),
            max_bytes: DEFAULT_MAX_CONTENT_LENGTH,
        }
    }
}
