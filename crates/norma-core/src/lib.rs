//! # Norma Core
//!
//! Core types, errors, and utilities for the Norma AI API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Page-based pagination parameters and metadata
//! - [`password`]: Password hashing and the shared strength rule
//! - [`file_storage`]: Storage backend for uploaded documents
//!
//! # Example
//!
//! ```ignore
//! use norma_core::errors::AppError;
//! use norma_core::pagination::{PaginationMeta, PaginationParams};
//! use norma_core::password::{hash_password, verify_password};
//!
//! let error = AppError::not_found("Document not found or access denied");
//! let hash = hash_password("Secure123!")?;
//!
//! let params = PaginationParams::default();
//! let meta = PaginationMeta::new(42, &params);
//! ```

pub mod errors;
pub mod file_storage;
pub mod pagination;
pub mod password;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorResponse};
pub use file_storage::{FileStorage, LocalFileStorage, StorageError};
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, validate_password_strength, verify_password};
