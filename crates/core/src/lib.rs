//! # registro-core
//!
//! Core types shared by the registro crates: the contact [`Record`],
//! startup configuration and the storage error type.

pub mod config;
pub mod error;
pub mod record;

pub use config::{AppConfig, DriveSecrets, DEFAULT_SECRETS_PATH, DEFAULT_SHEET_NAME};
pub use error::{StorageError, StorageResult};
pub use record::{Record, ValidationError, COLUMNS};
