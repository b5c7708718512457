//! Configuration resolution.
//!
//! Each setting is taken from the secrets file first and the environment
//! second; the first non-empty value wins. The result is resolved once at
//! startup and never changes afterwards.

use crate::error::{StorageError, StorageResult};
use config::{Config, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Sheet used when neither secrets nor environment name one.
pub const DEFAULT_SHEET_NAME: &str = "Respuestas";

/// Default location of the secrets file.
pub const DEFAULT_SECRETS_PATH: &str = ".streamlit/secrets.toml";

pub const FILE_ID_ENV: &str = "DRIVE_FILE_ID";
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";
pub const SHEET_NAME_ENV: &str = "DRIVE_SHEET_NAME";

#[derive(Debug, Default, Deserialize)]
struct SecretsFile {
    #[serde(default)]
    drive: DriveSecrets,
}

/// The `[drive]` table of the secrets file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DriveSecrets {
    pub file_id: Option<String>,
    pub credentials_path: Option<String>,
    pub sheet_name: Option<String>,
}

impl DriveSecrets {
    /// Load the `[drive]` table from a TOML secrets file.
    ///
    /// A missing file yields empty secrets; a malformed one is an error.
    pub fn load(path: &Path) -> StorageResult<Self> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .build()
            .map_err(|e| StorageError::Config(e.to_string()))?;

        let secrets: SecretsFile = settings
            .try_deserialize()
            .map_err(|e| StorageError::Config(e.to_string()))?;

        tracing::debug!(path = %path.display(), "loaded secrets");
        Ok(secrets.drive)
    }
}

/// Immutable process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub file_id: String,
    pub credentials_path: PathBuf,
    pub sheet_name: String,
}

impl AppConfig {
    /// Resolve from a secrets file and the process environment.
    pub fn resolve(secrets_path: &Path) -> StorageResult<Self> {
        let secrets = DriveSecrets::load(secrets_path)?;
        Self::from_sources(&secrets, |key| std::env::var(key).ok())
    }

    /// Resolve from already-loaded secrets and an environment lookup.
    ///
    /// Fails with [`StorageError::MissingFileId`] or
    /// [`StorageError::MissingCredentials`] before anything remote is touched.
    pub fn from_sources<F>(secrets: &DriveSecrets, env: F) -> StorageResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file_id = first_non_empty(secrets.file_id.clone(), env(FILE_ID_ENV))
            .ok_or(StorageError::MissingFileId)?;

        let credentials_path =
            first_non_empty(secrets.credentials_path.clone(), env(CREDENTIALS_ENV))
                .map(PathBuf::from)
                .ok_or(StorageError::MissingCredentials)?;

        let sheet_name = first_non_empty(secrets.sheet_name.clone(), env(SHEET_NAME_ENV))
            .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string());

        Ok(Self {
            file_id,
            credentials_path,
            sheet_name,
        })
    }
}

fn first_non_empty(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    primary
        .filter(|v| !v.trim().is_empty())
        .or_else(|| fallback.filter(|v| !v.trim().is_empty()))
}
