//! Error types for registro.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised while configuring or talking to the remote workbook.
///
/// Display strings are shown verbatim on the form page, so they are
/// written for the person filling in the form.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No remote file identifier in secrets or environment.
    #[error(
        "Debes configurar el identificador del archivo de Excel. \
         Utiliza drive.file_id en el archivo de secretos o la variable de entorno DRIVE_FILE_ID."
    )]
    MissingFileId,

    /// No service-account key path in secrets or environment.
    #[error(
        "No se encontró la ruta al archivo de credenciales. \
         Define GOOGLE_APPLICATION_CREDENTIALS o drive.credentials_path."
    )]
    MissingCredentials,

    /// The service-account key could not be read or used.
    #[error("No se pudieron cargar las credenciales: {0}")]
    Credentials(String),

    /// The secrets file exists but could not be parsed.
    #[error("No se pudo leer la configuración: {0}")]
    Config(String),

    /// Downloading the workbook failed for a reason other than not-found.
    #[error("No se pudo descargar el archivo de Excel: {0}")]
    Download(String),

    /// Uploading the updated workbook failed.
    #[error("No se pudo subir el archivo actualizado: {0}")]
    Upload(String),

    /// The workbook bytes could not be parsed or written.
    #[error("El archivo de Excel no es válido: {0}")]
    Workbook(String),
}

impl StorageError {
    /// True for errors caused by configuration or credentials rather than by
    /// the remote file itself.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingFileId | Self::MissingCredentials | Self::Credentials(_) | Self::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_classification() {
        assert!(StorageError::MissingFileId.is_configuration());
        assert!(StorageError::MissingCredentials.is_configuration());
        assert!(StorageError::Credentials("bad key".into()).is_configuration());
        assert!(!StorageError::Download("HTTP 500".into()).is_configuration());
        assert!(!StorageError::Upload("HTTP 403".into()).is_configuration());
    }

    #[test]
    fn test_messages_carry_cause() {
        let err = StorageError::Upload("HTTP 403 Forbidden".into());
        assert_eq!(
            err.to_string(),
            "No se pudo subir el archivo actualizado: HTTP 403 Forbidden"
        );
    }
}
