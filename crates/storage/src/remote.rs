//! Whole-file access to the remote workbook.

use async_trait::async_trait;
use registro_core::{StorageError, StorageResult};
use registro_drive::{DriveClient, DriveError};
use registro_sheet::XLSX_MIME_TYPE;
use std::sync::Mutex;

/// A single remote file holding the workbook bytes.
#[async_trait]
pub trait RemoteWorkbook: Send + Sync {
    /// Current content, or `None` when the file does not exist.
    async fn download(&self) -> StorageResult<Option<Vec<u8>>>;

    /// Replace the whole content.
    async fn upload(&self, content: Vec<u8>) -> StorageResult<()>;
}

/// The workbook stored on Google Drive under a fixed file id.
pub struct DriveWorkbook {
    client: DriveClient,
    file_id: String,
}

impl DriveWorkbook {
    pub fn new(client: DriveClient, file_id: impl Into<String>) -> Self {
        Self {
            client,
            file_id: file_id.into(),
        }
    }
}

#[async_trait]
impl RemoteWorkbook for DriveWorkbook {
    async fn download(&self) -> StorageResult<Option<Vec<u8>>> {
        self.client
            .download(&self.file_id)
            .await
            .map(|content| content.map(|b| b.to_vec()))
            .map_err(|e| match e {
                DriveError::Credentials(msg) | DriveError::Auth(msg) => {
                    StorageError::Credentials(msg)
                }
                other => StorageError::Download(other.to_string()),
            })
    }

    async fn upload(&self, content: Vec<u8>) -> StorageResult<()> {
        self.client
            .upload(&self.file_id, content, XLSX_MIME_TYPE)
            .await
            .map_err(|e| match e {
                DriveError::Credentials(msg) | DriveError::Auth(msg) => {
                    StorageError::Credentials(msg)
                }
                other => StorageError::Upload(other.to_string()),
            })
    }
}

/// Workbook bytes kept in process memory.
///
/// Behaves like a remote file that may not exist yet; used to exercise the
/// storage adapter without a network.
#[derive(Debug, Default)]
pub struct MemoryWorkbook {
    content: Mutex<Option<Vec<u8>>>,
}

impl MemoryWorkbook {
    /// A file that does not exist yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// A file that already holds `content`.
    pub fn with_content(content: Vec<u8>) -> Self {
        Self {
            content: Mutex::new(Some(content)),
        }
    }

    /// Snapshot of the current bytes.
    pub fn content(&self) -> Option<Vec<u8>> {
        self.content
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

#[async_trait]
impl RemoteWorkbook for MemoryWorkbook {
    async fn download(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.content())
    }

    async fn upload(&self, content: Vec<u8>) -> StorageResult<()> {
        let mut guard = self
            .content
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(content);
        Ok(())
    }
}
