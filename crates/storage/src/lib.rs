//! # registro-storage
//!
//! Keeps contact records in one sheet of a remotely stored Excel workbook.
//!
//! Every operation downloads the whole workbook, edits it in memory and, for
//! writes, uploads the whole workbook again. A missing file or sheet reads as
//! an empty table carrying the configured header.
//!
//! Appends made through one [`DriveExcelStorage`] are serialized. Writers in
//! other processes are not coordinated with: the last upload wins.

mod remote;

pub use remote::{DriveWorkbook, MemoryWorkbook, RemoteWorkbook};

use async_trait::async_trait;
use registro_core::{AppConfig, Record, StorageError, StorageResult};
use registro_drive::{DriveClient, ServiceAccountTokens};
use registro_sheet::{Book, CellValue, Sheet, SheetError};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Operations the form page needs from storage.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Append one record and return the whole updated table.
    async fn append_record(&self, record: &Record) -> StorageResult<Sheet>;

    /// Return the current table.
    async fn get_records(&self) -> StorageResult<Sheet>;
}

/// Storage adapter for a single named sheet inside a remote workbook.
pub struct DriveExcelStorage<R: RemoteWorkbook> {
    remote: R,
    sheet_name: String,
    columns: Vec<String>,
    write_lock: Mutex<()>,
}

impl DriveExcelStorage<DriveWorkbook> {
    /// Build the Drive-backed adapter from startup configuration.
    ///
    /// Reads the service-account key but performs no remote call, so
    /// credential problems surface here, before the first request.
    pub async fn connect(config: &AppConfig, timeout_secs: u64) -> StorageResult<Self> {
        let tokens = ServiceAccountTokens::from_key_file(&config.credentials_path)
            .await
            .map_err(|e| StorageError::Credentials(e.to_string()))?;

        let client = DriveClient::with_timeout(Arc::new(tokens), timeout_secs)
            .map_err(|e| StorageError::Credentials(e.to_string()))?;

        tracing::info!(
            file_id = %config.file_id,
            sheet = %config.sheet_name,
            "drive storage ready"
        );
        Ok(Self::new(
            DriveWorkbook::new(client, config.file_id.clone()),
            &config.sheet_name,
            Record::columns(),
        ))
    }
}

impl<R: RemoteWorkbook> DriveExcelStorage<R> {
    /// Adapter over `remote`, storing rows in `sheet_name` under `columns`.
    pub fn new(remote: R, sheet_name: &str, columns: &[&str]) -> Self {
        Self {
            remote,
            sheet_name: sheet_name.to_string(),
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    fn empty_table(&self) -> StorageResult<Sheet> {
        let columns: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        Sheet::with_header(&self.sheet_name, &columns).map_err(workbook_error)
    }

    /// Download the workbook and pick out the records sheet.
    ///
    /// The rest of the workbook is returned too so a write can keep it.
    async fn load(&self) -> StorageResult<(Book, Sheet)> {
        let Some(bytes) = self.remote.download().await? else {
            tracing::warn!("remote workbook not found, starting from an empty table");
            return Ok((Book::new(), self.empty_table()?));
        };

        if bytes.is_empty() {
            tracing::warn!("remote workbook is empty, starting from an empty table");
            return Ok((Book::new(), self.empty_table()?));
        }

        let book = Book::from_xlsx_bytes(&bytes).map_err(workbook_error)?;
        let sheet = match book.get_sheet(&self.sheet_name) {
            Ok(sheet) if !sheet.is_empty() => {
                let mut sheet = sheet.clone();
                sheet.name_columns_by_row(0).map_err(workbook_error)?;
                sheet
            }
            Ok(_) => self.empty_table()?,
            Err(SheetError::SheetNotFound { .. }) => {
                tracing::warn!(sheet = %self.sheet_name, "sheet not found, it will be created");
                self.empty_table()?
            }
            Err(e) => return Err(workbook_error(e)),
        };

        Ok((book, sheet))
    }

    /// Append `record` and upload the workbook. Returns the updated table.
    pub async fn append_record(&self, record: &Record) -> StorageResult<Sheet> {
        let _guard = self.write_lock.lock().await;

        let (mut book, mut sheet) = self.load().await?;

        let row: Vec<(&str, CellValue)> = self
            .columns
            .iter()
            .map(|column| {
                let value = record.get(column).unwrap_or_default();
                let cell = if value.is_empty() {
                    CellValue::Null
                } else {
                    CellValue::from(value)
                };
                (column.as_str(), cell)
            })
            .collect();
        sheet.append_named_row(row).map_err(workbook_error)?;

        book.put_sheet(&self.sheet_name, sheet.clone());
        let bytes = book.to_xlsx_bytes().map_err(workbook_error)?;
        self.remote.upload(bytes).await?;

        tracing::info!(
            sheet = %self.sheet_name,
            records = sheet.record_count(),
            "record appended"
        );
        Ok(sheet)
    }

    /// Current table of records.
    pub async fn get_records(&self) -> StorageResult<Sheet> {
        let (_, sheet) = self.load().await?;
        Ok(sheet)
    }
}

#[async_trait]
impl<R: RemoteWorkbook> RecordStore for DriveExcelStorage<R> {
    async fn append_record(&self, record: &Record) -> StorageResult<Sheet> {
        DriveExcelStorage::append_record(self, record).await
    }

    async fn get_records(&self) -> StorageResult<Sheet> {
        DriveExcelStorage::get_records(self).await
    }
}

fn workbook_error(err: SheetError) -> StorageError {
    StorageError::Workbook(err.to_string())
}
