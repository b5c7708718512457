use thiserror::Error;

/// Errors that can occur during sheet operations
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Row index out of bounds: {index} (sheet has {count} rows)")]
    RowIndexOutOfBounds { index: usize, count: usize },

    #[error("Column not found: {name}")]
    ColumnNotFound { name: String },

    #[error("Sheet not found: {name}")]
    SheetNotFound { name: String },

    #[error("Sheet already exists: {name}")]
    SheetAlreadyExists { name: String },

    #[error("Columns not named. Call name_columns_by_row() first")]
    ColumnsNotNamed,

    #[error("Data length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Excel read error: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    #[error("Excel write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("Row index overflow: {0}")]
    Overflow(usize),
}

pub type Result<T> = std::result::Result<T, SheetError>;
