//! Sheet/Book module for registro
//!
//! Tabular data held in memory between downloading a workbook and
//! uploading it again, plus the xlsx codec that works on byte buffers.
//!
//! # Examples
//!
//! ```
//! use registro_sheet::Sheet;
//!
//! let mut sheet = Sheet::with_header("Respuestas", &["Nombre", "Correo"]).unwrap();
//! sheet
//!     .append_named_row(vec![("Nombre", "Ana"), ("Correo", "a@x.com")])
//!     .unwrap();
//!
//! let bytes = sheet.to_xlsx_bytes().unwrap();
//! let loaded = Sheet::from_xlsx_bytes(&bytes, "Respuestas").unwrap().unwrap();
//! assert_eq!(loaded.record_count(), 1);
//! ```

mod book;
mod cell;
mod error;
mod sheet;
mod xlsx;

pub use book::Book;
pub use cell::CellValue;
pub use error::{Result, SheetError};
pub use sheet::Sheet;
pub use xlsx::XLSX_MIME_TYPE;
