//! # registro-server
//!
//! Single-page web form that appends contact records to an Excel workbook
//! hosted on Google Drive.

pub mod app;
pub mod page;

pub use app::{create_router, Backend, Health};
