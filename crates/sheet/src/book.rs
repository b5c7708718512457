use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use indexmap::IndexMap;

/// A book containing multiple sheets (preserves insertion order)
#[derive(Debug, Clone, Default)]
pub struct Book {
    sheets: IndexMap<String, Sheet>,
}

impl Book {
    /// Create a new empty book
    #[must_use]
    pub fn new() -> Self {
        Book {
            sheets: IndexMap::new(),
        }
    }

    /// Get all sheet names in order
    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.keys().map(String::as_str).collect()
    }

    // ===== Sheet Access =====

    /// Get a sheet by name
    pub fn get_sheet(&self, name: &str) -> Result<&Sheet> {
        self.sheets
            .get(name)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: name.to_string(),
            })
    }

    // ===== Sheet Management =====

    /// Add a sheet to the book
    pub fn add_sheet(&mut self, name: &str, mut sheet: Sheet) -> Result<()> {
        if self.sheets.contains_key(name) {
            return Err(SheetError::SheetAlreadyExists {
                name: name.to_string(),
            });
        }
        sheet.set_name(name);
        self.sheets.insert(name.to_string(), sheet);
        Ok(())
    }

    /// Replace a sheet in place, or append it when no sheet has that name.
    ///
    /// Returns the previous sheet, if any.
    pub fn put_sheet(&mut self, name: &str, mut sheet: Sheet) -> Option<Sheet> {
        sheet.set_name(name);
        self.sheets.insert(name.to_string(), sheet)
    }

    /// Iterate over `(name, sheet)` pairs in order
    pub fn sheets(&self) -> impl Iterator<Item = (&str, &Sheet)> {
        self.sheets.iter().map(|(k, v)| (k.as_str(), v))
    }
}
