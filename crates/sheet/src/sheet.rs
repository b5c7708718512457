use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use std::collections::{HashMap, HashSet};

/// A sheet representing a 2D grid of cells (row-major storage)
///
/// When columns are named, row 0 is the header and every following row is a
/// data row. `origin` is the worksheet position of `data[0][0]`, so a grid
/// loaded from B3 is written back at B3.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    origin: (u32, u32),
    data: Vec<Vec<CellValue>>,
    column_names: Option<Vec<String>>,
    column_index: Option<HashMap<String, usize>>,
}

impl Sheet {
    /// Create a new empty sheet with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Self::from_grid(name, (0, 0), Vec::new())
    }

    /// Sheet whose top-left cell sits at worksheet `(row, col)`
    pub(crate) fn from_grid(name: &str, origin: (u32, u32), data: Vec<Vec<CellValue>>) -> Self {
        Sheet {
            name: name.to_string(),
            origin,
            data,
            column_names: None,
            column_index: None,
        }
    }

    /// Create a named sheet holding only a header row
    pub fn with_header(name: &str, columns: &[&str]) -> Result<Self> {
        let mut sheet = Self::with_name(name);
        sheet.data.push(columns.iter().map(|c| CellValue::from(*c)).collect());
        sheet.name_columns_by_row(0)?;
        Ok(sheet)
    }

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Worksheet `(row, col)` of the top-left cell, 0-based
    #[must_use]
    pub fn origin(&self) -> (u32, u32) {
        self.origin
    }

    /// Get the number of rows (header included)
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Get the number of columns
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }

    /// Check if the sheet is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // ===== Cell Access =====

    /// Get a cell value by row and column index (0-based)
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.data.get(row).and_then(|r| r.get(col))
    }

    // ===== Row Operations =====

    /// Get an entire row by index (0-based)
    pub fn row(&self, index: usize) -> Result<&Vec<CellValue>> {
        self.data.get(index).ok_or(SheetError::RowIndexOutOfBounds {
            index,
            count: self.row_count(),
        })
    }

    /// Append a row to the end of the sheet
    pub fn row_append<T: Into<CellValue>>(&mut self, data: Vec<T>) -> Result<()> {
        let row: Vec<CellValue> = data.into_iter().map(Into::into).collect();

        // Ensure consistent column count
        if !self.data.is_empty() && row.len() != self.col_count() {
            return Err(SheetError::LengthMismatch {
                expected: self.col_count(),
                actual: row.len(),
            });
        }

        self.data.push(row);
        Ok(())
    }

    /// Append a row given as `(column name, value)` pairs.
    ///
    /// Values are placed under the header column of the same name. Header
    /// columns without a value get `Null`; names missing from the header are
    /// added as new columns, leaving earlier rows `Null` there.
    pub fn append_named_row<T: Into<CellValue>>(&mut self, values: Vec<(&str, T)>) -> Result<()> {
        if self.column_names.is_none() {
            return Err(SheetError::ColumnsNotNamed);
        }

        for (name, _) in &values {
            if self.column_index_by_name(name).is_err() {
                self.push_column(name)?;
            }
        }

        let mut row = vec![CellValue::Null; self.col_count()];
        for (name, value) in values {
            let col = self.column_index_by_name(name)?;
            row[col] = value.into();
        }

        self.row_append(row)
    }

    /// Data rows in order (header excluded when columns are named)
    pub fn records(&self) -> &[Vec<CellValue>] {
        let start = usize::from(self.column_names.is_some()).min(self.data.len());
        &self.data[start..]
    }

    /// Number of data rows (header excluded when columns are named)
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records().len()
    }

    /// Copy of the sheet keeping the header and the last `n` data rows.
    #[must_use]
    pub fn tail(&self, n: usize) -> Sheet {
        let records = self.records();
        let skip = records.len().saturating_sub(n);

        let mut data = Vec::with_capacity(n + 1);
        if self.column_names.is_some() {
            if let Some(header) = self.data.first() {
                data.push(header.clone());
            }
        }
        data.extend(records[skip..].iter().cloned());

        Sheet {
            name: self.name.clone(),
            origin: self.origin,
            data,
            column_names: self.column_names.clone(),
            column_index: self.column_index.clone(),
        }
    }

    // ===== Named Access =====

    /// Use the specified row as column headers
    ///
    /// The header cells stay as they are; only the lookup keys are derived
    /// from them. A blank header is keyed `Unnamed: <index>` and a repeated
    /// one gets a `.1`, `.2`, ... suffix, so any header row can be named.
    pub fn name_columns_by_row(&mut self, row_index: usize) -> Result<()> {
        let names = unique_column_names(self.row(row_index)?);
        let index_map = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        self.column_names = Some(names);
        self.column_index = Some(index_map);
        Ok(())
    }

    /// Get column names (if set)
    #[must_use]
    pub fn column_names(&self) -> Option<&Vec<String>> {
        self.column_names.as_ref()
    }

    /// Get the column index by name
    fn column_index_by_name(&self, name: &str) -> Result<usize> {
        self.column_index
            .as_ref()
            .ok_or(SheetError::ColumnsNotNamed)?
            .get(name)
            .copied()
            .ok_or_else(|| SheetError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    /// Add a named column at the end, padding existing data rows with `Null`
    fn push_column(&mut self, name: &str) -> Result<()> {
        let header_row = self.column_names.is_some();
        for (i, row) in self.data.iter_mut().enumerate() {
            if header_row && i == 0 {
                row.push(CellValue::from(name));
            } else {
                row.push(CellValue::Null);
            }
        }
        self.name_columns_by_row(0)
    }

    /// Get internal data reference
    #[must_use]
    pub fn data(&self) -> &Vec<Vec<CellValue>> {
        &self.data
    }
}

/// Lookup keys for a header row, pandas style
fn unique_column_names(header: &[CellValue]) -> Vec<String> {
    let mut used = HashSet::new();
    header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let base = cell.as_str();
            let base = if base.trim().is_empty() {
                format!("Unnamed: {i}")
            } else {
                base
            };

            let mut name = base.clone();
            let mut suffix = 0;
            while used.contains(&name) {
                suffix += 1;
                name = format!("{base}.{suffix}");
            }
            used.insert(name.clone());
            name
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contacts() -> Sheet {
        Sheet::with_header("Respuestas", &["Nombre", "Correo"]).unwrap()
    }

    #[test]
    fn test_with_header() {
        let sheet = contacts();
        assert_eq!(sheet.row_count(), 1);
        assert_eq!(sheet.record_count(), 0);
        assert_eq!(
            sheet.column_names().unwrap(),
            &vec!["Nombre".to_string(), "Correo".to_string()]
        );
    }

    #[test]
    fn test_append_named_row_aligns_by_name() {
        let mut sheet = contacts();
        sheet
            .append_named_row(vec![("Correo", "a@x.com"), ("Nombre", "Ana")])
            .unwrap();

        assert_eq!(sheet.get(1, 0).unwrap().as_str(), "Ana");
        assert_eq!(sheet.get(1, 1).unwrap().as_str(), "a@x.com");
    }

    #[test]
    fn test_append_named_row_missing_value_is_null() {
        let mut sheet = contacts();
        sheet.append_named_row(vec![("Nombre", "Ana")]).unwrap();
        assert_eq!(sheet.get(1, 1), Some(&CellValue::Null));
    }

    #[test]
    fn test_append_named_row_extends_header() {
        let mut sheet = contacts();
        sheet
            .append_named_row(vec![("Nombre", "Ana"), ("Correo", "a@x.com")])
            .unwrap();
        sheet
            .append_named_row(vec![("Nombre", "Luis"), ("Teléfono", "555")])
            .unwrap();

        assert_eq!(sheet.col_count(), 3);
        assert_eq!(sheet.get(0, 2).unwrap().as_str(), "Teléfono");
        assert_eq!(sheet.get(1, 2), Some(&CellValue::Null));
        assert_eq!(sheet.get(2, 2).unwrap().as_str(), "555");
    }

    #[test]
    fn test_append_named_row_requires_header() {
        let mut sheet = Sheet::with_name("S");
        let result = sheet.append_named_row(vec![("Nombre", "Ana")]);
        assert!(matches!(result, Err(SheetError::ColumnsNotNamed)));
    }

    #[test]
    fn test_row_length_mismatch() {
        let mut sheet = Sheet::with_name("S");
        sheet.row_append(vec!["a", "b", "c"]).unwrap();
        let result = sheet.row_append(vec!["x", "y"]);
        assert!(matches!(
            result,
            Err(SheetError::LengthMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_blank_and_repeated_headers_get_unique_keys() {
        let mut sheet = Sheet::with_name("S");
        sheet
            .row_append(vec!["Nombre", "Correo", "", "Nombre", "", "Nombre"])
            .unwrap();
        sheet.name_columns_by_row(0).unwrap();

        assert_eq!(
            sheet.column_names().unwrap(),
            &vec![
                "Nombre".to_string(),
                "Correo".to_string(),
                "Unnamed: 2".to_string(),
                "Nombre.1".to_string(),
                "Unnamed: 4".to_string(),
                "Nombre.2".to_string(),
            ]
        );
        // header cells are left untouched
        assert_eq!(sheet.get(0, 2).unwrap().as_str(), "");
        assert_eq!(sheet.get(0, 3).unwrap().as_str(), "Nombre");

        sheet
            .append_named_row(vec![("Nombre", "Ana"), ("Correo", "a@x.com")])
            .unwrap();
        assert_eq!(sheet.get(1, 0).unwrap().as_str(), "Ana");
        assert_eq!(sheet.get(1, 3), Some(&CellValue::Null));
        assert_eq!(sheet.col_count(), 6);
    }

    #[test]
    fn test_tail_keeps_header() {
        let mut sheet = contacts();
        for i in 0..15 {
            let name = format!("n{i}");
            sheet
                .append_named_row(vec![("Nombre", name.as_str()), ("Correo", "c")])
                .unwrap();
        }

        let tail = sheet.tail(10);
        assert_eq!(tail.record_count(), 10);
        assert_eq!(tail.get(0, 0).unwrap().as_str(), "Nombre");
        assert_eq!(tail.get(1, 0).unwrap().as_str(), "n5");
        assert_eq!(tail.get(10, 0).unwrap().as_str(), "n14");

        assert_eq!(contacts().tail(10).record_count(), 0);
        assert_eq!(tail.origin(), sheet.origin());
    }
}
