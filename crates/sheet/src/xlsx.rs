use crate::book::Book;
use crate::cell::{CellValue, FormulaCell};
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use calamine::{Data, Range, Reader, Xlsx};
use rust_xlsxwriter::{Format, Formula, Workbook, Worksheet};
use std::io::Cursor;

/// MIME type of an xlsx workbook
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const DATE_FORMAT: &str = "yyyy-mm-dd";
const DATE_TIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#ERROR: {e:?}")),
    }
}

fn open(bytes: &[u8]) -> Result<Xlsx<Cursor<&[u8]>>> {
    Ok(Xlsx::new(Cursor::new(bytes))?)
}

/// Smallest `(top_left, bottom_right)` box holding both ranges
fn bounds(values: &Range<Data>, formulas: &Range<String>) -> Option<((u32, u32), (u32, u32))> {
    let starts = [values.start(), formulas.start()].into_iter().flatten();
    let ends = [values.end(), formulas.end()].into_iter().flatten();

    let top_left = starts.reduce(|a, b| (a.0.min(b.0), a.1.min(b.1)))?;
    let bottom_right = ends.reduce(|a, b| (a.0.max(b.0), a.1.max(b.1)))?;
    Some((top_left, bottom_right))
}

/// Read a worksheet into a grid anchored at its first used cell.
///
/// Formula cells keep their source next to the value Excel cached.
fn read_sheet(workbook: &mut Xlsx<Cursor<&[u8]>>, sheet_name: &str) -> Result<Sheet> {
    let values = workbook.worksheet_range(sheet_name)?;
    let formulas = workbook.worksheet_formula(sheet_name)?;

    let Some((origin, end)) = bounds(&values, &formulas) else {
        return Ok(Sheet::with_name(sheet_name));
    };

    let height = (end.0 - origin.0) as usize + 1;
    let width = (end.1 - origin.1) as usize + 1;
    let mut data = vec![vec![CellValue::Null; width]; height];

    if let Some((top, left)) = values.start() {
        let (dr, dc) = ((top - origin.0) as usize, (left - origin.1) as usize);
        for (r, c, cell) in values.used_cells() {
            data[dr + r][dc + c] = data_to_cell_value(cell);
        }
    }

    if let Some((top, left)) = formulas.start() {
        let (dr, dc) = ((top - origin.0) as usize, (left - origin.1) as usize);
        for (r, c, source) in formulas.used_cells() {
            let slot = &mut data[dr + r][dc + c];
            let cached = std::mem::replace(slot, CellValue::Null);
            *slot = CellValue::formula(source.as_str(), cached);
        }
    }

    Ok(Sheet::from_grid(sheet_name, origin, data))
}

fn write_formula(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    formula: &FormulaCell,
) -> Result<()> {
    let mut cell = Formula::new(&formula.source);
    if let Some(cached) = formula.cached.as_deref().filter(|c| !c.is_blank()) {
        cell = cell.set_result(cached.as_str());
    }
    worksheet.write_formula(row, col, cell)?;
    Ok(())
}

impl Sheet {
    /// Load one sheet from xlsx bytes, using its first row as the header.
    ///
    /// Returns `Ok(None)` when the workbook has no sheet with that name. A
    /// sheet with no cells at all loads as an empty, unnamed sheet.
    pub fn from_xlsx_bytes(bytes: &[u8], sheet_name: &str) -> Result<Option<Self>> {
        let mut workbook = open(bytes)?;
        if !workbook.sheet_names().iter().any(|n| n == sheet_name) {
            return Ok(None);
        }

        let mut sheet = read_sheet(&mut workbook, sheet_name)?;
        if sheet.row_count() > 0 {
            sheet.name_columns_by_row(0)?;
        }
        Ok(Some(sheet))
    }

    /// Serialize this sheet alone as an xlsx workbook.
    pub fn to_xlsx_bytes(&self) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        self.write_to_worksheet(worksheet)?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Write sheet data to a worksheet, starting at the sheet's origin
    fn write_to_worksheet(&self, worksheet: &mut Worksheet) -> Result<()> {
        worksheet.set_name(self.name())?;

        let date = Format::new().set_num_format(DATE_FORMAT);
        let date_time = Format::new().set_num_format(DATE_TIME_FORMAT);
        let (top, left) = self.origin();

        for (row_idx, row) in self.data().iter().enumerate() {
            let row_num = u32::try_from(row_idx)
                .ok()
                .and_then(|r| r.checked_add(top))
                .ok_or(SheetError::Overflow(row_idx))?;
            for (col_idx, cell) in row.iter().enumerate() {
                let col_num = u32::try_from(col_idx)
                    .ok()
                    .and_then(|c| c.checked_add(left))
                    .and_then(|c| u16::try_from(c).ok())
                    .ok_or(SheetError::Overflow(col_idx))?;

                match cell {
                    CellValue::Null => {} // Leave empty
                    CellValue::Bool(b) => {
                        worksheet.write_boolean(row_num, col_num, *b)?;
                    }
                    CellValue::Int(i) => {
                        // Excel stores all numbers as f64
                        worksheet.write_number(row_num, col_num, *i as f64)?;
                    }
                    CellValue::Float(f) => {
                        worksheet.write_number(row_num, col_num, *f)?;
                    }
                    CellValue::String(s) if s.is_empty() => {}
                    CellValue::String(s) => {
                        worksheet.write_string(row_num, col_num, s)?;
                    }
                    CellValue::DateTime(serial) => {
                        let format = if serial.fract().abs() < f64::EPSILON {
                            &date
                        } else {
                            &date_time
                        };
                        worksheet.write_number_with_format(row_num, col_num, *serial, format)?;
                    }
                    CellValue::Formula(formula) => {
                        write_formula(worksheet, row_num, col_num, formula)?;
                    }
                }
            }
        }

        Ok(())
    }
}

impl Book {
    /// Load every sheet of an xlsx workbook from bytes.
    ///
    /// Sheets are loaded raw; callers name columns on the sheets they use.
    pub fn from_xlsx_bytes(bytes: &[u8]) -> Result<Self> {
        let mut workbook = open(bytes)?;
        let sheet_names: Vec<String> = workbook.sheet_names().to_vec();

        let mut book = Book::new();
        for sheet_name in sheet_names {
            let sheet = read_sheet(&mut workbook, &sheet_name)?;
            book.add_sheet(&sheet_name, sheet)?;
        }

        Ok(book)
    }

    /// Serialize every sheet, in order, as one xlsx workbook.
    pub fn to_xlsx_bytes(&self) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        for (_, sheet) in self.sheets() {
            let worksheet = workbook.add_worksheet();
            sheet.write_to_worksheet(worksheet)?;
        }
        Ok(workbook.save_to_buffer()?)
    }
}
