use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Represents a formula stored in a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaCell {
    pub source: String,
    pub cached: Option<Box<CellValue>>,
}

/// Represents a cell value in a sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Excel date serial: days since 1899-12-30, time as the fraction.
    DateTime(f64),
    Formula(FormulaCell),
}

impl CellValue {
    /// Create a formula cell value with the result Excel last computed.
    #[must_use]
    pub fn formula<S: Into<String>>(source: S, cached: CellValue) -> Self {
        CellValue::Formula(FormulaCell {
            source: source.into(),
            cached: Some(Box::new(cached)),
        })
    }

    /// Check if the value renders as an empty string
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Get the value as a string
    ///
    /// Whole floats render without a fractional part, so a phone number typed
    /// into Excel as `5551234` reads back as `"5551234"`. Formulas render
    /// their cached result.
    #[must_use]
    pub fn as_str(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::String(s) => s.clone(),
            CellValue::DateTime(serial) => format_serial_date(*serial),
            CellValue::Formula(formula) => formula
                .cached
                .as_deref()
                .map(CellValue::as_str)
                .unwrap_or_default(),
        }
    }
}

/// Render an Excel date serial as `YYYY-MM-DD`, adding the time when it is
/// not midnight.
fn format_serial_date(serial: f64) -> String {
    let Some(epoch) = NaiveDate::from_ymd_opt(1899, 12, 30).and_then(|d| d.and_hms_opt(0, 0, 0))
    else {
        return serial.to_string();
    };

    let millis = (serial * 86_400_000.0).round() as i64;
    let Some(moment) =
        Duration::try_milliseconds(millis).and_then(|offset| epoch.checked_add_signed(offset))
    else {
        return serial.to_string();
    };

    let pattern = if moment.time() == NaiveTime::MIN {
        "%Y-%m-%d"
    } else {
        "%Y-%m-%d %H:%M:%S"
    };
    moment.format(pattern).to_string()
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}
