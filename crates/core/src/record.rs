//! Contact records collected by the form.

use thiserror::Error;

/// Fixed column header of the records sheet, in storage order.
pub const COLUMNS: [&str; 4] = ["Nombre", "Correo", "Teléfono", "Comentarios"];

/// Maximum accepted length (in characters) per field, in column order.
pub const MAX_LENGTHS: [usize; 4] = [100, 120, 50, 500];

/// Reasons a submitted record is rejected before reaching storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("El nombre y el correo electrónico son obligatorios.")]
    MissingRequired,

    #[error("El campo {column} admite como máximo {max} caracteres.")]
    TooLong { column: &'static str, max: usize },
}

/// One form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub comments: String,
}

impl Record {
    /// Create a record from the four field values.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        comments: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            comments: comments.into(),
        }
    }

    /// The fixed column header.
    pub fn columns() -> &'static [&'static str] {
        &COLUMNS
    }

    /// Copy of this record with surrounding whitespace removed from every field.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self::new(
            self.name.trim(),
            self.email.trim(),
            self.phone.trim(),
            self.comments.trim(),
        )
    }

    /// Check required fields and length limits.
    ///
    /// Name and email must be non-empty once trimmed; phone and comments may be empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() {
            return Err(ValidationError::MissingRequired);
        }

        for ((column, max), value) in COLUMNS.into_iter().zip(MAX_LENGTHS).zip(self.values()) {
            if value.trim().chars().count() > max {
                return Err(ValidationError::TooLong { column, max });
            }
        }

        Ok(())
    }

    /// Field values in column order.
    pub fn values(&self) -> [&str; 4] {
        [&self.name, &self.email, &self.phone, &self.comments]
    }

    /// Value for a header column name, `None` for unknown columns.
    pub fn get(&self, column: &str) -> Option<&str> {
        COLUMNS
            .iter()
            .position(|c| *c == column)
            .map(|i| self.values()[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_trims_every_field() {
        let record = Record::new("  Ana ", "\ta@x.com\n", " 555 ", "  hola  ");
        assert_eq!(
            record.normalized(),
            Record::new("Ana", "a@x.com", "555", "hola")
        );
    }

    #[test]
    fn test_validate_requires_name_and_email() {
        assert_eq!(
            Record::new("", "a@x.com", "", "").validate(),
            Err(ValidationError::MissingRequired)
        );
        assert_eq!(
            Record::new("Ana", "   ", "", "").validate(),
            Err(ValidationError::MissingRequired)
        );
        assert!(Record::new("Ana", "a@x.com", "", "").validate().is_ok());
    }

    #[test]
    fn test_validate_length_limits() {
        let record = Record::new("Ana", "a@x.com", "5".repeat(51), "");
        assert_eq!(
            record.validate(),
            Err(ValidationError::TooLong {
                column: "Teléfono",
                max: 50
            })
        );

        // limits count characters, not bytes
        let record = Record::new("ñ".repeat(100), "a@x.com", "", "");
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_get_by_column() {
        let record = Record::new("Ana", "a@x.com", "", "hola");
        assert_eq!(record.get("Nombre"), Some("Ana"));
        assert_eq!(record.get("Teléfono"), Some(""));
        assert_eq!(record.get("Comentarios"), Some("hola"));
        assert_eq!(record.get("Edad"), None);
    }
}
