use registro_sheet::{Book, CellValue, Sheet, SheetError};

const HEADER: [&str; 4] = ["Nombre", "Correo", "Teléfono", "Comentarios"];

fn row(values: [&str; 4]) -> Vec<(&'static str, CellValue)> {
    HEADER
        .iter()
        .zip(values)
        .map(|(name, value)| {
            let cell = if value.is_empty() {
                CellValue::Null
            } else {
                CellValue::from(value)
            };
            (*name, cell)
        })
        .collect()
}

// ===== Round-trip Tests =====

#[test]
fn test_roundtrip_preserves_rows_and_column_order() {
    let mut sheet = Sheet::with_header("Respuestas", &HEADER).unwrap();
    sheet
        .append_named_row(row(["Ana", "a@x.com", "", "hola"]))
        .unwrap();
    sheet
        .append_named_row(row(["Luis", "l@x.com", "555 1234", ""]))
        .unwrap();
    sheet
        .append_named_row(row(["Zoë", "z@x.com", "+34 600", "ñandú, «comillas»"]))
        .unwrap();

    let bytes = sheet.to_xlsx_bytes().unwrap();
    let loaded = Sheet::from_xlsx_bytes(&bytes, "Respuestas")
        .unwrap()
        .unwrap();

    let header: Vec<String> = HEADER.iter().map(|s| (*s).to_string()).collect();
    assert_eq!(loaded.column_names(), Some(&header));
    assert_eq!(loaded.record_count(), 3);

    let as_text = |s: &Sheet| -> Vec<Vec<String>> {
        s.records()
            .iter()
            .map(|r| r.iter().map(CellValue::as_str).collect())
            .collect()
    };
    assert_eq!(as_text(&loaded), as_text(&sheet));
}

#[test]
fn test_header_only_sheet_roundtrip() {
    let sheet = Sheet::with_header("Respuestas", &HEADER).unwrap();
    let bytes = sheet.to_xlsx_bytes().unwrap();

    let loaded = Sheet::from_xlsx_bytes(&bytes, "Respuestas")
        .unwrap()
        .unwrap();
    assert_eq!(loaded.row_count(), 1);
    assert_eq!(loaded.record_count(), 0);
}

// ===== Book Tests =====

#[test]
fn test_book_replace_one_sheet() {
    let mut book = Book::new();
    let mut summary = Sheet::with_name("Resumen");
    summary.row_append(vec!["total", "3"]).unwrap();
    book.add_sheet("Resumen", summary).unwrap();
    book.add_sheet("Respuestas", Sheet::with_header("x", &HEADER).unwrap())
        .unwrap();

    let bytes = book.to_xlsx_bytes().unwrap();
    let mut loaded = Book::from_xlsx_bytes(&bytes).unwrap();

    let mut responses = Sheet::with_header("Respuestas", &HEADER).unwrap();
    responses
        .append_named_row(row(["Ana", "a@x.com", "", "hola"]))
        .unwrap();
    loaded.put_sheet("Respuestas", responses);

    let bytes = loaded.to_xlsx_bytes().unwrap();
    let reloaded = Book::from_xlsx_bytes(&bytes).unwrap();

    assert_eq!(reloaded.sheet_names(), vec!["Resumen", "Respuestas"]);
    assert_eq!(reloaded.get_sheet("Respuestas").unwrap().row_count(), 2);
    assert_eq!(
        reloaded.get_sheet("Resumen").unwrap().get(0, 1).unwrap().as_str(),
        "3"
    );
}

#[test]
fn test_get_missing_sheet() {
    let book = Book::new();
    let err = book.get_sheet("Respuestas").unwrap_err();
    assert!(matches!(err, SheetError::SheetNotFound { name } if name == "Respuestas"));
}
