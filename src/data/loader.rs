use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use super::error::DataError;
use super::model::{CellValue, Dataset};

/// Default delimiter of uploaded text files.
pub const DEFAULT_DELIMITER: u8 = b';';

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an uploaded byte stream into a [`Dataset`].
///
/// The bytes are tried as delimited text first; on any error they are read
/// as a spreadsheet workbook (xlsx, xls, xlsb or ods). The resulting table
/// must contain every required column.
pub fn load_bytes(bytes: &[u8], delimiter: u8) -> Result<Dataset, DataError> {
    let dataset = match parse_delimited(bytes, delimiter) {
        Ok(ds) => ds,
        Err(csv_err) => {
            log::debug!("delimited parse failed ({csv_err}); trying spreadsheet");
            parse_spreadsheet(bytes).map_err(|spreadsheet| DataError::Unreadable {
                csv: Box::new(csv_err),
                spreadsheet: Box::new(spreadsheet),
            })?
        }
    };

    let missing = dataset.missing_required_columns();
    if !missing.is_empty() {
        return Err(DataError::MissingColumns(missing));
    }

    log::info!(
        "Loaded {} rows with columns {:?}",
        dataset.len(),
        dataset.columns()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Delimited text
// ---------------------------------------------------------------------------

/// Header row, then one record per line. Short records are padded with
/// nulls; a record wider than the header is an error. Every field must be
/// valid UTF-8.
pub fn parse_delimited(bytes: &[u8], delimiter: u8) -> Result<Dataset, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() > columns.len() {
            return Err(DataError::TooManyFields {
                record: i + 1,
                expected: columns.len(),
                found: record.len(),
            });
        }
        rows.push(record.iter().map(CellValue::parse_field).collect());
    }

    Ok(Dataset::new(columns, rows))
}

// ---------------------------------------------------------------------------
// Spreadsheet
// ---------------------------------------------------------------------------

/// Read the first worksheet; its first row is the header.
pub fn parse_spreadsheet(bytes: &[u8]) -> Result<Dataset, DataError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(DataError::NoWorksheet)??;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Dataset::default());
    };

    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell {
            Data::Empty => format!("column_{}", i + 1),
            other => other.to_string().trim().to_string(),
        })
        .collect();

    let rows = rows
        .map(|row| row.iter().map(spreadsheet_cell).collect())
        .collect();

    Ok(Dataset::new(columns, rows).narrow_integral_floats())
}

fn spreadsheet_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::parse_field(s),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Empty | Data::Error(_) => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "age;job;marital;default;housing;loan;contact;month;day_of_week;y";

    #[test]
    fn parses_semicolon_text() {
        let text = format!(
            "{HEADER}\n56;housemaid;married;no;no;no;telephone;may;mon;no\n\
             37;services;married;no;yes;no;telephone;may;mon;yes\n"
        );
        let ds = load_bytes(text.as_bytes(), DEFAULT_DELIMITER).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.columns().len(), 10);
        assert_eq!(ds.rows()[0][0], CellValue::Integer(56));
        assert_eq!(ds.rows()[1][1], CellValue::from("services"));
    }

    #[test]
    fn quoted_fields_are_unquoted() {
        let text = format!("{HEADER}\n30;\"blue-collar\";married;no;yes;no;cellular;may;fri;no\n");
        let ds = load_bytes(text.as_bytes(), DEFAULT_DELIMITER).unwrap();
        assert_eq!(ds.rows()[0][1], CellValue::from("blue-collar"));
    }

    #[test]
    fn missing_columns_are_rejected_by_name() {
        let text = "age;job\n30;admin.\n";
        let err = load_bytes(text.as_bytes(), DEFAULT_DELIMITER).unwrap_err();
        match err {
            DataError::MissingColumns(cols) => {
                assert!(cols.contains(&"y".to_string()));
                assert!(cols.contains(&"marital".to_string()));
                assert!(!cols.contains(&"job".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn short_record_is_padded_with_null() {
        let text = format!(
            "{HEADER}\n56;housemaid;married;no;no;no;telephone;may;mon;no\n\
             37;services;married;no;yes;no;telephone;may;mon\n"
        );
        let ds = load_bytes(text.as_bytes(), DEFAULT_DELIMITER).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows()[1][8], CellValue::from("mon"));
        assert_eq!(ds.rows()[1][9], CellValue::Null);
    }

    #[test]
    fn wide_record_is_rejected() {
        let err = parse_delimited(b"a;b\n1;2\n1;2;3\n", DEFAULT_DELIMITER).unwrap_err();
        assert!(matches!(
            err,
            DataError::TooManyFields {
                record: 2,
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn ragged_text_falls_back_and_reports_both_failures() {
        let text = "a;b\n1;2;3\n";
        let err = load_bytes(text.as_bytes(), DEFAULT_DELIMITER).unwrap_err();
        match err {
            DataError::Unreadable { csv, spreadsheet } => {
                assert!(matches!(*csv, DataError::TooManyFields { .. }));
                assert!(matches!(*spreadsheet, DataError::Spreadsheet(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn binary_garbage_is_unreadable_with_spreadsheet_source() {
        let bytes = [0x50, 0x4b, 0x03, 0x04, 0xff, 0xfe, 0x00, 0x81];
        let err = load_bytes(&bytes, DEFAULT_DELIMITER).unwrap_err();
        assert!(matches!(err, DataError::Unreadable { .. }));
        let source = std::error::Error::source(&err).expect("spreadsheet error kept as source");
        assert!(source.to_string().contains("spreadsheet"));
    }
}
