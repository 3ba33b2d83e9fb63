use rust_xlsxwriter::{Workbook, XlsxError};

use super::error::DataError;
use super::model::{CellValue, Dataset};

/// Worksheet name used for every exported workbook.
pub const SHEET_NAME: &str = "Sheet1";

/// Comma-separated UTF-8 text, header row included, no index column.
pub fn to_csv_bytes(dataset: &Dataset) -> Result<Vec<u8>, DataError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(dataset.columns())?;
    for row in dataset.rows() {
        writer.write_record(row.iter().map(CellValue::to_field))?;
    }
    writer
        .into_inner()
        .map_err(|e| DataError::Io(e.into_error()))
}

/// Single-sheet XLSX workbook, header row included, no index column.
pub fn to_xlsx_bytes(dataset: &Dataset) -> Result<Vec<u8>, DataError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, name) in dataset.columns().iter().enumerate() {
        sheet.write_string(0, column_number(col)?, name)?;
    }

    for (row_no, row) in dataset.rows().iter().enumerate() {
        let row_no = u32::try_from(row_no + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (col, cell) in row.iter().enumerate() {
            let col = column_number(col)?;
            match cell {
                CellValue::String(s) => {
                    sheet.write_string(row_no, col, s)?;
                }
                CellValue::Integer(i) => {
                    sheet.write_number(row_no, col, *i as f64)?;
                }
                CellValue::Float(f) => {
                    sheet.write_number(row_no, col, *f)?;
                }
                CellValue::Bool(b) => {
                    sheet.write_boolean(row_no, col, *b)?;
                }
                CellValue::Null => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn column_number(col: usize) -> Result<u16, XlsxError> {
    u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)
}
