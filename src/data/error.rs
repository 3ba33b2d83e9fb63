//! Error types for the data layer.

use thiserror::Error;

/// Errors raised while loading, filtering, summarising or encoding a dataset.
#[derive(Debug, Error)]
pub enum DataError {
    // === Loading ===
    /// Delimited-text parsing failed.
    #[error("failed to parse delimited text: {0}")]
    Csv(#[from] csv::Error),

    /// A record has more fields than the header names.
    #[error("record {record} has {found} fields, header has {expected}")]
    TooManyFields {
        record: usize,
        expected: usize,
        found: usize,
    },

    /// The workbook reader rejected the upload.
    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("workbook has no worksheets")]
    NoWorksheet,

    /// Neither the delimited-text nor the spreadsheet reader accepted the upload.
    #[error("upload is neither delimited text ({csv}) nor a spreadsheet ({spreadsheet})")]
    Unreadable {
        csv: Box<DataError>,
        #[source]
        spreadsheet: Box<DataError>,
    },

    /// The upload lacks columns the dashboard depends on.
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    // === Pipeline ===
    /// A column referenced by an operation is not in the dataset.
    #[error("column '{0}' not found")]
    MissingColumn(String),

    /// A column has no usable (non-null) values.
    #[error("column '{0}' has no values")]
    EmptyColumn(String),

    /// A numeric operation met a non-numeric cell.
    #[error("column '{column}' row {row}: '{value}' is not numeric")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    // === Export ===
    /// Writing the workbook failed.
    #[error("failed to write spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Flushing the delimited-text writer failed.
    #[error("failed to write delimited text: {0}")]
    Io(#[from] std::io::Error),
}
