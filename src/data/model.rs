use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::error::DataError;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Numeric column filtered by an inclusive range.
pub const AGE_COLUMN: &str = "age";

/// Binary outcome column summarised before and after filtering.
pub const TARGET_COLUMN: &str = "y";

/// Categorical columns, in the order their filters are applied.
pub const CATEGORICAL_COLUMNS: [&str; 8] = [
    "job",
    "marital",
    "default",
    "housing",
    "loan",
    "contact",
    "month",
    "day_of_week",
];

/// Every column an upload must provide.
pub fn required_columns() -> impl Iterator<Item = &'static str> {
    [AGE_COLUMN]
        .into_iter()
        .chain(CATEGORICAL_COLUMNS)
        .chain([TARGET_COLUMN])
}

// ---------------------------------------------------------------------------
// CellValue – a single cell of the dataset
// ---------------------------------------------------------------------------

/// One cell of the dataset, typed on load.
///
/// Cells are totally ordered (nulls, then bools, integers, floats, strings)
/// so they can key `BTreeSet`s of filter options. Floats compare with
/// `f64::total_cmp`, which makes `NaN` equal to itself.
#[derive(Debug, Clone)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl CellValue {
    fn rank(&self) -> u8 {
        match self {
            CellValue::Null => 0,
            CellValue::Bool(_) => 1,
            CellValue::Integer(_) => 2,
            CellValue::Float(_) => 3,
            CellValue::String(_) => 4,
        }
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (CellValue::Integer(a), CellValue::Integer(b)) => a.cmp(b),
            (CellValue::Float(a), CellValue::Float(b)) => a.total_cmp(b),
            (CellValue::String(a), CellValue::String(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            CellValue::Bool(b) => b.hash(state),
            CellValue::Integer(i) => i.hash(state),
            // total_cmp equality is bit equality
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::String(s) => s.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Float(v) => write!(f, "{v:.4}"),
            CellValue::Null => f.write_str("<null>"),
            other => f.write_str(&other.to_field()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl CellValue {
    /// Interpret the value as an `f64` for range comparisons.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Lossless text form used when writing delimited files.
    /// Unlike `Display`, floats keep full precision and nulls are empty.
    pub fn to_field(&self) -> String {
        match self {
            CellValue::String(s) => s.clone(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(v) => v.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Null => String::new(),
        }
    }

    /// Coerce a raw text field into the narrowest matching type.
    pub fn parse_field(s: &str) -> CellValue {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Dataset – the loaded table
// ---------------------------------------------------------------------------

/// An ordered table: named columns and rows of cells.
///
/// Row position is the index; every derived dataset is renumbered from zero
/// simply by being a fresh `Vec`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    /// Build a dataset, padding or truncating each row to the header width
    /// and promoting mixed integer/float columns to floats.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Null);
                row
            })
            .collect();
        let mut dataset = Dataset { columns, rows };
        dataset.harmonise_numeric_columns();
        dataset
    }

    /// Column names in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Like [`column_index`](Self::column_index) but reports the absence.
    pub fn require_column(&self, name: &str) -> Result<usize, DataError> {
        self.column_index(name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))
    }

    /// Iterate one column's cells in row order.
    pub fn column_values(
        &self,
        name: &str,
    ) -> Result<impl Iterator<Item = &CellValue> + '_, DataError> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Sorted set of distinct values observed in a column.
    pub fn unique_values(&self, name: &str) -> Result<BTreeSet<CellValue>, DataError> {
        Ok(self.column_values(name)?.cloned().collect())
    }

    /// First `n` rows, for previews.
    pub fn head(&self, n: usize) -> &[Vec<CellValue>] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Names of the required columns absent from this dataset.
    pub fn missing_required_columns(&self) -> Vec<String> {
        required_columns()
            .filter(|c| self.column_index(c).is_none())
            .map(str::to_string)
            .collect()
    }

    /// Keep the rows for which `keep` holds, preserving their order.
    pub fn retain_rows<F>(&self, mut keep: F) -> Dataset
    where
        F: FnMut(&[CellValue]) -> bool,
    {
        Dataset {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Fallible variant of [`retain_rows`](Self::retain_rows).
    pub fn try_retain_rows<F>(&self, mut keep: F) -> Result<Dataset, DataError>
    where
        F: FnMut(&[CellValue]) -> Result<bool, DataError>,
    {
        let mut rows = Vec::new();
        for row in &self.rows {
            if keep(row)? {
                rows.push(row.clone());
            }
        }
        Ok(Dataset {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// A column holding both integers and floats becomes all floats.
    fn harmonise_numeric_columns(&mut self) {
        for col in 0..self.columns.len() {
            let has_int = self
                .rows
                .iter()
                .any(|row| matches!(row[col], CellValue::Integer(_)));
            let has_float = self
                .rows
                .iter()
                .any(|row| matches!(row[col], CellValue::Float(_)));
            if !(has_int && has_float) {
                continue;
            }
            for row in &mut self.rows {
                if let CellValue::Integer(i) = row[col] {
                    row[col] = CellValue::Float(i as f64);
                }
            }
        }
    }

    /// Spreadsheets store every number as a float: a float column whose
    /// values are all integral is turned back into integers.
    pub(crate) fn narrow_integral_floats(mut self) -> Self {
        for col in 0..self.columns.len() {
            let integral = self.rows.iter().all(|row| match row[col] {
                CellValue::Float(f) => f.fract() == 0.0 && f.abs() < i64::MAX as f64,
                _ => true,
            });
            if !integral {
                continue;
            }
            for row in &mut self.rows {
                if let CellValue::Float(f) = row[col] {
                    row[col] = CellValue::Integer(f as i64);
                }
            }
        }
        self
    }
}
