use std::collections::BTreeMap;

use super::error::DataError;
use super::model::{CellValue, Dataset, TARGET_COLUMN};

/// Header of the share column in exported proportion tables.
pub const PROPORTION_COLUMN: &str = "proportion";

/// Percentage frequency of each distinct value of a column, ascending by value.
#[derive(Debug, Clone, PartialEq)]
pub struct ProportionTable {
    pub column: String,
    pub entries: Vec<(CellValue, f64)>,
}

impl ProportionTable {
    /// Share of `value`, in percent.
    pub fn share(&self, value: &CellValue) -> Option<f64> {
        self.entries
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, pct)| *pct)
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, pct)| pct).sum()
    }

    pub fn labels(&self) -> impl Iterator<Item = &CellValue> + '_ {
        self.entries.iter().map(|(v, _)| v)
    }

    /// Two-column table (`<column>`, `proportion`) suitable for export.
    pub fn to_dataset(&self) -> Dataset {
        let rows = self
            .entries
            .iter()
            .map(|(value, pct)| vec![value.clone(), CellValue::Float(*pct)])
            .collect();
        Dataset::new(
            vec![self.column.clone(), PROPORTION_COLUMN.to_string()],
            rows,
        )
    }
}

/// Percentage frequency of the non-null values of `column`.
///
/// Fails when the column is absent or holds no values, e.g. after the
/// filters removed every row.
pub fn proportions(dataset: &Dataset, column: &str) -> Result<ProportionTable, DataError> {
    let mut counts: BTreeMap<CellValue, usize> = BTreeMap::new();
    for value in dataset.column_values(column)?.filter(|v| !v.is_null()) {
        *counts.entry(value.clone()).or_default() += 1;
    }

    let total: usize = counts.values().sum();
    if total == 0 {
        return Err(DataError::EmptyColumn(column.to_string()));
    }

    let entries = counts
        .into_iter()
        .map(|(value, n)| (value, n as f64 / total as f64 * 100.0))
        .collect();

    Ok(ProportionTable {
        column: column.to_string(),
        entries,
    })
}

/// [`proportions`] of the target column.
pub fn target_proportions(dataset: &Dataset) -> Result<ProportionTable, DataError> {
    proportions(dataset, TARGET_COLUMN)
}
