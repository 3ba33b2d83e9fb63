use std::collections::BTreeSet;

use super::error::DataError;
use super::model::{CellValue, Dataset, AGE_COLUMN, CATEGORICAL_COLUMNS};

/// Sentinel option meaning "do not filter this column".
pub const ALL: &str = "all";

// ---------------------------------------------------------------------------
// Filter predicates
// ---------------------------------------------------------------------------

/// Selection for one categorical column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Selection {
    /// Every row passes.
    #[default]
    All,
    /// Only rows whose value is in the set pass. An empty set passes nothing.
    Only(BTreeSet<CellValue>),
}

impl Selection {
    /// Build a selection from the options a user ticked.
    /// Ticking `all` wins over any explicit values.
    pub fn from_choices<I>(choices: I) -> Self
    where
        I: IntoIterator<Item = CellValue>,
    {
        let all = CellValue::from(ALL);
        let mut values = BTreeSet::new();
        for choice in choices {
            if choice == all {
                return Selection::All;
            }
            values.insert(choice);
        }
        Selection::Only(values)
    }

    pub fn matches(&self, value: &CellValue) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(values) => values.contains(value),
        }
    }
}

/// Inclusive age bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AgeRange {
    pub min: i64,
    pub max: i64,
}

impl AgeRange {
    pub fn new(min: i64, max: i64) -> Self {
        AgeRange { min, max }
    }

    pub fn contains(&self, age: f64) -> bool {
        self.min as f64 <= age && age <= self.max as f64
    }
}

/// Everything the pipeline needs to narrow a dataset: one age range and a
/// selection per categorical column, kept in application order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterSelection {
    pub age: AgeRange,
    categories: Vec<(String, Selection)>,
}

impl FilterSelection {
    /// The age range given, every categorical column set to [`Selection::All`].
    pub fn new(age: AgeRange) -> Self {
        FilterSelection {
            age,
            categories: CATEGORICAL_COLUMNS
                .iter()
                .map(|c| (c.to_string(), Selection::All))
                .collect(),
        }
    }

    /// Selection that keeps every row of `dataset`.
    pub fn pass_through(dataset: &Dataset) -> Result<Self, DataError> {
        Ok(Self::new(age_bounds(dataset)?))
    }

    /// Replace the selection for `column`.
    pub fn set(&mut self, column: &str, selection: Selection) -> Result<(), DataError> {
        let slot = self
            .categories
            .iter_mut()
            .find(|(c, _)| c == column)
            .ok_or_else(|| DataError::MissingColumn(column.to_string()))?;
        slot.1 = selection;
        Ok(())
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, column: &str, selection: Selection) -> Result<Self, DataError> {
        self.set(column, selection)?;
        Ok(self)
    }

    pub fn get(&self, column: &str) -> Option<&Selection> {
        self.categories
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, s)| s)
    }

    /// Categorical selections in application order.
    pub fn categories(&self) -> impl Iterator<Item = (&str, &Selection)> + '_ {
        self.categories.iter().map(|(c, s)| (c.as_str(), s))
    }
}

// ---------------------------------------------------------------------------
// Allow-lists
// ---------------------------------------------------------------------------

/// Sorted options followed by the `all` sentinel.
pub fn with_all_option(values: BTreeSet<CellValue>) -> Vec<CellValue> {
    let mut options: Vec<CellValue> = values.into_iter().collect();
    options.push(CellValue::from(ALL));
    options
}

/// Options for the filter control of `column`.
pub fn allow_list(dataset: &Dataset, column: &str) -> Result<Vec<CellValue>, DataError> {
    Ok(with_all_option(dataset.unique_values(column)?))
}

/// Slider bounds: the truncated minimum and maximum of the numeric ages.
pub fn age_bounds(dataset: &Dataset) -> Result<AgeRange, DataError> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for age in dataset.column_values(AGE_COLUMN)?.filter_map(CellValue::as_f64) {
        lo = lo.min(age);
        hi = hi.max(age);
    }
    if lo > hi {
        return Err(DataError::EmptyColumn(AGE_COLUMN.to_string()));
    }
    Ok(AgeRange::new(lo.trunc() as i64, hi.trunc() as i64))
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Keep rows whose age lies in `range`. Null ages never match.
pub fn filter_by_age(dataset: &Dataset, range: &AgeRange) -> Result<Dataset, DataError> {
    let idx = dataset.require_column(AGE_COLUMN)?;
    let mut row_no = 0;
    dataset.try_retain_rows(|row| {
        let cell = &row[idx];
        let current = row_no;
        row_no += 1;
        match cell {
            CellValue::Null => Ok(false),
            other => other
                .as_f64()
                .map(|age| range.contains(age))
                .ok_or_else(|| DataError::NonNumeric {
                    column: AGE_COLUMN.to_string(),
                    row: current,
                    value: other.to_string(),
                }),
        }
    })
}

/// Keep rows whose value in `column` matches `selection`.
/// [`Selection::All`] returns the dataset unchanged.
pub fn filter_by_membership(
    dataset: &Dataset,
    column: &str,
    selection: &Selection,
) -> Result<Dataset, DataError> {
    let idx = dataset.require_column(column)?;
    match selection {
        Selection::All => Ok(dataset.clone()),
        Selection::Only(_) => Ok(dataset.retain_rows(|row| selection.matches(&row[idx]))),
    }
}

/// Apply the age range, then each categorical selection in order.
pub fn apply(dataset: &Dataset, selection: &FilterSelection) -> Result<Dataset, DataError> {
    let mut current = filter_by_age(dataset, &selection.age)?;
    for (column, choice) in selection.categories() {
        current = filter_by_membership(&current, column, choice)?;
    }
    log::info!(
        "Filter kept {} of {} rows",
        current.len(),
        dataset.len()
    );
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        let ages = [25, 25, 30, 35, 40, 45, 50, 55, 60, 65];
        let rows = ages
            .iter()
            .enumerate()
            .map(|(i, &age)| {
                let job = if i % 2 == 0 { "admin" } else { "technician" };
                vec![CellValue::Integer(age), CellValue::from(job)]
            })
            .collect();
        Dataset::new(vec!["age".into(), "job".into()], rows)
    }

    #[test]
    fn choosing_all_overrides_explicit_values() {
        let sel = Selection::from_choices([CellValue::from("admin"), CellValue::from(ALL)]);
        assert_eq!(sel, Selection::All);
    }

    #[test]
    fn empty_choice_matches_nothing() {
        let sel = Selection::from_choices(Vec::new());
        let out = filter_by_membership(&dataset(), "job", &sel).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.columns(), dataset().columns());
    }

    #[test]
    fn allow_list_is_sorted_with_all_last() {
        let options = allow_list(&dataset(), "job").unwrap();
        assert_eq!(
            options,
            vec![
                CellValue::from("admin"),
                CellValue::from("technician"),
                CellValue::from(ALL),
            ]
        );
    }

    #[test]
    fn age_bounds_cover_the_column() {
        assert_eq!(age_bounds(&dataset()).unwrap(), AgeRange::new(25, 65));
    }

    #[test]
    fn age_bounds_truncate_fractional_ages() {
        let ds = Dataset::new(
            vec!["age".into()],
            vec![vec![CellValue::Float(18.7)], vec![CellValue::Float(70.2)]],
        );
        assert_eq!(age_bounds(&ds).unwrap(), AgeRange::new(18, 70));
    }

    #[test]
    fn age_bounds_of_empty_dataset_fail() {
        let ds = Dataset::new(vec!["age".into()], Vec::new());
        assert!(matches!(age_bounds(&ds), Err(DataError::EmptyColumn(_))));
    }

    #[test]
    fn age_filter_is_inclusive_and_skips_nulls() {
        let ds = Dataset::new(
            vec!["age".into()],
            vec![
                vec![CellValue::Integer(30)],
                vec![CellValue::Null],
                vec![CellValue::Integer(50)],
                vec![CellValue::Integer(51)],
            ],
        );
        let out = filter_by_age(&ds, &AgeRange::new(30, 50)).unwrap();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn non_numeric_age_is_reported() {
        let ds = Dataset::new(
            vec!["age".into()],
            vec![vec![CellValue::Integer(30)], vec![CellValue::from("old")]],
        );
        let err = filter_by_age(&ds, &AgeRange::new(0, 100)).unwrap_err();
        assert!(matches!(err, DataError::NonNumeric { row: 1, .. }));
    }

    #[test]
    fn unknown_column_cannot_be_selected() {
        let mut sel = FilterSelection::new(AgeRange::new(0, 1));
        assert!(sel.set("education", Selection::All).is_err());
        assert!(sel.set("loan", Selection::Only(BTreeSet::new())).is_ok());
        assert_eq!(sel.get("loan"), Some(&Selection::Only(BTreeSet::new())));
        assert_eq!(sel.get("job"), Some(&Selection::All));
    }

    #[test]
    fn categories_follow_application_order() {
        let sel = FilterSelection::new(AgeRange::new(0, 1));
        let order: Vec<&str> = sel.categories().map(|(c, _)| c).collect();
        assert_eq!(order, CATEGORICAL_COLUMNS);
    }
}
