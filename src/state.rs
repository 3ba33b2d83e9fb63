use std::borrow::Cow;
use std::collections::BTreeSet;

use crate::cache::{fingerprint, Memo};
use crate::color::ColorMap;
use crate::config::AppConfig;
use crate::data::error::DataError;
use crate::data::export::{to_csv_bytes, to_xlsx_bytes};
use crate::data::filter::{self, age_bounds, allow_list, AgeRange, FilterSelection, Selection, ALL};
use crate::data::loader;
use crate::data::model::{CellValue, Dataset, CATEGORICAL_COLUMNS};
use crate::data::summary::{target_proportions, ProportionTable};

/// Shown when the filtered view has no target values to summarise.
pub const FILTER_ERROR_MESSAGE: &str = "Erro no filtro dos dados";

// ---------------------------------------------------------------------------
// Small enums shared with the UI
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Bar,
    Pie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn encode(self, dataset: &Dataset) -> Result<Vec<u8>, DataError> {
        match self {
            ExportFormat::Xlsx => to_xlsx_bytes(dataset),
            ExportFormat::Csv => to_csv_bytes(dataset),
        }
    }
}

/// What a download button exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    Filtered,
    RawProportions,
    FilteredProportions,
}

impl ExportTarget {
    pub fn file_name(self, format: ExportFormat) -> String {
        let stem = match self {
            ExportTarget::Filtered => "bank_filtered",
            ExportTarget::RawProportions => "bank_raw_y",
            ExportTarget::FilteredProportions => "bank_y",
        };
        format!("{stem}.{}", format.extension())
    }

    fn slot(self) -> usize {
        match self {
            ExportTarget::Filtered => 0,
            ExportTarget::RawProportions => 1,
            ExportTarget::FilteredProportions => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Filter form (draft widget values)
// ---------------------------------------------------------------------------

/// One categorical control: its options and the ticked ones.
#[derive(Debug, Clone)]
pub struct CategoryControl {
    pub column: String,
    pub options: Vec<CellValue>,
    pub chosen: BTreeSet<CellValue>,
}

/// Widget values of the sidebar form. Edits stay here until submitted.
#[derive(Debug, Clone)]
pub struct FilterForm {
    pub chart: ChartKind,
    pub bounds: AgeRange,
    pub age: AgeRange,
    pub controls: Vec<CategoryControl>,
}

impl FilterForm {
    /// Form defaults for `dataset`: full age span, `all` ticked everywhere.
    pub fn new(dataset: &Dataset) -> Result<Self, DataError> {
        let bounds = age_bounds(dataset)?;
        let controls = CATEGORICAL_COLUMNS
            .iter()
            .map(|column| -> Result<CategoryControl, DataError> {
                Ok(CategoryControl {
                    column: column.to_string(),
                    options: allow_list(dataset, column)?,
                    chosen: BTreeSet::from([CellValue::from(ALL)]),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FilterForm {
            chart: ChartKind::default(),
            bounds,
            age: bounds,
            controls,
        })
    }

    /// Keep the age handles inside the bounds and in order.
    pub fn clamp_age(&mut self) {
        self.age.min = self.age.min.clamp(self.bounds.min, self.bounds.max);
        self.age.max = self.age.max.clamp(self.bounds.min, self.bounds.max);
        if self.age.min > self.age.max {
            self.age.max = self.age.min;
        }
    }

    pub fn toggle(&mut self, column: &str, value: &CellValue) {
        if let Some(control) = self.controls.iter_mut().find(|c| c.column == column) {
            if !control.chosen.remove(value) {
                control.chosen.insert(value.clone());
            }
        }
    }

    pub fn to_selection(&self) -> Result<FilterSelection, DataError> {
        let mut selection = FilterSelection::new(self.age);
        for control in &self.controls {
            selection.set(
                &control.column,
                Selection::from_choices(control.chosen.iter().cloned()),
            )?;
        }
        Ok(selection)
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// How often each cached stage actually ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub loads: u64,
    pub filters: u64,
    pub exports: u64,
}

/// The full dashboard state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Name of the file the current dataset came from.
    pub source_name: Option<String>,

    /// Draft widget values (None until a dataset is loaded).
    pub form: Option<FilterForm>,

    /// Selection of the last submission.
    pub applied: Option<FilterSelection>,

    /// Chart style of the last submission.
    pub chart: ChartKind,

    pub raw_proportions: Option<ProportionTable>,
    pub filtered_proportions: Option<ProportionTable>,

    /// Colours shared by both charts.
    pub colors: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    raw_cache: Memo<Dataset>,
    filter_cache: Memo<Dataset>,
    export_caches: [Memo<Vec<u8>>; 3],
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            source_name: None,
            form: None,
            applied: None,
            chart: ChartKind::default(),
            raw_proportions: None,
            filtered_proportions: None,
            colors: None,
            status_message: None,
            raw_cache: Memo::new("load"),
            filter_cache: Memo::new("filter"),
            export_caches: [
                Memo::new("export filtered"),
                Memo::new("export raw proportions"),
                Memo::new("export filtered proportions"),
            ],
        }
    }

    /// Dataset as uploaded.
    pub fn raw(&self) -> Option<&Dataset> {
        self.raw_cache.peek()
    }

    /// Dataset after the last submitted filters.
    pub fn filtered(&self) -> Option<&Dataset> {
        self.filter_cache.peek()
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            loads: self.raw_cache.misses(),
            filters: self.filter_cache.misses(),
            exports: self.export_caches.iter().map(Memo::misses).sum(),
        }
    }

    /// Parse an upload and reset the dashboard to pass-through filters.
    /// A rejected upload leaves the previous dataset in place.
    pub fn load_upload(&mut self, name: &str, bytes: &[u8]) {
        let key = fingerprint(bytes);
        let delimiter = self.config.delimiter_byte();
        let changed = self.raw_cache.key() != Some(key);

        let raw = match self
            .raw_cache
            .get_or_try_insert_with(key, || loader::load_bytes(bytes, delimiter))
        {
            Ok(raw) => raw,
            Err(e) => {
                log::error!("Failed to load {name}: {e}");
                self.status_message = Some(format!("Erro ao carregar {name}: {e}"));
                return;
            }
        };

        if changed {
            self.filter_cache.invalidate();
            for memo in &mut self.export_caches {
                memo.invalidate();
            }
        }

        let form = match FilterForm::new(raw) {
            Ok(form) => form,
            Err(e) => {
                log::error!("Cannot build filters for {name}: {e}");
                self.raw_cache.invalidate();
                self.source_name = None;
                self.form = None;
                self.applied = None;
                self.raw_proportions = None;
                self.filtered_proportions = None;
                self.colors = None;
                self.status_message = Some(format!("Erro ao carregar {name}: {e}"));
                return;
            }
        };

        self.raw_proportions = match target_proportions(raw) {
            Ok(table) => Some(table),
            Err(e) => {
                log::warn!("Raw proportions unavailable: {e}");
                None
            }
        };

        self.source_name = Some(name.to_string());
        self.status_message = None;
        self.form = Some(form);
        self.submit();
    }

    /// Apply the draft form: it becomes the active selection and chart style.
    pub fn submit(&mut self) {
        let Some(form) = &self.form else {
            return;
        };
        match form.to_selection() {
            Ok(selection) => {
                self.chart = form.chart;
                self.applied = Some(selection);
                self.run_pipeline();
            }
            Err(e) => {
                log::error!("Invalid filter form: {e}");
                self.status_message = Some(e.to_string());
            }
        }
    }

    /// Filter the raw dataset with the applied selection and refresh the
    /// filtered summary.
    fn run_pipeline(&mut self) {
        let (Some(raw), Some(selection)) = (self.raw_cache.peek(), &self.applied) else {
            return;
        };
        let key = fingerprint(&(self.raw_cache.key(), selection));

        let filtered = match self
            .filter_cache
            .get_or_try_insert_with(key, || filter::apply(raw, selection))
        {
            Ok(ds) => ds,
            Err(e) => {
                log::error!("Filtering failed: {e}");
                self.filter_cache.invalidate();
                self.filtered_proportions = None;
                self.status_message = Some(e.to_string());
                self.refresh_colors();
                return;
            }
        };

        match target_proportions(filtered) {
            Ok(table) => {
                self.filtered_proportions = Some(table);
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("Filtered proportions unavailable: {e}");
                self.filtered_proportions = None;
                self.status_message = Some(FILTER_ERROR_MESSAGE.to_string());
            }
        }
        self.refresh_colors();
    }

    fn refresh_colors(&mut self) {
        let tables = self
            .raw_proportions
            .iter()
            .chain(self.filtered_proportions.iter());
        self.colors = Some(ColorMap::for_tables(tables));
    }

    /// Encoded bytes for a download button, or `None` if there is nothing
    /// to export yet.
    pub fn export(
        &mut self,
        target: ExportTarget,
        format: ExportFormat,
    ) -> Result<Option<Vec<u8>>, DataError> {
        let dataset: Cow<'_, Dataset> = match target {
            ExportTarget::Filtered => match self.filter_cache.peek() {
                Some(ds) => Cow::Borrowed(ds),
                None => return Ok(None),
            },
            ExportTarget::RawProportions => match &self.raw_proportions {
                Some(table) => Cow::Owned(table.to_dataset()),
                None => return Ok(None),
            },
            ExportTarget::FilteredProportions => match &self.filtered_proportions {
                Some(table) => Cow::Owned(table.to_dataset()),
                None => return Ok(None),
            },
        };

        let key = fingerprint(&(dataset.as_ref(), format));
        let bytes = self.export_caches[target.slot()]
            .get_or_try_insert_with(key, || format.encode(&dataset))?;
        log::info!(
            "Prepared {} ({} bytes)",
            target.file_name(format),
            bytes.len()
        );
        Ok(Some(bytes.clone()))
    }
}
