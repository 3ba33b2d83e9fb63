//! Dashboard state: upload, submit, summaries and downloads.

mod common;

use telemarketing_analysis::config::AppConfig;
use telemarketing_analysis::data::loader::load_bytes;
use telemarketing_analysis::data::model::CellValue;
use telemarketing_analysis::state::{
    AppState, ChartKind, ExportFormat, ExportTarget, FILTER_ERROR_MESSAGE,
};

use common::{dataset, ten_rows, to_semicolon_text};

fn loaded_state() -> AppState {
    let mut state = AppState::new(AppConfig::default());
    let text = to_semicolon_text(&ten_rows());
    state.load_upload("bank.csv", text.as_bytes());
    state
}

#[test]
fn upload_applies_pass_through_filters() {
    let state = loaded_state();
    assert_eq!(state.source_name.as_deref(), Some("bank.csv"));
    assert_eq!(state.raw(), Some(&ten_rows()));
    assert_eq!(state.filtered(), Some(&ten_rows()));
    assert_eq!(state.raw_proportions, state.filtered_proportions);
    assert!(state.status_message.is_none());

    let form = state.form.as_ref().unwrap();
    assert_eq!((form.age.min, form.age.max), (25, 65));
    let job = &form.controls[0];
    assert_eq!(job.column, "job");
    assert_eq!(job.options.last(), Some(&CellValue::from("all")));
}

#[test]
fn draft_edits_apply_only_on_submit() {
    let mut state = loaded_state();
    let form = state.form.as_mut().unwrap();
    form.age.min = 30;
    form.age.max = 50;
    form.chart = ChartKind::Pie;
    form.toggle("job", &CellValue::from("all"));
    form.toggle("job", &CellValue::from("admin"));

    assert_eq!(state.filtered().unwrap().len(), 10);
    assert_eq!(state.chart, ChartKind::Bar);

    state.submit();
    assert_eq!(state.filtered().unwrap().len(), 3);
    assert_eq!(state.chart, ChartKind::Pie);
}

#[test]
fn emptied_filter_reports_and_clears_filtered_proportions() {
    let mut state = loaded_state();
    let form = state.form.as_mut().unwrap();
    form.toggle("marital", &CellValue::from("all"));
    state.submit();

    assert!(state.filtered().unwrap().is_empty());
    assert!(state.filtered_proportions.is_none());
    assert_eq!(state.status_message.as_deref(), Some(FILTER_ERROR_MESSAGE));
    assert!(state.raw_proportions.is_some());
}

#[test]
fn rejected_upload_keeps_previous_dataset() {
    let mut state = loaded_state();
    state.load_upload("broken.csv", b"age;job\n30;admin\n");

    assert!(state.status_message.as_deref().unwrap().contains("broken.csv"));
    assert_eq!(state.raw(), Some(&ten_rows()));
    assert_eq!(state.source_name.as_deref(), Some("bank.csv"));
}

#[test]
fn clamp_keeps_age_handles_ordered() {
    let mut state = loaded_state();
    let form = state.form.as_mut().unwrap();
    form.age.min = 70;
    form.age.max = 10;
    form.clamp_age();
    assert_eq!((form.age.min, form.age.max), (65, 65));
}

#[test]
fn downloads_use_expected_names_and_decode() {
    let mut state = loaded_state();

    assert_eq!(
        ExportTarget::Filtered.file_name(ExportFormat::Xlsx),
        "bank_filtered.xlsx"
    );
    assert_eq!(
        ExportTarget::RawProportions.file_name(ExportFormat::Csv),
        "bank_raw_y.csv"
    );
    assert_eq!(
        ExportTarget::FilteredProportions.file_name(ExportFormat::Xlsx),
        "bank_y.xlsx"
    );

    let csv = state
        .export(ExportTarget::Filtered, ExportFormat::Csv)
        .unwrap()
        .unwrap();
    assert_eq!(load_bytes(&csv, b',').unwrap(), ten_rows());

    let table = state
        .export(ExportTarget::RawProportions, ExportFormat::Csv)
        .unwrap()
        .unwrap();
    assert_eq!(String::from_utf8(table).unwrap(), "y,proportion\nno,70\nyes,30\n");

    // cached bytes are returned unchanged
    let again = state
        .export(ExportTarget::Filtered, ExportFormat::Csv)
        .unwrap()
        .unwrap();
    assert_eq!(again, csv);
}

#[test]
fn nothing_to_export_before_upload() {
    let mut state = AppState::default();
    assert!(state
        .export(ExportTarget::Filtered, ExportFormat::Xlsx)
        .unwrap()
        .is_none());
}

#[test]
fn reuploading_identical_bytes_reuses_the_parse() {
    let mut state = loaded_state();
    let before = state.cache_stats();

    let text = to_semicolon_text(&ten_rows());
    state.load_upload("copy.csv", text.as_bytes());

    assert_eq!(state.source_name.as_deref(), Some("copy.csv"));
    assert_eq!(state.raw(), Some(&ten_rows()));
    assert_eq!(state.cache_stats(), before);
}

#[test]
fn new_upload_replaces_cached_filter_and_exports() {
    let mut state = loaded_state();
    let first = state
        .export(ExportTarget::Filtered, ExportFormat::Csv)
        .unwrap()
        .unwrap();

    let smaller = dataset(ten_rows().rows()[..6].to_vec());
    state.load_upload("smaller.csv", to_semicolon_text(&smaller).as_bytes());
    assert_eq!(state.raw(), Some(&smaller));
    assert_eq!(state.filtered(), Some(&smaller));

    let second = state
        .export(ExportTarget::Filtered, ExportFormat::Csv)
        .unwrap()
        .unwrap();
    assert_ne!(second, first);
    assert_eq!(load_bytes(&second, b',').unwrap(), smaller);

    // a rejected upload is parsed but leaves the downstream caches alone
    let stats = state.cache_stats();
    state.load_upload("broken.csv", b"age;job\n30;admin\n");
    assert_eq!(state.filtered(), Some(&smaller));
    let third = state
        .export(ExportTarget::Filtered, ExportFormat::Csv)
        .unwrap()
        .unwrap();
    assert_eq!(third, second);

    let after = state.cache_stats();
    assert_eq!(after.loads, stats.loads + 1);
    assert_eq!((after.filters, after.exports), (stats.filters, stats.exports));
}
