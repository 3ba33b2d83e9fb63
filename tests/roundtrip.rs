//! Exported files must load back without losing columns or rows.

mod common;

use proptest::prelude::*;

use telemarketing_analysis::data::export::{to_csv_bytes, to_xlsx_bytes};
use telemarketing_analysis::data::filter::{apply, AgeRange, FilterSelection, Selection};
use telemarketing_analysis::data::loader::{load_bytes, parse_spreadsheet, DEFAULT_DELIMITER};
use telemarketing_analysis::data::model::CellValue;
use telemarketing_analysis::data::summary::target_proportions;

use common::{arb_dataset, ten_rows, to_semicolon_text};

#[test]
fn semicolon_upload_loads_the_fixture() {
    let ds = ten_rows();
    let text = to_semicolon_text(&ds);
    let loaded = load_bytes(text.as_bytes(), DEFAULT_DELIMITER).unwrap();
    assert_eq!(loaded, ds);
}

#[test]
fn csv_export_round_trips() {
    let ds = ten_rows();
    let bytes = to_csv_bytes(&ds).unwrap();
    let loaded = load_bytes(&bytes, b',').unwrap();
    assert_eq!(loaded, ds);
}

#[test]
fn xlsx_export_round_trips_through_the_spreadsheet_fallback() {
    let ds = ten_rows();
    let bytes = to_xlsx_bytes(&ds).unwrap();
    // Not delimited text, so the loader must fall back to the workbook reader.
    let loaded = load_bytes(&bytes, DEFAULT_DELIMITER).unwrap();
    assert_eq!(loaded.columns(), ds.columns());
    assert_eq!(loaded, ds);
}

#[test]
fn filtered_export_keeps_only_surviving_rows() {
    let ds = ten_rows();
    let selection = FilterSelection::new(AgeRange::new(40, 65))
        .with("job", Selection::from_choices([CellValue::from("technician")]))
        .unwrap();
    let filtered = apply(&ds, &selection).unwrap();

    let loaded = load_bytes(&to_xlsx_bytes(&filtered).unwrap(), DEFAULT_DELIMITER).unwrap();
    assert_eq!(loaded, filtered);
    assert_eq!(loaded.len(), 3);
}

#[test]
fn proportion_table_export_keeps_labels_and_shares() {
    let table = target_proportions(&ten_rows()).unwrap();
    let sheet = parse_spreadsheet(&to_xlsx_bytes(&table.to_dataset()).unwrap()).unwrap();

    assert_eq!(sheet.columns(), ["y".to_string(), "proportion".to_string()]);
    let shares: Vec<(String, f64)> = sheet
        .rows()
        .iter()
        .map(|r| (r[0].to_string(), r[1].as_f64().unwrap()))
        .collect();
    assert_eq!(shares, vec![("no".to_string(), 70.0), ("yes".to_string(), 30.0)]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn any_dataset_survives_csv_export(ds in arb_dataset()) {
        let loaded = load_bytes(&to_csv_bytes(&ds).unwrap(), b',').unwrap();
        prop_assert_eq!(loaded, ds);
    }

    #[test]
    fn any_dataset_survives_xlsx_export(ds in arb_dataset()) {
        let loaded = load_bytes(&to_xlsx_bytes(&ds).unwrap(), DEFAULT_DELIMITER).unwrap();
        prop_assert_eq!(loaded, ds);
    }
}
