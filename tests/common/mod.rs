//! Shared fixtures for integration tests.

#![allow(dead_code)]

use proptest::prelude::*;

use telemarketing_analysis::data::model::{CellValue, Dataset};

pub const COLUMNS: [&str; 11] = [
    "age",
    "job",
    "marital",
    "default",
    "housing",
    "loan",
    "contact",
    "month",
    "day_of_week",
    "duration",
    "y",
];

/// One full row; `job`, `age` and `y` vary, the rest cycles with `i`.
pub fn row(i: usize, age: i64, job: &str, y: &str) -> Vec<CellValue> {
    let pick = |opts: &[&str]| CellValue::from(opts[i % opts.len()]);
    vec![
        CellValue::Integer(age),
        CellValue::from(job),
        pick(&["married", "single"]),
        pick(&["no", "no", "unknown"]),
        pick(&["yes", "no"]),
        pick(&["no", "yes", "no"]),
        pick(&["cellular", "telephone"]),
        pick(&["may", "jun", "jul"]),
        pick(&["mon", "tue", "wed", "thu", "fri"]),
        CellValue::Float(100.5 + i as f64),
        CellValue::from(y),
    ]
}

pub fn dataset(rows: Vec<Vec<CellValue>>) -> Dataset {
    Dataset::new(COLUMNS.iter().map(|c| c.to_string()).collect(), rows)
}

/// Ten rows, ages 25..65, alternating admin/technician, 3 "yes".
pub fn ten_rows() -> Dataset {
    let ages = [25, 25, 30, 35, 40, 45, 50, 55, 60, 65];
    let rows = ages
        .iter()
        .enumerate()
        .map(|(i, &age)| {
            let job = if i % 2 == 0 { "admin" } else { "technician" };
            let y = if i % 3 == 0 && i > 0 { "yes" } else { "no" };
            row(i, age, job, y)
        })
        .collect();
    dataset(rows)
}

/// The fixture as semicolon-delimited text.
pub fn to_semicolon_text(ds: &Dataset) -> String {
    let mut out = ds.columns().join(";");
    out.push('\n');
    for r in ds.rows() {
        let fields: Vec<String> = r.iter().map(CellValue::to_field).collect();
        out.push_str(&fields.join(";"));
        out.push('\n');
    }
    out
}

pub const JOBS: [&str; 4] = ["admin", "blue-collar", "services", "technician"];

/// Up to 40 rows with random ages, jobs and outcomes.
pub fn arb_dataset() -> impl Strategy<Value = Dataset> {
    prop::collection::vec((18i64..90, 0usize..JOBS.len(), any::<bool>()), 0..40).prop_map(
        |specs| {
            let rows = specs
                .into_iter()
                .enumerate()
                .map(|(i, (age, job, yes))| row(i, age, JOBS[job], if yes { "yes" } else { "no" }))
                .collect();
            dataset(rows)
        },
    )
}
