use eframe::egui::{ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Dataset;
use crate::data::summary::{ProportionTable, PROPORTION_COLUMN};

const HEADER_HEIGHT: f32 = 20.0;
const ROW_HEIGHT: f32 = 18.0;
const MIN_COLUMN_WIDTH: f32 = 60.0;

// ---------------------------------------------------------------------------
// Dataset preview
// ---------------------------------------------------------------------------

/// First `rows` rows of `dataset`, with a leading row-number column.
pub fn dataset_preview(ui: &mut Ui, id: &str, dataset: &Dataset, rows: usize) {
    ui.push_id(id, |ui: &mut Ui| {
        ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .column(Column::auto())
                .columns(
                    Column::auto().at_least(MIN_COLUMN_WIDTH),
                    dataset.columns().len(),
                )
                .header(HEADER_HEIGHT, |mut header| {
                    header.col(|_ui| {});
                    for name in dataset.columns() {
                        header.col(|ui| {
                            ui.strong(name.as_str());
                        });
                    }
                })
                .body(|mut body| {
                    for (i, row) in dataset.head(rows).iter().enumerate() {
                        body.row(ROW_HEIGHT, |mut table_row| {
                            table_row.col(|ui| {
                                ui.label(i.to_string());
                            });
                            for cell in row {
                                table_row.col(|ui| {
                                    ui.label(cell.to_string());
                                });
                            }
                        });
                    }
                });
        });
    });
    ui.label(format!("{} linhas × {} colunas", dataset.len(), dataset.columns().len()));
}

// ---------------------------------------------------------------------------
// Proportion table
// ---------------------------------------------------------------------------

pub fn proportion_table(ui: &mut Ui, id: &str, table: &ProportionTable) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::auto().at_least(MIN_COLUMN_WIDTH))
            .column(Column::auto().at_least(MIN_COLUMN_WIDTH))
            .header(HEADER_HEIGHT, |mut header| {
                header.col(|ui| {
                    ui.strong(table.column.as_str());
                });
                header.col(|ui| {
                    ui.strong(PROPORTION_COLUMN);
                });
            })
            .body(|mut body| {
                for (value, pct) in &table.entries {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.label(value.to_string());
                        });
                        row.col(|ui| {
                            ui.label(format!("{pct:.6}"));
                        });
                    });
                }
            });
    });
}
