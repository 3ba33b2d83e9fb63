use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{self, load::SizedTexture, Color32, RichText, ScrollArea, Slider, TextureHandle, Ui};

use crate::data::model::CellValue;
use crate::state::{AppState, ChartKind, ExportFormat, ExportTarget};
use crate::ui::{plot, tables};

// ---------------------------------------------------------------------------
// Left side panel – upload and filter form
// ---------------------------------------------------------------------------

/// Sidebar label of a categorical filter.
pub fn column_label(column: &str) -> &str {
    match column {
        "job" => "Profissão",
        "marital" => "Estado civil",
        "default" => "Default",
        "housing" => "Tem financiamento imob?",
        "loan" => "Tem empréstimo?",
        "contact" => "Meio de contato",
        "month" => "Mês do contato",
        "day_of_week" => "Dia da semana",
        other => other,
    }
}

/// Render the left panel: branding, upload and the filter form.
pub fn side_panel(ui: &mut Ui, state: &mut AppState, branding: Option<&TextureHandle>) {
    if let Some(texture) = branding {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.add(
                egui::Image::from_texture(SizedTexture::from_handle(texture))
                    .max_width(ui.available_width() * 0.9)
                    .max_height(140.0),
            );
        });
        ui.add_space(4.0);
    }

    ui.heading("Suba o arquivo");
    if ui.button("Bank marketing data (csv, xlsx)…").clicked() {
        open_file_dialog(state);
    }
    if let Some(name) = &state.source_name {
        ui.label(RichText::new(name).weak());
    }
    ui.separator();

    let Some(form) = state.form.as_mut() else {
        ui.label("Nenhum arquivo carregado.");
        return;
    };

    let mut toggled: Vec<(String, CellValue)> = Vec::new();
    let mut submitted = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Chart type ----
            ui.strong("Tipo de gráfico:");
            ui.horizontal(|ui: &mut Ui| {
                ui.radio_value(&mut form.chart, ChartKind::Bar, "Barras");
                ui.radio_value(&mut form.chart, ChartKind::Pie, "Pizza");
            });
            ui.separator();

            // ---- Age range ----
            ui.strong("Idade");
            let bounds = form.bounds.min..=form.bounds.max;
            ui.add(Slider::new(&mut form.age.min, bounds.clone()).text("mín"));
            ui.add(Slider::new(&mut form.age.max, bounds).text("máx"));
            form.clamp_age();
            ui.separator();

            // ---- Categorical allow-lists (collapsible) ----
            for control in &form.controls {
                let header_text = format!(
                    "{}  ({}/{})",
                    column_label(&control.column),
                    control.chosen.len(),
                    control.options.len()
                );
                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(&control.column)
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        for option in &control.options {
                            let mut checked = control.chosen.contains(option);
                            if ui.checkbox(&mut checked, option.to_string()).changed() {
                                toggled.push((control.column.clone(), option.clone()));
                            }
                        }
                    });
            }
            ui.separator();

            if ui.button(RichText::new("Aplicar").strong()).clicked() {
                submitted = true;
            }
        });

    for (column, value) in &toggled {
        form.toggle(column, value);
    }
    if submitted {
        state.submit();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / status bar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Arquivo", |ui: &mut Ui| {
            if ui.button("Abrir…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(raw) = state.raw() {
            let visible = state.filtered().map_or(0, |ds| ds.len());
            ui.label(format!(
                "{} linhas carregadas, {} após os filtros",
                raw.len(),
                visible
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – previews, proportions, charts
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Telemarketing Analysis");
    ui.separator();

    let preview_rows = state.config.preview_rows;
    let Some(raw) = state.raw() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Suba um arquivo para começar  (Arquivo → Abrir…)");
        });
        return;
    };

    ui.heading("Antes dos filtros");
    tables::dataset_preview(ui, "raw_preview", raw, preview_rows);
    ui.add_space(8.0);

    ui.heading("Após os filtros");
    match state.filtered() {
        Some(filtered) => tables::dataset_preview(ui, "filtered_preview", filtered, preview_rows),
        None => {
            ui.label("Sem dados filtrados.");
        }
    }
    download_buttons(ui, state, ExportTarget::Filtered, "📥 Download tabela filtrada");
    ui.separator();

    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].heading("Proporção original");
        if let Some(table) = &state.raw_proportions {
            tables::proportion_table(&mut cols[0], "raw_proportions", table);
        }
        download_buttons(&mut cols[0], state, ExportTarget::RawProportions, "📥 Download");

        cols[1].heading("Proporção da tabela com filtros");
        if let Some(table) = &state.filtered_proportions {
            tables::proportion_table(&mut cols[1], "filtered_proportions", table);
        }
        download_buttons(&mut cols[1], state, ExportTarget::FilteredProportions, "📥 Download");
    });
    ui.separator();

    ui.heading("Proporção de aceite");
    plot::comparison_charts(ui, state);
}

fn download_buttons(ui: &mut Ui, state: &mut AppState, target: ExportTarget, label: &str) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        for format in [ExportFormat::Xlsx, ExportFormat::Csv] {
            let text = match format {
                ExportFormat::Xlsx => "Excel",
                ExportFormat::Csv => "CSV",
            };
            if ui.small_button(text).clicked() {
                save_file_dialog(state, target, format);
            }
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Bank marketing data")
        .add_filter("Supported files", &["csv", "xlsx"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx"])
        .pick_file();

    if let Some(path) = file {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        match std::fs::read(&path).with_context(|| format!("reading {}", path.display())) {
            Ok(bytes) => state.load_upload(&name, &bytes),
            Err(e) => {
                log::error!("Failed to open file: {e:#}");
                state.status_message = Some(format!("Erro: {e:#}"));
            }
        }
    }
}

pub fn save_file_dialog(state: &mut AppState, target: ExportTarget, format: ExportFormat) {
    let bytes = match state.export(target, format) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            log::debug!("nothing to export for {target:?}");
            return;
        }
        Err(e) => {
            log::error!("Export failed: {e}");
            state.status_message = Some(format!("Erro: {e}"));
            return;
        }
    };

    let file_name = target.file_name(format);
    let Some(path) = rfd::FileDialog::new()
        .set_title("Salvar")
        .set_file_name(&file_name)
        .add_filter(format.extension(), &[format.extension()])
        .save_file()
    else {
        return;
    };

    if let Err(e) = write_export(&path, &bytes) {
        log::error!("{e:#}");
        state.status_message = Some(format!("Erro: {e:#}"));
    }
}

fn write_export(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Saved {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
