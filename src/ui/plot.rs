use std::collections::BTreeSet;
use std::f32::consts::TAU;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, RichText, Sense, Shape, Stroke, Ui};
use egui_plot::{Bar, BarChart, Plot, PlotPoint, Text};

use crate::color::ColorMap;
use crate::data::model::CellValue;
use crate::data::summary::ProportionTable;
use crate::state::{AppState, ChartKind};

const CHART_HEIGHT: f32 = 260.0;
const BAR_WIDTH: f64 = 0.6;
/// Triangles per full turn when tessellating pie slices.
const PIE_SEGMENTS: f32 = 96.0;

// ---------------------------------------------------------------------------
// Raw vs filtered comparison (central panel)
// ---------------------------------------------------------------------------

/// Render the two side-by-side target charts.
pub fn comparison_charts(ui: &mut Ui, state: &AppState) {
    let colors = state
        .colors
        .clone()
        .unwrap_or_else(|| ColorMap::new(&BTreeSet::new()));

    ui.columns(2, |cols: &mut [Ui]| {
        target_chart(
            &mut cols[0],
            "raw_chart",
            "Dados brutos",
            state.raw_proportions.as_ref(),
            state.chart,
            &colors,
        );
        target_chart(
            &mut cols[1],
            "filtered_chart",
            "Dados filtrados",
            state.filtered_proportions.as_ref(),
            state.chart,
            &colors,
        );
    });
}

fn target_chart(
    ui: &mut Ui,
    id: &str,
    title: &str,
    table: Option<&ProportionTable>,
    kind: ChartKind,
    colors: &ColorMap,
) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(title).strong());
    });
    let Some(table) = table else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("Sem dados");
        });
        return;
    };
    match kind {
        ChartKind::Bar => bar_chart(ui, id, table, colors),
        ChartKind::Pie => pie_chart(ui, table, colors),
    }
}

// ---------------------------------------------------------------------------
// Bar chart
// ---------------------------------------------------------------------------

fn bar_chart(ui: &mut Ui, id: &str, table: &ProportionTable, colors: &ColorMap) {
    let bars: Vec<Bar> = table
        .entries
        .iter()
        .enumerate()
        .map(|(i, (label, pct))| {
            Bar::new(i as f64, *pct)
                .name(label.to_string())
                .fill(colors.color_for(label))
                .width(BAR_WIDTH)
        })
        .collect();
    let labels: Vec<String> = table.labels().map(ToString::to_string).collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_y(0.0)
        .include_y(110.0)
        .y_axis_label(table.column.as_str())
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
            for (i, (_, pct)) in table.entries.iter().enumerate() {
                plot_ui.text(Text::new(
                    PlotPoint::new(i as f64, pct + 4.0),
                    format!("{pct:.2}"),
                ));
            }
        });
}

/// Axis label for a grid mark: the category at integral positions, blank elsewhere.
fn category_label(labels: &[String], position: f64) -> String {
    let rounded = position.round();
    if (position - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

/// One slice: angles in radians, counter-clockwise from three o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: CellValue,
    pub start: f32,
    pub sweep: f32,
    pub percent: f64,
}

pub fn pie_slices(table: &ProportionTable) -> Vec<PieSlice> {
    let total = table.total();
    if total <= 0.0 {
        return Vec::new();
    }
    let mut start = 0.0_f32;
    table
        .entries
        .iter()
        .map(|(label, pct)| {
            let sweep = (pct / total) as f32 * TAU;
            let slice = PieSlice {
                label: label.clone(),
                start,
                sweep,
                percent: *pct,
            };
            start += sweep;
            slice
        })
        .collect()
}

fn direction(angle: f32) -> egui::Vec2 {
    // screen y grows downwards
    egui::vec2(angle.cos(), -angle.sin())
}

fn pie_chart(ui: &mut Ui, table: &ProportionTable, colors: &ColorMap) {
    let width = ui.available_width();
    let (response, painter) =
        ui.allocate_painter(egui::vec2(width, CHART_HEIGHT), Sense::hover());
    let center: Pos2 = response.rect.center();
    let radius = width.min(CHART_HEIGHT) * 0.38;
    let text_color = ui.visuals().text_color();

    for slice in pie_slices(table) {
        let color = colors.color_for(&slice.label);
        let steps = ((slice.sweep / TAU) * PIE_SEGMENTS).ceil().max(1.0) as usize;
        for s in 0..steps {
            let a0 = slice.start + slice.sweep * s as f32 / steps as f32;
            let a1 = slice.start + slice.sweep * (s + 1) as f32 / steps as f32;
            painter.add(Shape::convex_polygon(
                vec![
                    center,
                    center + direction(a0) * radius,
                    center + direction(a1) * radius,
                ],
                color,
                Stroke::NONE,
            ));
        }

        let mid = direction(slice.start + slice.sweep / 2.0);
        painter.text(
            center + mid * radius * 0.6,
            Align2::CENTER_CENTER,
            format!("{:.2}%", slice.percent),
            FontId::proportional(12.0),
            Color32::BLACK,
        );
        painter.text(
            center + mid * radius * 1.18,
            Align2::CENTER_CENTER,
            slice.label.to_string(),
            FontId::proportional(12.0),
            text_color,
        );
    }
}
