use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct TelemarketingApp {
    pub state: AppState,
    branding: Option<egui::TextureHandle>,
}

impl TelemarketingApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let branding = config
            .branding_image
            .as_deref()
            .and_then(|path| match load_branding(&cc.egui_ctx, path) {
                Ok(texture) => Some(texture),
                Err(e) => {
                    log::warn!("Branding image skipped: {e:#}");
                    None
                }
            });

        Self {
            state: AppState::new(config),
            branding,
        }
    }
}

/// Decode the sidebar picture into a GPU texture.
fn load_branding(ctx: &egui::Context, path: &Path) -> Result<egui::TextureHandle> {
    let image = image::open(path)
        .with_context(|| format!("decoding {}", path.display()))?
        .to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    let pixels = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
    Ok(ctx.load_texture("branding", pixels, egui::TextureOptions::LINEAR))
}

impl eframe::App for TelemarketingApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: upload + filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, self.branding.as_ref());
            });

        // ---- Central panel: tables and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    panels::central_panel(ui, &mut self.state);
                });
        });
    }
}
