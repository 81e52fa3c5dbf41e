use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CptViewerApp {
    pub state: AppState,
}

impl CptViewerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for CptViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: metadata and legend ----
        egui::SidePanel::left("info_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state);
            });

        // ---- Bottom panel: layer table ----
        if self.state.show_table && self.state.layer_batch.is_some() {
            egui::TopBottomPanel::bottom("layer_table")
                .resizable(true)
                .default_height(220.0)
                .show(ctx, |ui| {
                    table::layer_table(ui, &self.state);
                });
        }

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::soil_plot(ui, &self.state);
        });
    }
}
