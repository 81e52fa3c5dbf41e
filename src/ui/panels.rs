use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::table::write_table;
use crate::plot::save_figure;
use crate::state::AppState;
use crate::ui::color32;

// ---------------------------------------------------------------------------
// Left side panel – metadata and layer legend
// ---------------------------------------------------------------------------

/// Render the left info panel.
pub fn side_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("Sounding");
    ui.separator();

    for (kind, loaded) in [
        ("parse", &state.parse_response),
        ("classify", &state.classify_response),
    ] {
        let name = loaded
            .as_ref()
            .and_then(|r| r.path.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "—".to_string());
        ui.label(format!("{kind}: {name}"));
    }
    ui.separator();

    let soil = match &state.soil {
        Some(soil) => soil,
        None => {
            ui.label("No soil profile loaded.");
            return;
        }
    };

    let optional = |v: Option<f64>| {
        v.map(|v| format!("{v:.2} m"))
            .unwrap_or_else(|| "—".into())
    };

    egui::Grid::new("metadata")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            ui.label("Label");
            ui.label(soil.label());
            ui.end_row();
            ui.label("Reference");
            ui.label(soil.vertical_position_reference_point());
            ui.end_row();
            ui.label("Offset");
            ui.label(format!("{:.2} m", soil.vertical_position_offset()));
            ui.end_row();
            ui.label("Predrilled");
            ui.label(optional(soil.predrilled_depth()));
            ui.end_row();
            ui.label("Groundwater");
            ui.label(optional(soil.groundwater_level()));
            ui.end_row();
            if let Some(loc) = soil.location() {
                ui.label("Location");
                ui.label(format!("{:.6}, {:.6} ({})", loc.lat, loc.long, loc.srs_name));
                ui.end_row();
                if let Ok(rd) = loc.to_rd_new() {
                    ui.label("RD New");
                    ui.label(format!("{:.1}, {:.1}", rd.x, rd.y));
                    ui.end_row();
                }
            }
        });

    ui.separator();
    ui.strong(format!("Layers ({})", soil.layer_table().len()));

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for layer in soil.layer_table() {
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(RichText::new("■").color(color32(layer.color)).size(16.0));
                    ui.label(format!(
                        "{:.2}–{:.2} m  {}",
                        layer.upper_boundary, layer.lower_boundary, layer.geotechnical_soil_name
                    ))
                    .on_hover_text(format!(
                        "{}, mean qc {}",
                        layer.main_component,
                        layer
                            .mean_cone_resistance
                            .map(|v| format!("{v:.2} MPa"))
                            .unwrap_or_else(|| "—".into())
                    ));
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open parse response…").clicked() {
                open_response_dialog(state, ResponseKind::Parse);
                ui.close_menu();
            }
            if ui.button("Open classify response…").clicked() {
                open_response_dialog(state, ResponseKind::Classify);
                ui.close_menu();
            }
            ui.separator();
            let loaded = state.soil.is_some();
            if ui
                .add_enabled(loaded, egui::Button::new("Export figure…"))
                .clicked()
            {
                export_figure_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(loaded, egui::Button::new("Export layer table…"))
                .clicked()
            {
                export_table_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(soil) = &state.soil {
            ui.label(format!(
                "{}: {} samples, {} layers",
                soil.label(),
                soil.cpt_table().len(),
                soil.layer_table().len()
            ));
        }

        ui.separator();

        if ui
            .selectable_label(state.show_table, "Layer table")
            .clicked()
        {
            state.show_table = !state.show_table;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub enum ResponseKind {
    Parse,
    Classify,
}

pub fn open_response_dialog(state: &mut AppState, kind: ResponseKind) {
    let title = match kind {
        ResponseKind::Parse => "Open parse/cpt response",
        ResponseKind::Classify => "Open classify response",
    };
    let file = rfd::FileDialog::new()
        .set_title(title)
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        let result = match kind {
            ResponseKind::Parse => state.load_parse_file(&path),
            ResponseKind::Classify => state.load_classify_file(&path),
        };
        match result {
            Ok(()) => log::info!("Loaded {kind:?} response from {}", path.display()),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

fn export_figure_dialog(state: &mut AppState) {
    let Some(figure) = &state.figure else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export figure")
        .add_filter("PNG", &["png"])
        .add_filter("SVG", &["svg"])
        .set_file_name("soil_profile.png")
        .save_file();

    if let Some(path) = file {
        if let Err(e) = save_figure(figure, &path) {
            log::error!("Failed to export figure: {e}");
            state.status_message = Some(format!("Error: {e}"));
        }
    }
}

fn export_table_dialog(state: &mut AppState) {
    let Some(batch) = &state.layer_batch else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export layer table")
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .set_file_name("layers.csv")
        .save_file();

    if let Some(path) = file {
        if let Err(e) = write_table(batch, &path) {
            log::error!("Failed to export layer table: {e}");
            state.status_message = Some(format!("Error: {e}"));
        }
    }
}
