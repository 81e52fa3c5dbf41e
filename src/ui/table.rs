use arrow::util::display::array_value_to_string;
use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Layer table (bottom panel)
// ---------------------------------------------------------------------------

/// Show the Arrow projection of the layer table, nulls as empty cells.
pub fn layer_table(ui: &mut Ui, state: &AppState) {
    let Some(batch) = &state.layer_batch else {
        ui.label("No layer table.");
        return;
    };

    let schema = batch.schema();
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(Column::auto().at_least(60.0), schema.fields().len())
        .header(20.0, |mut header| {
            for field in schema.fields() {
                header.col(|ui| {
                    ui.strong(field.name());
                });
            }
        })
        .body(|body| {
            body.rows(18.0, batch.num_rows(), |mut row| {
                let i = row.index();
                for column in batch.columns() {
                    row.col(|ui| {
                        ui.label(array_value_to_string(column, i).unwrap_or_default());
                    });
                }
            });
        });
}
