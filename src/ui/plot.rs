use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{HLine, Legend, Line, LineStyle, Plot, PlotPoint, PlotPoints, Polygon, Text};

use crate::state::AppState;
use crate::ui::color32;

// ---------------------------------------------------------------------------
// Soil profile plot (central panel)
// ---------------------------------------------------------------------------

const ELEVATION_LINK: &str = "elevation";

/// Render the CPT traces and the layer column side by side.
pub fn soil_plot(ui: &mut Ui, state: &AppState) {
    let figure = match &state.figure {
        Some(fig) => fig,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a parse and a classify response  (File → Open…)");
            });
            return;
        }
    };

    let (lo, hi) = figure.elevation_range;
    let (r_cpt, r_layers) = figure.width_ratios;
    let total = (r_cpt + r_layers).max(f64::EPSILON);
    let available = ui.available_width() - ui.spacing().item_spacing.x;
    let layers_width = (available as f64 * r_layers / total) as f32;
    let cpt_width = available - layers_width;

    // All traces share one normalized x axis; label it with the cone scale.
    let cone_axis = figure.traces.first().map(|t| t.axis.clone());
    let x_label = figure
        .traces
        .iter()
        .map(|t| t.axis.label.as_str())
        .collect::<Vec<_>>()
        .join("  |  ");

    ui.horizontal(|ui: &mut Ui| {
        Plot::new("cpt_plot")
            .width(cpt_width)
            .legend(Legend::default())
            .link_axis(ELEVATION_LINK, [false, true])
            .x_axis_label(x_label)
            .y_axis_label(figure.elevation_label.clone())
            .include_x(0.0)
            .include_x(1.0)
            .include_y(lo)
            .include_y(hi)
            .x_axis_formatter(move |mark, _range| match &cone_axis {
                Some(axis) => format!("{:.0}", axis.value_at(mark.value)),
                None => String::new(),
            })
            .allow_boxed_zoom(true)
            .allow_drag(true)
            .allow_scroll(true)
            .allow_zoom(true)
            .show(ui, |plot_ui| {
                for trace in &figure.traces {
                    let name = format!("{} ({})", trace.name, trace.axis.label);
                    for seg in trace.normalized_segments(figure.elevation_range) {
                        let line = Line::new(PlotPoints::new(seg))
                            .name(&name)
                            .color(color32(trace.color))
                            .width(1.5);
                        plot_ui.line(line);
                    }
                }

                for level in &figure.levels {
                    plot_ui.hline(
                        HLine::new(level.elevation)
                            .name(&level.name)
                            .color(color32(level.color))
                            .style(LineStyle::dashed_loose())
                            .width(1.5),
                    );
                }
            });

        Plot::new("layer_plot")
            .width(layers_width)
            .show_axes([false, true])
            .show_grid([false, false])
            .link_axis(ELEVATION_LINK, [false, true])
            .include_x(0.0)
            .include_x(1.0)
            .include_y(lo)
            .include_y(hi)
            .show(ui, |plot_ui| {
                for band in &figure.bands {
                    let outline = PlotPoints::new(vec![
                        [0.0, band.top],
                        [1.0, band.top],
                        [1.0, band.bottom],
                        [0.0, band.bottom],
                    ]);
                    plot_ui.polygon(
                        Polygon::new(outline)
                            .name(&band.label)
                            .fill_color(color32(band.color))
                            .stroke(Stroke::NONE),
                    );
                    let mid = (band.top + band.bottom) / 2.0;
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(0.25, mid),
                            RichText::new(&band.label).size(9.0),
                        )
                        .color(Color32::BLACK),
                    );
                }
            });
    });
}
