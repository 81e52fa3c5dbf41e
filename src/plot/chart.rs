use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;

use crate::color::{self, Rgb};

use super::figure::{ticks, Figure, Layout, Rect};

// ---------------------------------------------------------------------------
// Figure → plotters drawing area, shared by the PNG and SVG backends
// ---------------------------------------------------------------------------

type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Layer annotations: 5 pt at 100 dpi.
const LABEL_SIZE: f64 = 7.0;
const TICK_SIZE: f64 = 10.0;
const AXIS_SIZE: f64 = 12.0;
const TITLE_SIZE: f64 = 14.0;

const DASH: u32 = 8;
const DASH_GAP: u32 = 5;

/// Draw `fig` onto `root`. Text is only drawn when `labels` is set, since
/// the bitmap backend is built without a font engine.
pub(crate) fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    fig: &Figure,
    labels: bool,
) -> DrawResult<DB> {
    root.fill(&rgb(color::WHITE))?;
    let layout = Layout::new(fig);

    draw_layer_panel(&panel(root, &layout.layers), fig, labels)?;
    draw_cpt_panel(&panel(root, &layout.cpt), fig)?;
    if labels {
        draw_annotations(root, fig, &layout)?;
    }
    Ok(())
}

fn panel<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, r: &Rect) -> DrawingArea<DB, Shift> {
    root.clone().shrink(
        (r.x.round() as i32, r.y.round() as i32),
        (r.w.round().max(1.0) as u32, r.h.round().max(1.0) as u32),
    )
}

fn draw_layer_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    fig: &Figure,
    labels: bool,
) -> DrawResult<DB> {
    let (lo, hi) = fig.elevation_range;
    let mut chart = ChartBuilder::on(area).build_cartesian_2d(0f64..1f64, lo..hi)?;

    chart.draw_series(fig.bands.iter().map(|band| {
        Rectangle::new(
            [(0.0, band.top), (1.0, band.bottom)],
            rgb(band.color).filled(),
        )
    }))?;

    if labels {
        let style = text_style(LABEL_SIZE, color::BLACK, HPos::Left, VPos::Center);
        chart.draw_series(fig.bands.iter().map(|band| {
            let mid = (band.top + band.bottom) / 2.0;
            Text::new(band.label.clone(), (0.25, mid), style.clone())
        }))?;
    }

    chart.draw_series(std::iter::once(frame(lo, hi)))?;
    Ok(())
}

fn draw_cpt_panel<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, fig: &Figure) -> DrawResult<DB> {
    let (lo, hi) = fig.elevation_range;
    let mut chart = ChartBuilder::on(area).build_cartesian_2d(0f64..1f64, lo..hi)?;

    // ---- Grid ----
    let grid = rgb(color::blend(color::BLACK, color::WHITE, 0.15)).stroke_width(1);
    let grid_major = rgb(color::blend(color::BLACK, color::WHITE, 0.35)).stroke_width(1);
    chart.draw_series(
        ticks(lo, hi, fig.elevation_tick)
            .into_iter()
            .map(|z| PathElement::new(vec![(0.0, z), (1.0, z)], grid)),
    )?;
    if let Some(primary) = fig.traces.first() {
        chart.draw_series(primary.axis.ticks(1.0).into_iter().map(|v| {
            let x = primary.axis.normalize(v);
            let major = (v / 5.0).fract().abs() < 1e-9;
            PathElement::new(vec![(x, lo), (x, hi)], if major { grid_major } else { grid })
        }))?;
    }

    // ---- Level lines ----
    for level in &fig.levels {
        chart.draw_series(DashedLineSeries::new(
            vec![(0.0, level.elevation), (1.0, level.elevation)],
            DASH,
            DASH_GAP,
            rgb(level.color).stroke_width(1),
        ))?;
    }

    // ---- Traces ----
    for trace in &fig.traces {
        let style = rgb(trace.color).stroke_width(1);
        for seg in trace.normalized_segments(fig.elevation_range) {
            chart.draw_series(LineSeries::new(seg.into_iter().map(|[t, z]| (t, z)), style))?;
        }
    }

    chart.draw_series(std::iter::once(frame(lo, hi)))?;
    Ok(())
}

/// Title, axis labels, tick labels and level names around the panels.
fn draw_annotations<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    fig: &Figure,
    layout: &Layout,
) -> DrawResult<DB> {
    let cpt = layout.cpt;
    let (lo, hi) = fig.elevation_range;
    let px = |x: f64, y: f64| (x.round() as i32, y.round() as i32);

    root.draw(&Text::new(
        fig.title.clone(),
        px(fig.width_px as f64 / 2.0, 4.0),
        text_style(TITLE_SIZE, color::BLACK, HPos::Center, VPos::Top),
    ))?;

    // ---- Vertical axis ----
    let tick_style = text_style(TICK_SIZE, color::BLACK, HPos::Right, VPos::Center);
    for z in ticks(lo, hi, fig.elevation_tick) {
        root.draw(&Text::new(
            format_tick(z),
            px(cpt.x - 4.0, layout.y_px(z)),
            tick_style.clone(),
        ))?;
    }
    let rotated = ("sans-serif", AXIS_SIZE)
        .into_font()
        .transform(FontTransform::Rotate270)
        .color(&rgb(color::BLACK))
        .pos(Pos::new(HPos::Center, VPos::Top));
    root.draw(&Text::new(
        fig.elevation_label.clone(),
        px(4.0, cpt.y + cpt.h / 2.0),
        rotated,
    ))?;

    // ---- Stacked value axes above the CPT panel ----
    if let Some(primary) = fig.traces.first() {
        let style = text_style(TICK_SIZE, primary.axis.color, HPos::Center, VPos::Bottom);
        for v in primary.axis.ticks(5.0) {
            let x = Layout::x_px(&cpt, primary.axis.normalize(v));
            root.draw(&Text::new(format_tick(v), px(x, cpt.y - 3.0), style.clone()))?;
        }
    }
    for (i, trace) in fig.traces.iter().enumerate() {
        let axis = &trace.axis;
        let (left, right) = if axis.inverted {
            (axis.max, axis.min)
        } else {
            (axis.min, axis.max)
        };
        let text = format!("{} ({} to {})", axis.label, format_tick(left), format_tick(right));
        let y = cpt.y - TICK_SIZE - 6.0 - i as f64 * (AXIS_SIZE + 4.0);
        root.draw(&Text::new(
            text,
            px(cpt.center_x(), y),
            text_style(AXIS_SIZE, axis.color, HPos::Center, VPos::Bottom),
        ))?;
    }

    // ---- Level names at the right end of each line ----
    for level in &fig.levels {
        root.draw(&Text::new(
            level.name.clone(),
            px(cpt.x + cpt.w - 4.0, layout.y_px(level.elevation) - 2.0),
            text_style(TICK_SIZE, level.color, HPos::Right, VPos::Bottom),
        ))?;
    }
    Ok(())
}

fn frame(lo: f64, hi: f64) -> Rectangle<(f64, f64)> {
    Rectangle::new([(0.0, lo), (1.0, hi)], rgb(color::BLACK).stroke_width(1))
}

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.red, c.green, c.blue)
}

fn text_style(size: f64, c: Rgb, h: HPos, v: VPos) -> TextStyle<'static> {
    ("sans-serif", size)
        .into_font()
        .color(&rgb(c))
        .pos(Pos::new(h, v))
}

fn format_tick(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}
