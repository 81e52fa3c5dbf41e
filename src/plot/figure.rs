use crate::color::{self, Rgb};
use crate::config::PlotConfig;
use crate::data::model::{CptSample, SoilProperties};

// ---------------------------------------------------------------------------
// Figure description
// ---------------------------------------------------------------------------

/// A value axis. Traces on different axes share one panel through
/// [`Axis::normalize`], which maps the axis range onto `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub inverted: bool,
    pub color: Rgb,
}

impl Axis {
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        let t = if span.abs() < f64::EPSILON {
            0.0
        } else {
            (value - self.min) / span
        };
        if self.inverted {
            1.0 - t
        } else {
            t
        }
    }

    /// Inverse of [`Axis::normalize`].
    pub fn value_at(&self, t: f64) -> f64 {
        let t = if self.inverted { 1.0 - t } else { t };
        self.min + t * (self.max - self.min)
    }

    /// Multiples of `step` inside the axis range.
    pub fn ticks(&self, step: f64) -> Vec<f64> {
        ticks(self.min, self.max, step)
    }
}

/// Upper bound on grid lines per axis; wider ranges get no grid.
const MAX_TICKS: f64 = 2_000.0;

/// Multiples of `step` in `lo..=hi`.
pub fn ticks(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || !(hi >= lo) || (hi - lo) / step > MAX_TICKS {
        return Vec::new();
    }
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

/// A measured trace against elevation. Nulls split it into segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub name: String,
    pub axis: Axis,
    pub color: Rgb,
    /// Runs of `[value, elevation]` points.
    pub segments: Vec<Vec<[f64; 2]>>,
}

impl Trace {
    /// Segments with the value mapped through the trace's axis, clipped to
    /// the panel `[0, 1] × elevation_range`. Non-finite points break a run.
    pub fn normalized_segments(&self, elevation_range: (f64, f64)) -> Vec<Vec<[f64; 2]>> {
        let mut out = Vec::new();
        let (lo, hi) = elevation_range;
        if !(lo <= hi) {
            return out;
        }
        for seg in &self.segments {
            let mut run: Vec<[f64; 2]> = Vec::with_capacity(seg.len());
            for &[v, z] in seg {
                let p = [self.axis.normalize(v), z];
                if p[0].is_finite() && p[1].is_finite() {
                    run.push(p);
                } else {
                    clip_polyline(&run, elevation_range, &mut out);
                    run.clear();
                }
            }
            clip_polyline(&run, elevation_range, &mut out);
        }
        out
    }
}

fn clip_polyline(points: &[[f64; 2]], (lo, hi): (f64, f64), out: &mut Vec<Vec<[f64; 2]>>) {
    if let [p] = points {
        if (0.0..=1.0).contains(&p[0]) && (lo..=hi).contains(&p[1]) {
            out.push(vec![*p]);
        }
        return;
    }

    let mut current: Vec<[f64; 2]> = Vec::new();
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let Some((enter, exit)) = clip_segment(a, b, (lo, hi)) else {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            continue;
        };
        if enter.is_some() || current.is_empty() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            current.push(enter.unwrap_or(a));
        }
        current.push(exit.unwrap_or(b));
        if exit.is_some() {
            out.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
}

#[derive(Debug, Clone, Copy)]
enum Edge {
    X(f64),
    Y(f64),
}

/// Liang–Barsky against `[0, 1] × [lo, hi]`. Returns the points where
/// `a`–`b` enters and leaves the box (`None` for an endpoint inside it),
/// or `None` when the segment misses the box.
fn clip_segment(
    a: [f64; 2],
    b: [f64; 2],
    (lo, hi): (f64, f64),
) -> Option<(Option<[f64; 2]>, Option<[f64; 2]>)> {
    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    let (mut enter, mut exit) = (None, None);
    for (p, q, edge) in [
        (-dx, a[0], Edge::X(0.0)),
        (dx, 1.0 - a[0], Edge::X(1.0)),
        (-dy, a[1] - lo, Edge::Y(lo)),
        (dy, hi - a[1], Edge::Y(hi)),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t0 {
                t0 = r;
                enter = Some(edge);
            }
        } else if r < t1 {
            t1 = r;
            exit = Some(edge);
        }
        if t0 > t1 {
            return None;
        }
    }

    // interpolate from the crossed edge; `t` loses precision on long segments
    let cut = |edge: Edge| {
        let [x, y] = match edge {
            Edge::X(x) => [x, a[1] + (x - a[0]) / dx * dy],
            Edge::Y(y) => [a[0] + (y - a[1]) / dy * dx, y],
        };
        [x.clamp(0.0, 1.0), y.clamp(lo, hi)]
    };
    Some((enter.map(cut), exit.map(cut)))
}

/// Horizontal dashed reference line.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelLine {
    pub name: String,
    pub elevation: f64,
    pub color: Rgb,
}

/// One soil layer drawn as a coloured band.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub label: String,
    pub top: f64,
    pub bottom: f64,
    pub color: Rgb,
}

/// Backend-agnostic description of the CPT / soil-layer plot.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub width_px: u32,
    pub height_px: u32,
    /// Relative widths of the CPT panel and the layer panel.
    pub width_ratios: (f64, f64),
    /// `(low, high)` elevation shown on the shared vertical axis.
    pub elevation_range: (f64, f64),
    pub elevation_tick: f64,
    pub elevation_label: String,
    /// Cone resistance first; its axis carries the grid.
    pub traces: Vec<Trace>,
    pub levels: Vec<LevelLine>,
    pub bands: Vec<Band>,
}

impl Figure {
    pub fn from_soil_properties(props: &SoilProperties, config: &PlotConfig) -> Figure {
        let offset = props.vertical_position_offset();
        let samples = props.cpt_table().samples();

        let traces = vec![
            Trace {
                name: "coneResistance".to_string(),
                axis: Axis {
                    label: "qc [MPa]".to_string(),
                    min: 0.0,
                    max: config.cone_resistance_max,
                    inverted: false,
                    color: color::CONE_RESISTANCE,
                },
                color: color::CONE_RESISTANCE,
                segments: segments(samples, offset, |s| s.cone_resistance),
            },
            Trace {
                name: "localFriction".to_string(),
                axis: Axis {
                    label: "fs [MPa]".to_string(),
                    min: 0.0,
                    max: config.local_friction_max,
                    inverted: false,
                    color: color::LOCAL_FRICTION,
                },
                color: color::LOCAL_FRICTION,
                segments: segments(samples, offset, |s| s.local_friction),
            },
            Trace {
                name: "frictionRatio".to_string(),
                axis: Axis {
                    label: "Rf [%]".to_string(),
                    min: 0.0,
                    max: config.friction_ratio_max,
                    inverted: true,
                    color: color::FRICTION_RATIO,
                },
                color: color::FRICTION_RATIO,
                segments: segments(samples, offset, |s| s.friction_ratio),
            },
        ];

        let mut levels = Vec::new();
        if let Some(gwl) = props.groundwater_level() {
            levels.push(LevelLine {
                name: "Groundwater level".to_string(),
                elevation: props.elevation(gwl),
                color: color::GROUNDWATER,
            });
        }
        if let Some(predrilled) = props.predrilled_depth() {
            levels.push(LevelLine {
                name: "Surface level".to_string(),
                elevation: props.elevation(predrilled),
                color: color::SURFACE,
            });
        }

        let bands: Vec<Band> = props
            .layer_table()
            .iter()
            .map(|layer| Band {
                label: layer.geotechnical_soil_name.clone(),
                top: layer.upper_elevation,
                bottom: layer.lower_elevation,
                color: layer.color,
            })
            .collect();

        let elevations = samples
            .iter()
            .map(|s| offset - s.penetration_length)
            .chain(bands.iter().flat_map(|b| [b.top, b.bottom]))
            .chain(levels.iter().map(|l| l.elevation));
        let elevation_range = padded_range(elevations);

        let (width_px, height_px) = config.pixel_size();
        Figure {
            title: props.label().to_string(),
            width_px,
            height_px,
            width_ratios: config.width_ratios,
            elevation_range,
            elevation_tick: config.elevation_tick,
            elevation_label: format!(
                "Elevation [m {}]",
                props.vertical_position_reference_point()
            ),
            traces,
            levels,
            bands,
        }
    }
}

fn segments(
    samples: &[CptSample],
    offset: f64,
    value: impl Fn(&CptSample) -> Option<f64>,
) -> Vec<Vec<[f64; 2]>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for s in samples {
        match value(s) {
            Some(v) => current.push([v, offset - s.penetration_length]),
            None if !current.is_empty() => out.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return (-1.0, 0.0);
    }
    let pad = ((hi - lo) * 0.02).max(0.25);
    (lo - pad, hi + pad)
}

// ---------------------------------------------------------------------------
// Pixel layout of the two panels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn center_x(&self) -> f64 {
        self.x + self.w / 2.0
    }
}

/// Where the two panels sit inside the figure, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub cpt: Rect,
    pub layers: Rect,
    elevation_range: (f64, f64),
}

impl Layout {
    pub fn new(fig: &Figure) -> Layout {
        let w = fig.width_px as f64;
        let h = fig.height_px as f64;
        let (left, right, top, bottom, gap) = (0.08 * w, 0.02 * w, 0.1 * h, 0.04 * h, 0.02 * w);

        let (r_cpt, r_layers) = fig.width_ratios;
        let total = (r_cpt + r_layers).max(f64::EPSILON);
        let usable = (w - left - right - gap).max(0.0);
        let cpt_w = usable * r_cpt / total;
        let layers_w = usable * r_layers / total;
        let panel_h = (h - top - bottom).max(0.0);

        Layout {
            cpt: Rect {
                x: left,
                y: top,
                w: cpt_w,
                h: panel_h,
            },
            layers: Rect {
                x: left + cpt_w + gap,
                y: top,
                w: layers_w,
                h: panel_h,
            },
            elevation_range: fig.elevation_range,
        }
    }

    /// Vertical pixel of an elevation; higher elevations sit higher up.
    pub fn y_px(&self, elevation: f64) -> f64 {
        let (lo, hi) = self.elevation_range;
        let span = (hi - lo).max(f64::EPSILON);
        self.cpt.y + (hi - elevation) / span * self.cpt.h
    }

    /// Horizontal pixel of a normalized position inside `panel`.
    pub fn x_px(panel: &Rect, t: f64) -> f64 {
        panel.x + t * panel.w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_axis_round_trips() {
        let axis = Axis {
            label: "Rf".into(),
            min: 0.0,
            max: 16.0,
            inverted: true,
            color: color::FRICTION_RATIO,
        };
        assert_eq!(axis.normalize(0.0), 1.0);
        assert_eq!(axis.normalize(16.0), 0.0);
        assert_eq!(axis.value_at(axis.normalize(4.0)), 4.0);
    }

    #[test]
    fn ticks_cover_inclusive_range() {
        assert_eq!(ticks(0.0, 40.0, 5.0).len(), 9);
        assert_eq!(ticks(-1.2, 0.1, 0.5), vec![-1.0, -0.5, 0.0]);
        assert!(ticks(0.0, 1.0, 0.0).is_empty());
    }

    #[test]
    fn nulls_split_segments() {
        let mk = |d: f64, qc: Option<f64>| CptSample {
            penetration_length: d,
            depth_offset: None,
            cone_resistance: qc,
            local_friction: None,
            friction_ratio: None,
        };
        let samples = [mk(0.0, Some(1.0)), mk(1.0, None), mk(2.0, Some(2.0)), mk(3.0, Some(3.0))];
        let segs = segments(&samples, 1.0, |s| s.cone_resistance);
        assert_eq!(segs, vec![vec![[1.0, 1.0]], vec![[2.0, -1.0], [3.0, -2.0]]]);
        assert!(segments(&samples, 0.0, |s| s.friction_ratio).is_empty());
    }

    fn cone_trace(segments: Vec<Vec<[f64; 2]>>) -> Trace {
        Trace {
            name: "coneResistance".into(),
            axis: Axis {
                label: "qc".into(),
                min: 0.0,
                max: 40.0,
                inverted: false,
                color: color::CONE_RESISTANCE,
            },
            color: color::CONE_RESISTANCE,
            segments,
        }
    }

    #[test]
    fn segments_inside_the_panel_are_kept() {
        let trace = cone_trace(vec![vec![[0.0, -1.0], [20.0, -2.0], [40.0, -3.0]]]);
        assert_eq!(
            trace.normalized_segments((-4.0, 0.0)),
            vec![vec![[0.0, -1.0], [0.5, -2.0], [1.0, -3.0]]]
        );
    }

    #[test]
    fn out_of_range_values_are_clipped_to_the_panel() {
        let trace = cone_trace(vec![vec![[20.0, -1.0], [1e300, -2.0], [20.0, -3.0]]]);
        let segs = trace.normalized_segments((-4.0, 0.0));
        assert_eq!(segs.len(), 2);
        for p in segs.iter().flatten() {
            assert!((0.0..=1.0).contains(&p[0]), "{p:?}");
            assert!((-4.0..=0.0).contains(&p[1]), "{p:?}");
        }
        assert_eq!(segs[0][0], [0.5, -1.0]);
        assert_eq!(segs[0][1][0], 1.0);
        assert_eq!(segs[1], vec![[1.0, -3.0], [0.5, -3.0]]);
    }

    #[test]
    fn non_finite_points_break_the_trace() {
        let trace = cone_trace(vec![vec![
            [10.0, -1.0],
            [f64::INFINITY, -1.5],
            [10.0, -2.0],
            [12.0, -2.5],
        ]]);
        let segs = trace.normalized_segments((-4.0, 0.0));
        assert_eq!(segs, vec![vec![[0.25, -1.0]], vec![[0.25, -2.0], [0.3, -2.5]]]);
    }

    #[test]
    fn huge_ranges_have_no_grid() {
        assert!(ticks(-1e300, 0.0, 0.5).is_empty());
        assert!(ticks(0.0, 1.0, f64::NAN).is_empty());
    }
}
