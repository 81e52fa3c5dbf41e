use std::fmt;
use std::str::FromStr;

use serde_json::Value as JsonValue;

use crate::color::Rgb;
use crate::config::{PlotConfig, ValidationConfig};
use crate::error::ValidationError;
use crate::plot::Figure;

use super::loader;
use super::location::Location;
use super::response::{ClassifiedResponse, ParsedResponse};

// ---------------------------------------------------------------------------
// MainComponent – dominant soil fraction of a layer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MainComponent {
    Rocks,
    Gravel,
    Sand,
    Silt,
    Clay,
    Peat,
}

impl MainComponent {
    pub const ALL: [MainComponent; 6] = [
        MainComponent::Rocks,
        MainComponent::Gravel,
        MainComponent::Sand,
        MainComponent::Silt,
        MainComponent::Clay,
        MainComponent::Peat,
    ];

    /// The literal used by the API.
    pub fn as_str(self) -> &'static str {
        match self {
            MainComponent::Rocks => "rocks",
            MainComponent::Gravel => "gravel",
            MainComponent::Sand => "sand",
            MainComponent::Silt => "silt",
            MainComponent::Clay => "clay",
            MainComponent::Peat => "peat",
        }
    }
}

impl FromStr for MainComponent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MainComponent::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown main component '{s}'"))
    }
}

impl fmt::Display for MainComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CPT traces
// ---------------------------------------------------------------------------

/// One measurement row of the parsed CPT.
#[derive(Debug, Clone, PartialEq)]
pub struct CptSample {
    /// Penetration length [m].
    pub penetration_length: f64,
    /// Depth [m w.r.t. reference].
    pub depth_offset: Option<f64>,
    /// Cone resistance q_c [MPa].
    pub cone_resistance: Option<f64>,
    /// Local friction f_s [MPa].
    pub local_friction: Option<f64>,
    /// Friction ratio R_f [%].
    pub friction_ratio: Option<f64>,
}

/// The CPT measurement traces, in the order the API returned them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CptTable {
    samples: Vec<CptSample>,
}

impl CptTable {
    pub fn new(samples: Vec<CptSample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[CptSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `(shallowest, deepest)` penetration length, `None` when empty.
    pub fn depth_range(&self) -> Option<(f64, f64)> {
        self.samples.iter().fold(None, |acc, s| {
            let d = s.penetration_length;
            Some(match acc {
                None => (d, d),
                Some((lo, hi)) => (f64::min(lo, d), f64::max(hi, d)),
            })
        })
    }

    /// Mean of `value` over samples with `top <= penetration_length < bottom`.
    pub fn mean_between(
        &self,
        top: f64,
        bottom: f64,
        value: impl Fn(&CptSample) -> Option<f64>,
    ) -> Option<f64> {
        let (sum, n) = self
            .samples
            .iter()
            .filter(|s| s.penetration_length >= top && s.penetration_length < bottom)
            .filter_map(&value)
            .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
        (n > 0).then(|| sum / n as f64)
    }
}

// ---------------------------------------------------------------------------
// Layers
// ---------------------------------------------------------------------------

/// One classified soil layer, merged with the CPT it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Geotechnical soil name (ISO 14688).
    pub geotechnical_soil_name: String,
    /// Upper boundary [m].
    pub upper_boundary: f64,
    /// Lower boundary [m].
    pub lower_boundary: f64,
    pub color: Rgb,
    pub main_component: MainComponent,
    /// Cohesion [kPa].
    pub cohesion: Option<f64>,
    /// Saturated unit weight [kN/m³].
    pub gamma_sat: Option<f64>,
    /// Unsaturated unit weight [kN/m³].
    pub gamma_unsat: Option<f64>,
    /// Friction angle [°].
    pub phi: Option<f64>,
    /// Undrained shear strength [kPa].
    pub undrained_shear_strength: Option<f64>,
    /// Upper boundary as elevation [m w.r.t. reference].
    pub upper_elevation: f64,
    /// Lower boundary as elevation [m w.r.t. reference].
    pub lower_elevation: f64,
    /// Mean q_c of the CPT samples inside the layer [MPa].
    pub mean_cone_resistance: Option<f64>,
    /// Mean R_f of the CPT samples inside the layer [%].
    pub mean_friction_ratio: Option<f64>,
}

impl Layer {
    pub fn thickness(&self) -> f64 {
        self.lower_boundary - self.upper_boundary
    }
}

/// Soil layers in the order of the classification response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerTable {
    layers: Vec<Layer>,
}

impl LayerTable {
    pub fn new(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Layer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// `(min upper boundary, max lower boundary)`, `None` when empty.
    pub fn span(&self) -> Option<(f64, f64)> {
        self.layers.iter().fold(None, |acc, l| {
            Some(match acc {
                None => (l.upper_boundary, l.lower_boundary),
                Some((top, bottom)) => (
                    f64::min(top, l.upper_boundary),
                    f64::max(bottom, l.lower_boundary),
                ),
            })
        })
    }
}

impl<'a> IntoIterator for &'a LayerTable {
    type Item = &'a Layer;
    type IntoIter = std::slice::Iter<'a, Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ---------------------------------------------------------------------------
// SoilProperties – the aggregate
// ---------------------------------------------------------------------------

/// CPT traces, classified layers and site metadata of one sounding.
///
/// Built once from a `parse/cpt` and a `classify/*` response and read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SoilProperties {
    pub(crate) cpt_table: CptTable,
    pub(crate) layer_table: LayerTable,
    pub(crate) location: Option<Location>,
    pub(crate) vertical_position_reference_point: String,
    pub(crate) vertical_position_offset: f64,
    pub(crate) predrilled_depth: Option<f64>,
    pub(crate) label: String,
    pub(crate) groundwater_level: Option<f64>,
}

impl SoilProperties {
    /// Build from the raw JSON bodies of `parse/cpt` and `classify/*`.
    pub fn from_api_response(
        response_parse: &JsonValue,
        response_classify: &JsonValue,
    ) -> Result<Self, ValidationError> {
        Self::from_api_response_with(
            response_parse,
            response_classify,
            &ValidationConfig::default(),
        )
    }

    pub fn from_api_response_with(
        response_parse: &JsonValue,
        response_classify: &JsonValue,
        config: &ValidationConfig,
    ) -> Result<Self, ValidationError> {
        let parsed = ParsedResponse::from_value(response_parse)?;
        let classified = ClassifiedResponse::from_value(response_classify)?;
        Self::from_responses(&parsed, &classified, config)
    }

    /// Build from already deserialized responses.
    pub fn from_responses(
        parsed: &ParsedResponse,
        classified: &ClassifiedResponse,
        config: &ValidationConfig,
    ) -> Result<Self, ValidationError> {
        loader::assemble(parsed, classified, config)
    }

    pub fn cpt_table(&self) -> &CptTable {
        &self.cpt_table
    }

    pub fn layer_table(&self) -> &LayerTable {
        &self.layer_table
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn vertical_position_reference_point(&self) -> &str {
        &self.vertical_position_reference_point
    }

    /// Vertical position offset [m w.r.t. reference].
    pub fn vertical_position_offset(&self) -> f64 {
        self.vertical_position_offset
    }

    /// Predrilled depth [m].
    pub fn predrilled_depth(&self) -> Option<f64> {
        self.predrilled_depth
    }

    /// CPT name.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Groundwater level [m].
    pub fn groundwater_level(&self) -> Option<f64> {
        self.groundwater_level
    }

    /// Convert a depth below the surface into an elevation w.r.t. the reference.
    pub fn elevation(&self, depth: f64) -> f64 {
        self.vertical_position_offset - depth
    }

    /// Describe the CPT / soil-layer plot. Rendering is left to a backend.
    pub fn figure(&self, config: &PlotConfig) -> Figure {
        Figure::from_soil_properties(self, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(depth: f64, qc: Option<f64>) -> CptSample {
        CptSample {
            penetration_length: depth,
            depth_offset: Some(-depth),
            cone_resistance: qc,
            local_friction: None,
            friction_ratio: None,
        }
    }

    #[test]
    fn main_component_literals() {
        assert_eq!("peat".parse::<MainComponent>(), Ok(MainComponent::Peat));
        assert!("loam".parse::<MainComponent>().is_err());
        assert_eq!(MainComponent::Gravel.to_string(), "gravel");
    }

    #[test]
    fn mean_between_is_half_open_and_skips_nulls() {
        let table = CptTable::new(vec![
            sample(0.0, Some(1.0)),
            sample(0.5, None),
            sample(1.0, Some(3.0)),
            sample(2.0, Some(100.0)),
        ]);
        let mean = table.mean_between(0.0, 2.0, |s| s.cone_resistance);
        assert_eq!(mean, Some(2.0));
        assert_eq!(table.mean_between(5.0, 6.0, |s| s.cone_resistance), None);
        assert_eq!(table.depth_range(), Some((0.0, 2.0)));
    }
}
