use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::ValidationError;

/// A numeric trace as sent by the API: nulls are allowed inside the array.
pub type NumericColumn = Vec<Option<f64>>;
/// A text trace as sent by the API.
pub type TextColumn = Vec<Option<String>>;

// ---------------------------------------------------------------------------
// parse/cpt
// ---------------------------------------------------------------------------

/// Body returned by `parse/cpt`.
///
/// Every field is optional at this level; required fields are enforced
/// when the response is turned into a [`CptTable`](super::model::CptTable).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedResponse {
    pub label: Option<String>,
    pub location: Option<RawLocation>,
    pub vertical_position_reference_point: Option<String>,
    pub vertical_position_offset: Option<f64>,
    pub predrilled_depth: Option<f64>,
    pub groundwater_level: Option<f64>,
    pub data: Option<ParsedData>,
}

/// Columnar measurement traces of a parsed CPT.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedData {
    pub depth: Option<NumericColumn>,
    pub penetration_length: Option<NumericColumn>,
    pub depth_offset: Option<NumericColumn>,
    pub cone_resistance: Option<NumericColumn>,
    pub local_friction: Option<NumericColumn>,
    pub friction_ratio: Option<NumericColumn>,
    pub friction_ratio_computed: Option<NumericColumn>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLocation {
    pub srs: Option<String>,
    pub lat: Option<f64>,
    pub long: Option<f64>,
}

impl ParsedResponse {
    pub fn from_value(value: &JsonValue) -> Result<Self, ValidationError> {
        ParsedResponse::deserialize(value).map_err(|source| ValidationError::Malformed {
            payload: "parse",
            source,
        })
    }
}

impl ParsedData {
    /// The depth trace: `depth` wins over `penetrationLength`. An explicit
    /// `"depth": null` counts as absent and falls back to `penetrationLength`.
    pub fn depth_column(&self) -> Option<&NumericColumn> {
        self.depth.as_ref().or(self.penetration_length.as_ref())
    }

    /// The friction ratio trace: `frictionRatio` wins over `frictionRatioComputed`.
    /// As with [`ParsedData::depth_column`], a `null` column counts as absent.
    pub fn friction_ratio_column(&self) -> Option<&NumericColumn> {
        self.friction_ratio
            .as_ref()
            .or(self.friction_ratio_computed.as_ref())
    }
}

// ---------------------------------------------------------------------------
// classify/*
// ---------------------------------------------------------------------------

/// Body returned by the `classify/*` endpoints, one array entry per layer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedResponse {
    pub geotechnical_soil_name: Option<TextColumn>,
    pub lower_boundary: Option<NumericColumn>,
    pub upper_boundary: Option<NumericColumn>,
    pub color: Option<TextColumn>,
    pub main_component: Option<TextColumn>,
    pub cohesion: Option<NumericColumn>,
    #[serde(rename = "gamma_sat")]
    pub gamma_sat: Option<NumericColumn>,
    #[serde(rename = "gamma_unsat")]
    pub gamma_unsat: Option<NumericColumn>,
    pub phi: Option<NumericColumn>,
    pub undrained_shear_strength: Option<NumericColumn>,
}

impl ClassifiedResponse {
    pub fn from_value(value: &JsonValue) -> Result<Self, ValidationError> {
        ClassifiedResponse::deserialize(value).map_err(|source| ValidationError::Malformed {
            payload: "classify",
            source,
        })
    }
}
