use std::path::Path;

use serde_json::Value as JsonValue;

use crate::color::parse_hex;
use crate::config::ValidationConfig;
use crate::error::{Error, Result, ValidationError};

use super::location::Location;
use super::model::{CptSample, CptTable, Layer, LayerTable, MainComponent, SoilProperties};
use super::response::{ClassifiedResponse, ParsedData, ParsedResponse};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read and parse a JSON document from disk.
pub fn read_json(path: &Path) -> Result<JsonValue> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(serde_json::from_str(&text)?)
}

/// Build [`SoilProperties`] from the two response bodies as text.
pub fn from_json_str(
    response_parse: &str,
    response_classify: &str,
    config: &ValidationConfig,
) -> Result<SoilProperties> {
    let parse: JsonValue = serde_json::from_str(response_parse)?;
    let classify: JsonValue = serde_json::from_str(response_classify)?;
    Ok(SoilProperties::from_api_response_with(
        &parse, &classify, config,
    )?)
}

/// Build [`SoilProperties`] from two saved response files.
pub fn load_files(
    parse_path: &Path,
    classify_path: &Path,
    config: &ValidationConfig,
) -> Result<SoilProperties> {
    let parse = read_json(parse_path)?;
    let classify = read_json(classify_path)?;
    log::debug!(
        "Read parse response {} and classify response {}",
        parse_path.display(),
        classify_path.display()
    );
    Ok(SoilProperties::from_api_response_with(
        &parse, &classify, config,
    )?)
}

/// Turn a `parse/cpt` response into the body expected by `classify/*`:
/// the depth trace is copied to `data.correctedPenetrationLength`.
pub fn classify_request_body(
    response_parse: &JsonValue,
) -> std::result::Result<JsonValue, ValidationError> {
    let mut body = response_parse.clone();
    let data = body
        .get_mut("data")
        .and_then(JsonValue::as_object_mut)
        .ok_or(ValidationError::MissingField {
            payload: "parse",
            field: "data",
        })?;
    let depth = data
        .get("depth")
        .or_else(|| data.get("penetrationLength"))
        .cloned()
        .ok_or(ValidationError::MissingField {
            payload: "parse",
            field: "penetrationLength",
        })?;
    data.insert("correctedPenetrationLength".to_string(), depth);
    Ok(body)
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

pub(crate) fn assemble(
    parsed: &ParsedResponse,
    classified: &ClassifiedResponse,
    config: &ValidationConfig,
) -> std::result::Result<SoilProperties, ValidationError> {
    let data = parsed.data.as_ref().ok_or(ValidationError::MissingField {
        payload: "parse",
        field: "data",
    })?;
    let cpt_table = build_cpt_table(data)?;

    let offset = parsed.vertical_position_offset.unwrap_or(0.0);
    let layer_table = build_layer_table(classified, &cpt_table, offset)?;
    check_depth_consistency(&cpt_table, &layer_table, config.depth_tolerance)?;

    let location = parsed.location.as_ref().and_then(|loc| match (loc.lat, loc.long) {
        (Some(lat), Some(long)) => Some(Location {
            srs_name: loc.srs.clone().unwrap_or_else(|| "Unknown".to_string()),
            long,
            lat,
        }),
        _ => {
            log::warn!("Ignoring location without both lat and long");
            None
        }
    });

    let props = SoilProperties {
        cpt_table,
        layer_table,
        location,
        vertical_position_reference_point: parsed
            .vertical_position_reference_point
            .clone()
            .unwrap_or_else(|| "Unknown".to_string()),
        vertical_position_offset: offset,
        predrilled_depth: parsed.predrilled_depth,
        label: parsed
            .label
            .clone()
            .unwrap_or_else(|| "Unknown".to_string()),
        groundwater_level: parsed.groundwater_level,
    };

    log::info!(
        "Built soil properties for '{}': {} CPT samples, {} layers",
        props.label,
        props.cpt_table.len(),
        props.layer_table.len()
    );
    Ok(props)
}

// -- column helpers --

fn required<'a, T>(
    column: Option<&'a Vec<T>>,
    payload: &'static str,
    field: &'static str,
) -> std::result::Result<&'a [T], ValidationError> {
    column
        .map(Vec::as_slice)
        .ok_or(ValidationError::MissingField { payload, field })
}

fn check_len(
    table: &'static str,
    field: &'static str,
    expected: usize,
    found: usize,
) -> std::result::Result<(), ValidationError> {
    if expected == found {
        Ok(())
    } else {
        Err(ValidationError::LengthMismatch {
            table,
            field,
            expected,
            found,
        })
    }
}

fn non_null<T: Clone>(
    value: &Option<T>,
    field: &'static str,
    index: usize,
) -> std::result::Result<T, ValidationError> {
    value.clone().ok_or_else(|| ValidationError::InvalidValue {
        field,
        index,
        reason: "value is null".to_string(),
    })
}

// ---------------------------------------------------------------------------
// CPT table
// ---------------------------------------------------------------------------

fn build_cpt_table(data: &ParsedData) -> std::result::Result<CptTable, ValidationError> {
    let depth_field = if data.depth.is_some() {
        "depth"
    } else {
        "penetrationLength"
    };
    let ratio_field = if data.friction_ratio.is_some() {
        "frictionRatio"
    } else {
        "frictionRatioComputed"
    };
    log::debug!("Reading depth from '{depth_field}', friction ratio from '{ratio_field}'");

    let depth = required(data.depth_column(), "parse", "penetrationLength")?;
    let depth_offset = required(data.depth_offset.as_ref(), "parse", "depthOffset")?;
    let cone_resistance = required(data.cone_resistance.as_ref(), "parse", "coneResistance")?;
    let local_friction = required(data.local_friction.as_ref(), "parse", "localFriction")?;
    let friction_ratio = required(data.friction_ratio_column(), "parse", "frictionRatio")?;

    let n = depth.len();
    let lengths = [
        ("depthOffset", depth_offset.len()),
        ("coneResistance", cone_resistance.len()),
        ("localFriction", local_friction.len()),
        (ratio_field, friction_ratio.len()),
    ];
    for (field, len) in lengths {
        check_len("CPT table", field, n, len)?;
    }

    let samples = (0..n)
        .map(|i| {
            Ok(CptSample {
                penetration_length: non_null(&depth[i], depth_field, i)?,
                depth_offset: depth_offset[i],
                cone_resistance: cone_resistance[i],
                local_friction: local_friction[i],
                friction_ratio: friction_ratio[i],
            })
        })
        .collect::<std::result::Result<Vec<_>, ValidationError>>()?;

    Ok(CptTable::new(samples))
}

// ---------------------------------------------------------------------------
// Layer table
// ---------------------------------------------------------------------------

fn build_layer_table(
    c: &ClassifiedResponse,
    cpt: &CptTable,
    offset: f64,
) -> std::result::Result<LayerTable, ValidationError> {
    const P: &str = "classify";
    let names = required(c.geotechnical_soil_name.as_ref(), P, "geotechnicalSoilName")?;
    let lower = required(c.lower_boundary.as_ref(), P, "lowerBoundary")?;
    let upper = required(c.upper_boundary.as_ref(), P, "upperBoundary")?;
    let colors = required(c.color.as_ref(), P, "color")?;
    let components = required(c.main_component.as_ref(), P, "mainComponent")?;
    let cohesion = required(c.cohesion.as_ref(), P, "cohesion")?;
    let gamma_sat = required(c.gamma_sat.as_ref(), P, "gamma_sat")?;
    let gamma_unsat = required(c.gamma_unsat.as_ref(), P, "gamma_unsat")?;
    let phi = required(c.phi.as_ref(), P, "phi")?;
    let su = required(c.undrained_shear_strength.as_ref(), P, "undrainedShearStrength")?;

    let n = names.len();
    let lengths = [
        ("lowerBoundary", lower.len()),
        ("upperBoundary", upper.len()),
        ("color", colors.len()),
        ("mainComponent", components.len()),
        ("cohesion", cohesion.len()),
        ("gamma_sat", gamma_sat.len()),
        ("gamma_unsat", gamma_unsat.len()),
        ("phi", phi.len()),
        ("undrainedShearStrength", su.len()),
    ];
    for (field, len) in lengths {
        check_len("layer table", field, n, len)?;
    }

    let mut layers = Vec::with_capacity(n);
    for i in 0..n {
        let upper_boundary = non_null(&upper[i], "upperBoundary", i)?;
        let lower_boundary = non_null(&lower[i], "lowerBoundary", i)?;
        if upper_boundary > lower_boundary {
            return Err(ValidationError::InvalidValue {
                field: "lowerBoundary",
                index: i,
                reason: format!(
                    "lower boundary {lower_boundary} lies above upper boundary {upper_boundary}"
                ),
            });
        }

        let code = non_null(&colors[i], "color", i)?;
        let color = parse_hex(&code).ok_or_else(|| ValidationError::InvalidValue {
            field: "color",
            index: i,
            reason: format!("'{code}' is not a hex colour code"),
        })?;

        let main_component = non_null(&components[i], "mainComponent", i)?
            .parse::<MainComponent>()
            .map_err(|reason| ValidationError::InvalidValue {
                field: "mainComponent",
                index: i,
                reason,
            })?;

        layers.push(Layer {
            geotechnical_soil_name: non_null(&names[i], "geotechnicalSoilName", i)?,
            upper_boundary,
            lower_boundary,
            color,
            main_component,
            cohesion: cohesion[i],
            gamma_sat: gamma_sat[i],
            gamma_unsat: gamma_unsat[i],
            phi: phi[i],
            undrained_shear_strength: su[i],
            upper_elevation: offset - upper_boundary,
            lower_elevation: offset - lower_boundary,
            mean_cone_resistance: cpt.mean_between(upper_boundary, lower_boundary, |s| {
                s.cone_resistance
            }),
            mean_friction_ratio: cpt.mean_between(upper_boundary, lower_boundary, |s| {
                s.friction_ratio
            }),
        });
    }

    let unmatched = layers
        .iter()
        .filter(|l| l.mean_cone_resistance.is_none())
        .count();
    if unmatched > 0 {
        log::warn!("{unmatched} layer(s) contain no cone resistance samples");
    }

    Ok(LayerTable::new(layers))
}

fn check_depth_consistency(
    cpt: &CptTable,
    layers: &LayerTable,
    tolerance: f64,
) -> std::result::Result<(), ValidationError> {
    let Some((layer_top, layer_bottom)) = layers.span() else {
        return Ok(());
    };
    let Some((cpt_top, cpt_bottom)) = cpt.depth_range() else {
        return Err(ValidationError::EmptyCpt {
            layers: layers.len(),
        });
    };
    if layer_top < cpt_top - tolerance || layer_bottom > cpt_bottom + tolerance {
        return Err(ValidationError::DepthRangeMismatch {
            layer_top,
            layer_bottom,
            cpt_top,
            cpt_bottom,
            tolerance,
        });
    }
    Ok(())
}
