//! Construction of `SoilProperties` from parse/classify responses.

mod common;

use common::{approx, responses, soil};
use cptcore::data::loader;
use cptcore::{MainComponent, SoilProperties, ValidationConfig, ValidationError};
use serde_json::{json, Value};

fn build(parse: &Value, classify: &Value) -> Result<SoilProperties, ValidationError> {
    SoilProperties::from_api_response(parse, classify)
}

#[test]
fn fixture_builds_with_one_row_per_layer() {
    let (parse, classify) = responses();
    let soil = build(&parse, &classify).unwrap();

    let n_layers = classify["geotechnicalSoilName"].as_array().unwrap().len();
    assert_eq!(soil.layer_table().len(), n_layers);
    assert_eq!(soil.cpt_table().len(), 21);

    assert_eq!(soil.label(), "CPT-TEST-01");
    assert_eq!(soil.vertical_position_reference_point(), "NAP");
    assert_eq!(soil.vertical_position_offset(), -0.5);
    assert_eq!(soil.predrilled_depth(), Some(0.2));
    assert_eq!(soil.groundwater_level(), Some(0.9));

    let loc = soil.location().unwrap();
    assert_eq!(loc.srs_name, "EPSG:4326");
    assert_eq!(loc.lat, 52.3731);
    assert!(loc.to_rd_new().is_ok());
}

#[test]
fn layers_keep_response_order_and_merge_cpt_statistics() {
    let soil = soil();
    let layers = soil.layer_table().layers();

    let names: Vec<&str> = layers
        .iter()
        .map(|l| l.geotechnical_soil_name.as_str())
        .collect();
    assert_eq!(names, ["Zand, schoon", "Klei, zwak zandig", "Veen"]);
    assert_eq!(
        layers.iter().map(|l| l.main_component).collect::<Vec<_>>(),
        [MainComponent::Sand, MainComponent::Clay, MainComponent::Peat]
    );

    let sand = &layers[0];
    assert!(approx(sand.upper_elevation, -0.5));
    assert!(approx(sand.lower_elevation, -1.7));
    assert!(approx(sand.thickness(), 1.2));
    assert_eq!(sand.cohesion, None);
    assert_eq!(sand.undrained_shear_strength, None);
    assert!(approx(sand.mean_cone_resistance.unwrap(), 8.1));

    // the sample at exactly 4.0 m is outside the half-open peat interval
    assert!(approx(layers[1].mean_cone_resistance.unwrap(), 0.9));
    assert!(approx(layers[2].mean_cone_resistance.unwrap(), 0.48));
}

#[test]
fn rebuilding_from_the_same_input_is_identical() {
    let (parse, classify) = responses();
    let a = build(&parse, &classify).unwrap();
    let b = build(&parse, &classify).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        a.layer_table().to_record_batch().unwrap(),
        b.layer_table().to_record_batch().unwrap()
    );
}

#[test]
fn depth_and_computed_friction_ratio_aliases() {
    let (mut parse, classify) = responses();
    let data = parse["data"].as_object_mut().unwrap();
    let ratio = data.remove("frictionRatio").unwrap();
    data.insert("frictionRatioComputed".into(), ratio);
    // `depth` wins over `penetrationLength`
    let shifted: Vec<f64> = data["penetrationLength"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap() + 0.01)
        .collect();
    data.insert("depth".into(), json!(shifted));

    let soil = build(&parse, &classify).unwrap();
    let first = &soil.cpt_table().samples()[0];
    assert!(approx(first.penetration_length, 0.01));
    assert_eq!(first.friction_ratio, Some(0.8));
}

#[test]
fn missing_required_fields_are_reported() {
    let (parse, classify) = responses();

    for field in ["coneResistance", "depthOffset", "localFriction", "frictionRatio"] {
        let mut p = parse.clone();
        p["data"].as_object_mut().unwrap().remove(field);
        match build(&p, &classify) {
            Err(ValidationError::MissingField { payload: "parse", field: f }) => {
                assert_eq!(f, field)
            }
            other => panic!("{field}: unexpected {other:?}"),
        }
    }

    for field in ["color", "phi", "gamma_sat", "upperBoundary", "undrainedShearStrength"] {
        let mut c = classify.clone();
        c.as_object_mut().unwrap().remove(field);
        match build(&parse, &c) {
            Err(ValidationError::MissingField {
                payload: "classify",
                field: f,
            }) => assert_eq!(f, field),
            other => panic!("{field}: unexpected {other:?}"),
        }
    }

    let mut p = parse.clone();
    p.as_object_mut().unwrap().remove("data");
    assert!(matches!(
        build(&p, &classify),
        Err(ValidationError::MissingField { field: "data", .. })
    ));
}

#[test]
fn column_lengths_must_agree() {
    let (parse, mut classify) = responses();
    classify["phi"] = json!([30.0, 22.5]);
    match build(&parse, &classify) {
        Err(ValidationError::LengthMismatch {
            field,
            expected,
            found,
            ..
        }) => {
            assert_eq!(field, "phi");
            assert_eq!((expected, found), (3, 2));
        }
        other => panic!("unexpected {other:?}"),
    }

    let (mut parse, classify) = responses();
    parse["data"]["coneResistance"] = json!([1.0]);
    assert!(matches!(
        build(&parse, &classify),
        Err(ValidationError::LengthMismatch {
            field: "coneResistance",
            ..
        })
    ));
}

#[test]
fn invalid_layer_values_are_rejected() {
    let (parse, classify) = responses();

    let mut c = classify.clone();
    c["color"][1] = json!("green");
    assert!(matches!(
        build(&parse, &c),
        Err(ValidationError::InvalidValue { field: "color", index: 1, .. })
    ));

    let mut c = classify.clone();
    c["mainComponent"][2] = json!("loam");
    assert!(matches!(
        build(&parse, &c),
        Err(ValidationError::InvalidValue { field: "mainComponent", index: 2, .. })
    ));

    let mut c = classify.clone();
    c["upperBoundary"][0] = json!(1.5);
    assert!(matches!(
        build(&parse, &c),
        Err(ValidationError::InvalidValue { field: "lowerBoundary", index: 0, .. })
    ));

    let mut c = classify.clone();
    c["lowerBoundary"][2] = Value::Null;
    assert!(matches!(
        build(&parse, &c),
        Err(ValidationError::InvalidValue { field: "lowerBoundary", index: 2, .. })
    ));
}

#[test]
fn null_depth_is_rejected() {
    let (mut parse, classify) = responses();
    parse["data"]["penetrationLength"][3] = Value::Null;
    assert!(matches!(
        build(&parse, &classify),
        Err(ValidationError::InvalidValue { field: "penetrationLength", index: 3, .. })
    ));
}

#[test]
fn wrong_json_types_are_malformed() {
    let (mut parse, classify) = responses();
    parse["data"]["coneResistance"][0] = json!("fast");
    assert!(matches!(
        build(&parse, &classify),
        Err(ValidationError::Malformed { payload: "parse", .. })
    ));
}

#[test]
fn layers_outside_the_cpt_are_rejected() {
    let (parse, mut classify) = responses();
    classify["lowerBoundary"][2] = json!(6.0);

    match build(&parse, &classify) {
        Err(ValidationError::DepthRangeMismatch {
            layer_bottom,
            cpt_bottom,
            ..
        }) => {
            assert_eq!(layer_bottom, 6.0);
            assert_eq!(cpt_bottom, 4.0);
        }
        other => panic!("unexpected {other:?}"),
    }

    // a wider tolerance accepts the same payloads
    let lenient = ValidationConfig {
        depth_tolerance: 2.5,
    };
    let soil = SoilProperties::from_api_response_with(&parse, &classify, &lenient).unwrap();
    assert_eq!(soil.layer_table().len(), 3);
}

#[test]
fn empty_classification_is_allowed() {
    let (parse, classify) = responses();
    let empty: Value = classify
        .as_object()
        .unwrap()
        .keys()
        .map(|k| (k.clone(), json!([])))
        .collect::<serde_json::Map<_, _>>()
        .into();
    let soil = build(&parse, &empty).unwrap();
    assert!(soil.layer_table().is_empty());
    assert_eq!(soil.cpt_table().len(), 21);
}

#[test]
fn optional_metadata_falls_back_to_defaults() {
    let (mut parse, classify) = responses();
    let obj = parse.as_object_mut().unwrap();
    for key in [
        "label",
        "location",
        "verticalPositionReferencePoint",
        "verticalPositionOffset",
        "predrilledDepth",
        "groundwaterLevel",
    ] {
        obj.remove(key);
    }

    let soil = build(&parse, &classify).unwrap();
    assert_eq!(soil.label(), "Unknown");
    assert_eq!(soil.vertical_position_reference_point(), "Unknown");
    assert_eq!(soil.vertical_position_offset(), 0.0);
    assert!(soil.location().is_none());
    assert!(soil.predrilled_depth().is_none());
    assert!(soil.groundwater_level().is_none());
    assert!(approx(soil.layer_table().layers()[0].lower_elevation, -1.2));
}

#[test]
fn files_and_strings_load_like_values() {
    let from_files = loader::load_files(
        &common::fixture_path("response_parse.json"),
        &common::fixture_path("response_classify.json"),
        &ValidationConfig::default(),
    )
    .unwrap();

    let (parse, classify) = responses();
    let from_str = loader::from_json_str(
        &parse.to_string(),
        &classify.to_string(),
        &ValidationConfig::default(),
    )
    .unwrap();

    assert_eq!(from_files, soil());
    assert_eq!(from_str, from_files);
}

#[test]
fn classify_request_body_copies_the_depth_trace() {
    let (parse, _) = responses();
    let body = loader::classify_request_body(&parse).unwrap();
    assert_eq!(
        body["data"]["correctedPenetrationLength"],
        parse["data"]["penetrationLength"]
    );
    assert_eq!(body["label"], parse["label"]);
}
