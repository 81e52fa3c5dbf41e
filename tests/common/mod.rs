#![allow(dead_code)]

use std::path::PathBuf;

use cptcore::SoilProperties;
use serde_json::Value;

pub fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("response")
        .join(filename)
}

pub fn fixture(filename: &str) -> Value {
    let text = std::fs::read_to_string(fixture_path(filename)).expect("read fixture");
    serde_json::from_str(&text).expect("valid json")
}

pub fn responses() -> (Value, Value) {
    (
        fixture("response_parse.json"),
        fixture("response_classify.json"),
    )
}

pub fn soil() -> SoilProperties {
    let (parse, classify) = responses();
    SoilProperties::from_api_response(&parse, &classify).expect("fixture builds")
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
