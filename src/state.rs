use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use arrow::record_batch::RecordBatch;
use serde_json::Value as JsonValue;

use crate::config::Config;
use crate::data::loader;
use crate::data::model::SoilProperties;
use crate::plot::Figure;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// A response body together with the file it was read from.
pub struct LoadedResponse {
    pub path: PathBuf,
    pub body: JsonValue,
}

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    pub config: Config,

    /// `parse/cpt` response (None until the user opens one).
    pub parse_response: Option<LoadedResponse>,

    /// `classify/*` response.
    pub classify_response: Option<LoadedResponse>,

    /// Model built once both responses are present.
    pub soil: Option<SoilProperties>,

    /// Figure and layer table derived from `soil` (cached).
    pub figure: Option<Figure>,
    pub layer_batch: Option<RecordBatch>,

    /// Whether the layer table panel is shown.
    pub show_table: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            show_table: true,
            ..Default::default()
        }
    }

    pub fn load_parse_file(&mut self, path: &Path) -> Result<()> {
        let body = loader::read_json(path)
            .with_context(|| format!("reading parse response {}", path.display()))?;
        self.parse_response = Some(LoadedResponse {
            path: path.to_path_buf(),
            body,
        });
        self.status_message = None;
        self.rebuild();
        Ok(())
    }

    pub fn load_classify_file(&mut self, path: &Path) -> Result<()> {
        let body = loader::read_json(path)
            .with_context(|| format!("reading classify response {}", path.display()))?;
        self.classify_response = Some(LoadedResponse {
            path: path.to_path_buf(),
            body,
        });
        self.status_message = None;
        self.rebuild();
        Ok(())
    }

    /// Rebuild the model once both responses are present.
    pub fn rebuild(&mut self) {
        self.soil = None;
        self.figure = None;
        self.layer_batch = None;

        let (Some(parse), Some(classify)) = (&self.parse_response, &self.classify_response) else {
            return;
        };

        let built = SoilProperties::from_api_response_with(
            &parse.body,
            &classify.body,
            &self.config.validation,
        )
        .context("building soil properties")
        .and_then(|soil| {
            let batch = soil.layer_table().to_record_batch()?;
            Ok((soil, batch))
        });

        match built {
            Ok((soil, batch)) => {
                self.figure = Some(soil.figure(&self.config.plot));
                self.layer_batch = Some(batch);
                self.soil = Some(soil);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to build soil properties: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("response")
            .join(name)
    }

    #[test]
    fn model_is_built_once_both_responses_are_loaded() {
        let mut state = AppState::new(Config::default());
        state
            .load_parse_file(&fixture("response_parse.json"))
            .unwrap();
        assert!(state.soil.is_none());

        state
            .load_classify_file(&fixture("response_classify.json"))
            .unwrap();
        assert!(state.soil.is_some());
        assert_eq!(state.layer_batch.as_ref().unwrap().num_rows(), 3);
        assert!(state.figure.is_some());
        assert!(state.status_message.is_none());
    }

    #[test]
    fn invalid_pair_sets_status_message() {
        let mut state = AppState::new(Config::default());
        state
            .load_parse_file(&fixture("response_parse.json"))
            .unwrap();
        state.classify_response = Some(LoadedResponse {
            path: PathBuf::from("broken.json"),
            body: serde_json::json!({"phi": [1.0]}),
        });
        state.rebuild();

        assert!(state.soil.is_none());
        assert!(state.figure.is_none());
        assert!(state.status_message.as_deref().unwrap().contains("Error"));
    }

    #[test]
    fn successful_load_clears_a_previous_error() {
        let mut state = AppState::new(Config::default());
        state.status_message = Some("Error: stale".into());

        state
            .load_parse_file(&fixture("response_parse.json"))
            .unwrap();
        assert!(state.soil.is_none());
        assert!(state.status_message.is_none());
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut state = AppState::default();
        assert!(state.load_parse_file(Path::new("does/not/exist.json")).is_err());
        assert!(state.parse_response.is_none());
    }
}
