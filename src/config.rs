use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Runtime configuration for the review pipeline.
///
/// Loaded from a JSON file when one is given, otherwise defaults apply.
/// All waits are fixed polling budgets: attempt count times interval.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Polling attempts when locating the visible photo.
    pub locate_attempts: u32,
    pub locate_interval_ms: u64,
    /// Polling attempts when waiting for the photo to change after an action.
    pub change_attempts: u32,
    pub change_interval_ms: u64,
    /// Delay between the delete click and the confirmation click.
    pub settle_delay_ms: u64,
    /// Delay after a dispatched action before the next iteration.
    pub post_action_delay_ms: u64,
    /// Consecutive locate failures tolerated before aborting a run.
    pub max_skips: u32,
    /// Base URL of the WebDriver endpoint driving the browser.
    pub webdriver_url: String,
    /// Attach to a running Chrome at this host:port instead of launching a
    /// fresh profile. Needed so the session carries the user's login.
    pub chrome_debugger_address: Option<String>,
    /// Local path of the ONNX classifier model.
    pub model_path: PathBuf,
    /// Where to download the model from when `model_path` is absent.
    pub model_url: Option<String>,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            locate_attempts: 10,
            locate_interval_ms: 500,
            change_attempts: 10,
            change_interval_ms: 500,
            settle_delay_ms: 500,
            post_action_delay_ms: 1000,
            max_skips: 3,
            webdriver_url: "http://localhost:9515".to_string(),
            chrome_debugger_address: None,
            model_path: PathBuf::from("models/resnet50_classifier.onnx"),
            model_url: None,
        }
    }
}

impl ReviewConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Cannot parse config {}: {}", path.display(), e)))
    }

    pub fn locate_interval(&self) -> Duration {
        Duration::from_millis(self.locate_interval_ms)
    }

    pub fn change_interval(&self) -> Duration {
        Duration::from_millis(self.change_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn post_action_delay(&self) -> Duration {
        Duration::from_millis(self.post_action_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_apply_to_missing_fields() {
        let cfg: ReviewConfig = serde_json::from_str(r#"{"max_skips": 5}"#).unwrap();
        assert_eq!(cfg.max_skips, 5);
        assert_eq!(cfg.locate_attempts, 10);
        assert_eq!(cfg.webdriver_url, "http://localhost:9515");
    }

    #[test]
    fn load_rejects_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = ReviewConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
