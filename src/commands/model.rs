use crate::config::ReviewConfig;
use crate::error::{Error, Result};
use crate::services::classifier::engine::download_model;
use tracing::info;

/// Fetches the classifier model to `model_path` when it is not already on
/// disk.
pub async fn execute(config: &ReviewConfig) -> Result<()> {
    if config.model_path.exists() {
        info!(path = %config.model_path.display(), "model already present");
        return Ok(());
    }

    let url = config.model_url.as_deref().ok_or_else(|| {
        Error::Config("model file is missing and no model_url is configured".to_string())
    })?;

    download_model(url, &config.model_path).await
}
