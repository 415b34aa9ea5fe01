use crate::commands::open_photo_page;
use crate::config::ReviewConfig;
use crate::error::Result;
use crate::services::classifier::engine::ClassifierEngine;
use crate::services::classifier::Classify;
use crate::services::locator::locate;
use tracing::info;

/// Single-shot action: classify the photo currently on display and print
/// the result. No action is dispatched against the page.
pub async fn execute(config: &ReviewConfig) -> Result<()> {
    let page = open_photo_page(config).await?;

    let run = async {
        let url = locate(&page, config.locate_attempts, config.locate_interval()).await?;
        info!(url = %url, "classifying current photo");

        let engine = ClassifierEngine::new(config.model_path.clone());
        let result = engine.classify_url(&url).await?;

        info!(
            verdict = %result.verdict(),
            confidence = %format!("{:.1}%", result.confidence * 100.0),
            "classification done"
        );
        println!("{}", serde_json::to_string_pretty(&result).unwrap_or_default());
        Ok(())
    };

    let outcome = run.await;
    let _ = page.close().await;
    outcome
}
