use crate::commands::open_photo_page;
use crate::config::ReviewConfig;
use crate::error::Result;
use crate::models::review_types::ReviewOutcome;
use crate::services::classifier::engine::ClassifierEngine;
use crate::services::review::ReviewSession;
use tracing::{info, warn};

/// Sequential action: review up to `count` photos, deleting the
/// forgettable ones and advancing past the memorable ones.
pub async fn execute(config: &ReviewConfig, count: usize) -> Result<()> {
    let page = open_photo_page(config).await?;
    let engine = ClassifierEngine::new(config.model_path.clone());

    info!(count, "starting sequential review");
    let outcome = ReviewSession::new(&page, &engine, config).run(count).await;
    let _ = page.close().await;

    let summary = outcome.summary();
    match &outcome {
        ReviewOutcome::Completed(_) => info!("review completed"),
        ReviewOutcome::Aborted { reason, .. } => warn!(reason = %reason, "review aborted early"),
    }
    println!(
        "Processed {} of {} requested: {} kept, {} deleted, {} skipped",
        summary.processed, summary.requested, summary.kept, summary.deleted, summary.skipped
    );
    Ok(())
}
