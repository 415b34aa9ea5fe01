pub mod engine;
pub mod preprocess;

use crate::error::Result;
use crate::models::classify_types::ClassificationResult;
use async_trait::async_trait;

/// The classification seam the review loop consumes: image URL in, verdict
/// out. Implemented by [`engine::ClassifierEngine`] and by test fakes.
#[async_trait]
pub trait Classify: Send + Sync {
    async fn classify_url(&self, url: &str) -> Result<ClassificationResult>;
}
