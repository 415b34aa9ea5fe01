pub mod selectors;
pub mod webdriver;

use crate::error::Result;
use async_trait::async_trait;

/// Outcome of a dispatched click.
///
/// This only says whether a click was fired, never whether it had the
/// intended effect on the page. Callers infer success from the next state
/// read (locate / wait-for-change).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Clicked,
    /// The target control was absent. Silently a no-op.
    NoTarget,
}

/// Boundary to the photo-viewing page being automated.
///
/// Every method is a single read or a single fire-and-forget action;
/// retrying and pacing live above this trait.
#[async_trait]
pub trait PhotoPage: Send + Sync {
    /// Address of the page currently shown.
    async fn current_url(&self) -> Result<String>;

    /// One scan for the photo on display. Filters to images that are
    /// actually rendered (non-zero size, not hidden, within the viewport)
    /// and picks the one with the greatest pixel area when several match.
    async fn visible_photo_url(&self) -> Result<Option<String>>;

    /// Clicks the first element matching `selector`, if any.
    async fn click(&self, selector: &str) -> Result<Dispatch>;

    /// Tries selectors in order, clicking the first one that matches.
    async fn click_first(&self, selectors: &[&str]) -> Result<Dispatch> {
        for selector in selectors {
            if self.click(selector).await? == Dispatch::Clicked {
                return Ok(Dispatch::Clicked);
            }
        }
        Ok(Dispatch::NoTarget)
    }
}
