use crate::error::{Error, Result};
use crate::services::page::PhotoPage;
use crate::services::poll::poll_until;
use std::time::Duration;
use tracing::{debug, warn};

/// Finds the URL of the photo currently on display, polling up to
/// `attempts` times while the page is still rendering.
///
/// `Error::ImageNotFound` after exhaustion; callers treat that as a skip,
/// not a fatal condition.
pub async fn locate<P: PhotoPage + ?Sized>(
    page: &P,
    attempts: u32,
    interval: Duration,
) -> Result<String> {
    let found = poll_until(attempts, interval, || page.visible_photo_url()).await?;
    match found {
        Some(url) => {
            debug!(url = %truncate(&url), "photo located");
            Ok(url)
        }
        None => Err(Error::ImageNotFound { attempts }),
    }
}

/// Polls until the visible photo's URL differs from `previous`, for use
/// after an advance or delete whose effect lands asynchronously.
///
/// Falls back to returning the last value seen, even when unchanged, once
/// the budget runs out. That is a deliberate soft-fail: the caller may end
/// up reclassifying the photo it just processed, which is wasteful but
/// safe for an idempotent classifier.
pub async fn wait_for_change<P: PhotoPage + ?Sized>(
    page: &P,
    previous: &str,
    attempts: u32,
    interval: Duration,
) -> Result<String> {
    let changed = poll_until(attempts, interval, || async move {
        match page.visible_photo_url().await? {
            Some(url) if url != previous => Ok::<_, Error>(Some(url)),
            _ => Ok(None),
        }
    })
    .await?;

    match changed {
        Some(url) => Ok(url),
        None => {
            warn!(
                attempts,
                "photo did not change; continuing with the last-seen image"
            );
            Ok(previous.to_string())
        }
    }
}

fn truncate(url: &str) -> &str {
    match url.char_indices().nth(60) {
        Some((idx, _)) => &url[..idx],
        None => url,
    }
}
