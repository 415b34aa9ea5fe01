use crate::config::ReviewConfig;
use crate::error::Error;
use crate::models::review_types::{ReviewOutcome, ReviewSummary};
use crate::services::classifier::Classify;
use crate::services::dispatcher::{trigger_advance, trigger_delete};
use crate::services::locator::{locate, wait_for_change};
use crate::services::page::PhotoPage;
use tracing::{error, info, warn};

/// Sequential classify-and-act pass over the host page.
///
/// One photo is in flight at a time; every iteration depends on the page
/// state the previous one left behind, so there is no parallelism here by
/// design.
///
/// Error policy: per-photo failures (photo not found, image fetch/decode,
/// a single bad inference) are absorbed as skips and the pass continues.
/// Only conditions no later iteration can recover from abort the run: the
/// model failing to load, or the page driver going away.
pub struct ReviewSession<'a> {
    page: &'a dyn PhotoPage,
    classifier: &'a dyn Classify,
    config: &'a ReviewConfig,
}

impl<'a> ReviewSession<'a> {
    pub fn new(
        page: &'a dyn PhotoPage,
        classifier: &'a dyn Classify,
        config: &'a ReviewConfig,
    ) -> Self {
        Self {
            page,
            classifier,
            config,
        }
    }

    pub async fn run(&self, count: usize) -> ReviewOutcome {
        let mut summary = ReviewSummary {
            requested: count,
            ..Default::default()
        };
        let mut consecutive_failures: u32 = 0;
        let mut last_seen: Option<String> = None;

        for i in 0..count {
            info!(photo = i + 1, total = count, "processing photo");

            // After an action the page advances asynchronously; wait for
            // the displayed photo to actually change before reading it.
            let located = match &last_seen {
                Some(previous) => {
                    wait_for_change(
                        self.page,
                        previous,
                        self.config.change_attempts,
                        self.config.change_interval(),
                    )
                    .await
                }
                None => {
                    locate(
                        self.page,
                        self.config.locate_attempts,
                        self.config.locate_interval(),
                    )
                    .await
                }
            };

            let url = match located {
                Ok(url) => url,
                Err(Error::ImageNotFound { attempts }) => {
                    summary.skipped += 1;
                    consecutive_failures += 1;
                    warn!(
                        attempts,
                        consecutive_failures, "no visible photo; skipping"
                    );
                    if consecutive_failures >= self.config.max_skips {
                        return self.abort(
                            summary,
                            format!(
                                "{} consecutive photos could not be located",
                                consecutive_failures
                            ),
                        );
                    }
                    continue;
                }
                Err(e) => return self.abort(summary, e.to_string()),
            };

            consecutive_failures = 0;

            let result = match self.classifier.classify_url(&url).await {
                Ok(result) => result,
                Err(e) if e.is_recoverable() => {
                    summary.skipped += 1;
                    warn!(error = %e, "classification failed; skipping photo");
                    // last_seen stays untouched so the next iteration does
                    // a plain change-wait against the same reference point.
                    continue;
                }
                Err(e) => {
                    error!(error = %e, "fatal classification failure");
                    return self.abort(summary, e.to_string());
                }
            };

            info!(
                verdict = %result.verdict(),
                confidence = %format!("{:.1}%", result.confidence * 100.0),
                "photo classified"
            );

            let dispatched = if result.is_memorable {
                summary.kept += 1;
                trigger_advance(self.page).await.map(|_| ())
            } else {
                summary.deleted += 1;
                trigger_delete(self.page, self.config.settle_delay())
                    .await
                    .map(|_| ())
            };
            if let Err(e) = dispatched {
                return self.abort(summary, e.to_string());
            }

            summary.processed += 1;
            last_seen = Some(url);
            tokio::time::sleep(self.config.post_action_delay()).await;
        }

        info!(
            kept = summary.kept,
            deleted = summary.deleted,
            skipped = summary.skipped,
            "review pass completed"
        );
        ReviewOutcome::Completed(summary)
    }

    fn abort(&self, summary: ReviewSummary, reason: String) -> ReviewOutcome {
        error!(
            reason = %reason,
            processed = summary.processed,
            skipped = summary.skipped,
            "review pass aborted"
        );
        ReviewOutcome::Aborted { summary, reason }
    }
}
