use serde::Serialize;

/// Per-run bookkeeping reported when a review pass ends.
#[derive(Debug, Serialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewSummary {
    /// Number of photos the caller asked for.
    pub requested: usize,
    /// Iterations actually entered.
    pub processed: usize,
    pub kept: usize,
    pub deleted: usize,
    pub skipped: usize,
}

/// How a review pass ended.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// All requested iterations ran.
    Completed(ReviewSummary),
    /// The run stopped early; `reason` says why.
    Aborted {
        summary: ReviewSummary,
        reason: String,
    },
}

impl ReviewOutcome {
    pub fn summary(&self) -> &ReviewSummary {
        match self {
            ReviewOutcome::Completed(s) => s,
            ReviewOutcome::Aborted { summary, .. } => summary,
        }
    }
}
