use serde::Serialize;

/// Outcome of classifying a single photo.
///
/// Produced once per photo and consumed immediately; never persisted.
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct ClassificationResult {
    pub is_memorable: bool,
    /// Probability of the winning class, in [0, 1].
    pub confidence: f32,
    pub prob_memorable: f32,
    pub prob_forgettable: f32,
}

impl ClassificationResult {
    /// Builds a result from the two class probabilities.
    ///
    /// Index 1 is "memorable", index 0 is "forgettable". The comparison is
    /// strict, so an exact tie counts as forgettable.
    pub fn from_probs(prob_forgettable: f32, prob_memorable: f32) -> Self {
        Self {
            is_memorable: prob_memorable > prob_forgettable,
            confidence: prob_memorable.max(prob_forgettable),
            prob_memorable,
            prob_forgettable,
        }
    }

    pub fn verdict(&self) -> Verdict {
        if self.is_memorable {
            Verdict::Memorable
        } else {
            Verdict::Forgettable
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Memorable,
    Forgettable,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Memorable => write!(f, "MEMORABLE"),
            Verdict::Forgettable => write!(f, "FORGETTABLE"),
        }
    }
}
