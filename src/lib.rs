pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::ReviewConfig;
pub use error::{Error, Result};
pub use models::classify_types::{ClassificationResult, Verdict};
pub use models::review_types::{ReviewOutcome, ReviewSummary};
