//! Trivia client: paginated question browsing and quiz play against a
//! trivia backend's HTTP API.
//!
//! - `listing`: retrieval modes (all / by category / search), mode-aware
//!   paging, delete with page adjustment
//! - `quiz`: non-repeating question sequencing, grading, end detection
//! - `evaluator`: token-set answer matching
//! - `api`: the backend seam (`TriviaBackend`) and its reqwest implementation
//! - `host`: terminal view driving both controllers

pub mod api;
pub mod config;
pub mod domain;
pub mod evaluator;
pub mod host;
pub mod listing;
pub mod notify;
pub mod protocol;
pub mod quiz;
pub mod telemetry;
pub mod util;

#[cfg(test)]
mod fake;

pub use api::{HttpBackend, TransportFailure, TriviaBackend};
pub use config::ClientConfig;
pub use listing::ListingController;
pub use quiz::QuizController;
