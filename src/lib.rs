//! Hotel pricing assistant.
//!
//! Collects a hotel query, fans it out to the pricing prediction service,
//! merges the answers into one view and derives the dashboard metrics from it.
//! The desktop binary in `main.rs` renders the result; everything here is
//! renderer-agnostic.

pub mod config;
pub mod domain;
pub mod infra;
pub mod orchestrator;
pub mod util;

pub use config::{ClientSettings, Enrichments, SettingsError};
pub use infra::prediction::{Endpoint, HttpPredictionClient, PredictionClient, PredictionClientError};
pub use orchestrator::{SubmissionError, SubmissionOrchestrator};
