pub mod prediction;
pub mod wire;

pub use prediction::{Endpoint, HttpPredictionClient, PredictionClient, PredictionClientError};
pub use wire::{EstimateRequest, PredictionPayload};
