//! Thin asynchronous client for the pricing prediction service.
//!
//! - One POST per call, JSON in and JSON out; no retries.
//! - Bodies that are not a JSON object are rejected as malformed.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use thiserror::Error;

use crate::{
    config::ClientSettings,
    domain::{FailureKind, FailureReason, FragmentSource, RawFragment},
    util::version::USER_AGENT,
};

const MAX_LOGGED_BODY: usize = 512;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Estimate,
    PredictPrice,
    PredictToday,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Estimate => "estimate",
            Endpoint::PredictPrice => "predict-price",
            Endpoint::PredictToday => "predict-today",
        }
    }

    pub fn source(&self) -> FragmentSource {
        match self {
            Endpoint::Estimate => FragmentSource::Estimate,
            Endpoint::PredictPrice => FragmentSource::PricePrediction,
            Endpoint::PredictToday => FragmentSource::TodayForecast,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path())
    }
}

#[derive(Debug, Error)]
pub enum PredictionClientError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{endpoint} answered with status {status}")]
    Status { endpoint: Endpoint, status: StatusCode },
    #[error("malformed response from {endpoint}: {detail}")]
    MalformedResponse { endpoint: Endpoint, detail: String },
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

impl PredictionClientError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PredictionClientError::MalformedResponse { .. } => FailureKind::MalformedResponse,
            PredictionClientError::InvalidUrl(_)
            | PredictionClientError::Network(_)
            | PredictionClientError::Status { .. }
            | PredictionClientError::Encode(_) => FailureKind::Network,
        }
    }
}

impl From<&PredictionClientError> for FailureReason {
    fn from(err: &PredictionClientError) -> Self {
        FailureReason::new(err.kind(), err.to_string())
    }
}

/// Network boundary used by the orchestrator. Implementations perform one
/// outbound request per call.
#[async_trait]
pub trait PredictionClient: Send + Sync {
    async fn call(
        &self,
        endpoint: Endpoint,
        payload: &Value,
    ) -> Result<RawFragment, PredictionClientError>;
}

#[derive(Clone)]
pub struct HttpPredictionClient {
    http: Client,
    base_url: Url,
}

impl HttpPredictionClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, PredictionClientError> {
        Self::with_base_url(
            &settings.base_url,
            Duration::from_secs(settings.timeout_secs),
        )
    }

    pub fn with_base_url(base: &str, timeout: Duration) -> Result<Self, PredictionClientError> {
        let base_url = Url::parse(&normalize_base(base))?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn url(&self, endpoint: Endpoint) -> Result<Url, url::ParseError> {
        self.base_url.join(endpoint.path())
    }
}

#[async_trait]
impl PredictionClient for HttpPredictionClient {
    async fn call(
        &self,
        endpoint: Endpoint,
        payload: &Value,
    ) -> Result<RawFragment, PredictionClientError> {
        let url = self.url(endpoint)?;
        tracing::debug!(%url, "requesting prediction");

        let response = self.http.post(url).json(payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PredictionClientError::Status { endpoint, status });
        }

        let body = response.text().await?;
        parse_fragment(endpoint, &body)
    }
}

/// Parses a response body into a fragment, rejecting anything but a JSON object.
pub fn parse_fragment(endpoint: Endpoint, body: &str) -> Result<RawFragment, PredictionClientError> {
    let value: Value = serde_json::from_str(body).map_err(|err| {
        tracing::warn!(
            %endpoint,
            body = body_excerpt(body),
            error = %err,
            "response body is not JSON"
        );
        PredictionClientError::MalformedResponse {
            endpoint,
            detail: err.to_string(),
        }
    })?;

    RawFragment::from_value(value).ok_or_else(|| {
        tracing::warn!(
            %endpoint,
            body = body_excerpt(body),
            "response body is not a JSON object"
        );
        PredictionClientError::MalformedResponse {
            endpoint,
            detail: "expected a JSON object".to_string(),
        }
    })
}

/// Leading part of a response body, cut on a char boundary, for log lines.
fn body_excerpt(body: &str) -> &str {
    match body.char_indices().nth(MAX_LOGGED_BODY) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}

fn normalize_base(base: &str) -> String {
    let trimmed = base.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}
