//! Runs one submission end to end: guard, fan out, aggregate, derive, settle.
//!
//! Endpoint calls for a submission are issued concurrently and all of them
//! settle before the state leaves `Submitting`. Only the estimate call is
//! mandatory; a failed price or today enrichment degrades that metric to
//! unavailable.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;
use tracing::Instrument;

use crate::{
    config::{ClientSettings, Enrichments},
    domain::{
        aggregate, derive_metrics, AggregatedView, FailureKind, FailureReason, Fragments,
        PresentationState, PresentationStateMachine, QueryModel, RawFragment, SubmissionId,
        TransitionError,
    },
    infra::{
        prediction::{Endpoint, HttpPredictionClient, PredictionClient, PredictionClientError},
        wire::{EstimateRequest, PredictionPayload},
    },
};

#[derive(Clone, Debug, PartialEq, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("submission failed: {0}")]
    Failed(FailureReason),
}

#[derive(Clone)]
pub struct SubmissionOrchestrator {
    client: Arc<dyn PredictionClient>,
    enrichments: Enrichments,
    machine: Arc<Mutex<PresentationStateMachine>>,
    updates: Arc<watch::Sender<PresentationState>>,
}

impl SubmissionOrchestrator {
    pub fn new(client: Arc<dyn PredictionClient>, enrichments: Enrichments) -> Self {
        let (updates, _) = watch::channel(PresentationState::Idle);
        Self {
            client,
            enrichments,
            machine: Arc::new(Mutex::new(PresentationStateMachine::new())),
            updates: Arc::new(updates),
        }
    }

    /// Orchestrator backed by the HTTP client described by `settings`.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, PredictionClientError> {
        let client = HttpPredictionClient::new(settings)?;
        tracing::debug!(base_url = %client.base_url(), "prediction client ready");
        Ok(Self::new(Arc::new(client), settings.enrichments))
    }

    pub fn state(&self) -> PresentationState {
        self.machine().state().clone()
    }

    /// Receiver that observes every transition.
    pub fn subscribe(&self) -> watch::Receiver<PresentationState> {
        self.updates.subscribe()
    }

    /// Runs one submission to completion.
    ///
    /// Dropping the returned future before it resolves settles the submission
    /// as [`FailureKind::Cancelled`], so the machine never stays in `Submitting`.
    pub async fn submit(&self, query: QueryModel) -> Result<AggregatedView, SubmissionError> {
        let id = self.transition(|machine| machine.begin(query.clone()))?;
        let mut guard = InFlight {
            orchestrator: self,
            id,
            settled: false,
        };
        let span = tracing::info_span!("submission", %id, location = query.location());
        let result = self.run(id, query).instrument(span).await;
        guard.settled = true;
        result
    }

    /// Id of the submission currently in flight, if any.
    pub fn in_flight(&self) -> Option<SubmissionId> {
        self.machine().in_flight()
    }

    /// Returns to `Idle` from `Success` or `Error`.
    pub fn reset(&self) -> Result<(), TransitionError> {
        self.transition(PresentationStateMachine::reset)
    }

    async fn run(
        &self,
        id: SubmissionId,
        query: QueryModel,
    ) -> Result<AggregatedView, SubmissionError> {
        tracing::info!("submission started");
        let outcome = match self.collect_fragments(&query).await {
            Ok(fragments) => aggregate(&fragments)
                .map_err(|err| FailureReason::new(FailureKind::Aggregation, err.to_string())),
            Err(reason) => Err(reason),
        };

        match outcome {
            Ok(view) => {
                let metrics = derive_metrics(&view);
                self.transition(|machine| machine.succeed(id, view.clone(), metrics))?;
                tracing::info!(demand = view.demand_level(), "submission succeeded");
                Ok(view)
            }
            Err(reason) => {
                tracing::warn!(kind = ?reason.kind, reason = %reason, "submission failed");
                self.transition(|machine| machine.fail(id, reason.clone()))?;
                Err(SubmissionError::Failed(reason))
            }
        }
    }

    async fn collect_fragments(&self, query: &QueryModel) -> Result<Fragments, FailureReason> {
        let estimate_body = encode(&EstimateRequest::from(query))?;
        let prediction_body = encode(&PredictionPayload::from(query))?;

        let (estimate, price, today) = tokio::join!(
            self.client.call(Endpoint::Estimate, &estimate_body),
            self.optional_call(
                self.enrichments.predict_price,
                Endpoint::PredictPrice,
                &prediction_body
            ),
            self.optional_call(
                self.enrichments.predict_today,
                Endpoint::PredictToday,
                &prediction_body
            ),
        );

        let estimate = estimate.map_err(|err| {
            tracing::warn!(endpoint = %Endpoint::Estimate, error = %err, "mandatory call failed");
            FailureReason::from(&err)
        })?;

        let mut fragments = Fragments::from([(Endpoint::Estimate.source(), estimate)]);
        fragments.extend(price.map(|fragment| (Endpoint::PredictPrice.source(), fragment)));
        fragments.extend(today.map(|fragment| (Endpoint::PredictToday.source(), fragment)));
        Ok(fragments)
    }

    async fn optional_call(
        &self,
        enabled: bool,
        endpoint: Endpoint,
        payload: &Value,
    ) -> Option<RawFragment> {
        if !enabled {
            return None;
        }
        match self.client.call(endpoint, payload).await {
            Ok(fragment) => Some(fragment),
            Err(err) => {
                tracing::warn!(%endpoint, error = %err, "optional enrichment unavailable");
                None
            }
        }
    }

    fn transition<T, F>(&self, apply: F) -> Result<T, TransitionError>
    where
        F: FnOnce(&mut PresentationStateMachine) -> Result<T, TransitionError>,
    {
        let mut machine = self.machine();
        let outcome = apply(&mut machine)?;
        self.updates.send_replace(machine.state().clone());
        Ok(outcome)
    }

    fn machine(&self) -> MutexGuard<'_, PresentationStateMachine> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Fails the in-flight submission if `submit` is dropped before it settles.
struct InFlight<'a> {
    orchestrator: &'a SubmissionOrchestrator,
    id: SubmissionId,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let id = self.id;
        tracing::warn!(%id, "submission dropped before it settled");
        let reason = FailureReason::new(FailureKind::Cancelled, "submission cancelled");
        if let Err(err) = self
            .orchestrator
            .transition(|machine| machine.fail(id, reason))
        {
            tracing::debug!(%id, error = %err, "cancelled submission was already settled");
        }
    }
}

fn encode<T: Serialize>(body: &T) -> Result<Value, FailureReason> {
    serde_json::to_value(body).map_err(|err| {
        let err = PredictionClientError::from(err);
        FailureReason::from(&err)
    })
}
