use std::fmt;

use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    entities::AggregatedView,
    metrics::DashboardMetrics,
    query::QueryModel,
};

/// Correlates one submission's calls, logs and completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubmissionId(Uuid);

impl SubmissionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    MalformedResponse,
    Aggregation,
    /// The submitting future was dropped before every call settled.
    Cancelled,
}

/// Why a submission ended in the `Error` state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailureReason {
    pub kind: FailureKind,
    pub message: String,
}

impl FailureReason {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn user_message(&self) -> String {
        match self.kind {
            FailureKind::Network => {
                "Unable to reach the pricing service. Check your connection and try again."
                    .to_string()
            }
            FailureKind::MalformedResponse | FailureKind::Aggregation => {
                "The pricing service returned unexpected data. Please try again later.".to_string()
            }
            FailureKind::Cancelled => "The request was cancelled. Please submit again.".to_string(),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SuccessPayload {
    pub query: QueryModel,
    pub view: AggregatedView,
    pub metrics: DashboardMetrics,
    pub completed_at: OffsetDateTime,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum PresentationState {
    #[default]
    Idle,
    Submitting(QueryModel),
    Success(Box<SuccessPayload>),
    Error(QueryModel, FailureReason),
}

impl PresentationState {
    pub fn phase(&self) -> Phase {
        match self {
            PresentationState::Idle => Phase::Idle,
            PresentationState::Submitting(_) => Phase::Submitting,
            PresentationState::Success(_) => Phase::Success,
            PresentationState::Error(..) => Phase::Error,
        }
    }

    pub fn query(&self) -> Option<&QueryModel> {
        match self {
            PresentationState::Idle => None,
            PresentationState::Submitting(query) | PresentationState::Error(query, _) => {
                Some(query)
            }
            PresentationState::Success(payload) => Some(&payload.query),
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, PresentationState::Submitting(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Success,
    Error,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "Idle",
            Phase::Submitting => "Submitting",
            Phase::Success => "Success",
            Phase::Error => "Error",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("a submission is already in flight")]
    AlreadySubmitting,
    #[error("cannot {action} while {from}")]
    InvalidTransition { from: Phase, action: &'static str },
    #[error("submission {0} is no longer current")]
    StaleSubmission(SubmissionId),
}

/// Owner of the single [`PresentationState`].
///
/// `Idle -> Submitting -> Success | Error -> Idle` are the only legal moves.
/// Completion must present the id handed out by [`begin`](Self::begin), so a
/// submission can settle at most once.
#[derive(Debug, Default)]
pub struct PresentationStateMachine {
    state: PresentationState,
    in_flight: Option<SubmissionId>,
}

impl PresentationStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PresentationState {
        &self.state
    }

    pub fn in_flight(&self) -> Option<SubmissionId> {
        self.in_flight
    }

    pub fn begin(&mut self, query: QueryModel) -> Result<SubmissionId, TransitionError> {
        match self.state.phase() {
            Phase::Idle => {
                let id = SubmissionId::new();
                self.state = PresentationState::Submitting(query);
                self.in_flight = Some(id);
                Ok(id)
            }
            Phase::Submitting => Err(TransitionError::AlreadySubmitting),
            from => Err(TransitionError::InvalidTransition {
                from,
                action: "submit",
            }),
        }
    }

    pub fn succeed(
        &mut self,
        id: SubmissionId,
        view: AggregatedView,
        metrics: DashboardMetrics,
    ) -> Result<(), TransitionError> {
        let query = self.settle(id)?;
        self.state = PresentationState::Success(Box::new(SuccessPayload {
            query,
            view,
            metrics,
            completed_at: OffsetDateTime::now_utc(),
        }));
        Ok(())
    }

    pub fn fail(&mut self, id: SubmissionId, reason: FailureReason) -> Result<(), TransitionError> {
        let query = self.settle(id)?;
        self.state = PresentationState::Error(query, reason);
        Ok(())
    }

    pub fn reset(&mut self) -> Result<(), TransitionError> {
        match self.state.phase() {
            Phase::Success | Phase::Error => {
                self.state = PresentationState::Idle;
                Ok(())
            }
            from => Err(TransitionError::InvalidTransition {
                from,
                action: "reset",
            }),
        }
    }

    fn settle(&mut self, id: SubmissionId) -> Result<QueryModel, TransitionError> {
        match std::mem::take(&mut self.state) {
            PresentationState::Submitting(query) if self.in_flight == Some(id) => {
                self.in_flight = None;
                Ok(query)
            }
            other => {
                self.state = other;
                Err(TransitionError::StaleSubmission(id))
            }
        }
    }
}
