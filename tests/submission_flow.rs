use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use hotel_pricing_assistant::{
    domain::{
        Amenity, DemandBucket, FailureKind, FieldValue, Phase, PresentationState, PriceRange,
        QueryDraft, QueryModel, RawFragment, RoomType, TransitionError,
    },
    infra::prediction::parse_fragment,
    Endpoint, Enrichments, PredictionClient, PredictionClientError, SubmissionError,
    SubmissionOrchestrator,
};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::sync::{watch, Notify};

#[derive(Clone)]
enum Reply {
    Body(Value),
    Status(StatusCode),
    Garbage,
}

/// Answers each endpoint from a fixed script and records what was called.
#[derive(Default)]
struct ScriptedClient {
    replies: HashMap<Endpoint, Reply>,
    calls: Mutex<Vec<(Endpoint, Value)>>,
    gates: HashMap<Endpoint, Arc<Notify>>,
}

impl ScriptedClient {
    fn new() -> Self {
        Self::default()
    }

    fn reply(mut self, endpoint: Endpoint, reply: Reply) -> Self {
        self.replies.insert(endpoint, reply);
        self
    }

    /// Holds `endpoint`'s reply until `gate` is notified.
    fn gated(mut self, endpoint: Endpoint, gate: Arc<Notify>) -> Self {
        self.gates.insert(endpoint, gate);
        self
    }

    fn called(&self) -> Vec<Endpoint> {
        let mut endpoints: Vec<_> = self
            .calls
            .lock()
            .unwrap()
            .iter()
            .map(|(endpoint, _)| *endpoint)
            .collect();
        endpoints.sort_by_key(|endpoint| endpoint.path());
        endpoints
    }

    fn payload(&self, endpoint: Endpoint) -> Option<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(called, _)| *called == endpoint)
            .map(|(_, payload)| payload.clone())
    }
}

#[async_trait]
impl PredictionClient for ScriptedClient {
    async fn call(
        &self,
        endpoint: Endpoint,
        payload: &Value,
    ) -> Result<RawFragment, PredictionClientError> {
        self.calls.lock().unwrap().push((endpoint, payload.clone()));
        if let Some(gate) = self.gates.get(&endpoint) {
            gate.notified().await;
        }

        match self.replies.get(&endpoint).cloned() {
            Some(Reply::Body(body)) => parse_fragment(endpoint, &body.to_string()),
            Some(Reply::Status(status)) => Err(PredictionClientError::Status { endpoint, status }),
            Some(Reply::Garbage) => parse_fragment(endpoint, "<html>bad gateway</html>"),
            None => Err(PredictionClientError::Status {
                endpoint,
                status: StatusCode::NOT_FOUND,
            }),
        }
    }
}

fn jaipur() -> QueryModel {
    let mut draft = QueryDraft::new();
    draft.set_field(FieldValue::Location("Jaipur".into()));
    draft.set_field(FieldValue::RoomType(Some(RoomType::Deluxe)));
    draft.set_field(FieldValue::CheckInHour(14));
    draft.set_field(FieldValue::CheckOutHour(11));
    draft.set_field(FieldValue::AddAmenity(Amenity::Wifi));
    draft.set_field(FieldValue::AddAmenity(Amenity::Pool));
    draft.set_field(FieldValue::DistanceFromCityCenter(2.5));
    draft.finalize().unwrap()
}

fn estimate_body() -> Value {
    json!({
        "trends": [
            { "date": "Mon", "price": 3000 },
            { "date": "Tue", "price": 3400 }
        ],
        "demand_level": 82,
        "recommendation": "Raise prices on weekends"
    })
}

fn range_body(min: f64, max: f64) -> Value {
    json!({ "predicted_price_range_in_inr": { "min": min, "max": max } })
}

fn full_script() -> ScriptedClient {
    ScriptedClient::new()
        .reply(Endpoint::Estimate, Reply::Body(estimate_body()))
        .reply(Endpoint::PredictPrice, Reply::Body(range_body(2800.0, 3600.0)))
        .reply(Endpoint::PredictToday, Reply::Body(range_body(3100.0, 3300.0)))
}

fn orchestrator(client: ScriptedClient) -> (SubmissionOrchestrator, Arc<ScriptedClient>) {
    let client = Arc::new(client);
    let orchestrator = SubmissionOrchestrator::new(client.clone(), Enrichments::default());
    (orchestrator, client)
}

#[tokio::test]
async fn successful_submission_merges_all_fragments() {
    let (orchestrator, client) = orchestrator(full_script());

    let view = orchestrator.submit(jaipur()).await.unwrap();

    assert_eq!(view.price_range(), Some(PriceRange::new(2800.0, 3600.0)));
    assert_eq!(view.forecast_price(), Some(3200.0));
    assert_eq!(view.demand_level(), 82);
    assert_eq!(view.recommendation(), "Raise prices on weekends");
    assert_eq!(
        client.called(),
        vec![Endpoint::Estimate, Endpoint::PredictPrice, Endpoint::PredictToday]
    );

    let PresentationState::Success(payload) = orchestrator.state() else {
        panic!("expected success, got {:?}", orchestrator.state().phase());
    };
    assert_eq!(payload.query, jaipur());
    assert_eq!(payload.metrics.demand.bucket, DemandBucket::VeryHigh);
    assert_eq!(payload.metrics.price_range_display(), "₹2800 - ₹3600");
    assert_eq!(payload.metrics.forecast_display(), "₹3200");
    assert_eq!(payload.metrics.series.len(), 2);
    assert_eq!(orchestrator.in_flight(), None);
}

#[tokio::test]
async fn payloads_follow_the_query() {
    let (orchestrator, client) = orchestrator(full_script());
    orchestrator.submit(jaipur()).await.unwrap();

    assert_eq!(
        client.payload(Endpoint::PredictPrice).unwrap(),
        json!({
            "location": "Jaipur",
            "type_of_room": "Deluxe",
            "check_in_time": "14:00",
            "check_out_time": "11:00",
            "amenities": "wifi,pool",
            "distance_from_city_center": 2.5,
            "hotel_name": ""
        })
    );
    assert_eq!(
        client.payload(Endpoint::PredictToday),
        client.payload(Endpoint::PredictPrice)
    );
    assert_eq!(
        client.payload(Endpoint::Estimate).unwrap()["roomType"],
        json!("Deluxe")
    );
}

#[tokio::test]
async fn failed_enrichments_degrade_to_trend_range() {
    let client = ScriptedClient::new()
        .reply(Endpoint::Estimate, Reply::Body(estimate_body()))
        .reply(
            Endpoint::PredictPrice,
            Reply::Status(StatusCode::INTERNAL_SERVER_ERROR),
        )
        .reply(Endpoint::PredictToday, Reply::Garbage);
    let (orchestrator, _) = orchestrator(client);

    let view = orchestrator.submit(jaipur()).await.unwrap();

    assert_eq!(view.price_range(), Some(PriceRange::new(3000.0, 3400.0)));
    assert_eq!(view.forecast_price(), None);
    let PresentationState::Success(payload) = orchestrator.state() else {
        panic!("expected success");
    };
    assert_eq!(payload.metrics.forecast_display(), "N/A");
}

#[tokio::test]
async fn disabled_enrichments_are_not_requested() {
    let client = Arc::new(full_script());
    let orchestrator = SubmissionOrchestrator::new(
        client.clone(),
        Enrichments {
            predict_price: false,
            predict_today: false,
        },
    );

    let view = orchestrator.submit(jaipur()).await.unwrap();

    assert_eq!(client.called(), vec![Endpoint::Estimate]);
    assert_eq!(view.price_range(), Some(PriceRange::new(3000.0, 3400.0)));
    assert_eq!(view.forecast_price(), None);
}

#[tokio::test]
async fn estimate_failure_ends_in_error_state() {
    let client = ScriptedClient::new()
        .reply(
            Endpoint::Estimate,
            Reply::Status(StatusCode::SERVICE_UNAVAILABLE),
        )
        .reply(Endpoint::PredictPrice, Reply::Body(range_body(1.0, 2.0)))
        .reply(Endpoint::PredictToday, Reply::Body(range_body(1.0, 2.0)));
    let (orchestrator, client) = orchestrator(client);

    let err = orchestrator.submit(jaipur()).await.unwrap_err();

    let SubmissionError::Failed(reason) = err else {
        panic!("expected a failed submission, got {err:?}");
    };
    assert_eq!(reason.kind, FailureKind::Network);
    // Every call still settles before the state changes.
    assert_eq!(client.called().len(), 3);
    assert_eq!(
        orchestrator.state(),
        PresentationState::Error(jaipur(), reason)
    );
}

#[tokio::test]
async fn non_object_estimate_is_a_malformed_response() {
    let client = ScriptedClient::new().reply(Endpoint::Estimate, Reply::Garbage);
    let (orchestrator, _) = orchestrator(client);

    let err = orchestrator.submit(jaipur()).await.unwrap_err();

    assert!(matches!(
        err,
        SubmissionError::Failed(ref reason) if reason.kind == FailureKind::MalformedResponse
    ));
    assert_eq!(orchestrator.state().phase(), Phase::Error);
}

#[tokio::test]
async fn invalid_estimate_fields_fail_aggregation() {
    let client = ScriptedClient::new().reply(
        Endpoint::Estimate,
        Reply::Body(json!({ "trends": [], "demand_level": 140 })),
    );
    let (orchestrator, _) = orchestrator(client);

    let err = orchestrator.submit(jaipur()).await.unwrap_err();

    let SubmissionError::Failed(reason) = err else {
        panic!("expected a failed submission");
    };
    assert_eq!(reason.kind, FailureKind::Aggregation);
    assert!(reason.message.contains("140"));
}

#[tokio::test]
async fn overlapping_submission_is_rejected() {
    let gate = Arc::new(Notify::new());
    let (orchestrator, _) = orchestrator(full_script().gated(Endpoint::Estimate, gate.clone()));
    let mut updates = orchestrator.subscribe();
    let phases = tokio::spawn(record_phases(orchestrator.subscribe()));

    let first = tokio::spawn({
        let orchestrator = orchestrator.clone();
        async move { orchestrator.submit(jaipur()).await }
    });

    updates.changed().await.unwrap();
    assert!(updates.borrow_and_update().is_submitting());

    let second = orchestrator.submit(jaipur()).await;
    assert_eq!(
        second.unwrap_err(),
        SubmissionError::Transition(TransitionError::AlreadySubmitting)
    );
    assert!(orchestrator.state().is_submitting());

    gate.notify_one();
    let view = first.await.unwrap().unwrap();
    assert_eq!(view.demand_level(), 82);
    assert_eq!(orchestrator.state().phase(), Phase::Success);
    // The rejected submit never touched the state; the first settled once.
    assert_eq!(phases.await.unwrap(), vec![Phase::Submitting, Phase::Success]);
}

/// Phases observed until the first settled state.
async fn record_phases(mut updates: watch::Receiver<PresentationState>) -> Vec<Phase> {
    let mut phases = Vec::new();
    while updates.changed().await.is_ok() {
        let phase = updates.borrow_and_update().phase();
        phases.push(phase);
        if matches!(phase, Phase::Success | Phase::Error) {
            break;
        }
    }
    phases
}

async fn until_called(client: &ScriptedClient, count: usize) {
    for _ in 0..100 {
        if client.called().len() >= count {
            break;
        }
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn state_leaves_submitting_only_after_every_call_settles() {
    let gate = Arc::new(Notify::new());
    let client = ScriptedClient::new()
        .reply(
            Endpoint::Estimate,
            Reply::Status(StatusCode::SERVICE_UNAVAILABLE),
        )
        .reply(Endpoint::PredictPrice, Reply::Body(range_body(1.0, 2.0)))
        .reply(Endpoint::PredictToday, Reply::Body(range_body(1.0, 2.0)))
        .gated(Endpoint::PredictPrice, gate.clone());
    let (orchestrator, client) = orchestrator(client);

    let submission = tokio::spawn({
        let orchestrator = orchestrator.clone();
        async move { orchestrator.submit(jaipur()).await }
    });

    until_called(&client, 3).await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    // The estimate already failed and /predict-today was issued while
    // /predict-price is still held, so the calls run side by side.
    assert_eq!(
        client.called(),
        vec![Endpoint::Estimate, Endpoint::PredictPrice, Endpoint::PredictToday]
    );
    assert!(orchestrator.state().is_submitting());
    assert!(!submission.is_finished());

    gate.notify_one();
    let err = submission.await.unwrap().unwrap_err();
    assert!(matches!(
        err,
        SubmissionError::Failed(ref reason) if reason.kind == FailureKind::Network
    ));
    assert_eq!(orchestrator.state().phase(), Phase::Error);
}

#[tokio::test]
async fn dropped_submission_settles_as_cancelled() {
    let gate = Arc::new(Notify::new());
    let (orchestrator, client) = orchestrator(full_script().gated(Endpoint::Estimate, gate));

    let submission = tokio::spawn({
        let orchestrator = orchestrator.clone();
        async move { orchestrator.submit(jaipur()).await }
    });
    until_called(&client, 1).await;
    assert!(orchestrator.state().is_submitting());

    submission.abort();
    assert!(submission.await.unwrap_err().is_cancelled());

    let PresentationState::Error(query, reason) = orchestrator.state() else {
        panic!("expected error, got {:?}", orchestrator.state().phase());
    };
    assert_eq!(query, jaipur());
    assert_eq!(reason.kind, FailureKind::Cancelled);
    assert_eq!(orchestrator.in_flight(), None);

    orchestrator.reset().unwrap();
    assert_eq!(orchestrator.state(), PresentationState::Idle);
}

#[tokio::test]
async fn reset_returns_to_idle_and_allows_resubmission() {
    let (orchestrator, _) = orchestrator(full_script());

    assert!(matches!(
        orchestrator.reset(),
        Err(TransitionError::InvalidTransition { .. })
    ));

    orchestrator.submit(jaipur()).await.unwrap();
    assert!(matches!(
        orchestrator.submit(jaipur()).await,
        Err(SubmissionError::Transition(
            TransitionError::InvalidTransition { .. }
        ))
    ));

    orchestrator.reset().unwrap();
    assert_eq!(orchestrator.state(), PresentationState::Idle);
    orchestrator.submit(jaipur()).await.unwrap();
    assert_eq!(orchestrator.state().phase(), Phase::Success);
}

#[tokio::test]
async fn subscribers_see_each_phase() {
    let (orchestrator, _) = orchestrator(full_script());
    let mut updates = orchestrator.subscribe();

    orchestrator.submit(jaipur()).await.unwrap();
    assert!(updates.has_changed().unwrap());
    assert_eq!(updates.borrow_and_update().phase(), Phase::Success);

    orchestrator.reset().unwrap();
    assert_eq!(*updates.borrow_and_update(), PresentationState::Idle);
}
