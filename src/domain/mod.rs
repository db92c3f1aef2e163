//! Query validation, aggregation, metric derivation and presentation state.

pub mod aggregation;
pub mod app_state;
pub mod entities;
pub mod metrics;
pub mod query;

pub use aggregation::{aggregate, AggregationError, Fragments};
pub use app_state::{
    FailureKind, FailureReason, Phase, PresentationState, PresentationStateMachine,
    SubmissionId, SuccessPayload, TransitionError,
};
pub use entities::{AggregatedView, FragmentSource, PriceRange, RawFragment, TrendPoint};
pub use metrics::{
    chart_series, classify_demand, derive_metrics, format_price, format_price_range,
    price_range_from_trends, recommendation_text, ChartPoint, ColorToken, DashboardMetrics,
    DemandBucket, DemandClass, EmptySeriesError,
};
pub use query::{
    hour_label, Amenity, FieldValue, QueryDraft, QueryField, QueryModel, QuerySummary, RoomType,
    ValidationError, MAX_HOUR,
};
