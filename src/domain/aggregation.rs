//! Merges endpoint fragments into one [`AggregatedView`].
//!
//! Field precedence:
//! - `price_range`: price-prediction fragment, else derived from `trends`, else unset.
//! - `forecast_price`: today-forecast fragment, else unset.
//! - `trends`, `demand_level`, `recommendation`: estimate fragment only.
//!
//! Only the estimate fragment is mandatory. A malformed optional fragment is
//! logged and treated as absent.

use std::collections::HashMap;

use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;

use super::entities::{AggregatedView, FragmentSource, PriceRange, RawFragment, TrendPoint};
use super::metrics::price_range_from_trends;

const MAX_DEMAND_LEVEL: f64 = 100.0;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum AggregationError {
    #[error("missing estimate fragment")]
    MissingEstimate,
    #[error("malformed {fragment} fragment: {detail}")]
    Malformed {
        fragment: FragmentSource,
        detail: String,
    },
    #[error("demand level {0} outside 0..=100")]
    DemandOutOfRange(f64),
}

pub type Fragments = HashMap<FragmentSource, RawFragment>;

#[derive(Debug, Deserialize)]
struct EstimateDto {
    #[serde(default)]
    trends: Vec<TrendPoint>,
    demand_level: f64,
    #[serde(default)]
    recommendation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PredictedRangeDto {
    predicted_price_range_in_inr: RangeDto,
}

#[derive(Debug, Deserialize)]
struct RangeDto {
    min: f64,
    max: f64,
}

impl From<RangeDto> for PriceRange {
    fn from(dto: RangeDto) -> Self {
        PriceRange::new(dto.min.min(dto.max), dto.max.max(dto.min))
    }
}

pub fn aggregate(fragments: &Fragments) -> Result<AggregatedView, AggregationError> {
    let estimate_fragment = fragments
        .get(&FragmentSource::Estimate)
        .ok_or(AggregationError::MissingEstimate)?;
    let estimate: EstimateDto = parse_fragment(FragmentSource::Estimate, estimate_fragment)
        .inspect_err(|err| {
            tracing::warn!(
                fragment = %estimate_fragment,
                error = %err,
                "estimate fragment failed validation"
            );
        })?;

    let demand_level = demand_level(estimate.demand_level).inspect_err(|err| {
        tracing::warn!(fragment = %estimate_fragment, error = %err, "estimate demand level rejected");
    })?;

    let price_range = optional_range(fragments, FragmentSource::PricePrediction).or_else(|| {
        match price_range_from_trends(&estimate.trends) {
            Ok(range) => Some(range),
            Err(err) => {
                tracing::debug!(error = %err, "price range unavailable");
                None
            }
        }
    });

    let forecast_price =
        optional_range(fragments, FragmentSource::TodayForecast).map(|range| range.midpoint());

    Ok(AggregatedView::new(
        estimate.trends,
        price_range,
        forecast_price,
        demand_level,
        estimate.recommendation.unwrap_or_default(),
    ))
}

fn optional_range(fragments: &Fragments, source: FragmentSource) -> Option<PriceRange> {
    let fragment = fragments.get(&source)?;
    match parse_fragment::<PredictedRangeDto>(source, fragment) {
        Ok(dto) => Some(dto.predicted_price_range_in_inr.into()),
        Err(err) => {
            tracing::warn!(
                fragment = %fragment,
                error = %err,
                "ignoring malformed optional fragment"
            );
            None
        }
    }
}

fn parse_fragment<T>(source: FragmentSource, fragment: &RawFragment) -> Result<T, AggregationError>
where
    T: DeserializeOwned,
{
    serde_json::from_value(fragment.clone().into_value()).map_err(|err| {
        AggregationError::Malformed {
            fragment: source,
            detail: err.to_string(),
        }
    })
}

fn demand_level(raw: f64) -> Result<u8, AggregationError> {
    if !(0.0..=MAX_DEMAND_LEVEL).contains(&raw) {
        return Err(AggregationError::DemandOutOfRange(raw));
    }
    Ok(raw.round() as u8)
}
