use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One day of the estimate's price trend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub price: f64,
}

impl TrendPoint {
    pub fn new(date: impl Into<String>, price: f64) -> Self {
        Self {
            date: date.into(),
            price,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// Where a fragment came from. Each prediction endpoint produces exactly one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FragmentSource {
    /// General estimate: trends, demand and recommendation. Mandatory.
    Estimate,
    /// Dedicated price-range prediction. Optional.
    PricePrediction,
    /// Today's forecast. Optional.
    TodayForecast,
}

impl FragmentSource {
    pub fn name(&self) -> &'static str {
        match self {
            FragmentSource::Estimate => "estimate",
            FragmentSource::PricePrediction => "price_prediction",
            FragmentSource::TodayForecast => "today_forecast",
        }
    }
}

impl fmt::Display for FragmentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single endpoint's JSON object, kept opaque until aggregation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawFragment(Map<String, Value>);

impl RawFragment {
    /// Accepts only JSON objects.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl fmt::Display for RawFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(&self.0) {
            Ok(json) => f.write_str(&json),
            Err(_) => f.write_str("<unprintable fragment>"),
        }
    }
}

/// Unified view model built from one or more fragments. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregatedView {
    trends: Vec<TrendPoint>,
    price_range: Option<PriceRange>,
    forecast_price: Option<f64>,
    demand_level: u8,
    recommendation: String,
}

impl AggregatedView {
    pub(crate) fn new(
        trends: Vec<TrendPoint>,
        price_range: Option<PriceRange>,
        forecast_price: Option<f64>,
        demand_level: u8,
        recommendation: String,
    ) -> Self {
        Self {
            trends,
            price_range,
            forecast_price,
            demand_level,
            recommendation,
        }
    }

    /// Chronological as returned by the estimate endpoint.
    pub fn trends(&self) -> &[TrendPoint] {
        &self.trends
    }

    /// `None` renders as "N/A".
    pub fn price_range(&self) -> Option<PriceRange> {
        self.price_range
    }

    pub fn forecast_price(&self) -> Option<f64> {
        self.forecast_price
    }

    /// Always within `0..=100`.
    pub fn demand_level(&self) -> u8 {
        self.demand_level
    }

    pub fn recommendation(&self) -> &str {
        &self.recommendation
    }
}
