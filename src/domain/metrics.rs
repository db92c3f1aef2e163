use serde::Serialize;
use thiserror::Error;

use super::entities::{AggregatedView, PriceRange, TrendPoint};

pub const CURRENCY_SYMBOL: &str = "₹";
pub const UNAVAILABLE: &str = "N/A";

const MODERATE_DEMAND_ABOVE: u8 = 50;
const VERY_HIGH_DEMAND_ABOVE: u8 = 75;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("cannot derive a range from an empty price series")]
pub struct EmptySeriesError;

pub fn price_range_from_trends(trends: &[TrendPoint]) -> Result<PriceRange, EmptySeriesError> {
    let mut prices = trends.iter().map(|point| point.price);
    let first = prices.next().ok_or(EmptySeriesError)?;
    let (min, max) = prices.fold((first, first), |(min, max), price| {
        (min.min(price), max.max(price))
    });
    Ok(PriceRange::new(min, max))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandBucket {
    Low,
    Moderate,
    VeryHigh,
}

impl DemandBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemandBucket::Low => "low",
            DemandBucket::Moderate => "moderate",
            DemandBucket::VeryHigh => "very_high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DemandBucket::Low => "Low",
            DemandBucket::Moderate => "Moderate",
            DemandBucket::VeryHigh => "Very High",
        }
    }

    pub fn color_token(&self) -> ColorToken {
        match self {
            DemandBucket::Low => ColorToken::Green,
            DemandBucket::Moderate => ColorToken::Amber,
            DemandBucket::VeryHigh => ColorToken::Red,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorToken {
    Green,
    Amber,
    Red,
}

impl ColorToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorToken::Green => "green",
            ColorToken::Amber => "amber",
            ColorToken::Red => "red",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DemandClass {
    pub bucket: DemandBucket,
    pub color_token: ColorToken,
}

/// The one breakpoint table every view uses:
/// `> 75` very high, `51..=75` moderate, `<= 50` low.
pub fn classify_demand(level: u8) -> DemandClass {
    let bucket = if level > VERY_HIGH_DEMAND_ABOVE {
        DemandBucket::VeryHigh
    } else if level > MODERATE_DEMAND_ABOVE {
        DemandBucket::Moderate
    } else {
        DemandBucket::Low
    };

    DemandClass {
        bucket,
        color_token: bucket.color_token(),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

pub fn chart_series(trends: &[TrendPoint]) -> Vec<ChartPoint> {
    trends
        .iter()
        .map(|point| ChartPoint {
            label: point.date.clone(),
            value: point.price,
        })
        .collect()
}

/// Everything the dashboard displays, derived once per successful submission.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardMetrics {
    pub price_range: Option<PriceRange>,
    pub forecast_price: Option<f64>,
    pub demand_level: u8,
    pub demand: DemandClass,
    pub series: Vec<ChartPoint>,
}

impl DashboardMetrics {
    pub fn price_range_display(&self) -> String {
        format_price_range(self.price_range)
    }

    pub fn forecast_display(&self) -> String {
        self.forecast_price
            .map(format_price)
            .unwrap_or_else(|| UNAVAILABLE.to_string())
    }

    /// Largest series value, used to scale the trend bars. `None` for an empty series.
    pub fn series_peak(&self) -> Option<f64> {
        self.series
            .iter()
            .map(|point| point.value)
            .fold(None, |peak: Option<f64>, value| {
                Some(peak.map_or(value, |p| p.max(value)))
            })
    }
}

pub fn derive_metrics(view: &AggregatedView) -> DashboardMetrics {
    DashboardMetrics {
        price_range: view.price_range(),
        forecast_price: view.forecast_price(),
        demand_level: view.demand_level(),
        demand: classify_demand(view.demand_level()),
        series: chart_series(view.trends()),
    }
}

pub fn format_price(value: f64) -> String {
    format!("{CURRENCY_SYMBOL}{value:.0}")
}

pub fn format_price_range(range: Option<PriceRange>) -> String {
    match range {
        Some(range) => format!("{} - {}", format_price(range.min), format_price(range.max)),
        None => UNAVAILABLE.to_string(),
    }
}

pub fn recommendation_text(recommendation: &str, location: &str) -> String {
    if recommendation.trim().is_empty() {
        format!(
            "Based on demand in {location}, consider adjusting prices as shown in the trend below."
        )
    } else {
        recommendation.to_string()
    }
}
