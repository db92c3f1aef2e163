use dioxus::prelude::*;

use hotel_pricing_assistant::domain::{format_price, ChartPoint};

use crate::ui::theme;

/// Horizontal bar per trend point, scaled against the series peak.
#[component]
pub fn TrendChart(series: Vec<ChartPoint>, peak: Option<f64>) -> Element {
    let bars = series
        .into_iter()
        .map(|point| TrendBar::new(point, peak))
        .collect::<Vec<_>>();

    rsx! {
        section {
            class: "{theme::PANEL}",
            h2 { class: "{theme::PANEL_TITLE}", "Price Trend" }
            if bars.is_empty() {
                p { class: "{theme::MUTED}", "No trend data returned for this query." }
            } else {
                ul { class: "trend-list",
                    for bar in bars {
                        li { class: "trend-row",
                            span { class: "trend-label", "{bar.label}" }
                            div { class: "meter",
                                div { class: "meter-fill fill-accent", style: "{bar.style}" }
                            }
                            span { class: "trend-value", "{bar.value}" }
                        }
                    }
                }
            }
        }
    }
}

#[derive(Clone, PartialEq)]
struct TrendBar {
    label: String,
    value: String,
    style: String,
}

impl TrendBar {
    fn new(point: ChartPoint, peak: Option<f64>) -> Self {
        let percent = match peak {
            Some(peak) if peak > 0.0 => (point.value / peak * 100.0).clamp(0.0, 100.0),
            _ => 0.0,
        };
        Self {
            label: point.label,
            value: format_price(point.value),
            style: format!("width: {percent:.0}%;"),
        }
    }
}
