use dioxus::prelude::*;

use hotel_pricing_assistant::{
    domain::{recommendation_text, SuccessPayload},
    SubmissionOrchestrator,
};
use time::OffsetDateTime;

use crate::ui::{
    components::{
        demand_badge::DemandBadge, kpi_card::KpiCard, summary_card::SummaryCard,
        trend_chart::TrendChart,
    },
    theme,
};

#[component]
pub fn DashboardPage(payload: SuccessPayload) -> Element {
    let orchestrator = use_context::<SubmissionOrchestrator>();

    let metrics = &payload.metrics;
    let summary = payload.query.summary();
    let recommendation = recommendation_text(payload.view.recommendation(), &summary.location);
    let updated = updated_label(payload.completed_at);

    let on_back = move |_| {
        if let Err(err) = orchestrator.reset() {
            tracing::warn!(error = %err, "reset rejected");
        }
    };

    rsx! {
        div { class: "dashboard",
            div { class: "row-between",
                div {
                    h2 { class: "dashboard-title", "Pricing insights for {summary.location}" }
                    p { class: "{theme::MUTED}", "{updated}" }
                }
                button { class: "{theme::BUTTON_SECONDARY}", onclick: on_back, "Back" }
            }

            div { class: "kpi-grid",
                KpiCard {
                    title: "Price Range".to_string(),
                    value: metrics.price_range_display(),
                    description: Some("Predicted nightly rate".to_string()),
                }
                KpiCard {
                    title: "Today's Forecast".to_string(),
                    value: metrics.forecast_display(),
                    description: Some("Midpoint of today's prediction".to_string()),
                }
                DemandBadge { level: metrics.demand_level, demand: metrics.demand }
            }

            section {
                class: "{theme::PANEL}",
                h2 { class: "{theme::PANEL_TITLE}", "Recommendation" }
                p { "{recommendation}" }
            }

            div { class: "dashboard-columns",
                TrendChart { series: metrics.series.clone(), peak: metrics.series_peak() }
                SummaryCard { summary: summary.clone() }
            }
        }
    }
}

fn updated_label(completed_at: OffsetDateTime) -> String {
    format!(
        "Updated {:02}:{:02} UTC",
        completed_at.hour(),
        completed_at.minute()
    )
}
