use dioxus::prelude::*;

use hotel_pricing_assistant::domain::DemandClass;

use crate::ui::theme;

/// Demand level with its bucket label and a 0-100 meter.
#[component]
pub fn DemandBadge(level: u8, demand: DemandClass) -> Element {
    let badge = theme::demand_badge(demand.color_token);
    let bar = theme::demand_bar(demand.color_token);
    let width = format!("width: {}%;", level.min(100));

    rsx! {
        div {
            class: "{theme::PANEL} kpi-card",
            div { class: "row-between",
                h3 { class: "{theme::LABEL}", "Demand" }
                span { class: "{badge}", "{demand.bucket.label()}" }
            }
            p { class: "kpi-value", "{level}%" }
            div { class: "meter",
                div { class: "{bar}", style: "{width}" }
            }
        }
    }
}
