use dioxus::prelude::*;

use hotel_pricing_assistant::domain::QuerySummary;

use crate::ui::theme;

#[component]
pub fn SummaryCard(summary: QuerySummary) -> Element {
    let rows = [
        ("Location", summary.location),
        ("Room type", summary.room_type),
        ("Check-in", summary.check_in),
        ("Check-out", summary.check_out),
        ("Amenities", summary.amenities),
    ];

    rsx! {
        section {
            class: "{theme::PANEL}",
            h2 { class: "{theme::PANEL_TITLE}", "Hotel Summary" }
            dl { class: "summary-list",
                for (label, value) in rows {
                    div { class: "row-between",
                        dt { class: "{theme::MUTED}", "{label}" }
                        dd { "{value}" }
                    }
                }
            }
        }
    }
}
