use dioxus::prelude::*;

use hotel_pricing_assistant::util::version::{version_label, APP_NAME};

#[component]
pub fn Shell(children: Element) -> Element {
    rsx! {
        div { class: "app-shell",
            header { class: "app-header",
                div { class: "app-header-inner",
                    span { class: "app-logo", "🏨" }
                    div {
                        h1 { class: "app-title", "{APP_NAME}" }
                        p { class: "text-muted", "Demand and price insights for your property" }
                    }
                    span { class: "app-version", "{version_label()}" }
                }
            }
            main { class: "app-main",
                {children}
            }
        }
    }
}
