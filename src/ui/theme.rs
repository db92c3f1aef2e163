//! Class names from `assets/main.css`, grouped by what they style.

use hotel_pricing_assistant::domain::ColorToken;

pub const PANEL: &str = "panel";
pub const PANEL_TITLE: &str = "panel-title";
pub const LABEL: &str = "field-label";
pub const INPUT: &str = "field-input";
pub const MUTED: &str = "text-muted";
pub const BUTTON_PRIMARY: &str = "button button-primary";
pub const BUTTON_SECONDARY: &str = "button button-secondary";

pub fn demand_badge(token: ColorToken) -> &'static str {
    match token {
        ColorToken::Green => "badge badge-green",
        ColorToken::Amber => "badge badge-amber",
        ColorToken::Red => "badge badge-red",
    }
}

pub fn demand_bar(token: ColorToken) -> &'static str {
    match token {
        ColorToken::Green => "meter-fill fill-green",
        ColorToken::Amber => "meter-fill fill-amber",
        ColorToken::Red => "meter-fill fill-red",
    }
}
