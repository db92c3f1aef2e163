pub const APP_NAME: &str = "Hotel Pricing Assistant";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const USER_AGENT: &str = concat!("hotel-pricing-assistant/", env!("CARGO_PKG_VERSION"));

pub fn version_label() -> String {
    format!("v{APP_VERSION}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_carries_version() {
        assert!(USER_AGENT.ends_with(APP_VERSION));
        assert_eq!(version_label(), format!("v{APP_VERSION}"));
    }
}
