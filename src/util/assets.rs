use std::{borrow::Cow, sync::OnceLock};

use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "assets"]
struct EmbeddedAssets;

static MAIN_CSS: OnceLock<String> = OnceLock::new();

/// Contents of `assets/main.css`, empty if the asset is missing.
pub fn main_css() -> &'static str {
    MAIN_CSS.get_or_init(|| load_text("main.css")).as_str()
}

fn load_text(path: &str) -> String {
    match load_asset(path) {
        Some(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        None => {
            tracing::warn!(path, "embedded asset not found");
            String::new()
        }
    }
}

fn load_asset(path: &str) -> Option<Cow<'static, [u8]>> {
    EmbeddedAssets::get(path.trim_start_matches('/')).map(|file| file.data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stylesheet_is_embedded() {
        assert!(main_css().contains(".dashboard"));
    }
}
