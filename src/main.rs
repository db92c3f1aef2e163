#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

mod app;
mod ui;

use dioxus::prelude::*;

#[cfg(feature = "desktop")]
use dioxus_desktop::{tao::window::WindowBuilder, Config as DesktopConfig};

use hotel_pricing_assistant::{
    util::{telemetry, version::APP_NAME},
    ClientSettings, SubmissionOrchestrator,
};

fn main() {
    // Wayland explicit-sync crashes on some drivers; fall back to GL unless the caller opts in.
    if std::env::var("WAYLAND_DISPLAY").is_ok() && std::env::var("WGPU_BACKEND").is_err() {
        std::env::set_var("WGPU_BACKEND", "gl");
    }

    // WebKit's DMABUF renderer opts into explicit sync; disable it unless the user overrides.
    if std::env::var("WAYLAND_DISPLAY").is_ok()
        && std::env::var("WEBKIT_DISABLE_DMABUF_RENDERER").is_err()
    {
        std::env::set_var("WEBKIT_DISABLE_DMABUF_RENDERER", "1");
    }

    let created = ClientSettings::write_default_file();
    let (settings, settings_error) = match ClientSettings::load() {
        Ok(settings) => (settings, None),
        Err(err) => (ClientSettings::default(), Some(err)),
    };

    if let Err(err) = telemetry::init(&settings.log_level) {
        eprintln!("Failed to initialise logging: {err}");
    }
    match created {
        Ok(Some(path)) => tracing::info!(path = %path.display(), "wrote default settings"),
        Ok(None) => {}
        Err(err) => tracing::warn!(error = %err, "could not write default settings"),
    }
    if let Some(err) = settings_error {
        tracing::warn!(error = %err, "falling back to default settings");
    }
    tracing::info!(base_url = %settings.base_url, "starting {APP_NAME}");

    let orchestrator = match SubmissionOrchestrator::from_settings(&settings)
        .or_else(|err| {
            tracing::warn!(error = %err, "prediction client rejected settings, using defaults");
            SubmissionOrchestrator::from_settings(&ClientSettings::default())
        }) {
        Ok(orchestrator) => orchestrator,
        Err(err) => {
            tracing::error!(error = %err, "failed to build prediction client");
            std::process::exit(1);
        }
    };

    let builder = LaunchBuilder::new().with_context(orchestrator);

    #[cfg(feature = "desktop")]
    let builder = {
        let config = desktop! {
            DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title(APP_NAME)
            )
        };
        builder.with_cfg(config)
    };

    #[cfg(not(feature = "desktop"))]
    let builder = builder;

    builder.launch(app::App);
}
