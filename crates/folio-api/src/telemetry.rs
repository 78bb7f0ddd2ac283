//! Tracing subscriber setup
//!
//! `RUST_LOG` overrides the default filter. `LOG_FORMAT=json` switches the
//! console output to one JSON object per event.

use tracing_subscriber::{
    fmt::{self, format::Format},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const DEFAULT_FILTER: &str = "folio=debug,tower_http=debug";

pub fn init_telemetry(environment: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let (json_layer, console_layer) = if json {
        (Some(fmt::layer().json().with_current_span(true)), None)
    } else {
        let console = fmt::layer().event_format(
            Format::default()
                .compact()
                .with_target(false)
                .without_time(),
        );
        (None, Some(console))
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(json_layer)
        .with(console_layer)
        .try_init()?;

    tracing::info!(environment = %environment, json, "Tracing initialized");
    Ok(())
}
