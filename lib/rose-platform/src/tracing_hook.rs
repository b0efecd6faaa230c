use std::fs::File;

use eyre::{Context, Result};
use tracing_error::ErrorLayer;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, EnvFilter, Layer};

/// Install the eyre report handler and the global tracing subscriber.
///
/// Human-readable logs go to stderr filtered by `RUST_LOG` (defaulting to `info`), and every
/// event is also written as JSON lines into `log.jsonl` in the working directory.
pub fn enable() -> Result<()> {
    color_eyre::install()?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::Layer::default().with_filter(filter);
    let log_file = File::create("log.jsonl").context("Cannot create log.jsonl")?;
    let json_layer = tracing_subscriber::fmt::Layer::default()
        .json()
        .with_file(true)
        .with_level(true)
        .with_line_number(true)
        .with_thread_names(true)
        .with_thread_ids(true)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .with_writer(log_file);
    let registry = tracing_subscriber::registry()
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .with(json_layer);
    #[cfg(feature = "tracy")]
    let registry = {
        let tracy_layer = tracing_tracy::TracyLayer::new();
        registry.with(tracy_layer)
    };
    registry
        .try_init()
        .context("A global tracing subscriber is already installed")?;
    Ok(())
}
