use tracing::subscriber::{set_global_default, SetGlobalDefaultError};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Log level used when `RUST_LOG` is unset.
pub const DEFAULT_LEVEL: &str = "info";

/// Installs the process-wide `tracing` subscriber. Records are bunyan-style JSON
/// lines tagged with `name` and written to `sink`; pass `std::io::sink` to drop
/// them.
///
/// `RUST_LOG` takes precedence over `default_level`. Fails if a subscriber is
/// already installed.
pub fn init_telemetry<Sink>(
    name: &str,
    default_level: &str,
    sink: Sink,
) -> Result<(), SetGlobalDefaultError>
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(BunyanFormattingLayer::new(name.to_string(), sink));

    set_global_default(subscriber)
}
