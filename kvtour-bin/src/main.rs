//!
//! kvtour: walks through strings, lists, sets, hashes and a pipeline on the
//! Redis server at localhost:6379.
//!

#![warn(clippy::pedantic)]

use clap::Parser;
use kvtour_lib::{tour, Config};
use std::io;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "otel")]
use opentelemetry::trace::TracerProvider as _;
#[cfg(feature = "otel")]
// OpenTelemetry-specific types (such as `OpenTelemetryLayer`)
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// The tour always targets the default server; only `--help` and `--version` are accepted.
#[derive(Parser, Debug)]
#[command(
    name = "kvtour",
    version,
    author,
    about = "Exercise the basic Redis data types against localhost:6379"
)]
struct CliCommand {}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    CliCommand::parse();
    set_up_logging()?;

    let config = Config::default();
    let summary = tour::run(&config, &mut io::stdout().lock());

    // Failures have already been printed; the exit status stays 0 either way.
    info!(
        aborted = summary.is_aborted(),
        failed_groups = summary.failures().len(),
        "done"
    );

    Ok(())
}

/// Logs go to stderr so they never mix with the tour output. `RUST_LOG`
/// overrides the default `warn` level.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

#[cfg(not(feature = "otel"))]
fn set_up_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .try_init()
}

#[cfg(feature = "otel")]
fn set_up_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .build()?;

    let provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
        .with_simple_exporter(exporter)
        .build();
    let tracer = provider.tracer("kvtour");
    opentelemetry::global::set_tracer_provider(provider);

    // Create a tracing layer with the configured tracer
    let opentelemetry = tracing_opentelemetry::layer().with_tracer(tracer);

    // Use the tracing subscriber `Registry`, or any other subscriber
    // that impls `LookupSpan`
    tracing_subscriber::registry()
        .with(opentelemetry)
        .with(env_filter())
        .with(fmt::Layer::default().with_writer(io::stderr))
        .try_init()?;

    Ok(())
}
