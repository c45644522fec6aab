//! Subscriber setup wiring `tracing` into the file exporter.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::file_writer::RotationPolicy;
use super::tracer;
use crate::infrastructure::paths::get_data_dir;
use crate::Config;

const SERVICE_NAME: &str = "homescout";
pub const TRACE_FILE_NAME: &str = "homescout-traces.json";

/// Installs the global subscriber exporting spans to the trace file.
///
/// The filter comes from `config.trace_level`, defaulting to `"info"`. If the
/// data directory cannot be resolved or created, tracing stays disabled. Only
/// the first successful call takes effect.
///
/// # Example
///
/// ```no_run
/// use homescout::observability::init_tracing;
/// use homescout::Config;
///
/// let config = Config {
///     trace_level: Some("homescout=debug".to_string()),
///     ..Config::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or("info");

    let Ok(data_dir) = get_data_dir() else {
        return;
    };
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![
        KeyValue::new("service.name", SERVICE_NAME),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let provider = tracer::create_tracer_provider(
        data_dir.join(TRACE_FILE_NAME),
        RotationPolicy::default(),
        resource,
    );
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(otel_layer)
        .try_init();
}
