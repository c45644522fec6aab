//! OpenTelemetry tracer provider exporting spans to a local file.

use std::path::PathBuf;

use futures_util::future::BoxFuture;
use opentelemetry::trace::TraceError;
use opentelemetry::Key;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::{Config, TracerProvider};

use super::file_writer::{RotatingFileWriter, RotationPolicy};
use super::span_formatter::SpanLineFormatter;

const SERVICE_NAME_KEY: &str = "service.name";

/// Writes each exported span as one JSON line.
struct FileSpanExporter {
    writer: RotatingFileWriter,
    formatter: SpanLineFormatter,
    is_shutdown: bool,
}

impl FileSpanExporter {
    fn new(file_path: PathBuf, policy: RotationPolicy, resource: &Resource) -> Self {
        Self {
            writer: RotatingFileWriter::new(file_path, policy),
            formatter: SpanLineFormatter::new(service_name(resource)),
            is_shutdown: false,
        }
    }

    fn write_batch(&self, batch: &[SpanData]) -> ExportResult {
        for span in batch {
            let line = self.formatter.format(span).to_string();
            self.writer
                .write_line(&line)
                .map_err(|e| TraceError::from(e.to_string()))?;
        }
        Ok(())
    }
}

impl SpanExporter for FileSpanExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = if self.is_shutdown {
            Err(TraceError::from("exporter is shut down"))
        } else {
            self.write_batch(&batch)
        };
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown = true;
    }

    fn set_resource(&mut self, resource: &Resource) {
        self.formatter.set_service(service_name(resource));
    }
}

impl std::fmt::Debug for FileSpanExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSpanExporter")
            .field("writer", &self.writer)
            .field("service", &self.formatter.service())
            .field("is_shutdown", &self.is_shutdown)
            .finish()
    }
}

fn service_name(resource: &Resource) -> String {
    resource
        .get(Key::new(SERVICE_NAME_KEY))
        .map_or_else(|| "unknown_service".to_string(), |value| value.to_string())
}

/// Builds a provider whose spans are written synchronously as they end.
pub fn create_tracer_provider(
    file_path: PathBuf,
    policy: RotationPolicy,
    resource: Resource,
) -> TracerProvider {
    let exporter = FileSpanExporter::new(file_path, policy, &resource);

    TracerProvider::builder()
        .with_config(Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}
