//! Compact JSON span records.
//!
//! Each finished span becomes one self-contained JSON object, written as a
//! single line so trace files can be processed with line-oriented tools:
//!
//! ```json
//! {"service":"homescout","trace_id":"4bf9…","span_id":"00f0…","parent_span_id":null,
//!  "name":"backend_request","start_unix_nanos":1729000000000000000,"duration_micros":5120,
//!  "attributes":{"request":"LoadProperties"},"events":[],"status":"unset"}
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use opentelemetry::trace::{SpanId, Status};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::SpanData;
use serde_json::{json, Map, Value as JsonValue};

#[derive(Debug, Clone)]
pub struct SpanLineFormatter {
    service: String,
}

impl SpanLineFormatter {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn set_service(&mut self, service: impl Into<String>) {
        self.service = service.into();
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn format(&self, span: &SpanData) -> JsonValue {
        let parent = (span.parent_span_id != SpanId::INVALID)
            .then(|| format!("{:016x}", span.parent_span_id));

        let events: Vec<JsonValue> = span
            .events
            .iter()
            .map(|event| {
                json!({
                    "name": event.name,
                    "offset_micros": micros_between(span.start_time, event.timestamp),
                    "attributes": attribute_map(&event.attributes),
                })
            })
            .collect();

        json!({
            "service": self.service,
            "trace_id": format!("{:032x}", span.span_context.trace_id()),
            "span_id": format!("{:016x}", span.span_context.span_id()),
            "parent_span_id": parent,
            "name": span.name,
            "start_unix_nanos": unix_nanos(span.start_time),
            "duration_micros": micros_between(span.start_time, span.end_time),
            "attributes": attribute_map(&span.attributes),
            "events": events,
            "status": status_value(&span.status),
        })
    }
}

fn unix_nanos(at: SystemTime) -> u128 {
    at.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO).as_nanos()
}

fn micros_between(start: SystemTime, end: SystemTime) -> u128 {
    end.duration_since(start).unwrap_or(Duration::ZERO).as_micros()
}

/// Flattens key/value pairs into a JSON object; later duplicates win.
pub(super) fn attribute_map(attributes: &[KeyValue]) -> JsonValue {
    let map: Map<String, JsonValue> = attributes
        .iter()
        .map(|kv| (kv.key.to_string(), attribute_value(&kv.value)))
        .collect();
    JsonValue::Object(map)
}

pub(super) fn attribute_value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => json!(b),
        Value::I64(i) => json!(i),
        Value::F64(f) => json!(f),
        other => json!(other.to_string()),
    }
}

fn status_value(status: &Status) -> JsonValue {
    match status {
        Status::Unset => json!("unset"),
        Status::Ok => json!("ok"),
        Status::Error { description } => json!({ "error": description }),
    }
}
