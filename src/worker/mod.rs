//! Background execution of backend requests.
//!
//! This module implements the worker side of the event loop: requests are
//! executed on spawned tasks so the loop never blocks on the network, and each
//! completion is posted back as data. Tracing context travels with every request.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Worker implementation and request execution

pub mod handler;
pub mod messages;

pub use handler::ApiWorker;
pub use messages::{ApiFailure, ApiRequest, ApiResponse, RequestKind, TraceContext};
