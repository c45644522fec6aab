//! API worker executing backend requests off the event loop.
//!
//! The runtime hands each [`ApiRequest`] to a spawned task running
//! [`ApiWorker::handle_message`]. The worker never mutates application state; it
//! only turns a request into an [`ApiResponse`] that is posted back to the event
//! loop. Failures become [`ApiResponse::Failed`] so that nothing but data crosses
//! the task boundary.

use std::sync::Arc;

use tracing::Instrument;

use crate::api::Backend;
use crate::domain::error::Result;
use crate::worker::{ApiFailure, ApiRequest, ApiResponse, RequestKind, TraceContext};

/// Executes requests against a shared [`Backend`].
///
/// Cloning is cheap; every clone shares the same backend.
#[derive(Debug)]
pub struct ApiWorker<B> {
    backend: Arc<B>,
}

impl<B> Clone for ApiWorker<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: Backend> ApiWorker<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Helper for turning a backend result into a response with consistent logging.
    fn complete<T, F>(kind: RequestKind, result: Result<T>, on_success: F) -> ApiResponse
    where
        F: FnOnce(T) -> ApiResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(request = ?kind, "backend request succeeded");
                on_success(value)
            }
            Err(e) => {
                if e.is_request_failure() {
                    tracing::debug!(request = ?kind, error = %e, "backend request failed");
                } else {
                    tracing::warn!(request = ?kind, error = %e, "backend request could not be issued");
                }
                ApiResponse::Failed {
                    failure: ApiFailure::from(&e),
                    kind,
                }
            }
        }
    }

    /// Rebuilds the OpenTelemetry parent context carried by a request.
    fn parent_context(trace_context: &TraceContext) -> Option<opentelemetry::Context> {
        use opentelemetry::trace::{
            SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
        };

        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        Some(opentelemetry::Context::current().with_remote_span_context(span_context))
    }

    /// Executes one request and returns its completion.
    ///
    /// The worker span is parented to the span that issued the request when the
    /// request carries a trace context.
    pub async fn handle_message(&self, request: ApiRequest) -> ApiResponse {
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let kind = request.kind();
        let span = tracing::debug_span!("worker_handle_message", request = ?kind);
        if let Some(parent) = request.trace_context().and_then(Self::parent_context) {
            span.set_parent(parent);
        }

        self.dispatch(request, kind).instrument(span).await
    }

    async fn dispatch(&self, request: ApiRequest, kind: RequestKind) -> ApiResponse {
        match request {
            ApiRequest::LoadProperties { .. } => {
                let result = self.backend.list_properties().await;
                Self::complete(kind, result, |properties| {
                    tracing::debug!(count = properties.len(), "properties fetched");
                    ApiResponse::PropertiesLoaded { properties }
                })
            }

            ApiRequest::LoadFavorites { .. } => {
                let result = self.backend.list_favorites().await;
                Self::complete(kind, result, |properties| ApiResponse::FavoritesLoaded {
                    properties,
                })
            }

            ApiRequest::ToggleFavorite { id, .. } => {
                let result = self.backend.toggle_favorite(&id).await;
                Self::complete(kind, result, |favorited| ApiResponse::FavoriteToggled {
                    id,
                    favorited,
                })
            }

            ApiRequest::LoadSettings { .. } => {
                let result = self.backend.get_settings().await;
                Self::complete(kind, result, |settings| ApiResponse::SettingsLoaded {
                    settings,
                })
            }

            ApiRequest::SaveSettings { settings, .. } => {
                let result = self.backend.save_settings(&settings).await;
                Self::complete(kind, result, |saved| ApiResponse::SettingsSaved {
                    settings: saved.settings,
                    message: saved.message,
                })
            }

            ApiRequest::ManualRefresh { .. } => {
                let result = self.backend.manual_scrape().await;
                Self::complete(kind, result, |()| ApiResponse::ManualRefreshCompleted)
            }
        }
    }
}
