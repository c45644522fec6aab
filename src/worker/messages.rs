//! Request/response protocol between the event loop and the API worker.
//!
//! This module defines the backend requests the application issues and the
//! completions the worker posts back. It also implements tracing context
//! propagation so that spans created by a spawned request are linked to the span
//! that issued it.

use crate::domain::error::HomescoutError;
use crate::domain::{Property, Settings};
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-task span propagation.
///
/// Captures the current trace and span IDs from OpenTelemetry to maintain
/// trace continuity when a request is executed on a spawned task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across tasks.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Returns `None` if the current span context is invalid or not sampled,
    /// which is always the case when no OpenTelemetry layer is installed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use homescout::worker::TraceContext;
    ///
    /// if let Some(ctx) = TraceContext::from_current() {
    ///     println!("Trace ID: {}", ctx.trace_id);
    /// }
    /// ```
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::Span::current();

        let otel_context = span.context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            tracing::trace!("span context is not valid");
            return None;
        }

        let trace_id = format!("{:032x}", span_context.trace_id());
        let parent_span_id = format!("{:016x}", span_context.span_id());

        tracing::trace!(%trace_id, %parent_span_id, "capturing trace context");

        Some(Self {
            trace_id,
            parent_span_id,
        })
    }
}

/// Generates builder methods for `ApiRequest` variants.
///
/// Each builder attaches the trace context of the calling span.
macro_rules! api_request_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl ApiRequest {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " request with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

api_request_builders! {
    load_properties(LoadProperties {}),
    load_favorites(LoadFavorites {}),
    toggle_favorite(ToggleFavorite { id: String }),
    load_settings(LoadSettings {}),
    save_settings(SaveSettings { settings: Settings }),
    manual_refresh(ManualRefresh {}),
}

/// Backend requests issued by the application layer.
///
/// Every variant carries an optional trace context linking the worker's span to
/// the span that issued the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiRequest {
    /// `GET /properties`
    LoadProperties {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// `GET /properties/favorites`
    LoadFavorites {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// `PUT /properties/favorite/{id}`
    ToggleFavorite {
        /// Listing to flip.
        id: String,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// `GET /settings`
    LoadSettings {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// `PUT /settings`
    SaveSettings {
        /// Full settings object to persist.
        settings: Settings,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// `POST /manual-scrape`
    ManualRefresh {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl ApiRequest {
    /// Identifies the request without its payload.
    #[must_use]
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::LoadProperties { .. } => RequestKind::LoadProperties,
            Self::LoadFavorites { .. } => RequestKind::LoadFavorites,
            Self::ToggleFavorite { id, .. } => RequestKind::ToggleFavorite { id: id.clone() },
            Self::LoadSettings { .. } => RequestKind::LoadSettings,
            Self::SaveSettings { .. } => RequestKind::SaveSettings,
            Self::ManualRefresh { .. } => RequestKind::ManualRefresh,
        }
    }

    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::LoadProperties { trace_context }
            | Self::LoadFavorites { trace_context }
            | Self::ToggleFavorite { trace_context, .. }
            | Self::LoadSettings { trace_context }
            | Self::SaveSettings { trace_context, .. }
            | Self::ManualRefresh { trace_context } => trace_context.as_ref(),
        }
    }
}

/// Which request a failure belongs to.
///
/// `ToggleFavorite` keeps the item id so the in-flight bookkeeping can be settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestKind {
    LoadProperties,
    LoadFavorites,
    ToggleFavorite { id: String },
    LoadSettings,
    SaveSettings,
    ManualRefresh,
}

/// Failure details carried back from the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFailure {
    /// HTTP status, when the backend answered at all.
    pub status: Option<u16>,

    /// The backend's `{"error": ...}` string, verbatim.
    pub message: Option<String>,

    /// Full error text for logs.
    pub detail: String,
}

impl ApiFailure {
    /// Returns the backend's message, or `fallback` when there is none.
    #[must_use]
    pub fn user_text(&self, fallback: &str) -> String {
        self.message.clone().unwrap_or_else(|| fallback.to_string())
    }
}

impl From<&HomescoutError> for ApiFailure {
    fn from(error: &HomescoutError) -> Self {
        let status = match error {
            HomescoutError::Api { status, .. } => Some(*status),
            _ => None,
        };
        Self {
            status,
            message: error.backend_message().map(str::to_string),
            detail: error.to_string(),
        }
    }
}

/// Completions posted by the worker back to the event loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ApiResponse {
    PropertiesLoaded {
        properties: Vec<Property>,
    },

    FavoritesLoaded {
        properties: Vec<Property>,
    },

    /// The backend's authoritative flag after a toggle.
    FavoriteToggled {
        id: String,
        favorited: bool,
    },

    SettingsLoaded {
        settings: Settings,
    },

    /// Settings as normalized by the backend, plus its confirmation text.
    SettingsSaved {
        settings: Settings,
        message: Option<String>,
    },

    ManualRefreshCompleted,

    /// A request failed.
    Failed {
        kind: RequestKind,
        failure: ApiFailure,
    },
}
