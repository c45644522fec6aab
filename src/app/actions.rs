//! Actions representing side effects to be executed by the runtime.
//!
//! This module defines the [`Action`] type, the imperative commands produced by
//! the event handler. Actions bridge pure state transitions and effectful
//! operations: backend requests, debounce timers, and user-facing notices.
//!
//! # Architecture
//!
//! The event handler returns a `Vec<Action>` after processing each event, allowing
//! multiple side effects to be queued atomically. The runtime executes them in
//! order.
//!
//! # Example
//!
//! ```
//! use homescout::app::Action;
//! use homescout::worker::ApiRequest;
//!
//! let actions = vec![
//!     Action::Request(ApiRequest::load_properties()),
//!     Action::Request(ApiRequest::load_favorites()),
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use std::fmt;
use std::time::Duration;

use crate::worker::ApiRequest;

/// Commands representing side effects to be executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Executes a backend request off the event loop.
    ///
    /// Its completion comes back as an [`Event::Api`](crate::app::Event::Api).
    Request(ApiRequest),

    /// Arms the single debounce timer, replacing any armed one.
    ///
    /// When it elapses the runtime delivers
    /// [`Event::RecomputeDue`](crate::app::Event::RecomputeDue) with `token`.
    ScheduleRecompute {
        /// Identifies the pending recompute this timer belongs to.
        token: u64,
        /// Debounce delay.
        delay: Duration,
    },

    /// Disarms the debounce timer.
    CancelRecompute,

    /// Surfaces a message to the user.
    Notify(Notice),
}

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// User-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NoticeLevel::Info => write!(f, "{}", self.text),
            NoticeLevel::Error => write!(f, "error: {}", self.text),
        }
    }
}
