//! Application layer coordinating state, events, and actions.
//!
//! This module is the client-side filtering and synchronization engine. It sits
//! between the runtime and the domain/worker layers and implements the
//! event-driven architecture every caller goes through.
//!
//! # Architecture
//!
//! ```text
//! User Intent → Events → Event Handler → State Mutations → Actions → Side Effects
//!                             ↑                                   ↓
//!                             └──── Completions / Timer Firings ───┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`engine`]: `all`/`filtered` views with debounced recomputation
//! - [`favorites`]: favorite flag synchronization and the `favorites` view
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`settings`]: backend-authoritative settings with a durable fallback
//! - [`state`]: Central application state container
//!
//! # Example
//!
//! ```
//! use homescout::app::{handle_event, AppState, ClearPolicy, Event, FilterEngine, SettingsStore};
//! use std::time::Duration;
//!
//! let engine = FilterEngine::new(Duration::from_millis(300), ClearPolicy::Immediate);
//! let mut state = AppState::new(engine, SettingsStore::new(None));
//! let (changed, _) = handle_event(&mut state, &Event::ClearFilters)?;
//! assert!(changed);
//! # Ok::<(), homescout::HomescoutError>(())
//! ```

pub mod actions;
pub mod engine;
pub mod favorites;
pub mod handler;
pub mod settings;
pub mod state;

pub use actions::{Action, Notice, NoticeLevel};
pub use engine::{ClearOutcome, ClearPolicy, FilterEngine, ScheduledRecompute};
pub use favorites::FavoriteSync;
pub use handler::{handle_event, Event};
pub use settings::{SettingsSource, SettingsStore};
pub use state::AppState;
