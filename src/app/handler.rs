//! Event handling and state transition logic.
//!
//! This module implements the orchestrator's single mutation entry point. It
//! processes user intents, debounce timer firings, and backend completions,
//! translating them into state changes and action sequences.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the caller, the debounce timer, or the API worker
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations occur via the engine, favorite, and settings components
//! 4. Actions are collected and returned for execution
//!
//! # Event Types
//!
//! - **Lifecycle**: `Init`, `Shutdown`
//! - **Filtering**: `SetFilter`, `ClearFilters`, `RecomputeDue`
//! - **Remote intents**: `ReloadProperties`, `ToggleFavorite`, `SaveSettings`, `ManualRefresh`
//! - **Completions**: `Api` with a typed [`ApiResponse`]
//!
//! # Example
//!
//! ```
//! use homescout::app::{handle_event, AppState, ClearPolicy, Event, FilterEngine, SettingsStore};
//! use std::time::Duration;
//!
//! let engine = FilterEngine::new(Duration::from_millis(300), ClearPolicy::Immediate);
//! let mut state = AppState::new(engine, SettingsStore::new(None));
//! let (_, actions) = handle_event(&mut state, &Event::Init)?;
//! assert_eq!(actions.len(), 3);
//! # Ok::<(), homescout::HomescoutError>(())
//! ```

use super::engine::ClearOutcome;
use crate::app::actions::Notice;
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::Settings;
use crate::filter::{parse_bound_value, PredicateKey};
use crate::worker::{ApiFailure, ApiRequest, ApiResponse, RequestKind};

const LOAD_PROPERTIES_FAILED: &str = "Failed to load properties. Please try again.";
const TOGGLE_FAVORITE_FAILED: &str = "Failed to update favorite. Please try again.";
const MANUAL_REFRESH_FAILED: &str = "Manual refresh failed. Please try again.";
const MANUAL_REFRESH_COMPLETED: &str = "Manual refresh completed";
const SETTINGS_SAVED: &str = "Settings saved";

/// Events triggered by user intent, timers, or backend completions.
///
/// Each event represents a discrete occurrence that may cause state changes
/// and action emissions. The runtime feeds them in one at a time, so state
/// transitions are deterministic.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Loads properties, favorites, and settings.
    Init,

    /// Reloads properties. Ignored while a load is already in flight.
    ReloadProperties,

    /// Sets or unsets one predicate from raw user text.
    ///
    /// Empty text unsets. Anything else must parse as a finite number.
    SetFilter {
        /// Which predicate to update.
        key: PredicateKey,
        /// User input for the bound.
        raw: String,
    },

    /// Unsets every predicate.
    ClearFilters,

    /// Asks the backend to flip the favorite flag of a listing.
    ToggleFavorite {
        /// Listing id.
        id: String,
    },

    /// Validates and sends a full settings object.
    SaveSettings {
        /// The settings to persist.
        settings: Settings,
    },

    /// Triggers a scrape, then reloads properties and favorites.
    ManualRefresh,

    /// A debounce timer elapsed.
    RecomputeDue {
        /// Token the timer was armed with.
        token: u64,
    },

    /// Wraps a completion from the API worker.
    Api(ApiResponse),

    /// Tears down pending work.
    Shutdown,
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// The boolean reports whether anything a caller displays changed (views,
/// predicates, flags, settings, or the error banner).
///
/// # Errors
///
/// Returns [`HomescoutError::Validation`](crate::HomescoutError::Validation) for
/// malformed filter input or non-positive settings. State is untouched in that
/// case. Backend failures are never returned as errors; they arrive as
/// [`ApiResponse::Failed`] and are reported through [`Action::Notify`] or logged.
///
/// # Example
///
/// ```
/// use homescout::app::{handle_event, Action, AppState, ClearPolicy, Event, FilterEngine, SettingsStore};
/// use std::time::Duration;
///
/// let engine = FilterEngine::new(Duration::from_millis(300), ClearPolicy::Immediate);
/// let mut state = AppState::new(engine, SettingsStore::new(None));
/// let event = Event::SetFilter { key: "min_price".parse()?, raw: "200000".into() };
/// let (_, actions) = handle_event(&mut state, &event)?;
/// assert!(matches!(actions[..], [Action::ScheduleRecompute { .. }]));
/// # Ok::<(), homescout::HomescoutError>(())
/// ```
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::Init => {
            tracing::debug!("initializing views");
            let mut actions = vec![];
            if begin_property_load(state) {
                actions.push(Action::Request(ApiRequest::load_properties()));
            }
            actions.push(Action::Request(ApiRequest::load_favorites()));
            actions.push(Action::Request(ApiRequest::load_settings()));
            Ok((true, actions))
        }
        Event::ReloadProperties => {
            if !begin_property_load(state) {
                tracing::debug!("property load already in flight; ignoring reload");
                return Ok((false, vec![]));
            }
            Ok((true, vec![Action::Request(ApiRequest::load_properties())]))
        }
        Event::SetFilter { key, raw } => {
            let value = parse_bound_value(raw)?;
            match state.engine.set_predicate(*key, value)? {
                Some(scheduled) => Ok((
                    true,
                    vec![Action::ScheduleRecompute {
                        token: scheduled.token,
                        delay: scheduled.delay,
                    }],
                )),
                None => Ok((false, vec![])),
            }
        }
        Event::ClearFilters => match state.engine.clear_predicates() {
            ClearOutcome::Recomputed { cancelled } => {
                tracing::debug!(cancelled, "filters cleared immediately");
                Ok((true, vec![Action::CancelRecompute]))
            }
            ClearOutcome::Scheduled(scheduled) => Ok((
                true,
                vec![Action::ScheduleRecompute {
                    token: scheduled.token,
                    delay: scheduled.delay,
                }],
            )),
            ClearOutcome::Unchanged => Ok((false, vec![])),
        },
        Event::ToggleFavorite { id } => {
            state.favorites.request_toggle(id);
            Ok((
                true,
                vec![Action::Request(ApiRequest::toggle_favorite(id.clone()))],
            ))
        }
        Event::SaveSettings { settings } => {
            state.settings.prepare_save(settings)?;
            tracing::debug!(?settings, "saving settings");
            Ok((false, vec![Action::Request(ApiRequest::save_settings(*settings))]))
        }
        Event::ManualRefresh => {
            if state.refreshing {
                tracing::debug!("manual refresh already in flight; ignoring");
                return Ok((false, vec![]));
            }
            state.refreshing = true;
            Ok((true, vec![Action::Request(ApiRequest::manual_refresh())]))
        }
        Event::RecomputeDue { token } => Ok((state.engine.fire(*token), vec![])),
        Event::Api(response) => Ok(handle_api_response(state, response)),
        Event::Shutdown => {
            let cancelled = state.engine.cancel_pending();
            tracing::debug!(cancelled, "shutting down");
            Ok((false, vec![Action::CancelRecompute]))
        }
    }
}

/// Marks a property load as in flight. Returns `false` if one already is.
fn begin_property_load(state: &mut AppState) -> bool {
    if state.loading {
        return false;
    }
    state.loading = true;
    state.error = None;
    true
}

fn handle_api_response(state: &mut AppState, response: &ApiResponse) -> (bool, Vec<Action>) {
    match response {
        ApiResponse::PropertiesLoaded { properties } => {
            state.loading = false;
            state.error = None;
            state.engine.load(properties.clone());
            (true, vec![])
        }
        ApiResponse::FavoritesLoaded { properties } => {
            state.favorites.replace_favorites(properties.clone());
            (true, vec![])
        }
        ApiResponse::FavoriteToggled { id, favorited } => {
            state
                .favorites
                .apply_toggled(&mut state.engine, id, *favorited);
            (true, vec![Action::Request(ApiRequest::load_favorites())])
        }
        ApiResponse::SettingsLoaded { settings } => {
            state.settings.apply_loaded(*settings);
            (true, vec![])
        }
        ApiResponse::SettingsSaved { settings, message } => {
            state.settings.apply_saved(*settings);
            let text = message.as_deref().unwrap_or(SETTINGS_SAVED);
            (true, vec![Action::Notify(Notice::info(text))])
        }
        ApiResponse::ManualRefreshCompleted => {
            state.refreshing = false;
            let mut actions = vec![Action::Notify(Notice::info(MANUAL_REFRESH_COMPLETED))];
            // A load already in flight returns the freshly scraped listings.
            if begin_property_load(state) {
                actions.push(Action::Request(ApiRequest::load_properties()));
            }
            actions.push(Action::Request(ApiRequest::load_favorites()));
            (true, actions)
        }
        ApiResponse::Failed { kind, failure } => handle_failure(state, kind, failure),
    }
}

fn handle_failure(state: &mut AppState, kind: &RequestKind, failure: &ApiFailure) -> (bool, Vec<Action>) {
    match kind {
        RequestKind::LoadProperties => {
            tracing::warn!(detail = %failure.detail, "failed to load properties");
            let text = failure.user_text(LOAD_PROPERTIES_FAILED);
            state.loading = false;
            state.error = Some(text.clone());
            (true, vec![Action::Notify(Notice::error(text))])
        }
        RequestKind::LoadFavorites => {
            tracing::warn!(detail = %failure.detail, "failed to load favorites");
            (false, vec![])
        }
        RequestKind::ToggleFavorite { id } => {
            tracing::warn!(id = %id, detail = %failure.detail, "failed to toggle favorite");
            state.favorites.toggle_failed(id);
            (
                true,
                vec![Action::Notify(Notice::error(
                    failure.user_text(TOGGLE_FAVORITE_FAILED),
                ))],
            )
        }
        RequestKind::LoadSettings => {
            let restored = state.settings.apply_load_failure(&failure.detail);
            (restored, vec![])
        }
        RequestKind::SaveSettings => {
            tracing::warn!(detail = %failure.detail, "failed to save settings");
            let reason = failure.message.as_deref().unwrap_or(&failure.detail);
            (
                false,
                vec![Action::Notify(Notice::error(format!(
                    "Failed to save settings: {reason}"
                )))],
            )
        }
        RequestKind::ManualRefresh => {
            tracing::warn!(detail = %failure.detail, "manual refresh failed");
            state.refreshing = false;
            (
                true,
                vec![Action::Notify(Notice::error(
                    failure.user_text(MANUAL_REFRESH_FAILED),
                ))],
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::engine::{ClearPolicy, FilterEngine};
    use crate::app::settings::SettingsStore;
    use crate::app::NoticeLevel;
    use crate::domain::{Attribute, HomescoutError, Property};
    use std::time::Duration;

    fn state(policy: ClearPolicy) -> AppState {
        let engine = FilterEngine::new(Duration::from_millis(300), policy);
        AppState::new(engine, SettingsStore::new(None))
    }

    fn priced(id: &str, price: f64) -> Property {
        let mut property = Property::new(id);
        property.list_price = Some(price);
        property
    }

    fn loaded(policy: ClearPolicy) -> AppState {
        let mut state = state(policy);
        handle_event(&mut state, &Event::ReloadProperties).expect("reload");
        let response = ApiResponse::PropertiesLoaded {
            properties: vec![
                priced("a", 100_000.0),
                priced("b", 250_000.0),
                priced("c", 400_000.0),
            ],
        };
        handle_event(&mut state, &Event::Api(response)).expect("loaded");
        state
    }

    fn failed(kind: RequestKind, error: &HomescoutError) -> Event {
        Event::Api(ApiResponse::Failed {
            kind,
            failure: ApiFailure::from(error),
        })
    }

    fn scheduled_token(actions: &[Action]) -> u64 {
        match actions {
            [Action::ScheduleRecompute { token, .. }] => *token,
            other => panic!("expected one ScheduleRecompute, got {other:?}"),
        }
    }

    fn notices(actions: &[Action]) -> Vec<&Notice> {
        actions
            .iter()
            .filter_map(|action| match action {
                Action::Notify(notice) => Some(notice),
                _ => None,
            })
            .collect()
    }

    fn ids(items: &[Property]) -> Vec<&str> {
        items.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn init_requests_every_view() {
        let mut state = state(ClearPolicy::Immediate);
        let (_, actions) = handle_event(&mut state, &Event::Init).expect("init");
        assert_eq!(actions.len(), 3);
        assert!(state.is_loading());
    }

    #[test]
    fn duplicate_reload_is_ignored() {
        let mut state = state(ClearPolicy::Immediate);
        let (_, first) = handle_event(&mut state, &Event::ReloadProperties).expect("reload");
        let (changed, second) = handle_event(&mut state, &Event::ReloadProperties).expect("reload");
        assert_eq!(first.len(), 1);
        assert!(!changed);
        assert!(second.is_empty());
    }

    #[test]
    fn filter_change_commits_only_when_due() {
        let mut state = loaded(ClearPolicy::Immediate);
        let event = Event::SetFilter {
            key: PredicateKey::min(Attribute::ListPrice),
            raw: "200000".into(),
        };
        let (_, actions) = handle_event(&mut state, &event).expect("set");
        let token = scheduled_token(&actions);
        assert_eq!(state.filtered().len(), 3);

        let (changed, _) = handle_event(&mut state, &Event::RecomputeDue { token }).expect("due");
        assert!(changed);
        assert_eq!(ids(state.filtered()), vec!["b", "c"]);
    }

    #[test]
    fn malformed_filter_is_rejected_without_state_change() {
        let mut state = loaded(ClearPolicy::Immediate);
        let event = Event::SetFilter {
            key: PredicateKey::max(Attribute::Beds),
            raw: "three".into(),
        };
        let err = handle_event(&mut state, &event).expect_err("rejected");
        assert!(matches!(err, HomescoutError::Validation(_)));
        assert!(state.filters().is_empty());
        assert_eq!(state.engine().pending_token(), None);
    }

    #[test]
    fn empty_filter_text_unsets() {
        let mut state = loaded(ClearPolicy::Immediate);
        let key = PredicateKey::min(Attribute::ListPrice);
        handle_event(&mut state, &Event::SetFilter { key, raw: "150000".into() }).expect("set");
        let (_, actions) =
            handle_event(&mut state, &Event::SetFilter { key, raw: "  ".into() }).expect("unset");
        handle_event(&mut state, &Event::RecomputeDue { token: scheduled_token(&actions) })
            .expect("due");
        assert!(state.filters().is_empty());
        assert_eq!(state.filtered(), state.all());
    }

    #[test]
    fn immediate_clear_restores_all_and_cancels_timer() {
        let mut state = loaded(ClearPolicy::Immediate);
        let event = Event::SetFilter {
            key: PredicateKey::max(Attribute::ListPrice),
            raw: "300000".into(),
        };
        let (_, actions) = handle_event(&mut state, &event).expect("set");
        let token = scheduled_token(&actions);

        let (_, actions) = handle_event(&mut state, &Event::ClearFilters).expect("clear");
        assert_eq!(actions, vec![Action::CancelRecompute]);
        assert_eq!(ids(state.filtered()), vec!["a", "b", "c"]);

        let (changed, _) = handle_event(&mut state, &Event::RecomputeDue { token }).expect("due");
        assert!(!changed);
    }

    #[test]
    fn favorite_toggle_applies_flag_and_reloads_favorites() {
        let mut state = loaded(ClearPolicy::Immediate);
        handle_event(&mut state, &Event::ToggleFavorite { id: "b".into() }).expect("toggle");
        assert!(state.is_favorite_pending("b"));

        let response = ApiResponse::FavoriteToggled {
            id: "b".into(),
            favorited: true,
        };
        let (_, actions) = handle_event(&mut state, &Event::Api(response)).expect("toggled");
        assert!(matches!(
            actions[..],
            [Action::Request(ApiRequest::LoadFavorites { .. })]
        ));
        assert!(state.property("b").is_some_and(|p| p.favorited));
        assert!(state.filtered().iter().any(|p| p.id == "b" && p.favorited));
        assert!(!state.is_favorite_pending("b"));
    }

    #[test]
    fn failed_toggle_surfaces_backend_text() {
        let mut state = loaded(ClearPolicy::Immediate);
        handle_event(&mut state, &Event::ToggleFavorite { id: "zz".into() }).expect("toggle");
        let error = HomescoutError::Api {
            status: 404,
            message: Some("Property not found".into()),
        };
        let (_, actions) =
            handle_event(&mut state, &failed(RequestKind::ToggleFavorite { id: "zz".into() }, &error))
                .expect("failed");
        assert_eq!(notices(&actions), vec![&Notice::error("Property not found")]);
        assert!(!state.is_favorite_pending("zz"));
        assert!(state.all().iter().all(|p| !p.favorited));
    }

    #[test]
    fn failed_property_load_sets_banner_until_next_success() {
        let mut state = state(ClearPolicy::Immediate);
        handle_event(&mut state, &Event::ReloadProperties).expect("reload");
        let error = HomescoutError::Network("connection refused".into());
        let (_, actions) =
            handle_event(&mut state, &failed(RequestKind::LoadProperties, &error)).expect("failed");

        assert_eq!(state.error(), Some(LOAD_PROPERTIES_FAILED));
        assert_eq!(notices(&actions)[0].level, NoticeLevel::Error);
        assert!(!state.is_loading());

        handle_event(&mut state, &Event::ReloadProperties).expect("reload");
        assert_eq!(state.error(), None);
    }

    #[test]
    fn invalid_settings_never_reach_the_backend() {
        let mut state = state(ClearPolicy::Immediate);
        let settings = Settings {
            update_interval_hours: 0,
            ..Settings::default()
        };
        let result = handle_event(&mut state, &Event::SaveSettings { settings });
        assert!(matches!(result, Err(HomescoutError::Validation(_))));
    }

    #[test]
    fn settings_save_failure_prefixes_reason() {
        let mut state = state(ClearPolicy::Immediate);
        let api = HomescoutError::Api {
            status: 400,
            message: Some("Update interval must be between 1 and 24 hours".into()),
        };
        let (_, actions) =
            handle_event(&mut state, &failed(RequestKind::SaveSettings, &api)).expect("failed");
        assert_eq!(
            notices(&actions)[0].text,
            "Failed to save settings: Update interval must be between 1 and 24 hours"
        );

        let transport = HomescoutError::Network("timed out".into());
        let (_, actions) =
            handle_event(&mut state, &failed(RequestKind::SaveSettings, &transport)).expect("failed");
        assert_eq!(
            notices(&actions)[0].text,
            "Failed to save settings: Network error: timed out"
        );
        assert_eq!(state.settings(), Settings::default());
    }

    #[test]
    fn saved_settings_replace_copy_and_surface_message() {
        let mut state = state(ClearPolicy::Immediate);
        let settings = Settings {
            search_radius_miles: 35,
            ..Settings::default()
        };
        let response = ApiResponse::SettingsSaved {
            settings,
            message: Some("Settings updated successfully.".into()),
        };
        let (_, actions) = handle_event(&mut state, &Event::Api(response)).expect("saved");
        assert_eq!(state.settings(), settings);
        assert_eq!(notices(&actions), vec![&Notice::info("Settings updated successfully.")]);
    }

    #[test]
    fn manual_refresh_reloads_on_success() {
        let mut state = state(ClearPolicy::Immediate);
        handle_event(&mut state, &Event::ManualRefresh).expect("refresh");
        assert!(state.is_refreshing());
        let (changed, ignored) = handle_event(&mut state, &Event::ManualRefresh).expect("refresh");
        assert!(!changed && ignored.is_empty());

        let (_, actions) =
            handle_event(&mut state, &Event::Api(ApiResponse::ManualRefreshCompleted)).expect("done");
        assert!(!state.is_refreshing());
        assert_eq!(notices(&actions), vec![&Notice::info(MANUAL_REFRESH_COMPLETED)]);
        assert_eq!(actions.len(), 3);
        assert!(state.is_loading());
    }

    #[test]
    fn refresh_completion_joins_an_inflight_load() {
        let is_load = |action: &Action| {
            matches!(action, Action::Request(request) if request.kind() == RequestKind::LoadProperties)
        };
        let mut state = state(ClearPolicy::Immediate);

        let (_, reload) = handle_event(&mut state, &Event::ReloadProperties).expect("reload");
        assert_eq!(reload.iter().filter(|a| is_load(a)).count(), 1);
        handle_event(&mut state, &Event::ManualRefresh).expect("refresh");

        let (_, actions) =
            handle_event(&mut state, &Event::Api(ApiResponse::ManualRefreshCompleted)).expect("done");
        assert!(!actions.iter().any(is_load));
        assert!(actions.iter().any(|a| {
            matches!(a, Action::Request(request) if request.kind() == RequestKind::LoadFavorites)
        }));
        assert!(state.is_loading());

        handle_event(
            &mut state,
            &Event::Api(ApiResponse::PropertiesLoaded {
                properties: vec![priced("a", 1.0)],
            }),
        )
        .expect("loaded");
        assert!(!state.is_loading());
        let (_, again) = handle_event(&mut state, &Event::ReloadProperties).expect("reload");
        assert_eq!(again.iter().filter(|a| is_load(a)).count(), 1);
    }

    #[test]
    fn favorites_load_failure_is_log_only() {
        let mut state = state(ClearPolicy::Immediate);
        let error = HomescoutError::Network("reset".into());
        let (changed, actions) =
            handle_event(&mut state, &failed(RequestKind::LoadFavorites, &error)).expect("failed");
        assert!(!changed);
        assert!(actions.is_empty());
    }
}
