//! Cooperative event loop driving the application layer.
//!
//! [`Runtime`] is the glue between [`handle_event`] and the outside world. It
//! owns the [`AppState`] and executes the actions the handler returns:
//!
//! ```text
//! ┌──────────────────────────────┐        spawn        ┌─────────────────┐
//! │ Runtime (caller's task)      │ ──── ApiRequest ──▶ │ ApiWorker task  │
//! │  AppState + handle_event     │                     │  Backend call   │
//! │  debounce timer (one slot)   │ ◀── ApiResponse ─── │                 │
//! └──────────────────────────────┘      mpsc           └─────────────────┘
//! ```
//!
//! All state mutation happens on the task calling [`Runtime::dispatch`] and
//! [`Runtime::next_event`]. Network calls and the debounce timer are the only
//! suspension points; in-flight requests are never cancelled.

use std::pin::Pin;

use tokio::sync::mpsc;
use tokio::time::Sleep;

use crate::api::Backend;
use crate::app::{handle_event, Action, AppState, Event, Notice, NoticeLevel};
use crate::domain::error::Result;
use crate::worker::{ApiResponse, ApiWorker};

/// The armed debounce timer.
struct ArmedTimer {
    token: u64,
    sleep: Pin<Box<Sleep>>,
}

/// What woke [`Runtime::next_event`].
enum Wake {
    Completed(Option<ApiResponse>),
    TimerFired(u64),
}

pub struct Runtime<B> {
    state: AppState,
    worker: ApiWorker<B>,
    completions_tx: mpsc::UnboundedSender<ApiResponse>,
    completions_rx: mpsc::UnboundedReceiver<ApiResponse>,
    /// Requests spawned whose completion has not been received yet.
    in_flight: usize,
    timer: Option<ArmedTimer>,
    notices: Vec<Notice>,
}

impl<B: Backend + 'static> Runtime<B> {
    #[must_use]
    pub fn new(state: AppState, backend: B) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            state,
            worker: ApiWorker::new(backend),
            completions_tx,
            completions_rx,
            in_flight: 0,
            timer: None,
            notices: Vec::new(),
        }
    }

    /// Handles one event and executes the resulting actions.
    ///
    /// Returns whether anything a caller displays changed.
    ///
    /// # Errors
    ///
    /// Returns the handler's validation errors. No action is executed in that case.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime while a request must be spawned.
    pub fn dispatch(&mut self, event: &Event) -> Result<bool> {
        let (changed, actions) = handle_event(&mut self.state, event)?;
        tracing::debug!(action_count = actions.len(), changed, "event handled");
        for action in actions {
            self.execute(action);
        }
        Ok(changed)
    }

    fn execute(&mut self, action: Action) {
        match action {
            Action::Request(request) => {
                tracing::debug!(request = ?request.kind(), "spawning backend request");
                let worker = self.worker.clone();
                let completions = self.completions_tx.clone();
                self.in_flight += 1;
                tokio::spawn(async move {
                    let response = worker.handle_message(request).await;
                    if completions.send(response).is_err() {
                        tracing::debug!("runtime dropped before request completed");
                    }
                });
            }
            Action::ScheduleRecompute { token, delay } => {
                tracing::trace!(token, delay_ms = delay.as_millis(), "arming debounce timer");
                self.timer = Some(ArmedTimer {
                    token,
                    sleep: Box::pin(tokio::time::sleep(delay)),
                });
            }
            Action::CancelRecompute => {
                if let Some(timer) = self.timer.take() {
                    tracing::trace!(token = timer.token, "debounce timer cancelled");
                }
            }
            Action::Notify(notice) => {
                match notice.level {
                    NoticeLevel::Info => tracing::info!(text = %notice.text, "notice"),
                    NoticeLevel::Error => tracing::warn!(text = %notice.text, "notice"),
                }
                self.notices.push(notice);
            }
        }
    }

    /// Returns `true` while a request is in flight or the timer is armed.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.in_flight > 0 || self.timer.is_some()
    }

    /// Waits for the next request completion or timer firing.
    ///
    /// Returns `None` immediately when nothing is pending. The returned event has
    /// not been handled yet; pass it to [`dispatch`](Self::dispatch).
    pub async fn next_event(&mut self) -> Option<Event> {
        if !self.is_busy() {
            return None;
        }

        let listening = self.in_flight > 0;
        let completions = &mut self.completions_rx;
        let timer = self.timer.as_mut();

        let wake = tokio::select! {
            response = completions.recv(), if listening => Wake::Completed(response),
            token = async move {
                match timer {
                    Some(armed) => {
                        armed.sleep.as_mut().await;
                        armed.token
                    }
                    None => std::future::pending::<u64>().await,
                }
            } => Wake::TimerFired(token),
        };

        match wake {
            Wake::Completed(Some(response)) => {
                self.in_flight -= 1;
                Some(Event::Api(response))
            }
            Wake::Completed(None) => {
                tracing::warn!("completion channel closed");
                self.in_flight = 0;
                None
            }
            Wake::TimerFired(token) => {
                self.timer = None;
                Some(Event::RecomputeDue { token })
            }
        }
    }

    /// Drives completions and timer firings until nothing is pending.
    ///
    /// Returns whether any handled event changed displayed state.
    ///
    /// # Errors
    ///
    /// Propagates handler errors; completions and timer firings do not produce any.
    pub async fn run_until_idle(&mut self) -> Result<bool> {
        let mut changed = false;
        while let Some(event) = self.next_event().await {
            changed |= self.dispatch(&event)?;
        }
        Ok(changed)
    }

    /// Drains notices produced since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SavedSettings;
    use crate::app::{ClearPolicy, FilterEngine, SettingsStore};
    use crate::domain::{Attribute, HomescoutError, Property, Settings};
    use crate::filter::PredicateKey;
    use async_trait::async_trait;
    use std::time::Duration;

    const LATENCY: Duration = Duration::from_millis(50);

    struct SlowBackend {
        properties: Vec<Property>,
    }

    #[async_trait]
    impl Backend for SlowBackend {
        async fn list_properties(&self) -> Result<Vec<Property>> {
            tokio::time::sleep(LATENCY).await;
            Ok(self.properties.clone())
        }

        async fn list_favorites(&self) -> Result<Vec<Property>> {
            Ok(vec![])
        }

        async fn toggle_favorite(&self, _id: &str) -> Result<bool> {
            tokio::time::sleep(LATENCY).await;
            Ok(true)
        }

        async fn get_settings(&self) -> Result<Settings> {
            Err(HomescoutError::Network("unreachable".into()))
        }

        async fn save_settings(&self, settings: &Settings) -> Result<SavedSettings> {
            Ok(SavedSettings {
                settings: *settings,
                message: None,
            })
        }

        async fn manual_scrape(&self) -> Result<()> {
            Ok(())
        }
    }

    fn runtime() -> Runtime<SlowBackend> {
        let properties = [100_000.0, 250_000.0, 400_000.0]
            .iter()
            .enumerate()
            .map(|(index, price)| {
                let mut property = Property::new(format!("p{index}"));
                property.list_price = Some(*price);
                property
            })
            .collect();
        let engine = FilterEngine::new(Duration::from_millis(300), ClearPolicy::Immediate);
        let state = AppState::new(engine, SettingsStore::new(None));
        Runtime::new(state, SlowBackend { properties })
    }

    fn set_filter(raw: &str) -> Event {
        Event::SetFilter {
            key: PredicateKey::min(Attribute::ListPrice),
            raw: raw.to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn idle_runtime_has_no_events() {
        let mut runtime = runtime();
        assert!(!runtime.is_busy());
        assert!(runtime.next_event().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn init_settles_every_request() {
        let mut runtime = runtime();
        runtime.dispatch(&Event::Init).expect("init");
        assert_eq!(runtime.in_flight(), 3);

        runtime.run_until_idle().await.expect("idle");
        assert_eq!(runtime.in_flight(), 0);
        assert_eq!(runtime.state().all().len(), 3);
        assert_eq!(runtime.state().settings(), Settings::default());
    }

    #[tokio::test(start_paused = true)]
    async fn burst_commits_once_after_last_edit() {
        let mut runtime = runtime();
        runtime.dispatch(&Event::ReloadProperties).expect("reload");
        runtime.run_until_idle().await.expect("idle");
        let baseline = runtime.state().engine().recompute_count();

        let start = tokio::time::Instant::now();
        for raw in ["50000", "150000", "200000"] {
            runtime.dispatch(&set_filter(raw)).expect("set");
            tokio::time::advance(Duration::from_millis(100)).await;
        }
        assert_eq!(runtime.state().filtered().len(), 3);

        runtime.run_until_idle().await.expect("idle");
        assert!(start.elapsed() >= Duration::from_millis(500));
        assert_eq!(runtime.state().engine().recompute_count(), baseline + 1);
        assert_eq!(runtime.state().filtered().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_clear_disarms_timer() {
        let mut runtime = runtime();
        runtime.dispatch(&Event::ReloadProperties).expect("reload");
        runtime.run_until_idle().await.expect("idle");

        runtime.dispatch(&set_filter("300000")).expect("set");
        assert!(runtime.is_busy());
        runtime.dispatch(&Event::ClearFilters).expect("clear");
        assert!(!runtime.is_busy());
        assert_eq!(runtime.state().filtered().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_input_executes_nothing() {
        let mut runtime = runtime();
        assert!(runtime.dispatch(&set_filter("lots")).is_err());
        assert!(!runtime.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn notices_are_drained_once() {
        let mut runtime = runtime();
        runtime.dispatch(&Event::ManualRefresh).expect("refresh");
        runtime.run_until_idle().await.expect("idle");

        let notices = runtime.take_notices();
        assert_eq!(notices, vec![Notice::info("Manual refresh completed")]);
        assert!(runtime.take_notices().is_empty());
        assert_eq!(runtime.state().all().len(), 3);
    }
}
