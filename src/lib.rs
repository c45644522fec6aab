//! Homescout: a client engine for browsing scraped real-estate listings.
//!
//! Homescout talks to a listing scraper's HTTP API and keeps three local views
//! of its data consistent:
//! - `all`: every listing from the last load, in backend order
//! - `filtered`: the listings passing the current numeric range filters,
//!   recomputed after a debounce window so bursts of edits commit once
//! - `favorites`: the backend's favorites list, refreshed after every toggle
//!
//! It also keeps the scraper's settings, confirmed by the backend and mirrored
//! to a durable local cache that is read back when the backend is unreachable.

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Terminal driver (main.rs)                          │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Runtime (runtime.rs)                               │  ← Event loop
//! │  - debounce timer, in-flight requests, notices      │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │
//! │  - Filter engine, favorites sync, settings store    │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Filtering     │   │ Storage Layer │   │ Worker Layer  │
//! │ (filter/)     │   │ (storage/)    │   │ (worker/)     │
//! │ - Predicates  │   │ - JSON cache  │   │ - Requests    │
//! │ - Range set   │   │ - Atomic I/O  │   │ - Trace ctx   │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                                                   │
//!                                         ┌───────────────┐
//!                                         │ Backend (api/)│
//!                                         │ - HTTP client │
//!                                         └───────────────┘
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Platform paths (infrastructure/)                 │
//! │  - Errors, listings, settings (domain/)             │
//! └─────────────────────────────────────────────────────┘
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - OpenTelemetry tracing to a local JSON-lines file │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! Settings are read from `~/.config/homescout/config.toml` on Linux:
//!
//! ```toml
//! api_base_url = "http://localhost:5000"
//! debounce_ms = 300
//! clear_policy = "immediate"   # or "debounced"
//! request_timeout_secs = 30
//! settings_cache_path = "~/.local/share/homescout/settings.json"
//! trace_level = "homescout=debug"
//! ```
//!
//! `--api-url` and `--trace-level` (or `HOMESCOUT_API_URL` and
//! `HOMESCOUT_TRACE_LEVEL`) override the file; see [`Cli`].
//!
//! # Example
//!
//! ```no_run
//! use homescout::runtime::Runtime;
//! use homescout::{initialize, Config, Event};
//!
//! # async fn run() -> homescout::Result<()> {
//! let config = Config::load(None)?;
//! let mut runtime = Runtime::new(initialize(&config), config.backend()?);
//!
//! runtime.dispatch(&Event::Init)?;
//! runtime.run_until_idle().await?;
//! println!("{} listings", runtime.state().all().len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod app;
pub mod domain;
pub mod filter;
pub mod infrastructure;
pub mod observability;
pub mod runtime;
pub mod storage;
pub mod worker;

pub use app::{handle_event, Action, AppState, ClearPolicy, Event, Notice, NoticeLevel};
pub use domain::{Attribute, HomescoutError, Property, Result, Settings};
pub use filter::{Bound, PredicateKey};

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;

use app::{FilterEngine, SettingsStore};
use api::HttpBackend;
use infrastructure::{default_config_file, expand_tilde, get_data_dir};
use storage::{JsonSettingsCache, SettingsCache};

/// Command-line arguments. Flags and their `HOMESCOUT_*` variables take
/// precedence over the configuration file.
#[derive(Debug, Parser)]
#[command(name = "homescout", version, about = "Browse scraped real-estate listings")]
pub struct Cli {
    /// Configuration file. Default: `config.toml` in the platform config dir
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL of the scraper API
    #[arg(long, env = "HOMESCOUT_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// `EnvFilter` directive for tracing, e.g. `homescout=debug`
    #[arg(long, env = "HOMESCOUT_TRACE_LEVEL", value_name = "DIRECTIVE")]
    pub trace_level: Option<String>,
}

impl Cli {
    /// Loads the configuration file named by `--config` and merges the
    /// command-line values over it.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        self.merge_into(&mut config);
        Ok(config)
    }

    /// Overwrites the fields given on the command line. Blank values are
    /// ignored, so an exported but empty variable keeps the file value.
    pub fn merge_into(&self, config: &mut Config) {
        let given = |value: Option<&str>| value.filter(|v| !v.trim().is_empty()).map(str::to_string);

        if let Some(url) = given(self.api_url.as_deref()) {
            config.api_base_url = url;
        }
        if let Some(level) = given(self.trace_level.as_deref()) {
            config.trace_level = Some(level);
        }
    }
}

/// Client configuration.
///
/// Every field has a default, so an empty or missing file is a valid
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL of the scraper API. Default: `http://localhost:5000`
    pub api_base_url: String,

    /// Quiet period before filter edits are committed. Default: 300
    pub debounce_ms: u64,

    /// Whether clearing all filters recomputes at once or after the debounce.
    pub clear_policy: ClearPolicy,

    /// Per-request timeout. Default: 30
    pub request_timeout_secs: u64,

    /// Location of the durable settings cache; `~` is expanded.
    ///
    /// Default: `settings.json` in the data directory.
    pub settings_cache_path: Option<String>,

    /// `EnvFilter` directive for tracing. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            debounce_ms: 300,
            clear_policy: ClearPolicy::default(),
            request_timeout_secs: 30,
            settings_cache_path: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Loads the configuration file.
    ///
    /// With `path` unset the platform default location is used. A missing
    /// file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`HomescoutError::Config`] if the file is not valid TOML or has
    /// unknown keys, and [`HomescoutError::Io`] if it exists but cannot be read.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => default_config_file()?,
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::from_toml_str(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = ?path, "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`HomescoutError::Config`] for malformed TOML, unknown keys, or
    /// wrongly typed values.
    ///
    /// # Example
    ///
    /// ```
    /// use homescout::{ClearPolicy, Config};
    ///
    /// let config = Config::from_toml_str("debounce_ms = 150\nclear_policy = \"debounced\"")?;
    /// assert_eq!(config.debounce_ms, 150);
    /// assert_eq!(config.clear_policy, ClearPolicy::Debounced);
    /// assert_eq!(config.api_base_url, "http://localhost:5000");
    /// # Ok::<(), homescout::HomescoutError>(())
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| HomescoutError::Config(e.to_string()))
    }

    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolves the settings cache location.
    ///
    /// # Errors
    ///
    /// Returns [`HomescoutError::Config`] if no path is configured and the
    /// data directory cannot be resolved.
    pub fn settings_cache_file(&self) -> Result<PathBuf> {
        match &self.settings_cache_path {
            Some(path) => Ok(expand_tilde(path)),
            None => Ok(get_data_dir()?.join("settings.json")),
        }
    }

    /// Builds the HTTP backend for `api_base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`HomescoutError::Config`] if the base URL is not an absolute
    /// `http`/`https` URL or the client cannot be built.
    pub fn backend(&self) -> Result<HttpBackend> {
        HttpBackend::new(&self.api_base_url, self.request_timeout())
    }
}

/// Builds the initial application state.
///
/// The settings cache is opened at [`Config::settings_cache_file`]. If it
/// cannot be opened the state runs without one, and settings load failures
/// keep the in-memory defaults.
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(api = %config.api_base_url, debounce_ms = config.debounce_ms, "initializing homescout");

    let cache = config
        .settings_cache_file()
        .and_then(JsonSettingsCache::new)
        .map(|cache| Box::new(cache) as Box<dyn SettingsCache>)
        .map_err(|e| tracing::warn!(error = %e, "settings cache unavailable, continuing without it"))
        .ok();

    let engine = FilterEngine::new(config.debounce(), config.clear_policy);
    AppState::new(engine, SettingsStore::new(cache))
}
