//! Scraper settings model.
//!
//! The authoritative copy of [`Settings`] lives on the backend. The client holds the
//! last fetched, last saved, or last cached copy.

use serde::{Deserialize, Serialize};

use super::error::{HomescoutError, Result};

/// Background scraper configuration.
///
/// Serialises with the backend's field names. Extra fields returned by the backend
/// (such as `last_updated`) are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Hours between scheduled scrapes.
    #[serde(rename = "update_interval")]
    pub update_interval_hours: u32,

    /// Search radius around the configured location, in miles.
    #[serde(rename = "search_radius")]
    pub search_radius_miles: u32,

    /// How far back listings are scraped, in days.
    #[serde(rename = "search_time_range")]
    pub search_time_range_days: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            update_interval_hours: 1,
            search_radius_miles: 20,
            search_time_range_days: 365,
        }
    }
}

impl Settings {
    /// Rejects non-positive values before a save is issued.
    ///
    /// Upper bounds are enforced by the backend, whose error message is surfaced
    /// verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`HomescoutError::Validation`] naming the first zero field.
    ///
    /// # Examples
    ///
    /// ```
    /// use homescout::domain::Settings;
    ///
    /// assert!(Settings::default().validate().is_ok());
    /// let zero = Settings { search_radius_miles: 0, ..Settings::default() };
    /// assert!(zero.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("update interval", self.update_interval_hours),
            ("search radius", self.search_radius_miles),
            ("search time range", self.search_time_range_days),
        ];
        match fields.iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(HomescoutError::Validation(format!(
                "{name} must be a positive number"
            ))),
            None => Ok(()),
        }
    }
}
