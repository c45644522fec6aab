//! Wire shapes of the listings backend.

use serde::{Deserialize, Serialize};

use crate::domain::{Property, Settings};

/// `{properties: [...]}` from `GET /properties` and `GET /properties/favorites`.
#[derive(Debug, Deserialize)]
pub struct PropertiesEnvelope {
    pub properties: Vec<Property>,
}

/// `{favorited: bool}` from `PUT /properties/favorite/{id}`.
#[derive(Debug, Deserialize)]
pub struct FavoriteToggleResponse {
    pub favorited: bool,
}

/// `{settings: {...}}` from `GET /settings`.
#[derive(Debug, Deserialize)]
pub struct SettingsEnvelope {
    pub settings: Settings,
}

/// Body of `PUT /settings`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSettingsRequest {
    pub update_interval: u32,
    pub search_radius: u32,
    pub search_time_range: u32,
}

impl From<&Settings> for SaveSettingsRequest {
    fn from(settings: &Settings) -> Self {
        Self {
            update_interval: settings.update_interval_hours,
            search_radius: settings.search_radius_miles,
            search_time_range: settings.search_time_range_days,
        }
    }
}

/// Confirmed result of a settings save.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SavedSettings {
    pub settings: Settings,
    #[serde(default)]
    pub message: Option<String>,
}

/// `{error: "..."}` returned on any failure.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}
