//! Listings backend abstraction.
//!
//! The application never talks HTTP directly. Every remote operation goes through
//! the [`Backend`] trait so that the worker can run against the real
//! [`HttpBackend`](crate::api::HttpBackend) or an in-memory double in tests.

use async_trait::async_trait;

use super::models::SavedSettings;
use crate::domain::error::Result;
use crate::domain::{Property, Settings};

/// The backend's request/response contract.
///
/// # Errors
///
/// Every method fails with [`HomescoutError::Network`](crate::HomescoutError::Network)
/// when no response arrived, [`HomescoutError::Api`](crate::HomescoutError::Api) for a
/// non-success status, and [`HomescoutError::Decode`](crate::HomescoutError::Decode)
/// when the body does not match the contract.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /properties`, in backend order.
    async fn list_properties(&self) -> Result<Vec<Property>>;

    /// `GET /properties/favorites`
    async fn list_favorites(&self) -> Result<Vec<Property>>;

    /// `PUT /properties/favorite/{id}`; returns the authoritative flag.
    async fn toggle_favorite(&self, id: &str) -> Result<bool>;

    /// `GET /settings`
    async fn get_settings(&self) -> Result<Settings>;

    /// `PUT /settings` with the full object; returns the backend's copy.
    async fn save_settings(&self, settings: &Settings) -> Result<SavedSettings>;

    /// `POST /manual-scrape`; resolves once the scrape has finished.
    async fn manual_scrape(&self) -> Result<()>;
}
