//! Client side of the listings backend.
//!
//! - `backend`: the async [`Backend`] trait every remote operation goes through
//! - `http`: [`HttpBackend`], the reqwest implementation
//! - `models`: wire shapes (envelopes, save body, error body)

pub mod backend;
pub mod http;
pub mod models;

pub use backend::Backend;
pub use http::HttpBackend;
pub use models::SavedSettings;
