//! Storage layer for the durable settings cache.
//!
//! # Modules
//!
//! - `backend`: cache trait abstraction for backend implementations
//! - `json`: JSON file-based implementation with atomic writes

pub mod backend;
pub mod json;

pub use backend::SettingsCache;
pub use json::JsonSettingsCache;
