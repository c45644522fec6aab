//! Domain layer for homescout.
//!
//! This module contains the core domain types, independent of the HTTP transport,
//! the runtime, or any persistence concern.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`property`]: Listing model and filterable attributes
//! - [`settings`]: Scraper settings model
//!
//! # Examples
//!
//! ```
//! use homescout::domain::{Property, Result};
//!
//! fn sample_listing() -> Result<Property> {
//!     let mut property = Property::new("p-1");
//!     property.list_price = Some(199_000.0);
//!     Ok(property)
//! }
//! ```

pub mod error;
pub mod property;
pub mod settings;

pub use error::{HomescoutError, Result};
pub use property::{Attribute, Property};
pub use settings::Settings;
