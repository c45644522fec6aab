//! Numeric range filtering.
//!
//! - [`predicate`]: predicate keys (`min_price`, `max_beds`, ...) and value parsing
//! - [`range`]: the predicate mapping and its pure evaluation against a listing

pub mod predicate;
pub mod range;

pub use predicate::{ensure_finite, parse_bound_value, Bound, PredicateKey};
pub use range::RangeFilterSet;
