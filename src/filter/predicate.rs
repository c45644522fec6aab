//! Predicate keys and bound-value parsing.
//!
//! A predicate is one named bound on one numeric attribute. Its key is the pair
//! `(attribute, bound)`, written `min_<attr>` or `max_<attr>` in text form. Values
//! arrive as raw user text and are validated here, at the boundary, so that nothing
//! malformed ever reaches the filter state.

use crate::domain::{Attribute, HomescoutError, Result};
use std::fmt;
use std::str::FromStr;

/// Direction of an inclusive bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bound {
    /// Satisfied when `value >= bound`.
    Min,
    /// Satisfied when `value <= bound`.
    Max,
}

impl Bound {
    /// Returns `true` if `value` satisfies this bound at `limit` (inclusive).
    #[must_use]
    pub fn admits(self, value: f64, limit: f64) -> bool {
        match self {
            Self::Min => value >= limit,
            Self::Max => value <= limit,
        }
    }

    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

/// Identifies one entry in the predicate mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PredicateKey {
    pub attribute: Attribute,
    pub bound: Bound,
}

impl PredicateKey {
    #[must_use]
    pub const fn new(attribute: Attribute, bound: Bound) -> Self {
        Self { attribute, bound }
    }

    #[must_use]
    pub const fn min(attribute: Attribute) -> Self {
        Self::new(attribute, Bound::Min)
    }

    #[must_use]
    pub const fn max(attribute: Attribute) -> Self {
        Self::new(attribute, Bound::Max)
    }
}

impl fmt::Display for PredicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.bound.prefix(), self.attribute)
    }
}

impl FromStr for PredicateKey {
    type Err = HomescoutError;

    /// Parses `min_<attr>` / `max_<attr>`, accepting any attribute alias.
    ///
    /// # Examples
    ///
    /// ```
    /// use homescout::domain::Attribute;
    /// use homescout::filter::{Bound, PredicateKey};
    ///
    /// let key: PredicateKey = "max_lot_acre".parse()?;
    /// assert_eq!(key, PredicateKey::new(Attribute::LotAcre, Bound::Max));
    /// # Ok::<(), homescout::HomescoutError>(())
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (bound, attribute) = if let Some(rest) = trimmed.strip_prefix("min_") {
            (Bound::Min, rest)
        } else if let Some(rest) = trimmed.strip_prefix("max_") {
            (Bound::Max, rest)
        } else {
            return Err(HomescoutError::Validation(format!(
                "filter '{trimmed}' must start with min_ or max_"
            )));
        };
        Ok(Self::new(attribute.parse()?, bound))
    }
}

/// Parses raw user input for a bound.
///
/// Empty or whitespace-only input means "unset" and yields `Ok(None)`. Anything else
/// must be a finite number; non-numeric text, `NaN`, and infinities are rejected
/// rather than treated as unset.
///
/// # Errors
///
/// Returns [`HomescoutError::Validation`] for malformed input.
///
/// # Examples
///
/// ```
/// use homescout::filter::parse_bound_value;
///
/// assert_eq!(parse_bound_value(" 200000 ")?, Some(200_000.0));
/// assert_eq!(parse_bound_value("")?, None);
/// assert!(parse_bound_value("cheap").is_err());
/// # Ok::<(), homescout::HomescoutError>(())
/// ```
pub fn parse_bound_value(raw: &str) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| HomescoutError::Validation(format!("'{trimmed}' is not a number")))?;
    ensure_finite(value).map(Some)
}

/// Rejects `NaN` and infinities.
///
/// # Errors
///
/// Returns [`HomescoutError::Validation`] for non-finite values.
pub fn ensure_finite(value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(HomescoutError::Validation(format!(
            "'{value}' is not a finite number"
        )))
    }
}
