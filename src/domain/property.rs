//! Property domain model and filterable attributes.
//!
//! A [`Property`] is one scraped listing as returned by the backend. Only its numeric
//! attributes take part in filtering; the remaining fields are display data carried
//! through untouched. [`Attribute`] names the numeric attributes a range predicate
//! can reference.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::HomescoutError;

/// Listings not refreshed by the scraper for this many days are considered stale.
const STALE_AFTER_DAYS: i64 = 7;

/// Timestamp layout produced by the backend (`isoformat()` without offset).
const BACKEND_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// One scraped real-estate listing.
///
/// `id` is stable and unique within a load and is the join key across every view.
/// Numeric attributes are optional: an absent value is unknown, and an unknown value
/// never satisfies a set bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(rename = "property_id")]
    pub id: String,

    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,

    pub sqft: Option<f64>,
    pub lot_acre: Option<f64>,
    pub list_price: Option<f64>,
    pub beds: Option<f64>,
    pub baths: Option<f64>,
    pub year_built: Option<f64>,
    pub property_type: Option<String>,
    pub stories: Option<f64>,
    pub parking_garage: Option<f64>,
    /// Estimated distance in miles from the search center.
    pub estdist: Option<f64>,

    #[serde(default)]
    pub favorited: bool,

    pub listing_date: Option<String>,
    pub primary_photo: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub status: Option<String>,

    pub last_updated: Option<String>,
    pub first_seen: Option<String>,
}

impl Property {
    /// Creates a listing with only an identifier; every other field is unknown.
    ///
    /// # Examples
    ///
    /// ```
    /// use homescout::domain::{Attribute, Property};
    ///
    /// let mut property = Property::new("p-1");
    /// property.list_price = Some(250_000.0);
    /// assert_eq!(property.attribute(Attribute::ListPrice), Some(250_000.0));
    /// assert_eq!(property.attribute(Attribute::Beds), None);
    /// ```
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: None,
            city: None,
            state: None,
            zip_code: None,
            sqft: None,
            lot_acre: None,
            list_price: None,
            beds: None,
            baths: None,
            year_built: None,
            property_type: None,
            stories: None,
            parking_garage: None,
            estdist: None,
            favorited: false,
            listing_date: None,
            primary_photo: None,
            description: None,
            url: None,
            status: None,
            last_updated: None,
            first_seen: None,
        }
    }

    /// Returns the value of a numeric attribute, `None` when unknown.
    #[must_use]
    pub const fn attribute(&self, attribute: Attribute) -> Option<f64> {
        match attribute {
            Attribute::ListPrice => self.list_price,
            Attribute::Sqft => self.sqft,
            Attribute::LotAcre => self.lot_acre,
            Attribute::Beds => self.beds,
            Attribute::Baths => self.baths,
            Attribute::YearBuilt => self.year_built,
            Attribute::Stories => self.stories,
            Attribute::GarageSpaces => self.parking_garage,
            Attribute::Distance => self.estdist,
        }
    }

    /// Parses `last_updated` into a timestamp, if present and well-formed.
    #[must_use]
    pub fn last_updated_at(&self) -> Option<NaiveDateTime> {
        self.last_updated
            .as_deref()
            .and_then(|raw| NaiveDateTime::parse_from_str(raw, BACKEND_TIMESTAMP_FORMAT).ok())
    }

    /// Returns `true` if the scraper has not refreshed this listing for over a week.
    ///
    /// Listings without a parseable `last_updated` are never stale.
    #[must_use]
    pub fn is_stale(&self, now: NaiveDateTime) -> bool {
        self.last_updated_at()
            .is_some_and(|updated| now - updated > TimeDelta::days(STALE_AFTER_DAYS))
    }
}

/// Numeric listing attribute that a range predicate can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    ListPrice,
    Sqft,
    LotAcre,
    Beds,
    Baths,
    YearBuilt,
    Stories,
    GarageSpaces,
    Distance,
}

impl Attribute {
    /// Every filterable attribute, in display order.
    pub const ALL: [Self; 9] = [
        Self::ListPrice,
        Self::Sqft,
        Self::LotAcre,
        Self::Beds,
        Self::Baths,
        Self::YearBuilt,
        Self::Stories,
        Self::GarageSpaces,
        Self::Distance,
    ];

    /// Canonical name used in predicate keys such as `min_price`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ListPrice => "price",
            Self::Sqft => "sqft",
            Self::LotAcre => "lot_acre",
            Self::Beds => "beds",
            Self::Baths => "baths",
            Self::YearBuilt => "year_built",
            Self::Stories => "stories",
            Self::GarageSpaces => "garage",
            Self::Distance => "distance",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = HomescoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price" | "list_price" => Ok(Self::ListPrice),
            "sqft" | "square_feet" => Ok(Self::Sqft),
            "lot" | "lot_acre" | "lot_acres" => Ok(Self::LotAcre),
            "beds" | "bedrooms" => Ok(Self::Beds),
            "baths" | "bathrooms" => Ok(Self::Baths),
            "year" | "year_built" => Ok(Self::YearBuilt),
            "stories" => Ok(Self::Stories),
            "garage" | "parking_garage" => Ok(Self::GarageSpaces),
            "distance" | "estdist" => Ok(Self::Distance),
            other => Err(HomescoutError::Validation(format!(
                "unknown attribute '{other}'"
            ))),
        }
    }
}
