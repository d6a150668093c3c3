//! Filter criteria owned by the controller.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::{Category, Coordinates, Listing, Locale};
use crate::error::GuiaError;

pub const MIN_PRICE_LEVEL: u8 = 1;
pub const MAX_PRICE_LEVEL: u8 = 4;
pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;

/// Category facet: the `all` sentinel or one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl FromStr for CategoryFilter {
    type Err = GuiaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            value.parse().map(Self::Only)
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(value: Category) -> Self {
        Self::Only(value)
    }
}

// Deserialized bounds are passed through the clamping constructors.
#[derive(Deserialize)]
struct RangeBounds<T> {
    lo: T,
    hi: T,
}

/// Inclusive price level range, always within `1..=4` with `lo <= hi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceRange {
    lo: u8,
    hi: u8,
}

impl PriceRange {
    /// Clamp both bounds into `1..=4`, swapping them if inverted.
    #[must_use]
    pub fn new(lo: u8, hi: u8) -> Self {
        let lo = lo.clamp(MIN_PRICE_LEVEL, MAX_PRICE_LEVEL);
        let hi = hi.clamp(MIN_PRICE_LEVEL, MAX_PRICE_LEVEL);
        Self {
            lo: lo.min(hi),
            hi: lo.max(hi),
        }
    }

    #[must_use]
    pub const fn lo(&self) -> u8 {
        self.lo
    }

    #[must_use]
    pub const fn hi(&self) -> u8 {
        self.hi
    }

    #[must_use]
    pub fn contains(&self, level: u8) -> bool {
        (self.lo..=self.hi).contains(&level)
    }

    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            lo: MIN_PRICE_LEVEL,
            hi: MAX_PRICE_LEVEL,
        }
    }
}

impl<'de> Deserialize<'de> for PriceRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bounds = RangeBounds::<u8>::deserialize(deserializer)?;
        Ok(Self::new(bounds.lo, bounds.hi))
    }
}

/// Inclusive rating range, always within `0.0..=5.0` with `lo <= hi`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingRange {
    lo: f64,
    hi: f64,
}

impl RatingRange {
    /// Clamp both bounds into `0..=5`, swapping them if inverted.
    /// A NaN bound falls back to the unrestricted end.
    #[must_use]
    pub fn new(lo: f64, hi: f64) -> Self {
        let lo = if lo.is_nan() { MIN_RATING } else { lo.clamp(MIN_RATING, MAX_RATING) };
        let hi = if hi.is_nan() { MAX_RATING } else { hi.clamp(MIN_RATING, MAX_RATING) };
        Self {
            lo: lo.min(hi),
            hi: lo.max(hi),
        }
    }

    #[must_use]
    pub const fn lo(&self) -> f64 {
        self.lo
    }

    #[must_use]
    pub const fn hi(&self) -> f64 {
        self.hi
    }

    #[must_use]
    pub fn contains(&self, rating: f64) -> bool {
        (self.lo..=self.hi).contains(&rating)
    }

    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_unrestricted(&self) -> bool {
        self.lo == MIN_RATING && self.hi == MAX_RATING
    }
}

impl Default for RatingRange {
    fn default() -> Self {
        Self {
            lo: MIN_RATING,
            hi: MAX_RATING,
        }
    }
}

impl<'de> Deserialize<'de> for RatingRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bounds = RangeBounds::<f64>::deserialize(deserializer)?;
        Ok(Self::new(bounds.lo, bounds.hi))
    }
}

/// Boolean amenity flags a user can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Wifi,
    Parking,
    Cards,
    PetFriendly,
}

impl Feature {
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Wifi => "wifi",
            Self::Parking => "parking",
            Self::Cards => "cards",
            Self::PetFriendly => "pet_friendly",
        }
    }

    #[must_use]
    pub const fn is_offered_by(self, listing: &Listing) -> bool {
        match self {
            Self::Wifi => listing.has_wifi,
            Self::Parking => listing.has_parking,
            Self::Cards => listing.accepts_cards,
            Self::PetFriendly => listing.is_pet_friendly,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Feature {
    type Err = GuiaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "wifi" | "has_wifi" => Ok(Self::Wifi),
            "parking" | "has_parking" => Ok(Self::Parking),
            "cards" | "accepts_cards" => Ok(Self::Cards),
            "pet_friendly" | "pets" | "is_pet_friendly" => Ok(Self::PetFriendly),
            other => Err(GuiaError::Config(format!(
                "unknown feature {other} (expected wifi|parking|cards|pet_friendly)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    Featured,
    Rating,
    Name,
    Price,
    Distance,
}

impl SortMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::Rating => "rating",
            Self::Name => "name",
            Self::Price => "price",
            Self::Distance => "distance",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = GuiaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "featured" => Ok(Self::Featured),
            "rating" => Ok(Self::Rating),
            "name" => Ok(Self::Name),
            "price" => Ok(Self::Price),
            "distance" => Ok(Self::Distance),
            other => Err(GuiaError::Config(format!(
                "invalid sort mode {other} (expected featured|rating|name|price|distance)"
            ))),
        }
    }
}

/// Snapshot of everything that shapes a result list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search_query: String,
    pub locale: Locale,
    pub category: CategoryFilter,
    pub subcategory: Option<String>,
    pub price_range: PriceRange,
    pub rating_range: RatingRange,
    pub features: BTreeSet<Feature>,
    pub sort_mode: SortMode,
    pub distance_sort_enabled: bool,
    pub user_location: Option<Coordinates>,
    pub open_now: bool,
}

impl FilterCriteria {
    #[must_use]
    pub fn with_locale(locale: Locale) -> Self {
        Self {
            locale,
            ..Self::default()
        }
    }

    /// Number of facets narrowing the result beyond the defaults.
    #[must_use]
    pub fn active_filter_count(&self) -> usize {
        [
            self.category != CategoryFilter::All,
            self.subcategory.is_some(),
            !self.price_range.is_unrestricted(),
            !self.rating_range.is_unrestricted(),
            !self.features.is_empty(),
            self.open_now,
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// Restore default facets, keeping the locale and user location.
    pub fn reset(&mut self) {
        *self = Self {
            locale: self.locale,
            user_location: self.user_location,
            ..Self::default()
        };
    }
}
