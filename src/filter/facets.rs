//! Facet predicates.
//!
//! Every predicate is independent; a listing passes when all enabled
//! predicates accept it. Missing or out-of-domain values never satisfy a
//! range test.

use chrono::{Datelike, NaiveDateTime, NaiveTime};

use crate::catalog::Listing;
use crate::search::normalize;

use super::criteria::{
    CategoryFilter, Feature, FilterCriteria, MAX_PRICE_LEVEL, MAX_RATING, MIN_PRICE_LEVEL,
    MIN_RATING, PriceRange, RatingRange,
};

/// Apply every enabled facet of `criteria` to `listing`.
///
/// `now` is the local wall-clock time used by the open-now facet.
#[must_use]
pub fn passes(listing: &Listing, criteria: &FilterCriteria, now: NaiveDateTime) -> bool {
    matches_category(listing, criteria.category)
        && matches_subcategory(listing, criteria.subcategory.as_deref())
        && matches_price(listing, criteria.price_range)
        && matches_rating(listing, criteria.rating_range)
        && matches_features(listing, criteria.features.iter().copied())
        && (!criteria.open_now || is_open_at(listing, now))
}

#[must_use]
pub fn matches_category(listing: &Listing, filter: CategoryFilter) -> bool {
    match filter {
        CategoryFilter::All => true,
        CategoryFilter::Only(category) => listing.category == category,
    }
}

/// Exact match after normalization; bypassed when unset or blank.
#[must_use]
pub fn matches_subcategory(listing: &Listing, wanted: Option<&str>) -> bool {
    let Some(wanted) = wanted.map(normalize).filter(|w| !w.is_empty()) else {
        return true;
    };
    listing
        .subcategory
        .as_deref()
        .is_some_and(|sub| normalize(sub) == wanted)
}

#[must_use]
pub fn matches_price(listing: &Listing, range: PriceRange) -> bool {
    listing
        .price_level
        .filter(|level| (MIN_PRICE_LEVEL..=MAX_PRICE_LEVEL).contains(level))
        .is_some_and(|level| range.contains(level))
}

#[must_use]
pub fn matches_rating(listing: &Listing, range: RatingRange) -> bool {
    listing
        .rating
        .filter(|rating| (MIN_RATING..=MAX_RATING).contains(rating))
        .is_some_and(|rating| range.contains(rating))
}

/// OR semantics: any one selected feature is enough. No selection passes all.
pub fn matches_features(listing: &Listing, mut selected: impl Iterator<Item = Feature>) -> bool {
    let mut any_selected = false;
    let offered = selected.any(|feature| {
        any_selected = true;
        feature.is_offered_by(listing)
    });
    offered || !any_selected
}

/// Whether `listing` is open at `now`.
///
/// Opening time is inclusive and closing time exclusive. A window whose
/// closing time is not after its opening time runs past midnight.
#[must_use]
pub fn is_open_at(listing: &Listing, now: NaiveDateTime) -> bool {
    let Some(day) = listing
        .operating_hours
        .as_ref()
        .and_then(|hours| hours.day(now.weekday()))
    else {
        return false;
    };
    if day.closed {
        return false;
    }
    match (day.open, day.close) {
        (Some(open), Some(close)) => within(now.time(), open, close),
        _ => false,
    }
}

fn within(time: NaiveTime, open: NaiveTime, close: NaiveTime) -> bool {
    if open < close {
        open <= time && time < close
    } else {
        time >= open || time < close
    }
}
