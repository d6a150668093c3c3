//! Result ordering.
//!
//! Sorting is stable: listings that compare equal keep catalog order.

use std::cmp::Ordering;

use crate::catalog::{Listing, Locale};
use crate::engine::RankedListing;
use crate::filter::{FilterCriteria, SortMode};
use crate::search::normalize;

/// Order `items` in place according to `criteria`.
pub fn sort_results(items: &mut [RankedListing], criteria: &FilterCriteria) {
    let by_distance = criteria.distance_sort_enabled || criteria.sort_mode == SortMode::Distance;
    items.sort_by(|a, b| compare(a, b, by_distance, criteria.sort_mode, criteria.locale));
}

fn compare(
    a: &RankedListing,
    b: &RankedListing,
    by_distance: bool,
    mode: SortMode,
    locale: Locale,
) -> Ordering {
    if by_distance {
        // Listings without a distance go after those with one so the
        // comparator stays a total order.
        match (a.distance_km, b.distance_km) {
            (Some(da), Some(db)) => return da.total_cmp(&db),
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            (None, None) => {}
        }
    }
    compare_by_mode(&a.listing, &b.listing, mode, locale)
}

fn compare_by_mode(a: &Listing, b: &Listing, mode: SortMode, locale: Locale) -> Ordering {
    match mode {
        SortMode::Featured => b
            .featured
            .cmp(&a.featured)
            .then_with(|| rating_desc(a, b)),
        SortMode::Rating => rating_desc(a, b),
        SortMode::Name => name_key(a, locale).cmp(&name_key(b, locale)),
        SortMode::Price => present_first(a.price_level, b.price_level, u8::cmp),
        // Distance ordering is handled before the mode; anything left has none.
        SortMode::Distance => Ordering::Equal,
    }
}

// Folded names compare byte-wise, so "ñ" sorts as "n". No collation tables.
fn name_key(listing: &Listing, locale: Locale) -> String {
    normalize(listing.display_name(locale))
}

fn rating_desc(a: &Listing, b: &Listing) -> Ordering {
    let valid = |rating: Option<f64>| rating.filter(|r| !r.is_nan());
    present_first(valid(a.rating), valid(b.rating), |x, y| y.total_cmp(x))
}

fn present_first<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(&x, &y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
