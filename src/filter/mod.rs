//! Facet filtering: criteria types and the predicates applied to them.

pub mod criteria;
pub mod facets;

pub use criteria::{CategoryFilter, Feature, FilterCriteria, PriceRange, RatingRange, SortMode};
pub use facets::passes;
