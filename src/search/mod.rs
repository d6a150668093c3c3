//! Text search over listings.
//!
//! Query → [`normalize`] → [`TermExpander::expand`] → [`score`] per listing.

pub mod expand;
pub mod normalize;
pub mod scoring;

pub use expand::TermExpander;
pub use normalize::normalize;
pub use scoring::{ListingText, ScoreWeights, score};
