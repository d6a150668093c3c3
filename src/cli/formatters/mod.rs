//! Renderers for command results.

pub mod search_results;

pub use search_results::{SearchReport, SearchResponseJson};
