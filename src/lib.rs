//! guia - bilingual directory search
//!
//! Search, rank and filter a catalog of tourism listings (restaurants,
//! hotels, attractions and more) described in Spanish and English.
//!
//! The pipeline is pure: [`engine::SearchEngine::run`] maps a catalog, a
//! [`filter::FilterCriteria`] snapshot and the current time to an ordered
//! result list. [`controller::FilterController`] owns mutable criteria,
//! debounces changes and publishes results to subscribers.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod filter;
pub mod geo;
pub mod rank;
pub mod search;
pub mod test_utils;

pub use error::{GeolocationError, GuiaError, Result};
