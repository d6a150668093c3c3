//! Integration tests for the search pipeline and the filter controller.

mod controller_tests;
mod geolocation_tests;
mod scenario_tests;
