//! Test utilities for Storyboard narrative tests.
//!
//! This module provides a scripted driver and shared fixtures.

pub mod mock_driver;

#[allow(unused_imports)]
pub use mock_driver::{MockDriver, MockImages, MockResponse, invalid_argument, unavailable};
