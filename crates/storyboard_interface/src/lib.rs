//! Trait definitions for the Storyboard generation pipeline.
//!
//! Every provider call made by the pipeline goes through [`GenerativeDriver`], so the
//! extraction, image, and speech services can run against the live Gemini client or
//! a scripted test double.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::GenerativeDriver;
