//! Retry, pacing, and configuration for the Storyboard pipeline.
//!
//! - [`invoke`] wraps a single upstream call in an exponential-backoff retry envelope
//! - [`Pacer`] spaces the start of successive batch units
//! - [`StoryboardConfig`] loads models, retry policies, and pacing from TOML

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod pacer;
mod retry;

pub use config::{
    ExtractionConfig, ModelConfig, PacingConfig, RetryConfig, SpeechConfig, StoryboardConfig,
};
pub use pacer::Pacer;
pub use retry::{RetryPolicy, invoke};
