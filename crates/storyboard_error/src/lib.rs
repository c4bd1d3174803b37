//! Error types for the Storyboard pipeline.
//!
//! This crate provides the foundation error types used throughout the Storyboard workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use storyboard_error::{JsonError, StoryboardResult};
//!
//! fn parse_world() -> StoryboardResult<String> {
//!     Err(JsonError::new("Response body was empty"))?
//! }
//!
//! match parse_world() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod frame;
mod gemini;
mod generation;
mod json;
mod storage;

pub use config::ConfigError;
pub use error::{StoryboardError, StoryboardErrorKind, StoryboardResult};
pub use frame::{FrameError, FrameErrorKind};
pub use gemini::{
    GeminiError, GeminiErrorKind, NETWORK_FAILURE_PATTERNS, RetryableError,
    TRANSIENT_STATUS_CODES, is_transient_failure,
};
pub use generation::{GenerationError, GenerationErrorKind};
pub use json::JsonError;
pub use storage::{StorageError, StorageErrorKind};
