//! Storyboard - script to storyboard generation
//!
//! Storyboard turns an authored script into storyboard artifacts with Google
//! Gemini: character reference sheets, scene concept art, one illustration per
//! shot, and spoken dialogue.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use storyboard::{GeminiClient, InMemoryStorage, StoryboardConfig, Storyboarder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoryboardConfig::load()?;
//!     let driver = Arc::new(GeminiClient::from_config(&config.models, None)?);
//!     let studio = Storyboarder::new(driver, Arc::new(InMemoryStorage::new()), &config);
//!
//!     let script = std::fs::read_to_string("pilot.txt")?;
//!     let world = studio.extract_world_info(&script).await?;
//!     let panels = studio.analyze_script(&script, &world.character_names()).await?;
//!     println!("{} panels", panels.len());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `storyboard_error` - Error types and transient-failure classification
//! - `storyboard_core` - Characters, scenes, panels, statuses, requests
//! - `storyboard_rate_limit` - Retry envelope, pacing, configuration
//! - `storyboard_interface` - The `GenerativeDriver` trait
//! - `storyboard_storage` - Revocable blob storage for audio
//! - `storyboard_models` - Gemini REST client
//! - `storyboard_narrative` - Extraction, prompts, image and speech synthesis, batches
//!
//! This crate (`storyboard`) re-exports everything for convenience.

pub use storyboard_core::*;
pub use storyboard_error::*;
pub use storyboard_interface::*;
pub use storyboard_models::{GeminiClient, resolve_api_key};
pub use storyboard_narrative::*;
pub use storyboard_rate_limit::*;
pub use storyboard_storage::{
    AudioReference, InMemoryStorage, MediaMetadata, MediaReference, MediaStorage, MediaType,
};
