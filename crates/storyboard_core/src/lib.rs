//! Core data types for the Storyboard generation pipeline.
//!
//! This crate provides the narrative entities (characters, scenes, panels), the
//! generation status machines, media references, and the provider-neutral
//! request/response types shared by every other Storyboard crate.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod entity;
mod media;
mod output;
mod panel;
mod request;
mod status;

pub use entity::{Character, EntityDraft, Scene, WorldInfo};
pub use media::{AspectRatio, ImageReference};
pub use output::Output;
pub use panel::ScriptPanel;
pub use request::{
    GenerateRequest, GenerateRequestBuilder, GenerateResponse, ImageRequest, ImageRequestBuilder,
    ResponseFormat,
};
pub use status::{AudioStatus, FrameStatus};
