//! Script analysis and media generation for Storyboard.
//!
//! This crate turns a script into storyboard artifacts:
//! - [`EntityExtractor`] finds characters and scenes, then breaks the script into panels
//! - The prompt functions compile narrative metadata into deterministic prompts
//! - [`ImageSynthesizer`] generates images with a primary and a fallback model
//! - [`SpeechSynthesizer`] speaks dialogue and packages it as WAV
//! - [`StoryboardFrame`] tracks each panel's image and audio state
//! - [`BatchRunner`] processes units sequentially behind a pacer
//!
//! [`Storyboarder`] wires all of them to one driver and one blob store.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod batch;
mod extraction;
mod frame;
mod image;
mod json;
mod prompts;
mod speech;
mod studio;

pub use batch::{BatchReport, BatchRunner, BatchUnit, PanelRender, SceneArt, UnitOutcome};
pub use extraction::{
    ESTABLISHING_SHOT_DESCRIPTION, EntityExtractor, MISSING_DESCRIPTION_SENTINEL,
    needs_recovery, parse_panels, parse_world_info, recover_description,
};
pub use frame::StoryboardFrame;
pub use image::{ImageOutcome, ImageSynthesizer};
pub use json::{extract_json, parse_json_value};
pub use prompts::{
    character_sheet_prompt, panel_prompt, resolve_character, scene_detail_grid_prompt,
    scene_panorama_prompt,
};
pub use speech::{
    BITS_PER_SAMPLE, CHANNELS, HEADER_LEN, SAMPLE_RATE, SpeechSynthesizer, WAV_MIME, WavSpec,
    encode_wav, encode_wav_with, voice_for, wav_header,
};
pub use studio::Storyboarder;
