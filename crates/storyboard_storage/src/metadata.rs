//! Media metadata types.

use serde::{Deserialize, Serialize};

/// Type of media content.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaType {
    /// Image content (PNG, JPEG)
    #[display("image")]
    Image,
    /// Audio content (WAV)
    #[display("audio")]
    Audio,
}

/// Metadata about media being stored.
///
/// Does not derive `Eq` because of the `f32` duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaMetadata {
    /// Type of media
    pub media_type: MediaType,
    /// MIME type (e.g., "audio/wav")
    pub mime_type: String,
    /// Suggested filename, if any
    pub filename: Option<String>,
    /// Playback duration in seconds, for audio
    pub duration_seconds: Option<f32>,
}

impl MediaMetadata {
    /// Metadata with only type and MIME set.
    pub fn new(media_type: MediaType, mime_type: impl Into<String>) -> Self {
        Self {
            media_type,
            mime_type: mime_type.into(),
            filename: None,
            duration_seconds: None,
        }
    }
}
