//! Image references and the aspect ratios images can be requested at.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use storyboard_error::{GeminiError, GeminiErrorKind, StoryboardResult};

/// Aspect ratios accepted by both image tiers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::EnumString,
    derive_more::Display,
)]
pub enum AspectRatio {
    /// Square
    #[default]
    #[display("1:1")]
    #[serde(rename = "1:1")]
    #[strum(serialize = "1:1")]
    Square,
    /// Portrait 3:4
    #[display("3:4")]
    #[serde(rename = "3:4")]
    #[strum(serialize = "3:4")]
    Portrait,
    /// Landscape 4:3
    #[display("4:3")]
    #[serde(rename = "4:3")]
    #[strum(serialize = "4:3")]
    Landscape,
    /// Tall 9:16
    #[display("9:16")]
    #[serde(rename = "9:16")]
    #[strum(serialize = "9:16")]
    Tall,
    /// Widescreen 16:9
    #[display("16:9")]
    #[serde(rename = "16:9")]
    #[strum(serialize = "16:9")]
    Widescreen,
}

impl AspectRatio {
    /// Ratio string as sent to the provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "3:4",
            AspectRatio::Landscape => "4:3",
            AspectRatio::Tall => "9:16",
            AspectRatio::Widescreen => "16:9",
        }
    }
}

/// A generated image, held as a `data:image/<png|jpeg>;base64,<payload>` URI.
///
/// # Examples
///
/// ```
/// use storyboard_core::ImageReference;
///
/// let image = ImageReference::from_bytes(ImageReference::PNG, &[0x89, 0x50, 0x4E, 0x47]);
/// assert_eq!(image.as_str(), "data:image/png;base64,iVBORw==");
/// assert_eq!(image.mime_type(), "image/png");
/// assert_eq!(image.decode().unwrap(), vec![0x89, 0x50, 0x4E, 0x47]);
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
pub struct ImageReference(String);

impl ImageReference {
    /// MIME type of Tier-1 images.
    pub const PNG: &'static str = "image/png";
    /// MIME type of Tier-2 images.
    pub const JPEG: &'static str = "image/jpeg";

    /// Encode raw image bytes as a data URI.
    pub fn from_bytes(mime_type: &str, data: &[u8]) -> Self {
        Self(format!("data:{};base64,{}", mime_type, STANDARD.encode(data)))
    }

    /// Wrap an existing image data URI, rejecting anything else.
    pub fn parse(uri: impl Into<String>) -> Option<Self> {
        let uri = uri.into();
        let is_image_uri = uri
            .strip_prefix("data:image/")
            .is_some_and(|rest| rest.contains(";base64,"));
        is_image_uri.then_some(Self(uri))
    }

    /// The full data URI.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// MIME type declared by the URI.
    pub fn mime_type(&self) -> &str {
        self.0
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
            .unwrap_or_default()
    }

    /// Base64 payload portion of the URI.
    pub fn base64_payload(&self) -> &str {
        self.0
            .split_once(";base64,")
            .map(|(_, payload)| payload)
            .unwrap_or_default()
    }

    /// Decode the payload back into image bytes.
    pub fn decode(&self) -> StoryboardResult<Vec<u8>> {
        STANDARD
            .decode(self.base64_payload())
            .map_err(|e| GeminiError::new(GeminiErrorKind::Base64Decode(e.to_string())).into())
    }
}
