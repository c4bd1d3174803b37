//! TOML configuration for models, retry envelopes, and pacing.
//!
//! Sources, later ones overriding earlier:
//! - Bundled defaults (include_str! from storyboard.toml)
//! - ~/.config/storyboard/storyboard.toml
//! - ./storyboard.toml
//!
//! Every field has a serde default, so an override file only needs the keys it changes.

use crate::{Pacer, RetryPolicy};
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use storyboard_error::{ConfigError, StoryboardError, StoryboardResult};
use tracing::{debug, instrument};

/// Model identifiers and the provider base URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModelConfig {
    /// REST base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Text and JSON-mode model
    #[serde(default = "default_text_model")]
    pub text: String,
    /// Tier-1 multimodal image model
    #[serde(default = "default_image_primary")]
    pub image_primary: String,
    /// Tier-2 dedicated image model
    #[serde(default = "default_image_fallback")]
    pub image_fallback: String,
    /// Speech synthesis model
    #[serde(default = "default_speech_model")]
    pub speech: String,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_image_primary() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_image_fallback() -> String {
    "imagen-4.0-generate-001".to_string()
}

fn default_speech_model() -> String {
    "gemini-2.5-flash-preview-tts".to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            text: default_text_model(),
            image_primary: default_image_primary(),
            image_fallback: default_image_fallback(),
            speech: default_speech_model(),
        }
    }
}

/// Retry envelopes per call family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Text and JSON calls
    #[serde(default = "RetryPolicy::general")]
    pub general: RetryPolicy,
    /// Image calls (each tier)
    #[serde(default = "RetryPolicy::image")]
    pub image: RetryPolicy,
    /// Speech calls
    #[serde(default = "RetryPolicy::speech")]
    pub speech: RetryPolicy,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            general: RetryPolicy::general(),
            image: RetryPolicy::image(),
            speech: RetryPolicy::speech(),
        }
    }
}

/// Inter-unit spacing for each batch, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct PacingConfig {
    /// Character sheet batch
    #[serde(default = "default_characters_ms")]
    pub characters_ms: u64,
    /// Scene art batch
    #[serde(default = "default_scenes_ms")]
    pub scenes_ms: u64,
    /// Panel image batch
    #[serde(default = "default_panels_ms")]
    pub panels_ms: u64,
    /// Dialogue audio batch
    #[serde(default = "default_audio_ms")]
    pub audio_ms: u64,
}

fn default_characters_ms() -> u64 {
    1000
}

fn default_scenes_ms() -> u64 {
    1000
}

fn default_panels_ms() -> u64 {
    2000
}

fn default_audio_ms() -> u64 {
    500
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            characters_ms: default_characters_ms(),
            scenes_ms: default_scenes_ms(),
            panels_ms: default_panels_ms(),
            audio_ms: default_audio_ms(),
        }
    }
}

impl PacingConfig {
    /// Pacer for the character sheet batch.
    pub fn characters(&self) -> Pacer {
        Pacer::new(Duration::from_millis(self.characters_ms))
    }

    /// Pacer for the scene art batch.
    pub fn scenes(&self) -> Pacer {
        Pacer::new(Duration::from_millis(self.scenes_ms))
    }

    /// Pacer for the panel image batch.
    pub fn panels(&self) -> Pacer {
        Pacer::new(Duration::from_millis(self.panels_ms))
    }

    /// Pacer for the dialogue audio batch.
    pub fn audio(&self) -> Pacer {
        Pacer::new(Duration::from_millis(self.audio_ms))
    }

    /// All-zero pacing, for tests and offline drivers.
    pub fn unpaced() -> Self {
        Self {
            characters_ms: 0,
            scenes_ms: 0,
            panels_ms: 0,
            audio_ms: 0,
        }
    }
}

/// Entity extraction settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExtractionConfig {
    /// Natural language every extracted description is written in
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_locale() -> String {
    "Simplified Chinese".to_string()
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
        }
    }
}

/// Speech synthesis settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SpeechConfig {
    /// Preset voice used when a speaker has none
    #[serde(default = "default_voice")]
    pub default_voice: String,
}

fn default_voice() -> String {
    "Kore".to_string()
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            default_voice: default_voice(),
        }
    }
}

/// Top-level Storyboard configuration.
///
/// # Example
///
/// ```no_run
/// use storyboard_rate_limit::StoryboardConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = StoryboardConfig::load()?;
/// println!("Text model: {}", config.models.text);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct StoryboardConfig {
    /// Model identifiers
    #[serde(default)]
    pub models: ModelConfig,
    /// Retry envelopes
    #[serde(default)]
    pub retry: RetryConfig,
    /// Batch pacing
    #[serde(default)]
    pub pacing: PacingConfig,
    /// Entity extraction
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Speech synthesis
    #[serde(default)]
    pub speech: SpeechConfig,
}

impl StoryboardConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> StoryboardResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                StoryboardError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                StoryboardError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid TOML or has mistyped values.
    pub fn from_toml_str(toml: &str) -> StoryboardResult<Self> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .and_then(Config::try_deserialize::<Self>)
            .map_err(|e| {
                StoryboardError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> StoryboardResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        const DEFAULT_CONFIG: &str = include_str!("../../../storyboard.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/storyboard/storyboard.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("storyboard").required(false));

        builder
            .build()
            .map_err(|e| {
                StoryboardError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                StoryboardError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }
}
