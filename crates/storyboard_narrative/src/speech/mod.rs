//! Speech synthesis and WAV packaging.

mod wav;

pub use wav::{
    BITS_PER_SAMPLE, CHANNELS, HEADER_LEN, SAMPLE_RATE, WavSpec, encode_wav, encode_wav_with,
    wav_header,
};

use crate::prompts::resolve_character;
use std::sync::Arc;
use storyboard_core::{Character, GenerateRequest, Output, ResponseFormat, ScriptPanel};
use storyboard_error::{GenerationError, GenerationErrorKind, StoryboardResult};
use storyboard_interface::GenerativeDriver;
use storyboard_rate_limit::{RetryPolicy, invoke};
use storyboard_storage::{AudioReference, MediaMetadata, MediaStorage, MediaType};
use tracing::{debug, instrument};

/// MIME type of stored speech.
pub const WAV_MIME: &str = "audio/wav";

/// Turns dialogue into stored, playable WAV resources.
#[derive(Clone)]
pub struct SpeechSynthesizer {
    driver: Arc<dyn GenerativeDriver>,
    model: String,
    policy: RetryPolicy,
    storage: Arc<dyn MediaStorage>,
}

impl std::fmt::Debug for SpeechSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechSynthesizer")
            .field("provider", &self.driver.provider_name())
            .field("model", &self.model)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl SpeechSynthesizer {
    /// Create a synthesizer storing its output in `storage`.
    pub fn new(
        driver: Arc<dyn GenerativeDriver>,
        model: impl Into<String>,
        policy: RetryPolicy,
        storage: Arc<dyn MediaStorage>,
    ) -> Self {
        Self {
            driver,
            model: model.into(),
            policy,
            storage,
        }
    }

    /// Speak `text` with a preset voice.
    ///
    /// The payload is taken as 24 kHz mono 16-bit PCM. The returned reference
    /// stays playable until the caller deletes it from storage.
    ///
    /// # Errors
    ///
    /// Returns `GenerationErrorKind::AudioMissing` if the first part of the
    /// response is not a non-empty audio payload, the provider error once
    /// retries are exhausted, or a storage error.
    #[instrument(skip(self, text), fields(model = %self.model, text_len = text.len()))]
    pub async fn synthesize(&self, text: &str, voice: &str) -> StoryboardResult<AudioReference> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
            response: ResponseFormat::Audio {
                voice: voice.to_string(),
            },
        };

        let response = invoke(self.policy, || self.driver.generate(&request)).await?;
        let pcm = match response.first() {
            Some(Output::Audio { data, .. }) if !data.is_empty() => data,
            _ => return Err(GenerationError::new(GenerationErrorKind::AudioMissing).into()),
        };

        let spec = WavSpec::default();
        let wav = encode_wav_with(spec, pcm);
        let mut metadata = MediaMetadata::new(MediaType::Audio, WAV_MIME);
        metadata.duration_seconds = Some(spec.duration_seconds(pcm.len()));

        let media = self.storage.store(&wav, &metadata).await?;
        debug!(
            pcm_bytes = pcm.len(),
            wav_bytes = wav.len(),
            url = %media.storage_path,
            "Stored synthesized speech"
        );
        Ok(AudioReference::new(media))
    }
}

/// Voice for a panel's dialogue.
///
/// The first present character that resolves in the roster and has a default
/// voice decides; otherwise `default_voice` is used.
pub fn voice_for<'a>(panel: &ScriptPanel, roster: &'a [Character], default_voice: &'a str) -> &'a str {
    panel
        .characters
        .iter()
        .filter_map(|name| resolve_character(name, roster))
        .find_map(|character| character.default_voice.as_deref())
        .unwrap_or(default_voice)
}
