//! Tiered image synthesis.
//!
//! Tier 1 asks a multimodal model for an inline image. If it refuses with text,
//! returns nothing, or fails outright, Tier 2 asks a dedicated image model.

use std::sync::Arc;
use storyboard_core::{
    AspectRatio, GenerateRequest, GenerateResponse, ImageReference, ImageRequestBuilder, Output,
    ResponseFormat,
};
use storyboard_error::{GenerationError, GenerationErrorKind, StoryboardResult};
use storyboard_interface::GenerativeDriver;
use storyboard_rate_limit::{RetryPolicy, invoke};
use tracing::{debug, instrument, warn};

/// Characters of a refusal kept as the diagnostic.
const REFUSAL_PREVIEW_CHARS: usize = 100;

const EMPTY_RESPONSE_DIAGNOSTIC: &str = "Tier 1 returned neither an image nor text";

/// What a Tier-1 response actually contained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// Inline image bytes
    ImagePayload {
        /// Declared MIME type, if any
        mime: Option<String>,
        /// Raw image bytes
        data: Vec<u8>,
    },
    /// The model answered with text instead of an image
    TextRefusal(String),
    /// No usable part at all
    Empty,
}

impl ImageOutcome {
    /// Classify a response. Any image part wins over text; blank text counts as empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_core::{GenerateResponse, Output};
    /// use storyboard_narrative::ImageOutcome;
    ///
    /// let response = GenerateResponse {
    ///     outputs: vec![Output::Text("I can't draw that.".to_string())],
    /// };
    /// assert_eq!(
    ///     ImageOutcome::from_response(&response),
    ///     ImageOutcome::TextRefusal("I can't draw that.".to_string())
    /// );
    /// ```
    pub fn from_response(response: &GenerateResponse) -> Self {
        let image = response.outputs.iter().find_map(|output| match output {
            Output::Image { mime, data } if !data.is_empty() => Some(ImageOutcome::ImagePayload {
                mime: mime.clone(),
                data: data.clone(),
            }),
            _ => None,
        });
        if let Some(image) = image {
            return image;
        }

        response
            .outputs
            .iter()
            .find_map(|output| match output {
                Output::Text(text) if !text.trim().is_empty() => {
                    Some(ImageOutcome::TextRefusal(text.trim().to_string()))
                }
                _ => None,
            })
            .unwrap_or(ImageOutcome::Empty)
    }
}

/// Generates one image per call, falling back from the primary to the secondary model.
#[derive(Clone)]
pub struct ImageSynthesizer {
    driver: Arc<dyn GenerativeDriver>,
    primary_model: String,
    fallback_model: String,
    policy: RetryPolicy,
}

impl std::fmt::Debug for ImageSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSynthesizer")
            .field("provider", &self.driver.provider_name())
            .field("primary_model", &self.primary_model)
            .field("fallback_model", &self.fallback_model)
            .field("policy", &self.policy)
            .finish()
    }
}

impl ImageSynthesizer {
    /// Create a synthesizer. Each tier is retried independently under `policy`.
    pub fn new(
        driver: Arc<dyn GenerativeDriver>,
        primary_model: impl Into<String>,
        fallback_model: impl Into<String>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            driver,
            primary_model: primary_model.into(),
            fallback_model: fallback_model.into(),
            policy,
        }
    }

    /// Generate an image.
    ///
    /// Tier-1 images are returned as PNG data URIs, Tier-2 images as JPEG.
    ///
    /// # Errors
    ///
    /// Returns `GenerationErrorKind::Exhausted` when both tiers fail. Its
    /// diagnostic is Tier 1's refusal or empty-response message if there was
    /// one, else Tier 2's error followed by Tier 1's error.
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len(), aspect_ratio = %aspect_ratio))]
    pub async fn generate(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> StoryboardResult<ImageReference> {
        let mut soft_diagnostic = None;
        let mut tier1_error = None;

        match self.primary(prompt, aspect_ratio).await {
            Ok(ImageOutcome::ImagePayload { data, .. }) => {
                debug!(bytes = data.len(), "Tier 1 produced an image");
                return Ok(ImageReference::from_bytes(ImageReference::PNG, &data));
            }
            Ok(ImageOutcome::TextRefusal(text)) => {
                let preview: String = text.chars().take(REFUSAL_PREVIEW_CHARS).collect();
                warn!(refusal = %preview, "Tier 1 refused, falling back to Tier 2");
                soft_diagnostic = Some(format!("Tier 1 refused: {}", preview));
            }
            Ok(ImageOutcome::Empty) => {
                warn!("Tier 1 returned an empty response, falling back to Tier 2");
                soft_diagnostic = Some(EMPTY_RESPONSE_DIAGNOSTIC.to_string());
            }
            Err(e) => {
                warn!(error = %e, "Tier 1 failed, falling back to Tier 2");
                tier1_error = Some(format!("Tier 1 failed: {}", e));
            }
        }

        let tier2_error = match self.fallback(prompt, aspect_ratio).await {
            Ok(Some(data)) => {
                debug!(bytes = data.len(), "Tier 2 produced an image");
                return Ok(ImageReference::from_bytes(ImageReference::JPEG, &data));
            }
            Ok(None) => "Tier 2 returned no images".to_string(),
            Err(e) => format!("Tier 2 failed: {}", e),
        };
        warn!(error = %tier2_error, "Tier 2 failed, image generation exhausted");

        let diagnostic = match (soft_diagnostic, tier1_error) {
            (Some(soft), _) => soft,
            (None, Some(tier1)) => format!("{}; {}", tier2_error, tier1),
            (None, None) => tier2_error,
        };
        Err(GenerationError::new(GenerationErrorKind::Exhausted(diagnostic)).into())
    }

    async fn primary(&self, prompt: &str, aspect_ratio: AspectRatio) -> StoryboardResult<ImageOutcome> {
        let request = GenerateRequest {
            model: self.primary_model.clone(),
            prompt: prompt.to_string(),
            response: ResponseFormat::Image {
                aspect_ratio: Some(aspect_ratio),
            },
        };

        let response = invoke(self.policy, || self.driver.generate(&request)).await?;
        Ok(ImageOutcome::from_response(&response))
    }

    async fn fallback(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> StoryboardResult<Option<Vec<u8>>> {
        let request = ImageRequestBuilder::default()
            .model(self.fallback_model.clone())
            .prompt(prompt)
            .aspect_ratio(aspect_ratio)
            .number_of_images(1u32)
            .output_mime(ImageReference::JPEG)
            .build()?;

        let images = invoke(self.policy, || self.driver.generate_images(&request)).await?;
        Ok(images.into_iter().find(|image| !image.is_empty()))
    }
}
