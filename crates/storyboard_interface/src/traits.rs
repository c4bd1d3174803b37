//! Trait definitions for generative backends.

use async_trait::async_trait;
use storyboard_core::{GenerateRequest, GenerateResponse, ImageRequest};
use storyboard_error::StoryboardResult;

/// Core trait that every generative backend implements.
///
/// Implementations perform exactly one provider call per method invocation.
/// Retries and pacing are layered on by callers.
#[async_trait]
pub trait GenerativeDriver: Send + Sync {
    /// Content generation: text, schema-constrained JSON, inline image, or inline audio.
    async fn generate(&self, req: &GenerateRequest) -> StoryboardResult<GenerateResponse>;

    /// Dedicated image generation. Returns the raw bytes of each generated image.
    async fn generate_images(&self, req: &ImageRequest) -> StoryboardResult<Vec<Vec<u8>>>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;
}
