//! Provider-neutral generation requests and responses.

use crate::{AspectRatio, Output};
use serde::{Deserialize, Serialize};
use storyboard_error::{ConfigError, StoryboardResult};

/// What the caller wants back from a content-generation call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Free-form text
    #[default]
    Text,
    /// JSON constrained by a response schema
    Json {
        /// Schema the response must conform to
        schema: serde_json::Value,
    },
    /// Inline image output
    Image {
        /// Requested aspect ratio, if any
        aspect_ratio: Option<AspectRatio>,
    },
    /// Inline audio output spoken with a preset voice
    Audio {
        /// Preset voice name
        voice: String,
    },
}

/// A single-prompt content-generation request.
///
/// # Examples
///
/// ```
/// use storyboard_core::{GenerateRequestBuilder, ResponseFormat};
///
/// let request = GenerateRequestBuilder::default()
///     .model("gemini-2.5-flash")
///     .prompt("Describe the scene")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.response, ResponseFormat::Text);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into), build_fn(private, name = "build_internal"))]
pub struct GenerateRequest {
    /// Model identifier
    pub model: String,
    /// Prompt text
    pub prompt: String,
    /// Requested response modality
    #[builder(default)]
    pub response: ResponseFormat,
}

impl GenerateRequestBuilder {
    /// Build the request.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the model or prompt is missing.
    pub fn build(&self) -> StoryboardResult<GenerateRequest> {
        Ok(self
            .build_internal()
            .map_err(|e| ConfigError::new(e.to_string()))?)
    }
}

impl GenerateRequest {
    /// Plain text request.
    pub fn text(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            response: ResponseFormat::Text,
        }
    }
}

/// Dedicated image-generation (predict) request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into), build_fn(private, name = "build_internal"))]
pub struct ImageRequest {
    /// Image model identifier
    pub model: String,
    /// Prompt text
    pub prompt: String,
    /// Requested aspect ratio
    #[builder(default)]
    pub aspect_ratio: AspectRatio,
    /// Number of images to generate
    #[builder(default = "1")]
    pub number_of_images: u32,
    /// Output MIME type
    #[builder(default = "\"image/jpeg\".to_string()")]
    pub output_mime: String,
}

impl ImageRequestBuilder {
    /// Build the request.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the model or prompt is missing.
    pub fn build(&self) -> StoryboardResult<ImageRequest> {
        Ok(self
            .build_internal()
            .map_err(|e| ConfigError::new(e.to_string()))?)
    }
}

/// Outputs returned by a content-generation call, in response order.
///
/// # Examples
///
/// ```
/// use storyboard_core::{GenerateResponse, Output};
///
/// let response = GenerateResponse {
///     outputs: vec![Output::Text("{\"characters\": []}".to_string())],
/// };
///
/// assert_eq!(response.text(), "{\"characters\": []}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Generated outputs
    pub outputs: Vec<Output>,
}

impl GenerateResponse {
    /// Concatenated text of every text output.
    pub fn text(&self) -> String {
        self.outputs
            .iter()
            .filter_map(|output| match output {
                Output::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// First output, if any.
    pub fn first(&self) -> Option<&Output> {
        self.outputs.first()
    }
}
