//! Scripted generative driver for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use storyboard_core::{GenerateRequest, GenerateResponse, ImageRequest, Output};
use storyboard_error::{GeminiError, GeminiErrorKind, StoryboardResult};
use storyboard_interface::GenerativeDriver;

/// One scripted reply to `generate`.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// A single text part
    Text(String),
    /// A single inline PNG part
    Image(Vec<u8>),
    /// A single inline PCM part
    Audio(Vec<u8>),
    /// Arbitrary parts
    Outputs(Vec<Output>),
    /// A response with no parts
    Empty,
    /// A provider error
    Error(GeminiErrorKind),
}

/// One scripted reply to `generate_images`.
#[derive(Debug, Clone)]
pub enum MockImages {
    /// Decoded images
    Images(Vec<Vec<u8>>),
    /// A provider error
    Error(GeminiErrorKind),
}

/// Driver that replays scripted responses in order and records every request.
///
/// Once a script runs out, further calls fail with a non-retryable error.
#[derive(Debug, Default)]
pub struct MockDriver {
    responses: Mutex<VecDeque<MockResponse>>,
    images: Mutex<VecDeque<MockImages>>,
    requests: Arc<Mutex<Vec<GenerateRequest>>>,
    image_requests: Arc<Mutex<Vec<ImageRequest>>>,
}

#[allow(dead_code)]
impl MockDriver {
    /// A driver with empty scripts.
    pub fn new() -> Self {
        Self::default()
    }

    /// A driver whose `generate` replays `responses`.
    pub fn with_responses(responses: impl IntoIterator<Item = MockResponse>) -> Self {
        Self::new().then_responses(responses)
    }

    /// Append `generate` replies.
    pub fn then_responses(self, responses: impl IntoIterator<Item = MockResponse>) -> Self {
        self.responses.lock().unwrap().extend(responses);
        self
    }

    /// Append `generate_images` replies.
    pub fn then_images(self, images: impl IntoIterator<Item = MockImages>) -> Self {
        self.images.lock().unwrap().extend(images);
        self
    }

    /// Number of `generate` calls made.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Number of `generate_images` calls made.
    pub fn image_call_count(&self) -> usize {
        self.image_requests.lock().unwrap().len()
    }

    /// Every `generate` request, in call order.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Every `generate_images` request, in call order.
    pub fn image_requests(&self) -> Vec<ImageRequest> {
        self.image_requests.lock().unwrap().clone()
    }

    fn exhausted(call: usize) -> GeminiError {
        GeminiError::new(GeminiErrorKind::InvalidResponse(format!(
            "Mock script exhausted at call {}",
            call
        )))
    }
}

#[async_trait]
impl GenerativeDriver for MockDriver {
    async fn generate(&self, req: &GenerateRequest) -> StoryboardResult<GenerateResponse> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(req.clone());
            requests.len()
        };
        let next = self.responses.lock().unwrap().pop_front();

        let outputs = match next {
            Some(MockResponse::Text(text)) => vec![Output::Text(text)],
            Some(MockResponse::Image(data)) => vec![Output::Image {
                mime: Some("image/png".to_string()),
                data,
            }],
            Some(MockResponse::Audio(data)) => vec![Output::Audio {
                mime: Some("audio/L16;codec=pcm;rate=24000".to_string()),
                data,
            }],
            Some(MockResponse::Outputs(outputs)) => outputs,
            Some(MockResponse::Empty) => Vec::new(),
            Some(MockResponse::Error(kind)) => return Err(GeminiError::new(kind).into()),
            None => return Err(Self::exhausted(call).into()),
        };

        Ok(GenerateResponse { outputs })
    }

    async fn generate_images(&self, req: &ImageRequest) -> StoryboardResult<Vec<Vec<u8>>> {
        let call = {
            let mut requests = self.image_requests.lock().unwrap();
            requests.push(req.clone());
            requests.len()
        };

        match self.images.lock().unwrap().pop_front() {
            Some(MockImages::Images(images)) => Ok(images),
            Some(MockImages::Error(kind)) => Err(GeminiError::new(kind).into()),
            None => Err(Self::exhausted(call).into()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// A retryable upstream failure.
#[allow(dead_code)]
pub fn unavailable() -> GeminiErrorKind {
    GeminiErrorKind::HttpError {
        status_code: 503,
        message: "UNAVAILABLE: The model is overloaded".to_string(),
    }
}

/// A permanent upstream failure.
#[allow(dead_code)]
pub fn invalid_argument() -> GeminiErrorKind {
    GeminiErrorKind::HttpError {
        status_code: 400,
        message: "INVALID_ARGUMENT: Request contains an invalid argument".to_string(),
    }
}
