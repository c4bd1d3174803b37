//! Gemini REST client.

use super::conversion;
use super::credentials::resolve_api_key;
use super::protocol::{GenerateContentResponse, PredictResponse};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::error::Error as _;
use storyboard_core::{GenerateRequest, GenerateResponse, ImageRequest};
use storyboard_error::{GeminiError, GeminiErrorKind, StoryboardResult};
use storyboard_interface::GenerativeDriver;
use storyboard_rate_limit::ModelConfig;
use tracing::{debug, instrument};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini REST API client.
///
/// Holds one pooled HTTP client and the resolved API key. The model is chosen
/// per request.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl GeminiClient {
    /// Create a client against the public endpoint.
    ///
    /// The key is `api_key` if non-blank, else `GEMINI_API_KEY`, else `API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` before any network activity if no key is found,
    /// or `ClientCreation` if the HTTP client cannot be built.
    #[instrument(name = "gemini_client_new", skip_all)]
    pub fn new(api_key: Option<&str>) -> StoryboardResult<Self> {
        let api_key = resolve_api_key(api_key)?;
        Self::with_api_key(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client for the configured base URL.
    ///
    /// # Errors
    ///
    /// Same as [`GeminiClient::new`].
    #[instrument(name = "gemini_client_from_config", skip_all, fields(base_url = %models.base_url))]
    pub fn from_config(models: &ModelConfig, api_key: Option<&str>) -> StoryboardResult<Self> {
        let api_key = resolve_api_key(api_key)?;
        Self::with_api_key(api_key, &models.base_url)
    }

    /// Create a client with an already-resolved key and explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` for a blank key, or `ClientCreation` if the HTTP
    /// client cannot be built.
    pub fn with_api_key(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> StoryboardResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GeminiError::new(GeminiErrorKind::MissingApiKey).into());
        }

        let client = Client::builder()
            .build()
            .map_err(|e| GeminiError::new(GeminiErrorKind::ClientCreation(e.to_string())))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    async fn post<B, R>(&self, url: &str, body: &B) -> Result<R, GeminiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::Transport(describe_transport(&e))))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(conversion::parse_error_body(status.as_u16(), &body));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::Transport(describe_transport(&e))))?;

        serde_json::from_slice::<R>(&body).map_err(|e| {
            GeminiError::new(GeminiErrorKind::InvalidResponse(format!(
                "Failed to parse response: {}",
                e
            )))
        })
    }
}

/// Prefix reqwest errors with the failure class so the transient classifier
/// recognizes timeouts, refused connections, and bodies cut off mid-read.
fn describe_transport(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {}", error_chain(e))
    } else if e.is_connect() || e.is_body() || e.is_decode() {
        format!("connection error: {}", error_chain(e))
    } else {
        error_chain(e)
    }
}

/// `e` followed by each of its sources, joined with `": "`.
fn error_chain(e: &reqwest::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[async_trait]
impl GenerativeDriver for GeminiClient {
    #[instrument(skip(self, req), fields(model = %req.model, prompt_len = req.prompt.len()))]
    async fn generate(&self, req: &GenerateRequest) -> StoryboardResult<GenerateResponse> {
        let url = self.endpoint(&req.model, "generateContent");
        let body = conversion::to_generate_content(req);
        debug!(url = %url, "Sending generateContent request");

        let response: GenerateContentResponse = self.post(&url, &body).await?;
        let response = conversion::from_generate_content(&response)?;

        debug!(outputs = response.outputs.len(), "Received generateContent response");
        Ok(response)
    }

    #[instrument(skip(self, req), fields(model = %req.model, aspect_ratio = %req.aspect_ratio))]
    async fn generate_images(&self, req: &ImageRequest) -> StoryboardResult<Vec<Vec<u8>>> {
        let url = self.endpoint(&req.model, "predict");
        let body = conversion::to_predict(req);
        debug!(url = %url, "Sending predict request");

        let response: PredictResponse = self.post(&url, &body).await?;
        let images = conversion::from_predict(&response)?;

        debug!(images = images.len(), "Received predict response");
        Ok(images)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}
