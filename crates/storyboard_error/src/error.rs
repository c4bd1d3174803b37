//! Top-level error wrapper types.

use crate::{
    ConfigError, FrameError, GeminiError, GenerationError, JsonError, RetryableError,
    StorageError,
};

/// Every error condition a Storyboard operation can surface.
///
/// # Examples
///
/// ```
/// use storyboard_error::{JsonError, StoryboardError};
///
/// let err: StoryboardError = JsonError::new("not JSON").into();
/// assert!(format!("{}", err).contains("JSON Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StoryboardErrorKind {
    /// Provider (Gemini) error, possibly transient
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// Malformed or absent JSON
    #[from(JsonError)]
    Json(JsonError),
    /// Image or speech generation failed terminally
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Illegal frame state change
    #[from(FrameError)]
    Frame(FrameError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Blob storage error
    #[from(StorageError)]
    Storage(StorageError),
}

/// Storyboard error with kind discrimination.
///
/// # Examples
///
/// ```
/// use storyboard_error::{ConfigError, StoryboardErrorKind, StoryboardResult};
///
/// fn might_fail() -> StoryboardResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), StoryboardErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Storyboard Error: {}", _0)]
pub struct StoryboardError(Box<StoryboardErrorKind>);

impl StoryboardError {
    /// Create a new error from a kind.
    pub fn new(kind: StoryboardErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoryboardErrorKind {
        &self.0
    }

    /// True when this error is the pre-network missing-credential failure.
    pub fn is_credential_missing(&self) -> bool {
        matches!(
            self.kind(),
            StoryboardErrorKind::Gemini(GeminiError {
                kind: crate::GeminiErrorKind::MissingApiKey,
                ..
            })
        )
    }
}

impl<T> From<T> for StoryboardError
where
    T: Into<StoryboardErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

impl RetryableError for StoryboardError {
    fn is_retryable(&self) -> bool {
        match self.kind() {
            StoryboardErrorKind::Gemini(err) => err.is_retryable(),
            _ => false,
        }
    }
}

/// Result type for Storyboard operations.
pub type StoryboardResult<T> = std::result::Result<T, StoryboardError>;
