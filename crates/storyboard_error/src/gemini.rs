//! Provider error types and transient-failure classification.

/// Upstream status codes that mark a failure as transient.
pub const TRANSIENT_STATUS_CODES: [u16; 4] = [500, 502, 503, 504];

/// Message fragments that identify a network-level failure.
///
/// Matched case-insensitively against the full (concatenated) error message.
pub const NETWORK_FAILURE_PATTERNS: &[&str] = &[
    "fetch failed",
    "failed to fetch",
    "network error",
    "networkerror",
    "error sending request",
    "connection reset",
    "connection refused",
    "connection closed",
    "connection error",
    "econnreset",
    "econnrefused",
    "etimedout",
    "timed out",
    "timeout",
    "rpc failed",
    "xhr error",
    "socket hang up",
];

/// Classify a failure as transient.
///
/// A failure is transient when its status code is one of
/// [`TRANSIENT_STATUS_CODES`], or when its message contains any of
/// [`NETWORK_FAILURE_PATTERNS`].
///
/// # Examples
///
/// ```
/// use storyboard_error::is_transient_failure;
///
/// assert!(is_transient_failure(Some(503), "Service Unavailable"));
/// assert!(is_transient_failure(None, "error sending request for url"));
/// assert!(!is_transient_failure(Some(400), "Invalid argument"));
/// ```
pub fn is_transient_failure(status_code: Option<u16>, message: &str) -> bool {
    if status_code.is_some_and(|code| TRANSIENT_STATUS_CODES.contains(&code)) {
        return true;
    }
    let message = message.to_lowercase();
    NETWORK_FAILURE_PATTERNS
        .iter()
        .any(|pattern| message.contains(pattern))
}

/// Gemini-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GeminiErrorKind {
    /// No API credential was supplied and none is set in the environment
    #[display("No Gemini API key: pass one explicitly or set GEMINI_API_KEY")]
    MissingApiKey,
    /// Failed to create the HTTP client
    #[display("Failed to create Gemini client: {}", _0)]
    ClientCreation(String),
    /// Request never produced an HTTP response (DNS, connect, timeout, ...)
    #[display("Gemini transport failure: {}", _0)]
    Transport(String),
    /// HTTP error with status code and message
    #[display("HTTP {} error: {}", status_code, message)]
    HttpError {
        /// HTTP status code (or the nested `error.code` of the body)
        status_code: u16,
        /// Error message, including the nested `error.message`
        message: String,
    },
    /// Response body could not be decoded
    #[display("Invalid Gemini response: {}", _0)]
    InvalidResponse(String),
    /// Base64 decoding failed
    #[display("Base64 decode error: {}", _0)]
    Base64Decode(String),
}

impl GeminiErrorKind {
    /// Check if this error type should be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            GeminiErrorKind::HttpError {
                status_code,
                message,
            } => is_transient_failure(Some(*status_code), message),
            GeminiErrorKind::Transport(message) => is_transient_failure(None, message),
            _ => false,
        }
    }

    /// Status code carried by this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GeminiErrorKind::HttpError { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

/// Gemini error with source location tracking.
///
/// # Examples
///
/// ```
/// use storyboard_error::{GeminiError, GeminiErrorKind};
///
/// let err = GeminiError::new(GeminiErrorKind::MissingApiKey);
/// assert!(format!("{}", err).contains("GEMINI_API_KEY"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gemini Error: {} at line {} in {}", kind, line, file)]
pub struct GeminiError {
    /// The kind of error that occurred
    pub kind: GeminiErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GeminiError {
    /// Create a new GeminiError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GeminiErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Trait for errors that support retry logic.
///
/// # Examples
///
/// ```
/// use storyboard_error::{GeminiError, GeminiErrorKind, RetryableError};
///
/// let err = GeminiError::new(GeminiErrorKind::HttpError {
///     status_code: 503,
///     message: "Service unavailable".to_string(),
/// });
/// assert!(err.is_retryable());
///
/// let err = GeminiError::new(GeminiErrorKind::HttpError {
///     status_code: 429,
///     message: "Resource exhausted".to_string(),
/// });
/// assert!(!err.is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    ///
    /// Transient errors (5xx gateway/availability codes, dropped connections,
    /// timeouts) return true. Everything else, including credential and parse
    /// failures, returns false.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for GeminiError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
