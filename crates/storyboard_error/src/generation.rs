//! Media generation error types.

/// Terminal failures of image and speech generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// Every image tier failed; carries the most informative diagnostic
    #[display("Image generation exhausted all tiers: {}", _0)]
    Exhausted(String),
    /// Speech response carried no inline audio payload
    #[display("Speech response contained no audio payload")]
    AudioMissing,
}

/// Generation error with location tracking.
///
/// # Examples
///
/// ```
/// use storyboard_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::Exhausted(
///     "Tier 1 refused: cannot depict".to_string(),
/// ));
/// assert!(format!("{}", err).contains("cannot depict"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new generation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
