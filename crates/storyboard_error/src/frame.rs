//! Storyboard frame state errors.

/// Specific error conditions for frame state changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum FrameErrorKind {
    /// Status change not permitted by the frame's state machine
    #[display("Invalid {} transition: {} -> {}", machine, from, to)]
    InvalidTransition {
        /// Which state machine ("status" or "audio")
        machine: &'static str,
        /// Current state
        from: String,
        /// Requested state
        to: String,
    },
}

/// Frame error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Frame Error: {} at line {} in {}", kind, line, file)]
pub struct FrameError {
    /// The specific error condition
    pub kind: FrameErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl FrameError {
    /// Create a new FrameError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: FrameErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
