//! Generation status machines for storyboard frames.
//!
//! A frame's image status and audio status are independent. Neither may move from
//! `error` to `done` without passing through `generating`.

use serde::{Deserialize, Serialize};

/// Image generation status of a frame.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum FrameStatus {
    /// Not generated yet
    #[default]
    #[display("pending")]
    Pending,
    /// Request in flight
    #[display("generating")]
    Generating,
    /// Image available
    #[display("done")]
    Done,
    /// Last attempt failed
    #[display("error")]
    Error,
}

impl FrameStatus {
    /// Whether the state machine allows moving to `next`.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_core::FrameStatus;
    ///
    /// assert!(FrameStatus::Error.can_transition_to(FrameStatus::Generating));
    /// assert!(!FrameStatus::Error.can_transition_to(FrameStatus::Done));
    /// ```
    pub fn can_transition_to(self, next: Self) -> bool {
        use FrameStatus::*;
        self == next
            || matches!(
                (self, next),
                (Pending, Generating)
                    | (Generating, Done)
                    | (Generating, Error)
                    | (Done, Generating)
                    | (Error, Generating)
            )
    }
}

/// Dialogue audio status of a frame.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum AudioStatus {
    /// No audio requested
    #[default]
    #[display("idle")]
    Idle,
    /// Request in flight
    #[display("generating")]
    Generating,
    /// Audio available
    #[display("done")]
    Done,
    /// Last attempt failed
    #[display("error")]
    Error,
}

impl AudioStatus {
    /// Whether the state machine allows moving to `next`.
    pub fn can_transition_to(self, next: Self) -> bool {
        use AudioStatus::*;
        self == next
            || matches!(
                (self, next),
                (Idle, Generating)
                    | (Generating, Done)
                    | (Generating, Error)
                    | (Done, Generating)
                    | (Error, Generating)
            )
    }
}
