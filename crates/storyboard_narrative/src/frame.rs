//! Storyboard frames: a panel bound to its generation state.

use crate::prompts::panel_prompt;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use storyboard_core::{AudioStatus, Character, FrameStatus, ImageReference, Scene, ScriptPanel};
use storyboard_error::{FrameError, FrameErrorKind, StoryboardResult};
use storyboard_storage::AudioReference;
use uuid::Uuid;

/// A script panel plus its image and audio generation state.
///
/// The stored prompt always equals [`StoryboardFrame::expected_prompt`] for the
/// roster and scenes last passed in: every panel or scene edit recomputes it,
/// and a completed generation records the exact prompt that was sent.
///
/// # Examples
///
/// ```
/// use storyboard_core::{Character, FrameStatus, ImageReference, ScriptPanel};
/// use storyboard_narrative::StoryboardFrame;
///
/// let roster = vec![Character::new("Alice", "Courier", "Short red hair")];
/// let panel = ScriptPanel::new(1, "Alice waits").with_characters(["Alice"]);
/// let mut frame = StoryboardFrame::from_panel(panel, &roster, &[]);
///
/// frame.begin_generation().unwrap();
/// let prompt = frame.prompt().clone();
/// let image = ImageReference::from_bytes(ImageReference::PNG, b"png");
/// frame.complete_generation(image, prompt).unwrap();
///
/// assert_eq!(*frame.status(), FrameStatus::Done);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct StoryboardFrame {
    /// Stable identifier
    id: String,
    /// Panel fields
    panel: ScriptPanel,
    /// Last generated image
    image: Option<ImageReference>,
    /// Prompt last computed or used
    prompt: String,
    /// Image generation status
    status: FrameStatus,
    /// Bound scene identifier
    scene_id: Option<String>,
    /// Last synthesized dialogue
    audio: Option<AudioReference>,
    /// Audio generation status
    audio_status: AudioStatus,
}

impl StoryboardFrame {
    /// Promote a panel. The frame starts unbound to any scene.
    pub fn from_panel(panel: ScriptPanel, roster: &[Character], scenes: &[Scene]) -> Self {
        let mut frame = Self {
            id: Uuid::new_v4().to_string(),
            panel,
            image: None,
            prompt: String::new(),
            status: FrameStatus::default(),
            scene_id: None,
            audio: None,
            audio_status: AudioStatus::default(),
        };
        frame.refresh_prompt(roster, scenes);
        frame
    }

    /// The bound scene, if it is in `scenes`.
    pub fn bound_scene<'a>(&self, scenes: &'a [Scene]) -> Option<&'a Scene> {
        let scene_id = self.scene_id.as_deref()?;
        scenes.iter().find(|scene| scene.id == scene_id)
    }

    /// Prompt for the current panel fields and bindings.
    pub fn expected_prompt(&self, roster: &[Character], scenes: &[Scene]) -> String {
        panel_prompt(&self.panel, roster, self.bound_scene(scenes))
    }

    /// Recompute the stored prompt, e.g. after the caller edited a character.
    pub fn refresh_prompt(&mut self, roster: &[Character], scenes: &[Scene]) {
        self.prompt = self.expected_prompt(roster, scenes);
    }

    /// Replace the visual action.
    pub fn set_description(
        &mut self,
        description: impl Into<String>,
        roster: &[Character],
        scenes: &[Scene],
    ) {
        self.panel.description = description.into();
        self.refresh_prompt(roster, scenes);
    }

    /// Replace or clear the dialogue.
    pub fn set_dialogue(&mut self, dialogue: Option<String>, roster: &[Character], scenes: &[Scene]) {
        self.panel.dialogue = dialogue;
        self.refresh_prompt(roster, scenes);
    }

    /// Replace or clear the shot label.
    pub fn set_camera(&mut self, camera: Option<String>, roster: &[Character], scenes: &[Scene]) {
        self.panel.camera = camera;
        self.refresh_prompt(roster, scenes);
    }

    /// Replace the characters present.
    pub fn set_characters(
        &mut self,
        characters: Vec<String>,
        roster: &[Character],
        scenes: &[Scene],
    ) {
        self.panel.characters = characters;
        self.refresh_prompt(roster, scenes);
    }

    /// Bind to a scene, or unbind with `None`.
    pub fn bind_scene(&mut self, scene_id: Option<String>, roster: &[Character], scenes: &[Scene]) {
        self.scene_id = scene_id;
        self.refresh_prompt(roster, scenes);
    }

    /// Mark the image as in flight.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the frame is pending, done, or errored.
    pub fn begin_generation(&mut self) -> StoryboardResult<()> {
        self.move_status(FrameStatus::Generating)
    }

    /// Store a generated image and the prompt that produced it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the frame is generating.
    pub fn complete_generation(
        &mut self,
        image: ImageReference,
        prompt: String,
    ) -> StoryboardResult<()> {
        self.move_status(FrameStatus::Done)?;
        self.image = Some(image);
        self.prompt = prompt;
        Ok(())
    }

    /// Record a failed image generation. Any previous image is kept.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the frame is generating.
    pub fn fail_generation(&mut self) -> StoryboardResult<()> {
        self.move_status(FrameStatus::Error)
    }

    /// Mark dialogue audio as in flight.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless audio is idle, done, or errored.
    pub fn begin_audio(&mut self) -> StoryboardResult<()> {
        self.move_audio(AudioStatus::Generating)
    }

    /// Store synthesized audio, returning the reference it replaces so the
    /// caller can revoke it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless audio is generating.
    pub fn complete_audio(
        &mut self,
        audio: AudioReference,
    ) -> StoryboardResult<Option<AudioReference>> {
        self.move_audio(AudioStatus::Done)?;
        Ok(self.audio.replace(audio))
    }

    /// Record a failed synthesis.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless audio is generating.
    pub fn fail_audio(&mut self) -> StoryboardResult<()> {
        self.move_audio(AudioStatus::Error)
    }

    fn move_status(&mut self, next: FrameStatus) -> StoryboardResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(invalid_transition("status", self.status, next));
        }
        self.status = next;
        Ok(())
    }

    fn move_audio(&mut self, next: AudioStatus) -> StoryboardResult<()> {
        if !self.audio_status.can_transition_to(next) {
            return Err(invalid_transition("audio", self.audio_status, next));
        }
        self.audio_status = next;
        Ok(())
    }
}

#[track_caller]
fn invalid_transition(
    machine: &'static str,
    from: impl std::fmt::Display,
    to: impl std::fmt::Display,
) -> storyboard_error::StoryboardError {
    FrameError::new(FrameErrorKind::InvalidTransition {
        machine,
        from: from.to_string(),
        to: to.to_string(),
    })
    .into()
}
