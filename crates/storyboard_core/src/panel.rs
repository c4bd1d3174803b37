//! Script panels produced by shot breakdown.

use serde::{Deserialize, Serialize};

/// One shot of the script, as returned by panel analysis.
///
/// `panel_number` is assigned once during analysis and never renumbered.
///
/// # Examples
///
/// ```
/// use storyboard_core::ScriptPanel;
///
/// let panel = ScriptPanel::new(1, "Alice opens the door")
///     .with_characters(["Alice"])
///     .with_dialogue("Hello?")
///     .with_camera("Close-up");
///
/// assert_eq!(panel.characters, vec!["Alice".to_string()]);
/// assert!(panel.has_dialogue());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ScriptPanel {
    /// Sequence position
    pub panel_number: u32,
    /// Visual action text
    pub description: String,
    /// Characters present, in order of mention
    pub characters: Vec<String>,
    /// Spoken line, if any
    pub dialogue: Option<String>,
    /// Camera / shot-type label, if any
    pub camera: Option<String>,
}

impl ScriptPanel {
    /// Create a panel with no characters, dialogue, or camera label.
    pub fn new(panel_number: u32, description: impl Into<String>) -> Self {
        Self {
            panel_number,
            description: description.into(),
            ..Default::default()
        }
    }

    /// Builder-style character list setter.
    pub fn with_characters<I, S>(mut self, characters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.characters = characters.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style dialogue setter.
    pub fn with_dialogue(mut self, dialogue: impl Into<String>) -> Self {
        self.dialogue = Some(dialogue.into());
        self
    }

    /// Builder-style camera label setter.
    pub fn with_camera(mut self, camera: impl Into<String>) -> Self {
        self.camera = Some(camera.into());
        self
    }

    /// True when the panel carries non-blank dialogue.
    pub fn has_dialogue(&self) -> bool {
        self.dialogue
            .as_deref()
            .is_some_and(|line| !line.trim().is_empty())
    }
}
