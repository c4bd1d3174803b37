//! Characters, scenes, and the drafts script extraction produces.

use crate::ImageReference;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A character or scene as first identified in the script.
///
/// `visual_prompt` becomes the entity's visual DNA once promoted.
///
/// # Examples
///
/// ```
/// use storyboard_core::{Character, EntityDraft};
///
/// let draft = EntityDraft {
///     name: "Alice".to_string(),
///     description: "A curious courier".to_string(),
///     visual_prompt: "Short red hair, green bomber jacket".to_string(),
/// };
/// let alice = Character::from_draft(&draft);
/// assert_eq!(alice.visual_dna, draft.visual_prompt);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDraft {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Short description
    #[serde(default)]
    pub description: String,
    /// Long-form visual description
    #[serde(default)]
    pub visual_prompt: String,
}

/// Phase-one extraction result.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorldInfo {
    /// Characters found in the script
    #[serde(default)]
    pub characters: Vec<EntityDraft>,
    /// Scenes found in the script
    #[serde(default)]
    pub scenes: Vec<EntityDraft>,
}

impl WorldInfo {
    /// Names of all extracted characters, in extraction order.
    pub fn character_names(&self) -> Vec<String> {
        self.characters.iter().map(|c| c.name.clone()).collect()
    }
}

/// A character owned by the surrounding application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Character {
    /// Stable identifier
    pub id: String,
    /// Display name, matched against panel character lists
    pub name: String,
    /// Short description
    pub description: String,
    /// Canonical visual description reused across generations
    pub visual_dna: String,
    /// Generated character sheet, if any
    pub image: Option<ImageReference>,
    /// Preset voice used for this character's dialogue
    pub default_voice: Option<String>,
}

impl Character {
    /// Create a character with a fresh identifier.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        visual_dna: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            visual_dna: visual_dna.into(),
            image: None,
            default_voice: None,
        }
    }

    /// Promote an extraction draft.
    pub fn from_draft(draft: &EntityDraft) -> Self {
        Self::new(&draft.name, &draft.description, &draft.visual_prompt)
    }

    /// Builder-style default voice setter.
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.default_voice = Some(voice.into());
        self
    }
}

/// A location owned by the surrounding application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scene {
    /// Stable identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Short description
    pub description: String,
    /// Canonical visual description reused across generations
    pub visual_dna: String,
    /// Wide-angle concept art, if generated
    pub panorama: Option<ImageReference>,
    /// Nine-panel detail grid, if generated
    pub detail_grid: Option<ImageReference>,
}

impl Scene {
    /// Create a scene with a fresh identifier.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        visual_dna: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            visual_dna: visual_dna.into(),
            panorama: None,
            detail_grid: None,
        }
    }

    /// Promote an extraction draft.
    pub fn from_draft(draft: &EntityDraft) -> Self {
        Self::new(&draft.name, &draft.description, &draft.visual_prompt)
    }
}
