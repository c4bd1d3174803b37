//! Prompt templates.
//!
//! Every function here is pure: identical inputs always produce byte-identical
//! prompts, so a prompt can be previewed before anything is generated.

use storyboard_core::{Character, Scene, ScriptPanel};

const PANEL_PREAMBLE: &str = "Cinematic storyboard panel, digital painting. Consistent character \
designs, dramatic lighting, clear staging, high detail, no text, no speech bubbles, no panel borders.";

const DEFAULT_CAMERA: &str = "Medium shot";

const GENERIC_LOCATION: &str =
    "Atmospheric, softly lit environment that matches the mood of the action.";

const NO_CHARACTERS: &str = "No characters are visible in this shot.";

/// Multi-view character reference sheet.
///
/// # Examples
///
/// ```
/// use storyboard_core::Character;
/// use storyboard_narrative::character_sheet_prompt;
///
/// let alice = Character::new("Alice", "Courier", "Short red hair, green bomber jacket");
/// let prompt = character_sheet_prompt(&alice);
/// assert!(prompt.contains("Alice"));
/// assert!(prompt.contains("Short red hair, green bomber jacket"));
/// ```
pub fn character_sheet_prompt(character: &Character) -> String {
    format!(
        "Character reference sheet for \"{name}\".\n\
         Layout on a plain neutral background:\n\
         - Three full-body poses: front view, side view, back view\n\
         - Two close-up inserts of facial expressions: neutral and emotional\n\
         - One detail insert of a signature accessory or clothing element\n\
         Keep proportions, colors, and costume identical across every view.\n\n\
         CHARACTER DESIGN:\n{dna}",
        name = character.name,
        dna = character.visual_dna,
    )
}

/// Wide-angle establishing concept art, explicitly without characters.
pub fn scene_panorama_prompt(scene: &Scene) -> String {
    format!(
        "Wide-angle panoramic concept art of the location \"{name}\".\n\
         Environment only: no people, no characters, no figures.\n\
         Cinematic composition, strong sense of depth and scale, detailed lighting.\n\n\
         LOCATION DESIGN:\n{dna}",
        name = scene.name,
        dna = scene.visual_dna,
    )
}

/// Nine-panel grid of technical environment details.
pub fn scene_detail_grid_prompt(scene: &Scene) -> String {
    format!(
        "A 3x3 grid of nine detail studies of the location \"{name}\".\n\
         Each cell shows one close-up technical detail: materials and textures, props, \
         architectural elements, signage, lighting fixtures, and surfaces.\n\
         No characters. Consistent palette and lighting across all nine cells.\n\n\
         LOCATION DESIGN:\n{dna}",
        name = scene.name,
        dna = scene.visual_dna,
    )
}

/// Full prompt for one storyboard panel.
///
/// Sections, in order: style preamble, action and shot, location, characters.
/// Each name in the panel is resolved with [`resolve_character`]; unmatched
/// names get a generic placeholder line.
///
/// # Examples
///
/// ```
/// use storyboard_core::{Character, ScriptPanel};
/// use storyboard_narrative::panel_prompt;
///
/// let roster = vec![Character::new("Alice", "Courier", "Short red hair")];
/// let panel = ScriptPanel::new(1, "Alice sprints across a rooftop")
///     .with_characters(["AliceSmith", "Bob"])
///     .with_camera("Wide shot");
///
/// let prompt = panel_prompt(&panel, &roster, None);
/// assert!(prompt.contains("Wide shot: Alice sprints across a rooftop"));
/// assert!(prompt.contains("Short red hair"));
/// assert!(prompt.contains("Bob: a character not described in the roster"));
/// ```
pub fn panel_prompt(panel: &ScriptPanel, roster: &[Character], scene: Option<&Scene>) -> String {
    let camera = panel
        .camera
        .as_deref()
        .map(str::trim)
        .filter(|camera| !camera.is_empty())
        .unwrap_or(DEFAULT_CAMERA);

    let location = match scene {
        Some(scene) => format!("{}: {}", scene.name, scene.visual_dna),
        None => GENERIC_LOCATION.to_string(),
    };

    let characters = if panel.characters.is_empty() {
        NO_CHARACTERS.to_string()
    } else {
        panel
            .characters
            .iter()
            .map(|name| match resolve_character(name, roster) {
                Some(character) => format!("- {}: {}", character.name, character.visual_dna),
                None => format!(
                    "- {}: a character not described in the roster; keep their design simple and consistent.",
                    name.trim()
                ),
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "{PANEL_PREAMBLE}\n\n\
         ACTION & SHOT:\n{camera}: {description}\n\n\
         LOCATION:\n{location}\n\n\
         CHARACTERS:\n{characters}",
        description = panel.description.trim(),
    )
}

/// Find the roster entry a panel's character name refers to.
///
/// An exact match anywhere in the roster wins. Otherwise the first character
/// whose name contains, or is contained in, `name` is returned. Empty names
/// never match.
///
/// Containment is deliberately loose: a roster entry "Li" also matches "Liu".
///
/// # Examples
///
/// ```
/// use storyboard_core::Character;
/// use storyboard_narrative::resolve_character;
///
/// let roster = vec![
///     Character::new("Alice", "", "red hair"),
///     Character::new("Alice Smith", "", "grey hair"),
/// ];
///
/// assert_eq!(resolve_character("Alice Smith", &roster).unwrap().visual_dna, "grey hair");
/// assert_eq!(resolve_character("AliceSmith", &roster).unwrap().visual_dna, "red hair");
/// assert!(resolve_character("Bob", &roster).is_none());
/// ```
pub fn resolve_character<'a>(name: &str, roster: &'a [Character]) -> Option<&'a Character> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    roster
        .iter()
        .find(|character| character.name.trim() == name)
        .or_else(|| {
            roster.iter().find(|character| {
                let candidate = character.name.trim();
                !candidate.is_empty() && (candidate.contains(name) || name.contains(candidate))
            })
        })
}
