//! Two-phase script analysis: world extraction, then shot breakdown.

use crate::json::parse_json_value;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use storyboard_core::{EntityDraft, GenerateRequest, ResponseFormat, ScriptPanel, WorldInfo};
use storyboard_error::{JsonError, StoryboardResult};
use storyboard_interface::GenerativeDriver;
use storyboard_rate_limit::{RetryPolicy, invoke};
use tracing::{debug, instrument, warn};

/// Placeholder some models emit instead of leaving the action text empty.
pub const MISSING_DESCRIPTION_SENTINEL: &str = "No description generated.";

/// Replacement action text for a panel with neither description nor dialogue.
pub const ESTABLISHING_SHOT_DESCRIPTION: &str =
    "Establishing shot of the location. Cinematic lighting, atmospheric composition, no characters in focus.";

/// Characters of dialogue quoted in a recovered description.
const DIALOGUE_PREVIEW_CHARS: usize = 15;

/// Runs both extraction phases against a text model.
#[derive(Clone)]
pub struct EntityExtractor {
    driver: Arc<dyn GenerativeDriver>,
    model: String,
    policy: RetryPolicy,
    locale: String,
}

impl std::fmt::Debug for EntityExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityExtractor")
            .field("provider", &self.driver.provider_name())
            .field("model", &self.model)
            .field("policy", &self.policy)
            .field("locale", &self.locale)
            .finish()
    }
}

impl EntityExtractor {
    /// Create an extractor.
    ///
    /// `locale` names the language every extracted text field is written in,
    /// whatever language the script itself uses.
    pub fn new(
        driver: Arc<dyn GenerativeDriver>,
        model: impl Into<String>,
        policy: RetryPolicy,
        locale: impl Into<String>,
    ) -> Self {
        Self {
            driver,
            model: model.into(),
            policy,
            locale: locale.into(),
        }
    }

    /// Phase one: identify the characters and scenes of a script.
    ///
    /// # Errors
    ///
    /// Returns a `JsonError` if the response is absent or not JSON, or the
    /// provider error once retries are exhausted.
    #[instrument(skip(self, script), fields(model = %self.model, script_len = script.len()))]
    pub async fn extract_world_info(&self, script: &str) -> StoryboardResult<WorldInfo> {
        let prompt = world_info_prompt(script, &self.locale);
        let value = self.request_json(prompt, world_info_schema()).await?;
        let world = parse_world_info(&value)?;

        debug!(
            characters = world.characters.len(),
            scenes = world.scenes.len(),
            "Extracted world info"
        );
        Ok(world)
    }

    /// Phase two: break a script into ordered shot panels.
    ///
    /// `character_names` are the phase-one names the model should reuse.
    /// Panels with missing action text are repaired with
    /// [`recover_description`].
    ///
    /// # Errors
    ///
    /// Same contract as [`EntityExtractor::extract_world_info`].
    #[instrument(
        skip(self, script, character_names),
        fields(model = %self.model, script_len = script.len(), known = character_names.len())
    )]
    pub async fn analyze_script(
        &self,
        script: &str,
        character_names: &[String],
    ) -> StoryboardResult<Vec<ScriptPanel>> {
        let prompt = panel_prompt(script, character_names, &self.locale);
        let value = self.request_json(prompt, panels_schema()).await?;
        let panels = parse_panels(&value)?;

        debug!(panels = panels.len(), "Analyzed script");
        Ok(panels)
    }

    async fn request_json(&self, prompt: String, schema: Value) -> StoryboardResult<Value> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt,
            response: ResponseFormat::Json { schema },
        };

        let response = invoke(self.policy, || self.driver.generate(&request)).await?;
        parse_json_value(&response.text())
    }
}

fn world_info_prompt(script: &str, locale: &str) -> String {
    format!(
        "Analyze the following script and identify every character and every distinct \
         location.\n\
         For each character give a name, a one-sentence description, and a visualPrompt: a \
         detailed, reusable description of their appearance (face, hair, build, clothing, \
         colors, distinguishing features).\n\
         For each scene give a name, a one-sentence description, and a visualPrompt describing \
         the environment (architecture, lighting, palette, weather, mood).\n\
         Write every text field in {locale}, regardless of the script's language.\n\n\
         SCRIPT:\n{script}"
    )
}

fn panel_prompt(script: &str, character_names: &[String], locale: &str) -> String {
    let known = if character_names.is_empty() {
        "(none identified)".to_string()
    } else {
        character_names.join(", ")
    };

    format!(
        "Break the following script into an ordered sequence of storyboard panels, one per \
         shot.\n\
         For each panel give: panelNumber (starting at 1), description (the visual action, \
         never empty), characters (names present, using the known names exactly), dialogue \
         (the spoken line, or empty), and camera (shot type, e.g. Close-up, Wide shot).\n\
         Known characters: {known}\n\
         Write every text field in {locale}, regardless of the script's language.\n\n\
         SCRIPT:\n{script}"
    )
}

fn entity_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": {"type": "STRING"},
                "description": {"type": "STRING"},
                "visualPrompt": {"type": "STRING"}
            },
            "required": ["name", "description", "visualPrompt"]
        }
    })
}

fn world_info_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "characters": entity_schema(),
            "scenes": entity_schema()
        },
        "required": ["characters", "scenes"]
    })
}

fn panels_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "panelNumber": {"type": "INTEGER"},
                "description": {"type": "STRING"},
                "characters": {"type": "ARRAY", "items": {"type": "STRING"}},
                "dialogue": {"type": "STRING"},
                "camera": {"type": "STRING"}
            },
            "required": ["panelNumber", "description", "characters"]
        }
    })
}

/// Read a phase-one response.
///
/// Missing or non-array `characters` / `scenes` become empty lists; entries that
/// are not objects are skipped.
///
/// # Errors
///
/// Returns a `JsonError` if the top level is not an object.
pub fn parse_world_info(value: &Value) -> StoryboardResult<WorldInfo> {
    let object = value.as_object().ok_or_else(|| {
        tracing::error!(kind = json_kind(value), "World info response is not an object");
        JsonError::new(format!(
            "Expected a JSON object with characters and scenes, got {}",
            json_kind(value)
        ))
    })?;

    Ok(WorldInfo {
        characters: drafts(object, "characters"),
        scenes: drafts(object, "scenes"),
    })
}

fn drafts(object: &Map<String, Value>, key: &str) -> Vec<EntityDraft> {
    object
        .get(key)
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_object)
                .map(|entry| EntityDraft {
                    name: string_field(entry, &["name"]),
                    description: string_field(entry, &["description"]),
                    visual_prompt: string_field(entry, &["visualPrompt", "visual_prompt"]),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Read a phase-two response and repair each panel.
///
/// Accepts a bare array or an object holding a `panels` array. Panel order is
/// the response order.
///
/// # Errors
///
/// Returns a `JsonError` for any other shape.
pub fn parse_panels(value: &Value) -> StoryboardResult<Vec<ScriptPanel>> {
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(object) => match object.get("panels") {
            Some(Value::Array(entries)) => entries,
            _ => {
                tracing::error!("Panel response object has no panels array");
                return Err(JsonError::new("Expected a panels array in the response").into());
            }
        },
        other => {
            tracing::error!(kind = json_kind(other), "Panel response is not an array");
            return Err(JsonError::new(format!(
                "Expected a JSON array of panels, got {}",
                json_kind(other)
            ))
            .into());
        }
    };

    let panels = entries
        .iter()
        .filter_map(Value::as_object)
        .map(|entry| {
            let mut panel = ScriptPanel {
                panel_number: panel_number(entry.get("panelNumber").or(entry.get("panel_number"))),
                description: string_field(entry, &["description", "visualAction"]),
                characters: character_list(entry.get("characters")),
                dialogue: optional_field(entry, &["dialogue"]),
                camera: optional_field(entry, &["camera", "shotType"]),
            };
            recover_description(&mut panel);
            panel
        })
        .collect();

    Ok(panels)
}

/// True when a panel's action text must be synthesized.
pub fn needs_recovery(description: &str) -> bool {
    let description = description.trim();
    description.is_empty() || description == MISSING_DESCRIPTION_SENTINEL
}

/// Replace missing action text in place.
///
/// With dialogue present the description quotes its first 15 characters,
/// attributed to the panel's characters (or "Character"). Otherwise a generic
/// establishing shot is used. Panels with real action text are left unchanged.
///
/// # Examples
///
/// ```
/// use storyboard_core::ScriptPanel;
/// use storyboard_narrative::recover_description;
///
/// let mut panel = ScriptPanel::new(2, "")
///     .with_characters(["Alice", "Bob"])
///     .with_dialogue("Where were you last night?");
/// recover_description(&mut panel);
///
/// assert_eq!(
///     panel.description,
///     "Alice, Bob saying: \"Where were you ...\". Cinematic lighting, detailed expression."
/// );
/// ```
pub fn recover_description(panel: &mut ScriptPanel) {
    if !needs_recovery(&panel.description) {
        return;
    }

    let recovered = match panel.dialogue.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(dialogue) => {
            let speakers = if panel.characters.is_empty() {
                "Character".to_string()
            } else {
                panel.characters.join(", ")
            };
            let preview: String = dialogue.chars().take(DIALOGUE_PREVIEW_CHARS).collect();
            format!(
                "{speakers} saying: \"{preview}...\". Cinematic lighting, detailed expression."
            )
        }
        None => ESTABLISHING_SHOT_DESCRIPTION.to_string(),
    };

    warn!(
        panel_number = panel.panel_number,
        "Panel had no visual action, synthesized a description"
    );
    panel.description = recovered;
}

/// Integer, float, or numeric-string index; anything else is 0.
fn panel_number(value: Option<&Value>) -> u32 {
    let number = match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<u64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f as u64)
            })
        }
        _ => None,
    };

    number
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or_default()
}

fn character_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(names)) => names
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect(),
        Some(Value::String(name)) if !name.trim().is_empty() => vec![name.trim().to_string()],
        _ => Vec::new(),
    }
}

fn string_field(entry: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| entry.get(*key).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

fn optional_field(entry: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    let value = string_field(entry, keys);
    (!value.trim().is_empty()).then_some(value)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
