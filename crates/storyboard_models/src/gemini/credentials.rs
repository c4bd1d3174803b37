//! API key resolution.

use storyboard_error::{GeminiError, GeminiErrorKind, StoryboardResult};

/// Environment variables consulted, in order, when no override is given.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Resolve the Gemini API key from an override or the process environment.
///
/// # Errors
///
/// Returns `MissingApiKey` when neither the override nor any of
/// [`API_KEY_VARS`] holds a non-blank value.
pub fn resolve_api_key(override_key: Option<&str>) -> StoryboardResult<String> {
    resolve_api_key_from(override_key, |name| std::env::var(name).ok())
}

/// Resolve the API key against an arbitrary variable lookup.
///
/// # Examples
///
/// ```
/// use storyboard_models::resolve_api_key_from;
///
/// let env = |name: &str| (name == "API_KEY").then(|| "from-env".to_string());
///
/// assert_eq!(resolve_api_key_from(Some("explicit"), env).unwrap(), "explicit");
/// assert_eq!(resolve_api_key_from(Some("   "), env).unwrap(), "from-env");
/// assert!(resolve_api_key_from(None, |_| None).is_err());
/// ```
pub fn resolve_api_key_from<F>(override_key: Option<&str>, lookup: F) -> StoryboardResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |key: &str| {
        let key = key.trim();
        (!key.is_empty()).then(|| key.to_string())
    };

    override_key
        .and_then(non_blank)
        .or_else(|| {
            API_KEY_VARS
                .iter()
                .find_map(|name| lookup(*name).as_deref().and_then(non_blank))
        })
        .ok_or_else(|| GeminiError::new(GeminiErrorKind::MissingApiKey).into())
}
