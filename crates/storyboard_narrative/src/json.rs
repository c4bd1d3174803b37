//! Locating and parsing JSON in model responses.
//!
//! JSON-mode responses are normally bare JSON, but models still occasionally wrap
//! them in markdown fences or surround them with prose.

use serde_json::Value;
use storyboard_error::{JsonError, StoryboardResult};

/// Parse a response body as JSON.
///
/// The body is tried verbatim first, then whatever [`extract_json`] finds inside it.
///
/// # Errors
///
/// Returns a [`JsonError`] if the body is blank or no parseable JSON is found.
///
/// # Examples
///
/// ```
/// use storyboard_narrative::parse_json_value;
///
/// let value = parse_json_value("Sure!\n```json\n{\"scenes\": []}\n```").unwrap();
/// assert!(value["scenes"].is_array());
/// ```
pub fn parse_json_value(body: &str) -> StoryboardResult<Value> {
    if body.trim().is_empty() {
        tracing::error!("Response body was empty");
        return Err(JsonError::new("Response body was empty").into());
    }

    if let Ok(value) = serde_json::from_str::<Value>(body.trim()) {
        return Ok(value);
    }

    let candidate = extract_json(body)?;
    serde_json::from_str::<Value>(&candidate).map_err(|e| {
        let preview: String = candidate.chars().take(100).collect();
        tracing::error!(error = %e, json_preview = %preview, "JSON parsing failed");
        JsonError::new(format!("Failed to parse JSON: {} (JSON: {}...)", e, preview)).into()
    })
}

/// Extract the JSON text from a response that may contain markdown or prose.
///
/// Strategies, in order:
/// 1. A fenced code block (```` ```json ```` or a bare fence)
/// 2. Whichever balanced `{...}` or `[...]` structure opens first
///
/// # Errors
///
/// Returns a [`JsonError`] if no candidate is found.
pub fn extract_json(response: &str) -> StoryboardResult<String> {
    if let Some(fenced) = fenced_block(response) {
        return Ok(fenced);
    }

    let delimiters = match (response.find('{'), response.find('[')) {
        (Some(brace), Some(bracket)) if bracket < brace => [('[', ']'), ('{', '}')],
        _ => [('{', '}'), ('[', ']')],
    };

    delimiters
        .into_iter()
        .find_map(|(open, close)| balanced(response, open, close))
        .ok_or_else(|| {
            tracing::error!(response_length = response.len(), "No JSON found in response");
            JsonError::new(format!(
                "No JSON found in response (length: {})",
                response.len()
            ))
            .into()
        })
}

/// Content of the first fenced code block. An unterminated fence runs to the end.
fn fenced_block(response: &str) -> Option<String> {
    let start = response.find("```")?;
    let after_fence = start + 3;
    let body_start = response[after_fence..]
        .find('\n')
        .map(|n| after_fence + n + 1)
        .unwrap_or(after_fence);

    let body = match response[body_start..].find("```") {
        Some(end) => &response[body_start..body_start + end],
        None => &response[body_start..],
    };

    let body = body.trim();
    (!body.is_empty()).then(|| body.to_string())
}

/// First `open ... close` span with matched nesting, ignoring delimiters in strings.
fn balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in response[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(response[start..start + i + ch.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbatim_json_parses() {
        let value = parse_json_value(r#"{"characters": [{"name": "Alice"}]}"#).unwrap();
        assert_eq!(value["characters"][0]["name"], "Alice");
    }

    #[test]
    fn fenced_json_is_unwrapped() {
        let response = "Here you go:\n```json\n[{\"panelNumber\": 1}]\n```\nEnjoy!";
        assert_eq!(extract_json(response).unwrap(), "[{\"panelNumber\": 1}]");
    }

    #[test]
    fn unterminated_fence_runs_to_end() {
        let response = "```json\n{\"scenes\": []}";
        let value = parse_json_value(response).unwrap();
        assert!(value["scenes"].is_array());
    }

    #[test]
    fn array_preferred_when_it_opens_first() {
        let response = "Panels: [{\"a\": 1}, {\"b\": 2}] done";
        assert_eq!(extract_json(response).unwrap(), "[{\"a\": 1}, {\"b\": 2}]");
    }

    #[test]
    fn delimiters_inside_strings_are_ignored() {
        let response = r#"Result: {"dialogue": "She said \"}\" and left", "n": 1} trailing"#;
        let value = parse_json_value(response).unwrap();
        assert_eq!(value["n"], 1);
    }

    #[test]
    fn multibyte_text_is_handled() {
        let response = "结果：{\"name\": \"李雷\"}。";
        let value = parse_json_value(response).unwrap();
        assert_eq!(value["name"], "李雷");
    }

    #[test]
    fn plain_prose_is_an_error() {
        assert!(parse_json_value("I cannot help with that.").is_err());
        assert!(parse_json_value("   ").is_err());
    }

    #[test]
    fn truncated_json_is_an_error() {
        assert!(parse_json_value(r#"{"characters": [{"name": "Al"#).is_err());
    }
}
