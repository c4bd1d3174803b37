//! Tests for two-phase script extraction.

mod test_utils;

use std::sync::Arc;
use storyboard_core::{ResponseFormat, ScriptPanel};
use storyboard_error::{RetryableError, StoryboardErrorKind};
use storyboard_narrative::{
    ESTABLISHING_SHOT_DESCRIPTION, EntityExtractor, parse_panels, parse_world_info,
};
use storyboard_rate_limit::RetryPolicy;
use test_utils::{MockDriver, MockResponse, invalid_argument, unavailable};

const SCRIPT: &str = "INT. NIGHT MARKET - NIGHT\nAlice weaves between stalls. Bob calls out to her.";

fn extractor(driver: Arc<MockDriver>) -> EntityExtractor {
    EntityExtractor::new(driver, "text-model", RetryPolicy::new(2, 10), "Simplified Chinese")
}

#[tokio::test]
async fn world_info_reads_characters_and_scenes() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::with_responses([MockResponse::Text(
        r#"{
            "characters": [
                {"name": "Alice", "description": "A courier", "visualPrompt": "Short red hair"},
                {"name": "Bob", "description": "A vendor", "visualPrompt": "Grey apron"}
            ],
            "scenes": [
                {"name": "Night Market", "description": "Busy stalls", "visualPrompt": "Neon lanterns"}
            ]
        }"#
        .to_string(),
    )]));

    let world = extractor(driver.clone()).extract_world_info(SCRIPT).await?;

    assert_eq!(world.character_names(), vec!["Alice", "Bob"]);
    assert_eq!(world.characters[0].visual_prompt, "Short red hair");
    assert_eq!(world.scenes.len(), 1);
    assert_eq!(world.scenes[0].visual_prompt, "Neon lanterns");
    Ok(())
}

#[tokio::test]
async fn world_info_request_is_json_mode_with_locale() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::with_responses([MockResponse::Text(
        r#"{"characters": [], "scenes": []}"#.to_string(),
    )]));

    extractor(driver.clone()).extract_world_info(SCRIPT).await?;

    let requests = driver.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "text-model");
    assert!(requests[0].prompt.contains("Simplified Chinese"));
    assert!(requests[0].prompt.contains(SCRIPT));
    match &requests[0].response {
        ResponseFormat::Json { schema } => {
            assert!(schema["properties"]["characters"].is_object());
            assert!(schema["properties"]["scenes"].is_object());
        }
        other => panic!("expected JSON mode, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn missing_arrays_default_to_empty() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::with_responses([MockResponse::Text(
        r#"{"characters": [{"name": "Alice"}]}"#.to_string(),
    )]));

    let world = extractor(driver).extract_world_info(SCRIPT).await?;

    assert_eq!(world.characters.len(), 1);
    assert_eq!(world.characters[0].description, "");
    assert!(world.scenes.is_empty());
    Ok(())
}

#[tokio::test]
async fn fenced_response_is_accepted() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::with_responses([MockResponse::Text(
        "```json\n{\"characters\": [], \"scenes\": [{\"name\": \"Dock\"}]}\n```".to_string(),
    )]));

    let world = extractor(driver).extract_world_info(SCRIPT).await?;
    assert_eq!(world.scenes[0].name, "Dock");
    Ok(())
}

#[tokio::test]
async fn invalid_json_is_a_parse_error_and_not_retried() {
    let driver = Arc::new(MockDriver::with_responses([MockResponse::Text(
        "I'm sorry, I can't analyze this script.".to_string(),
    )]));

    let err = extractor(driver.clone())
        .extract_world_info(SCRIPT)
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), StoryboardErrorKind::Json(_)));
    assert!(!err.is_retryable());
    assert_eq!(driver.call_count(), 1);
}

#[tokio::test]
async fn absent_body_is_a_parse_error() {
    let driver = Arc::new(MockDriver::with_responses([MockResponse::Empty]));

    let err = extractor(driver).extract_world_info(SCRIPT).await.unwrap_err();
    assert!(matches!(err.kind(), StoryboardErrorKind::Json(_)));
}

#[test]
fn non_object_world_info_is_rejected() {
    let err = parse_world_info(&serde_json::json!([1, 2, 3])).unwrap_err();
    assert!(matches!(err.kind(), StoryboardErrorKind::Json(_)));
}

#[tokio::test(start_paused = true)]
async fn transient_failures_are_retried() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::with_responses([
        MockResponse::Error(unavailable()),
        MockResponse::Error(unavailable()),
        MockResponse::Text(r#"{"characters": [], "scenes": []}"#.to_string()),
    ]));

    let world = extractor(driver.clone()).extract_world_info(SCRIPT).await?;

    assert!(world.characters.is_empty());
    assert_eq!(driver.call_count(), 3);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_surface_the_provider_error() {
    let driver = Arc::new(MockDriver::with_responses(
        std::iter::repeat_with(|| MockResponse::Error(unavailable())).take(5),
    ));

    let err = extractor(driver.clone())
        .extract_world_info(SCRIPT)
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), StoryboardErrorKind::Gemini(_)));
    assert!(err.to_string().contains("UNAVAILABLE: The model is overloaded"));
    assert_eq!(driver.call_count(), 3);
}

#[tokio::test]
async fn permanent_failures_are_not_retried() {
    let driver = Arc::new(MockDriver::with_responses([MockResponse::Error(
        invalid_argument(),
    )]));

    extractor(driver.clone())
        .extract_world_info(SCRIPT)
        .await
        .unwrap_err();
    assert_eq!(driver.call_count(), 1);
}

#[tokio::test]
async fn panels_keep_provider_order_and_fields() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::with_responses([MockResponse::Text(
        r#"[
            {"panelNumber": 2, "description": "Bob waves", "characters": ["Bob"], "dialogue": "Over here!", "camera": "Wide shot"},
            {"panelNumber": 1, "description": "Alice turns", "characters": ["Alice"], "dialogue": "", "camera": "Close-up"}
        ]"#
        .to_string(),
    )]));

    let names = vec!["Alice".to_string(), "Bob".to_string()];
    let panels = extractor(driver.clone()).analyze_script(SCRIPT, &names).await?;

    assert_eq!(
        panels,
        vec![
            ScriptPanel::new(2, "Bob waves")
                .with_characters(["Bob"])
                .with_dialogue("Over here!")
                .with_camera("Wide shot"),
            ScriptPanel::new(1, "Alice turns")
                .with_characters(["Alice"])
                .with_camera("Close-up"),
        ]
    );

    let prompt = &driver.requests()[0].prompt;
    assert!(prompt.contains("Alice, Bob"));
    assert!(prompt.contains("Simplified Chinese"));
    Ok(())
}

#[tokio::test]
async fn chinese_dialogue_recovers_missing_description() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::with_responses([MockResponse::Text(
        r#"{"panels": [
            {"panelNumber": 1, "description": "", "characters": ["李雷", "韩梅梅"], "dialogue": "你好吗最近怎么样"}
        ]}"#
        .to_string(),
    )]));

    let panels = extractor(driver).analyze_script(SCRIPT, &[]).await?;

    assert_eq!(
        panels[0].description,
        "李雷, 韩梅梅 saying: \"你好吗最近怎么样...\". Cinematic lighting, detailed expression."
    );
    assert!(panels[0].description.contains("你好吗最近怎么样"));
    Ok(())
}

#[test]
fn sentinel_description_is_recovered() {
    let value = serde_json::json!([
        {"panelNumber": 1, "description": "No description generated.", "characters": [], "dialogue": "Run!"},
        {"panelNumber": 2, "description": "   ", "characters": ["Alice"]}
    ]);

    let panels = parse_panels(&value).unwrap();

    assert_eq!(
        panels[0].description,
        "Character saying: \"Run!...\". Cinematic lighting, detailed expression."
    );
    assert_eq!(panels[1].description, ESTABLISHING_SHOT_DESCRIPTION);
}

#[test]
fn long_dialogue_is_truncated_to_fifteen_characters() {
    let value = serde_json::json!([
        {"description": "", "characters": ["Alice"], "dialogue": "abcdefghijklmnopqrstuvwxyz"}
    ]);

    let panels = parse_panels(&value).unwrap();
    assert!(panels[0].description.contains("\"abcdefghijklmno...\""));
}

#[test]
fn panel_numbers_default_to_zero() {
    let value = serde_json::json!([
        {"description": "a"},
        {"panelNumber": "three", "description": "b"},
        {"panelNumber": "4", "description": "c"},
        {"panelNumber": null, "description": "d"}
    ]);

    let numbers: Vec<u32> = parse_panels(&value)
        .unwrap()
        .iter()
        .map(|panel| panel.panel_number)
        .collect();
    assert_eq!(numbers, vec![0, 0, 4, 0]);
}

#[test]
fn scalar_panel_response_is_rejected() {
    let err = parse_panels(&serde_json::json!("panels")).unwrap_err();
    assert!(matches!(err.kind(), StoryboardErrorKind::Json(_)));

    let err = parse_panels(&serde_json::json!({"shots": []})).unwrap_err();
    assert!(matches!(err.kind(), StoryboardErrorKind::Json(_)));
}
