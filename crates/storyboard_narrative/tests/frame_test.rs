//! Tests for storyboard frame state.

use std::time::Duration;
use storyboard_core::{AudioStatus, Character, FrameStatus, ImageReference, Scene, ScriptPanel};
use storyboard_error::{FrameErrorKind, StoryboardErrorKind};
use storyboard_narrative::{StoryboardFrame, panel_prompt};
use storyboard_storage::{AudioReference, InMemoryStorage, MediaMetadata, MediaStorage, MediaType};

fn fixtures() -> (Vec<Character>, Vec<Scene>) {
    (
        vec![
            Character::new("Alice", "Courier", "Short red hair"),
            Character::new("Bob", "Vendor", "Grey apron"),
        ],
        vec![Scene::new("Dock", "Harbor", "Fog over black water")],
    )
}

fn image() -> ImageReference {
    ImageReference::from_bytes(ImageReference::PNG, b"png")
}

async fn audio(storage: &InMemoryStorage) -> AudioReference {
    let media = storage
        .store(b"RIFF", &MediaMetadata::new(MediaType::Audio, "audio/wav"))
        .await
        .unwrap();
    AudioReference::new(media)
}

fn details(err: storyboard_error::StoryboardError) -> (String, String, String) {
    match err.kind() {
        StoryboardErrorKind::Frame(e) => match &e.kind {
            FrameErrorKind::InvalidTransition { machine, from, to } => {
                (machine.to_string(), from.clone(), to.clone())
            }
        },
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn new_frame_is_pending_idle_and_unbound() {
    let (roster, scenes) = fixtures();
    let panel = ScriptPanel::new(1, "Alice waits").with_characters(["Alice"]);

    let frame = StoryboardFrame::from_panel(panel.clone(), &roster, &scenes);

    assert_eq!(*frame.status(), FrameStatus::Pending);
    assert_eq!(*frame.audio_status(), AudioStatus::Idle);
    assert!(frame.scene_id().is_none());
    assert!(frame.image().is_none());
    assert_eq!(frame.prompt(), &panel_prompt(&panel, &roster, None));
}

#[test]
fn every_mutation_recomputes_the_prompt() {
    let (roster, scenes) = fixtures();
    let mut frame =
        StoryboardFrame::from_panel(ScriptPanel::new(1, "Alice waits"), &roster, &scenes);

    frame.set_description("Alice runs", &roster, &scenes);
    assert!(frame.prompt().contains("Alice runs"));

    frame.set_camera(Some("Low angle".to_string()), &roster, &scenes);
    assert!(frame.prompt().contains("Low angle: Alice runs"));

    frame.set_characters(vec!["Bob".to_string()], &roster, &scenes);
    assert!(frame.prompt().contains("Grey apron"));

    frame.set_dialogue(Some("Wait!".to_string()), &roster, &scenes);
    assert_eq!(frame.panel().dialogue.as_deref(), Some("Wait!"));

    frame.bind_scene(Some(scenes[0].id.clone()), &roster, &scenes);
    assert!(frame.prompt().contains("Fog over black water"));
    assert_eq!(frame.bound_scene(&scenes), Some(&scenes[0]));

    assert_eq!(frame.prompt(), &frame.expected_prompt(&roster, &scenes));

    frame.bind_scene(None, &roster, &scenes);
    assert!(!frame.prompt().contains("Fog over black water"));
}

#[test]
fn refresh_picks_up_roster_edits() {
    let (mut roster, scenes) = fixtures();
    let mut frame = StoryboardFrame::from_panel(
        ScriptPanel::new(1, "Alice waits").with_characters(["Alice"]),
        &roster,
        &scenes,
    );

    roster[0].visual_dna = "Long silver hair".to_string();
    assert_ne!(frame.prompt(), &frame.expected_prompt(&roster, &scenes));

    frame.refresh_prompt(&roster, &scenes);
    assert!(frame.prompt().contains("Long silver hair"));
}

#[test]
fn generation_records_the_prompt_used() -> anyhow::Result<()> {
    let (roster, scenes) = fixtures();
    let mut frame =
        StoryboardFrame::from_panel(ScriptPanel::new(1, "Alice waits"), &roster, &scenes);

    frame.begin_generation()?;
    assert_eq!(*frame.status(), FrameStatus::Generating);

    let used = frame.expected_prompt(&roster, &scenes);
    frame.complete_generation(image(), used.clone())?;

    assert_eq!(*frame.status(), FrameStatus::Done);
    assert_eq!(frame.prompt(), &used);
    assert_eq!(frame.image().as_ref(), Some(&image()));
    Ok(())
}

#[test]
fn error_cannot_jump_to_done() -> anyhow::Result<()> {
    let (roster, scenes) = fixtures();
    let mut frame =
        StoryboardFrame::from_panel(ScriptPanel::new(1, "Alice waits"), &roster, &scenes);

    frame.begin_generation()?;
    frame.fail_generation()?;
    assert_eq!(*frame.status(), FrameStatus::Error);

    let err = frame
        .complete_generation(image(), String::new())
        .unwrap_err();
    assert_eq!(
        details(err),
        ("status".to_string(), "error".to_string(), "done".to_string())
    );
    assert_eq!(*frame.status(), FrameStatus::Error);
    assert!(frame.image().is_none());

    frame.begin_generation()?;
    frame.complete_generation(image(), String::new())?;
    assert_eq!(*frame.status(), FrameStatus::Done);
    Ok(())
}

#[test]
fn pending_cannot_complete_or_fail() {
    let (roster, scenes) = fixtures();
    let mut frame =
        StoryboardFrame::from_panel(ScriptPanel::new(1, "Alice waits"), &roster, &scenes);

    assert!(frame.complete_generation(image(), String::new()).is_err());
    assert!(frame.fail_generation().is_err());
    assert_eq!(*frame.status(), FrameStatus::Pending);
}

#[tokio::test]
async fn audio_machine_is_independent() -> anyhow::Result<()> {
    let (roster, scenes) = fixtures();
    let storage = InMemoryStorage::new();
    let mut frame = StoryboardFrame::from_panel(
        ScriptPanel::new(1, "Alice waits").with_dialogue("Hello"),
        &roster,
        &scenes,
    );

    let err = frame.complete_audio(audio(&storage).await).unwrap_err();
    assert_eq!(
        details(err),
        ("audio".to_string(), "idle".to_string(), "done".to_string())
    );

    frame.begin_audio()?;
    frame.fail_audio()?;
    assert_eq!(*frame.audio_status(), AudioStatus::Error);
    assert_eq!(*frame.status(), FrameStatus::Pending);

    frame.begin_audio()?;
    let first = audio(&storage).await;
    assert!(frame.complete_audio(first.clone())?.is_none());

    frame.begin_audio()?;
    let second = audio(&storage).await;
    let replaced = frame.complete_audio(second.clone())?;

    assert_eq!(replaced, Some(first.clone()));
    assert_eq!(frame.audio().as_ref(), Some(&second));

    storage.delete(&first.media).await?;
    assert_eq!(
        storage.get_url(&second.media, Duration::from_secs(60)).await?,
        Some(second.url.clone())
    );
    Ok(())
}
