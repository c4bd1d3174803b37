//! Full pipeline command handler.

use super::artifacts::{slug, write_bytes, write_image, write_json};
use super::{CliResult, Session};
use serde_json::json;
use std::path::{Path, PathBuf};
use storyboard::{Character, MediaStorage, Scene, StoryboardFrame};
use tracing::{info, instrument, warn};

/// Options for a pipeline run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Script file
    pub script: PathBuf,
    /// Directory artifacts are written to
    pub out_dir: PathBuf,
    /// Skip character sheets and scene art
    pub skip_art: bool,
    /// Skip dialogue audio
    pub skip_audio: bool,
}

/// Script to storyboard: extract, analyze, render panels, voice dialogue.
///
/// Every frame is bound to the first extracted scene. Failed units are logged
/// and left in the `error` state; the run still writes everything that succeeded.
#[instrument(skip(session), fields(script = %options.script.display(), out_dir = %options.out_dir.display()))]
pub async fn run_pipeline(session: &Session, options: &RunOptions) -> CliResult<()> {
    let studio = &session.studio;
    let script = tokio::fs::read_to_string(&options.script).await?;

    let world = studio.extract_world_info(&script).await?;
    let mut roster: Vec<Character> = world.characters.iter().map(Character::from_draft).collect();
    let mut scenes: Vec<Scene> = world.scenes.iter().map(Scene::from_draft).collect();
    info!(characters = roster.len(), scenes = scenes.len(), "Extracted world");

    let panels = studio
        .analyze_script(&script, &world.character_names())
        .await?;
    let scene_id = scenes.first().map(|scene| scene.id.clone());
    let mut frames: Vec<StoryboardFrame> = panels
        .into_iter()
        .map(|panel| {
            let mut frame = StoryboardFrame::from_panel(panel, &roster, &scenes);
            frame.bind_scene(scene_id.clone(), &roster, &scenes);
            frame
        })
        .collect();
    info!(frames = frames.len(), "Analyzed script");

    if !options.skip_art {
        studio
            .generate_all_character_sheets(roster.clone(), |outcome| {
                if let (Some(character), Ok(image)) = (
                    roster.iter_mut().find(|c| c.id == outcome.unit_id),
                    outcome.result,
                ) {
                    character.image = Some(image);
                }
            })
            .await;

        studio
            .generate_all_scene_art(scenes.clone(), |outcome| {
                if let (Some(scene), Ok(art)) = (
                    scenes.iter_mut().find(|s| s.id == outcome.unit_id),
                    outcome.result,
                ) {
                    scene.panorama = Some(art.panorama);
                    scene.detail_grid = art.detail_grid.ok();
                }
            })
            .await;
    }

    for frame in &mut frames {
        frame.begin_generation()?;
    }
    let report = studio
        .generate_all_panel_images(frames.clone(), &roster, &scenes, |outcome| {
            let Some(frame) = frames.iter_mut().find(|f| f.id() == &outcome.unit_id) else {
                return;
            };
            let settled = match outcome.result {
                Ok(render) => frame.complete_generation(render.image, render.prompt),
                Err(_) => frame.fail_generation(),
            };
            if let Err(e) = settled {
                warn!(frame = %outcome.unit_id, error = %e, "Could not settle frame");
            }
        })
        .await;
    info!(completed = report.completed.len(), failed = report.failed.len(), "Rendered panels");

    if !options.skip_audio {
        for frame in frames.iter_mut().filter(|f| f.panel().has_dialogue()) {
            frame.begin_audio()?;
        }
        let report = studio
            .generate_all_dialogue_audio(frames.clone(), &roster, |outcome| {
                let Some(frame) = frames.iter_mut().find(|f| f.id() == &outcome.unit_id) else {
                    return;
                };
                let settled = match outcome.result {
                    Ok(audio) => frame.complete_audio(audio).map(|_| ()),
                    Err(_) => frame.fail_audio(),
                };
                if let Err(e) = settled {
                    warn!(frame = %outcome.unit_id, error = %e, "Could not settle frame audio");
                }
            })
            .await;
        info!(completed = report.completed.len(), failed = report.failed.len(), "Voiced dialogue");
    }

    write_artifacts(session, &options.out_dir, &roster, &scenes, &frames).await?;
    println!("{}", options.out_dir.display());
    Ok(())
}

async fn write_artifacts(
    session: &Session,
    out_dir: &Path,
    roster: &[Character],
    scenes: &[Scene],
    frames: &[StoryboardFrame],
) -> CliResult<()> {
    for (index, character) in roster.iter().enumerate() {
        if let Some(image) = &character.image {
            let stem = format!("{:02}-{}", index + 1, slug(&character.name));
            write_image(&out_dir.join("characters"), &stem, image).await?;
        }
    }

    for (index, scene) in scenes.iter().enumerate() {
        let stem = format!("{:02}-{}", index + 1, slug(&scene.name));
        if let Some(panorama) = &scene.panorama {
            write_image(&out_dir.join("scenes"), &format!("{}-panorama", stem), panorama).await?;
        }
        if let Some(grid) = &scene.detail_grid {
            write_image(&out_dir.join("scenes"), &format!("{}-details", stem), grid).await?;
        }
    }

    for (index, frame) in frames.iter().enumerate() {
        let stem = format!("panel-{:03}", index + 1);
        if let Some(image) = frame.image() {
            write_image(&out_dir.join("panels"), &stem, image).await?;
        }
        if let Some(audio) = frame.audio() {
            let wav = session.storage.retrieve(&audio.media).await?;
            write_bytes(&out_dir.join("audio").join(format!("{}.wav", stem)), &wav).await?;
            session.storage.delete(&audio.media).await?;
        }
    }

    let manifest = json!({
        "characters": roster.iter().map(|character| json!({
            "id": character.id,
            "name": character.name,
            "description": character.description,
            "visual_dna": character.visual_dna,
            "default_voice": character.default_voice,
        })).collect::<Vec<_>>(),
        "scenes": scenes.iter().map(|scene| json!({
            "id": scene.id,
            "name": scene.name,
            "description": scene.description,
            "visual_dna": scene.visual_dna,
        })).collect::<Vec<_>>(),
        "frames": frames.iter().map(|frame| json!({
            "id": frame.id(),
            "panel": frame.panel(),
            "prompt": frame.prompt(),
            "status": frame.status(),
            "scene_id": frame.scene_id(),
            "audio_status": frame.audio_status(),
        })).collect::<Vec<_>>(),
    });
    write_json(&out_dir.join("storyboard.json"), &manifest).await
}
