//! Single-operation command handlers.

use super::artifacts::{image_extension, with_extension, write_bytes};
use super::{CliResult, Session};
use std::path::Path;
use storyboard::{AspectRatio, MediaStorage};
use tracing::info;

/// Print the characters and scenes of a script as JSON.
pub async fn extract(session: &Session, script: &Path) -> CliResult<()> {
    let script = tokio::fs::read_to_string(script).await?;
    let world = session.studio.extract_world_info(&script).await?;

    println!("{}", serde_json::to_string_pretty(&world)?);
    Ok(())
}

/// Print the panels of a script as JSON.
///
/// Character names are extracted first when none are given.
pub async fn analyze(session: &Session, script: &Path, characters: Vec<String>) -> CliResult<()> {
    let script = tokio::fs::read_to_string(script).await?;
    let names = if characters.is_empty() {
        session
            .studio
            .extract_world_info(&script)
            .await?
            .character_names()
    } else {
        characters
    };

    let panels = session.studio.analyze_script(&script, &names).await?;
    println!("{}", serde_json::to_string_pretty(&panels)?);
    Ok(())
}

/// Generate one image and write it to `out`.
pub async fn image(
    session: &Session,
    prompt: &str,
    aspect_ratio: AspectRatio,
    out: &Path,
) -> CliResult<()> {
    let image = session.studio.generate_image(prompt, aspect_ratio).await?;
    let path = with_extension(out, image_extension(&image));

    write_bytes(&path, &image.decode()?).await?;
    println!("{}", path.display());
    Ok(())
}

/// Speak `text` and write the WAV to `out`.
pub async fn speech(
    session: &Session,
    text: &str,
    voice: Option<&str>,
    out: &Path,
) -> CliResult<()> {
    let voice = voice.unwrap_or(&session.config.speech.default_voice);
    let audio = session.studio.generate_speech(text, voice).await?;
    info!(url = %audio.url, voice, "Synthesized speech");

    let wav = session.storage.retrieve(&audio.media).await?;
    let path = with_extension(out, "wav");
    write_bytes(&path, &wav).await?;
    session.storage.delete(&audio.media).await?;

    println!("{}", path.display());
    Ok(())
}
