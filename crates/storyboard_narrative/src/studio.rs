//! The `Storyboarder`: every pipeline operation behind one handle.

use crate::batch::{BatchReport, BatchRunner, PanelRender, SceneArt, UnitOutcome};
use crate::extraction::EntityExtractor;
use crate::image::ImageSynthesizer;
use crate::prompts::{character_sheet_prompt, scene_detail_grid_prompt, scene_panorama_prompt};
use crate::speech::{SpeechSynthesizer, voice_for};
use crate::StoryboardFrame;
use std::sync::Arc;
use storyboard_core::{AspectRatio, Character, ImageReference, Scene, ScriptPanel, WorldInfo};
use storyboard_error::{GenerationError, GenerationErrorKind, StoryboardResult};
use storyboard_interface::GenerativeDriver;
use storyboard_rate_limit::{PacingConfig, StoryboardConfig};
use storyboard_storage::{AudioReference, MediaStorage};
use tracing::{instrument, warn};

/// Orchestrates extraction, prompt assembly, and media generation.
///
/// Holds no narrative state of its own. Batch methods take snapshots of the
/// caller's characters, scenes, or frames and report each result through a
/// commit callback, leaving the caller to update its own collections.
///
/// # Example
///
/// ```rust,ignore
/// let config = StoryboardConfig::load()?;
/// let driver = Arc::new(GeminiClient::from_config(&config.models, None)?);
/// let studio = Storyboarder::new(driver, Arc::new(InMemoryStorage::new()), &config);
///
/// let world = studio.extract_world_info(&script).await?;
/// let panels = studio.analyze_script(&script, &world.character_names()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Storyboarder {
    extractor: EntityExtractor,
    images: ImageSynthesizer,
    speech: SpeechSynthesizer,
    default_voice: String,
    pacing: PacingConfig,
}

impl Storyboarder {
    /// Wire every component to one driver and one blob store.
    pub fn new(
        driver: Arc<dyn GenerativeDriver>,
        storage: Arc<dyn MediaStorage>,
        config: &StoryboardConfig,
    ) -> Self {
        let models = &config.models;
        Self {
            extractor: EntityExtractor::new(
                driver.clone(),
                &models.text,
                config.retry.general,
                &config.extraction.locale,
            ),
            images: ImageSynthesizer::new(
                driver.clone(),
                &models.image_primary,
                &models.image_fallback,
                config.retry.image,
            ),
            speech: SpeechSynthesizer::new(driver, &models.speech, config.retry.speech, storage),
            default_voice: config.speech.default_voice.clone(),
            pacing: config.pacing,
        }
    }

    /// Identify characters and scenes.
    ///
    /// # Errors
    ///
    /// See [`EntityExtractor::extract_world_info`].
    pub async fn extract_world_info(&self, script: &str) -> StoryboardResult<WorldInfo> {
        self.extractor.extract_world_info(script).await
    }

    /// Break a script into panels.
    ///
    /// # Errors
    ///
    /// See [`EntityExtractor::analyze_script`].
    pub async fn analyze_script(
        &self,
        script: &str,
        character_names: &[String],
    ) -> StoryboardResult<Vec<ScriptPanel>> {
        self.extractor.analyze_script(script, character_names).await
    }

    /// Generate one image through both tiers.
    ///
    /// # Errors
    ///
    /// See [`ImageSynthesizer::generate`].
    pub async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> StoryboardResult<ImageReference> {
        self.images.generate(prompt, aspect_ratio).await
    }

    /// Speak a line with a preset voice.
    ///
    /// # Errors
    ///
    /// See [`SpeechSynthesizer::synthesize`].
    pub async fn generate_speech(&self, text: &str, voice: &str) -> StoryboardResult<AudioReference> {
        self.speech.synthesize(text, voice).await
    }

    /// Voice a panel's dialogue is spoken with.
    pub fn voice_for<'a>(&'a self, panel: &ScriptPanel, roster: &'a [Character]) -> &'a str {
        voice_for(panel, roster, &self.default_voice)
    }

    /// Character sheet at 16:9.
    ///
    /// # Errors
    ///
    /// See [`ImageSynthesizer::generate`].
    #[instrument(skip(self, character), fields(character = %character.name))]
    pub async fn generate_character_sheet(
        &self,
        character: &Character,
    ) -> StoryboardResult<ImageReference> {
        self.generate_image(&character_sheet_prompt(character), AspectRatio::Widescreen)
            .await
    }

    /// Panorama at 16:9, then detail grid at 1:1.
    ///
    /// A failed detail grid is carried in [`SceneArt::detail_grid`] so the
    /// finished panorama still reaches the caller.
    ///
    /// # Errors
    ///
    /// Fails only if the panorama fails; the grid is not attempted then.
    #[instrument(skip(self, scene), fields(scene = %scene.name))]
    pub async fn generate_scene_art(&self, scene: &Scene) -> StoryboardResult<SceneArt> {
        let panorama = self
            .generate_image(&scene_panorama_prompt(scene), AspectRatio::Widescreen)
            .await?;
        let detail_grid = self
            .generate_image(&scene_detail_grid_prompt(scene), AspectRatio::Square)
            .await;
        if let Err(e) = &detail_grid {
            warn!(scene_id = %scene.id, error = %e, "Detail grid failed, keeping panorama");
        }
        Ok(SceneArt {
            panorama,
            detail_grid,
        })
    }

    /// Panel image at 16:9 from the frame's current prompt.
    ///
    /// # Errors
    ///
    /// See [`ImageSynthesizer::generate`].
    #[instrument(skip_all, fields(frame = %frame.id(), panel_number = frame.panel().panel_number))]
    pub async fn generate_panel_image(
        &self,
        frame: &StoryboardFrame,
        roster: &[Character],
        scenes: &[Scene],
    ) -> StoryboardResult<PanelRender> {
        let prompt = frame.expected_prompt(roster, scenes);
        let image = self.generate_image(&prompt, AspectRatio::Widescreen).await?;
        Ok(PanelRender { image, prompt })
    }

    /// Dialogue audio for one frame.
    ///
    /// # Errors
    ///
    /// Returns `AudioMissing` for a frame without dialogue, otherwise see
    /// [`SpeechSynthesizer::synthesize`].
    #[instrument(skip_all, fields(frame = %frame.id()))]
    pub async fn generate_frame_audio(
        &self,
        frame: &StoryboardFrame,
        roster: &[Character],
    ) -> StoryboardResult<AudioReference> {
        let panel = frame.panel();
        let dialogue = match panel.dialogue.as_deref() {
            Some(line) if !line.trim().is_empty() => line,
            _ => return Err(GenerationError::new(GenerationErrorKind::AudioMissing).into()),
        };
        self.generate_speech(dialogue, self.voice_for(panel, roster))
            .await
    }

    /// Character sheets for every character, paced by `[pacing] characters_ms`.
    pub async fn generate_all_character_sheets<C>(
        &self,
        characters: Vec<Character>,
        commit: C,
    ) -> BatchReport
    where
        C: FnMut(UnitOutcome<ImageReference>),
    {
        BatchRunner::new("character_sheets", self.pacing.characters())
            .run(
                &characters,
                |character| self.generate_character_sheet(character),
                commit,
            )
            .await
    }

    /// Panorama and detail grid for every scene, paced by `[pacing] scenes_ms`.
    pub async fn generate_all_scene_art<C>(&self, scenes: Vec<Scene>, commit: C) -> BatchReport
    where
        C: FnMut(UnitOutcome<SceneArt>),
    {
        BatchRunner::new("scene_art", self.pacing.scenes())
            .run(&scenes, |scene| self.generate_scene_art(scene), commit)
            .await
    }

    /// Image for every frame, paced by `[pacing] panels_ms`.
    ///
    /// Callers usually mark each frame with
    /// [`StoryboardFrame::begin_generation`] first and settle it in `commit`.
    pub async fn generate_all_panel_images<C>(
        &self,
        frames: Vec<StoryboardFrame>,
        roster: &[Character],
        scenes: &[Scene],
        commit: C,
    ) -> BatchReport
    where
        C: FnMut(UnitOutcome<PanelRender>),
    {
        BatchRunner::new("panel_images", self.pacing.panels())
            .run(
                &frames,
                |frame| self.generate_panel_image(frame, roster, scenes),
                commit,
            )
            .await
    }

    /// Audio for every frame with dialogue, paced by `[pacing] audio_ms`.
    ///
    /// Frames without dialogue are not units and appear in neither list of
    /// the report.
    pub async fn generate_all_dialogue_audio<C>(
        &self,
        frames: Vec<StoryboardFrame>,
        roster: &[Character],
        commit: C,
    ) -> BatchReport
    where
        C: FnMut(UnitOutcome<AudioReference>),
    {
        let speaking: Vec<StoryboardFrame> = frames
            .into_iter()
            .filter(|frame| frame.panel().has_dialogue())
            .collect();

        BatchRunner::new("dialogue_audio", self.pacing.audio())
            .run(
                &speaking,
                |frame| self.generate_frame_audio(frame, roster),
                commit,
            )
            .await
    }
}
