//! Shared setup for every command.

use std::path::Path;
use std::sync::Arc;
use storyboard::{GeminiClient, InMemoryStorage, StoryboardConfig, StoryboardResult, Storyboarder};
use tracing::{debug, instrument};

/// Configuration, blob store, and pipeline handle for one invocation.
pub struct Session {
    /// Loaded configuration
    pub config: StoryboardConfig,
    /// Blob store holding synthesized audio
    pub storage: Arc<InMemoryStorage>,
    /// Pipeline handle
    pub studio: Storyboarder,
}

impl Session {
    /// Load configuration and connect to Gemini.
    ///
    /// Fails before any network call when no API key is available.
    #[instrument(skip(api_key))]
    pub fn open(config_path: Option<&Path>, api_key: Option<&str>) -> StoryboardResult<Self> {
        let config = match config_path {
            Some(path) => StoryboardConfig::from_file(path)?,
            None => StoryboardConfig::load()?,
        };
        debug!(
            text_model = %config.models.text,
            image_primary = %config.models.image_primary,
            image_fallback = %config.models.image_fallback,
            speech_model = %config.models.speech,
            "Loaded configuration"
        );

        let driver = Arc::new(GeminiClient::from_config(&config.models, api_key)?);
        let storage = Arc::new(InMemoryStorage::new());
        let studio = Storyboarder::new(driver, storage.clone(), &config);

        Ok(Self {
            config,
            storage,
            studio,
        })
    }
}
