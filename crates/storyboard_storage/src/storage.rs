//! Storage trait definition.

use crate::{MediaMetadata, MediaReference};
use std::time::Duration;
use storyboard_error::StoryboardResult;

/// Trait for media storage backends.
#[async_trait::async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store media and return a reference.
    ///
    /// The implementation should:
    /// - Compute a content hash of `data`
    /// - Keep the bytes until the reference is deleted
    /// - Return a reference whose `storage_path` is a resolvable URL
    async fn store(&self, data: &[u8], metadata: &MediaMetadata)
    -> StoryboardResult<MediaReference>;

    /// Retrieve media by reference.
    async fn retrieve(&self, reference: &MediaReference) -> StoryboardResult<Vec<u8>>;

    /// URL for direct access, or `None` if the media is gone.
    async fn get_url(
        &self,
        reference: &MediaReference,
        expires_in: Duration,
    ) -> StoryboardResult<Option<String>>;

    /// Delete (revoke) media by reference.
    async fn delete(&self, reference: &MediaReference) -> StoryboardResult<()>;

    /// Check if media exists.
    async fn exists(&self, reference: &MediaReference) -> StoryboardResult<bool>;
}
