//! In-process blob storage with revocable URLs.

use crate::{MediaMetadata, MediaReference, MediaStorage};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;
use storyboard_error::{StorageError, StorageErrorKind, StoryboardResult};
use tokio::sync::RwLock;
use uuid::Uuid;

/// URL scheme prefix for every issued resource.
const BLOB_PREFIX: &str = "blob:storyboard/";

/// Revoked URLs remembered by default.
pub const DEFAULT_REVOKED_CAPACITY: usize = 1024;

#[derive(Debug, Default)]
struct Blobs {
    live: HashMap<String, Vec<u8>>,
    revoked: HashSet<String>,
    revoked_order: VecDeque<String>,
}

impl Blobs {
    /// Remember `url` as revoked, forgetting the oldest beyond `capacity`.
    fn revoke(&mut self, url: String, capacity: usize) {
        if capacity == 0 || !self.revoked.insert(url.clone()) {
            return;
        }
        self.revoked_order.push_back(url);
        while self.revoked_order.len() > capacity {
            if let Some(oldest) = self.revoked_order.pop_front() {
                self.revoked.remove(&oldest);
            }
        }
    }
}

/// In-memory storage backend.
///
/// Each stored item gets a fresh `blob:storyboard/<uuid>` URL, even when the
/// bytes are identical to an earlier item, so revoking one URL never affects another.
///
/// Only the most recent revocations are remembered; an older revoked URL
/// reports `NotFound` instead of `Revoked`.
#[derive(Debug)]
pub struct InMemoryStorage {
    blobs: RwLock<Blobs>,
    revoked_capacity: usize,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::with_revoked_capacity(DEFAULT_REVOKED_CAPACITY)
    }
}

impl InMemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store remembering at most `capacity` revoked URLs.
    pub fn with_revoked_capacity(capacity: usize) -> Self {
        Self {
            blobs: RwLock::new(Blobs::default()),
            revoked_capacity: capacity,
        }
    }

    /// Number of live (unrevoked) resources.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.live.len()
    }

    /// True when no live resources remain.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn compute_hash(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        format!("{:x}", hasher.finalize())
    }

    fn verify_hash(data: &[u8], expected_hash: &str) -> StoryboardResult<()> {
        let actual_hash = Self::compute_hash(data);
        if actual_hash != expected_hash {
            return Err(StorageError::new(StorageErrorKind::HashMismatch(format!(
                "expected {}, got {}",
                expected_hash, actual_hash
            )))
            .into());
        }
        Ok(())
    }

    fn missing(blobs: &Blobs, url: &str) -> StorageError {
        if blobs.revoked.contains(url) {
            StorageError::new(StorageErrorKind::Revoked(url.to_string()))
        } else {
            StorageError::new(StorageErrorKind::NotFound(url.to_string()))
        }
    }
}

#[async_trait::async_trait]
impl MediaStorage for InMemoryStorage {
    #[tracing::instrument(skip(self, data, metadata), fields(size = data.len(), media_type = %metadata.media_type))]
    async fn store(
        &self,
        data: &[u8],
        metadata: &MediaMetadata,
    ) -> StoryboardResult<MediaReference> {
        let hash = Self::compute_hash(data);
        let id = Uuid::new_v4();
        let url = format!("{}{}", BLOB_PREFIX, id);

        self.blobs
            .write()
            .await
            .live
            .insert(url.clone(), data.to_vec());

        tracing::debug!(hash = %hash, url = %url, "Stored blob");

        Ok(MediaReference {
            id,
            content_hash: hash,
            storage_backend: "memory".to_string(),
            storage_path: url,
            size_bytes: data.len() as u64,
            media_type: metadata.media_type,
            mime_type: metadata.mime_type.clone(),
        })
    }

    #[tracing::instrument(skip(self), fields(url = %reference.storage_path))]
    async fn retrieve(&self, reference: &MediaReference) -> StoryboardResult<Vec<u8>> {
        let blobs = self.blobs.read().await;
        let data = blobs
            .live
            .get(&reference.storage_path)
            .ok_or_else(|| Self::missing(&blobs, &reference.storage_path))?;

        Self::verify_hash(data, &reference.content_hash)?;
        Ok(data.clone())
    }

    async fn get_url(
        &self,
        reference: &MediaReference,
        _expires_in: Duration,
    ) -> StoryboardResult<Option<String>> {
        let blobs = self.blobs.read().await;
        Ok(blobs
            .live
            .contains_key(&reference.storage_path)
            .then(|| reference.storage_path.clone()))
    }

    #[tracing::instrument(skip(self), fields(url = %reference.storage_path))]
    async fn delete(&self, reference: &MediaReference) -> StoryboardResult<()> {
        let mut blobs = self.blobs.write().await;
        let url = &reference.storage_path;

        if blobs.live.remove(url).is_some() {
            blobs.revoke(url.clone(), self.revoked_capacity);
            tracing::debug!("Revoked blob");
            return Ok(());
        }
        if blobs.revoked.contains(url) {
            return Ok(());
        }
        Err(StorageError::new(StorageErrorKind::NotFound(url.clone())).into())
    }

    async fn exists(&self, reference: &MediaReference) -> StoryboardResult<bool> {
        Ok(self
            .blobs
            .read()
            .await
            .live
            .contains_key(&reference.storage_path))
    }
}
