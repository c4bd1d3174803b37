//! References to stored media.

use crate::MediaType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reference to stored media.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaReference {
    /// Unique identifier for this media reference
    pub id: Uuid,
    /// SHA-256 hash of the content
    pub content_hash: String,
    /// Storage backend name (e.g., "memory")
    pub storage_backend: String,
    /// Backend-specific location; a `blob:` URL for the in-memory backend
    pub storage_path: String,
    /// Size of the media in bytes
    pub size_bytes: u64,
    /// Type of media
    pub media_type: MediaType,
    /// MIME type
    pub mime_type: String,
}

/// A playable, caller-revocable audio resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{}", url)]
pub struct AudioReference {
    /// Resource URL handed to players
    pub url: String,
    /// Backing storage reference, needed to revoke the URL
    pub media: MediaReference,
}

impl AudioReference {
    /// Wrap a stored WAV.
    pub fn new(media: MediaReference) -> Self {
        Self {
            url: media.storage_path.clone(),
            media,
        }
    }
}
