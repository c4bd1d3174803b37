//! Revocable media storage for Storyboard.
//!
//! Synthesized audio is handed to callers as a `blob:` URL backed by an
//! in-process store. The caller owns the resource's lifetime and revokes it
//! with [`MediaStorage::delete`].
//!
//! # Example
//!
//! ```rust
//! use storyboard_storage::{InMemoryStorage, MediaMetadata, MediaStorage, MediaType};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = InMemoryStorage::new();
//! let metadata = MediaMetadata::new(MediaType::Audio, "audio/wav");
//!
//! let reference = storage.store(b"RIFF....WAVE", &metadata).await?;
//! assert!(reference.storage_path.starts_with("blob:storyboard/"));
//!
//! storage.delete(&reference).await?;
//! assert!(!storage.exists(&reference).await?);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod memory;
mod metadata;
mod reference;
mod storage;

pub use memory::{DEFAULT_REVOKED_CAPACITY, InMemoryStorage};
pub use metadata::{MediaMetadata, MediaType};
pub use reference::{AudioReference, MediaReference};
pub use storage::MediaStorage;
pub use storyboard_error::{StorageError, StorageErrorKind};
