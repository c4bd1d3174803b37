//! Writing generated artifacts to disk.

use super::CliResult;
use serde_json::Value;
use std::path::{Path, PathBuf};
use storyboard::ImageReference;
use tracing::info;

/// File extension for an image's MIME type.
pub fn image_extension(image: &ImageReference) -> &'static str {
    match image.mime_type() {
        ImageReference::JPEG => "jpg",
        _ => "png",
    }
}

/// Filesystem-safe version of a display name. Letters in any script are kept.
pub fn slug(name: &str) -> String {
    let slug: String = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let slug = slug.trim_matches('-').to_string();
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

/// Decode an image and write it as `<dir>/<stem>.<ext>`.
pub async fn write_image(dir: &Path, stem: &str, image: &ImageReference) -> CliResult<PathBuf> {
    let path = dir.join(format!("{}.{}", stem, image_extension(image)));
    write_bytes(&path, &image.decode()?).await?;
    Ok(path)
}

/// Write bytes, creating parent directories.
pub async fn write_bytes(path: &Path, bytes: &[u8]) -> CliResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await?;
    info!(path = %path.display(), bytes = bytes.len(), "Wrote artifact");
    Ok(())
}

/// Write pretty-printed JSON.
pub async fn write_json(path: &Path, value: &Value) -> CliResult<()> {
    write_bytes(path, serde_json::to_string_pretty(value)?.as_bytes()).await
}

/// Set `path`'s extension unless it already has the right one.
pub fn with_extension(path: &Path, extension: &str) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(existing) if existing.eq_ignore_ascii_case(extension) => path.to_path_buf(),
        _ => path.with_extension(extension),
    }
}
