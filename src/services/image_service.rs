//! Recipe image storage
//!
//! Images arrive as base64 data URIs (`data:image/png;base64,...`) or bare
//! base64. They are sniffed by magic bytes and written under
//! `<media_root>/recipes/`.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::ImageFormat;
use std::path::Path;
use uuid::Uuid;

use crate::domain::DomainError;

const RECIPE_DIR: &str = "recipes";

/// Decode an uploaded image payload and detect its format.
pub fn decode_image(payload: &str) -> Result<(Vec<u8>, ImageFormat), DomainError> {
    let encoded = match payload.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        Some(_) => return Err(DomainError::validation("malformed image data URI")),
        None => payload,
    };

    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| DomainError::validation(format!("image is not valid base64: {}", e)))?;

    if bytes.is_empty() {
        return Err(DomainError::validation("image is empty"));
    }

    let format = image::guess_format(&bytes)
        .map_err(|_| DomainError::validation("unrecognised image format"))?;

    match format {
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Gif | ImageFormat::WebP => {
            Ok((bytes, format))
        }
        other => Err(DomainError::validation(format!(
            "unsupported image format {:?}",
            other
        ))),
    }
}

/// Store an uploaded image; returns its path relative to `media_root`.
pub async fn save_recipe_image(media_root: &Path, payload: &str) -> Result<String, DomainError> {
    let (bytes, format) = decode_image(payload)?;
    let extension = format.extensions_str().first().copied().unwrap_or("img");
    let relative = format!("{}/{}.{}", RECIPE_DIR, Uuid::new_v4(), extension);

    let dir = media_root.join(RECIPE_DIR);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| DomainError::Internal(format!("cannot create {}: {}", dir.display(), e)))?;

    let target = media_root.join(&relative);
    tokio::fs::write(&target, &bytes)
        .await
        .map_err(|e| DomainError::Internal(format!("cannot write {}: {}", target.display(), e)))?;

    tracing::debug!("Stored recipe image {} ({} bytes)", relative, bytes.len());
    Ok(relative)
}

/// Best-effort removal of a replaced or orphaned image.
pub async fn remove_recipe_image(media_root: &Path, relative: &str) {
    let target = media_root.join(relative);
    if let Err(e) = tokio::fs::remove_file(&target).await {
        tracing::warn!("Failed to remove image {}: {}", target.display(), e);
    }
}

/// Public URL of a stored image
pub fn image_url(relative: &str) -> String {
    format!("/media/{}", relative)
}
