//! File-backed tokens
//!
//! The content type is derived from the file extension. Images become inline
//! `"<mime>:base64:<payload>"` strings, fonts become font descriptors with a data
//! URI source, and Lottie documents become animations.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tint_tokens::FileValue;

use super::ExtractError;
use crate::declaration::{AnimationRepresentation, DeclarationCaches, FontInformation};

/// Content type of a referenced file
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum FileKind {
    Image(&'static str),
    Font(&'static str),
    Lottie,
    /// Recognized, but there is no category for it
    Other(&'static str),
}

/// Classify a path by extension (case-insensitive).
pub fn classify(path: &Path) -> Option<FileKind> {
    let extension = path.extension()?.to_str()?.to_lowercase();
    Some(match extension.as_str() {
        "png" => FileKind::Image("image/png"),
        "jpg" | "jpeg" => FileKind::Image("image/jpeg"),
        "gif" => FileKind::Image("image/gif"),
        "webp" => FileKind::Image("image/webp"),
        "bmp" => FileKind::Image("image/bmp"),
        "svg" => FileKind::Image("image/svg+xml"),
        "tif" | "tiff" => FileKind::Image("image/tiff"),
        "heic" => FileKind::Image("image/heic"),
        "ico" => FileKind::Image("image/x-icon"),
        "ttf" => FileKind::Font("font/ttf"),
        "otf" => FileKind::Font("font/otf"),
        "ttc" => FileKind::Font("font/collection"),
        "woff" => FileKind::Font("font/woff"),
        "woff2" => FileKind::Font("font/woff2"),
        "lottie" | "lot" => FileKind::Lottie,
        "json" => FileKind::Other("application/json"),
        "txt" => FileKind::Other("text/plain"),
        "csv" => FileKind::Other("text/csv"),
        "html" | "htm" => FileKind::Other("text/html"),
        "pdf" => FileKind::Other("application/pdf"),
        "zip" => FileKind::Other("application/zip"),
        "mp3" => FileKind::Other("audio/mpeg"),
        "wav" => FileKind::Other("audio/wav"),
        "mp4" => FileKind::Other("video/mp4"),
        "mov" => FileKind::Other("video/quicktime"),
        _ => return None,
    })
}

pub(crate) async fn extract(
    file: &FileValue,
    key: String,
    caches: &mut DeclarationCaches,
) -> Result<(), ExtractError> {
    let path = file.path.as_path();
    match classify(path) {
        Some(FileKind::Image(mime)) => {
            let encoded = read_base64(path).await?;
            caches.images.insert(key, format!("{mime}:base64:{encoded}"));
        }
        Some(FileKind::Font(mime)) => {
            let encoded = read_base64(path).await?;
            // Placeholder name: the file stem, not a lookup in the font's name table.
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            caches.fonts.insert(
                key,
                FontInformation {
                    post_script_name: name,
                    source: Some(format!("data:{mime};base64,{encoded}")),
                },
            );
        }
        Some(FileKind::Lottie) => {
            let encoded = read_base64(path).await?;
            caches
                .animations
                .insert(key, AnimationRepresentation::Lottie(encoded));
        }
        Some(FileKind::Other(mime)) => {
            return Err(ExtractError::UnsupportedFileType {
                path: path.to_path_buf(),
                mime,
            })
        }
        None => return Err(ExtractError::UnknownFileType(path.to_path_buf())),
    }
    Ok(())
}

async fn read_base64(path: &Path) -> Result<String, ExtractError> {
    let data = tokio::fs::read(path).await.map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::trace!(path = %path.display(), bytes = data.len(), "embedding file token");
    Ok(STANDARD.encode(data))
}
