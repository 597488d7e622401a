//! Persisting generated images to local disk

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

pub const FILE_PREFIX: &str = "generated_image_";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Filename format: `generated_image_<YYYYMMDD_HHMMSS>_<index>.png`
pub fn generated_image_name(timestamp: DateTime<Local>, index: usize) -> String {
    format!(
        "{}{}_{}.png",
        FILE_PREFIX,
        timestamp.format(TIMESTAMP_FORMAT),
        index
    )
}

/// Write image bytes under `dir` using the timestamped name
///
/// Creates `dir` when missing and returns the written path.
pub async fn save_image(dir: impl AsRef<Path>, index: usize, bytes: &[u8]) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let path = dir.join(generated_image_name(Local::now(), index));
    fs::write(&path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    debug!("Saved image: {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}

/// MIME type guessed from a file extension, defaulting to PNG
pub fn mime_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_generated_image_name_pattern() {
        let timestamp = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            generated_image_name(timestamp, 2),
            "generated_image_20240309_070501_2.png"
        );
    }

    #[test]
    fn test_mime_type_for() {
        assert_eq!(mime_type_for(Path::new("a/banner.PNG")), "image/png");
        assert_eq!(mime_type_for(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("no_extension")), "image/png");
    }

    #[tokio::test]
    async fn test_save_image_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested");

        let path = save_image(&dir, 1, b"payload").await.unwrap();

        assert!(path.starts_with(&dir));
        assert_eq!(std::fs::read(&path).unwrap(), b"payload");
    }
}
