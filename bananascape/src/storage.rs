//! File-system layout for generated assets.
//!
//! ```text
//! <root>/
//!   <thing>/<thing>_<stage>.png
//!   _landscapes_/final_composite_landscape.png
//! ```

use std::io::Cursor;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{BananascapeError, GenerationError};
use crate::genai::GeneratedImage;

/// Directory name holding composite landscapes.
pub const LANDSCAPE_DIR: &str = "_landscapes_";

/// File name of the final composite landscape.
pub const FINAL_LANDSCAPE_FILE: &str = "final_composite_landscape.png";

/// URL prefix under which the server exposes the asset root.
pub const ASSETS_URL_PREFIX: &str = "/assets";

/// Reads and writes images under an asset root.
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    /// Creates a store rooted at `root`. Nothing is created on disk yet.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Returns the asset root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for one subject's progression.
    #[must_use]
    pub fn subject_dir(&self, thing: &str) -> PathBuf {
        self.root.join(thing)
    }

    /// Directory for composite landscapes.
    #[must_use]
    pub fn landscape_dir(&self) -> PathBuf {
        self.root.join(LANDSCAPE_DIR)
    }

    /// Path of one progression stage image.
    #[must_use]
    pub fn stage_image_path(&self, thing: &str, stage: u8) -> PathBuf {
        self.subject_dir(thing).join(format!("{thing}_{stage}.png"))
    }

    /// Path of the final composite landscape.
    #[must_use]
    pub fn final_landscape_path(&self) -> PathBuf {
        self.landscape_dir().join(FINAL_LANDSCAPE_FILE)
    }

    /// Creates `dir` and its parents if missing.
    pub async fn ensure_dir(&self, dir: &Path) -> Result<(), BananascapeError> {
        tokio::fs::create_dir_all(dir).await?;
        Ok(())
    }

    /// Writes raw bytes to `path`, creating the parent directory if needed.
    pub async fn save_image(&self, path: &Path, bytes: &[u8]) -> Result<(), BananascapeError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, bytes).await?;
        debug!(path = %path.display(), bytes = bytes.len(), "Saved image");
        Ok(())
    }

    /// Writes a generated image to `path` as PNG, re-encoding other formats.
    pub async fn save_png(
        &self,
        path: &Path,
        image: &GeneratedImage,
    ) -> Result<(), BananascapeError> {
        if image.is_png() {
            return self.save_image(path, &image.bytes).await;
        }
        let bytes = image.bytes.clone();
        let encoded = tokio::task::spawn_blocking(move || to_png(&bytes))
            .await
            .map_err(|e| BananascapeError::Internal(format!("PNG encoding task failed: {e}")))??;
        self.save_image(path, &encoded).await
    }

    /// Reads an image back from disk.
    pub async fn read_image(&self, path: &Path) -> Result<Vec<u8>, BananascapeError> {
        Ok(tokio::fs::read(path).await?)
    }

    /// Maps a path under the root to its `/assets/...` URL, percent-encoding
    /// each segment.
    ///
    /// Returns `None` for paths outside the root.
    #[must_use]
    pub fn relative_url(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let segments: Vec<String> = relative
            .components()
            .map(|c| urlencoding::encode(&c.as_os_str().to_string_lossy()).into_owned())
            .collect();
        if segments.is_empty() {
            return None;
        }
        Some(format!("{ASSETS_URL_PREFIX}/{}", segments.join("/")))
    }
}

/// Decodes any supported image format and re-encodes it as PNG.
pub fn to_png(bytes: &[u8]) -> Result<Vec<u8>, GenerationError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| GenerationError::Decode(e.to_string()))?;
    let mut out = Cursor::new(Vec::new());
    decoded
        .write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| GenerationError::Decode(e.to_string()))?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn tiny_jpeg() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([200, 30, 30]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, image::ImageFormat::Jpeg)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_layout() {
        let store = AssetStore::new("assets");
        assert_eq!(store.subject_dir("tree"), PathBuf::from("assets/tree"));
        assert_eq!(
            store.stage_image_path("tree", 3),
            PathBuf::from("assets/tree/tree_3.png")
        );
        assert_eq!(
            store.final_landscape_path(),
            PathBuf::from("assets/_landscapes_/final_composite_landscape.png")
        );
    }

    #[test]
    fn test_relative_url() {
        let store = AssetStore::new("/srv/assets");
        assert_eq!(
            store
                .relative_url(Path::new("/srv/assets/_landscapes_/final_composite_landscape.png"))
                .as_deref(),
            Some("/assets/_landscapes_/final_composite_landscape.png")
        );
        assert_eq!(
            store.relative_url(Path::new("/srv/assets/a#b/a#b_1.png")),
            Some("/assets/a%23b/a%23b_1.png".to_string())
        );
        assert_eq!(
            store.relative_url(Path::new("/srv/assets/old oak?/old oak?_2.png")),
            Some("/assets/old%20oak%3F/old%20oak%3F_2.png".to_string())
        );
        assert_eq!(store.relative_url(Path::new("/etc/passwd")), None);
        assert_eq!(store.relative_url(Path::new("/srv/assets")), None);
    }

    #[tokio::test]
    async fn test_save_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path());
        let path = store.stage_image_path("lamp", 1);

        store.save_image(&path, b"\x89PNG fake").await.unwrap();

        assert!(path.exists());
        assert_eq!(store.read_image(&path).await.unwrap(), b"\x89PNG fake");
    }

    #[tokio::test]
    async fn test_save_png_reencodes_jpeg() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path());
        let path = store.final_landscape_path();

        store
            .save_png(&path, &GeneratedImage::new(tiny_jpeg(), "image/jpeg"))
            .await
            .unwrap();

        let written = store.read_image(&path).await.unwrap();
        assert_eq!(
            image::guess_format(&written).unwrap(),
            image::ImageFormat::Png
        );
    }

    #[tokio::test]
    async fn test_save_png_keeps_png_bytes() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path());
        let path = dir.path().join("x.png");

        store
            .save_png(&path, &GeneratedImage::new(b"opaque".to_vec(), "image/png"))
            .await
            .unwrap();
        assert_eq!(store.read_image(&path).await.unwrap(), b"opaque");
    }

    #[test]
    fn test_to_png_rejects_garbage() {
        assert!(matches!(
            to_png(b"definitely not an image"),
            Err(GenerationError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_ensure_dir_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path());
        let landscapes = store.landscape_dir();

        store.ensure_dir(&landscapes).await.unwrap();
        store.ensure_dir(&landscapes).await.unwrap();
        assert!(landscapes.is_dir());
    }
}
