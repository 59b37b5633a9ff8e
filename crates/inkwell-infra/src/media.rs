//! Local-disk image store: decode, shrink to the kind's bounds, write under a random name.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::DynamicImage;

use inkwell_core::ports::{ImageError, ImageKind, ImageStore, ImageUpload};

/// Extensions accepted for uploads.
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Image storage configuration.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Directory holding `profile_pics/` and `news_pics/`.
    pub root: PathBuf,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("static/images"),
        }
    }
}

impl MediaConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            root: std::env::var("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| MediaConfig::default().root),
        }
    }
}

/// Filesystem-backed [`ImageStore`].
pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    pub fn new(config: MediaConfig) -> Self {
        Self { root: config.root }
    }
}

fn allowed_extension(filename: &str) -> Result<String, ImageError> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(ImageError::UnsupportedFormat(format!(
            "'{filename}' (allowed: jpg, png)"
        )))
    }
}

/// 16 hex chars from 8 random bytes.
fn random_stem() -> String {
    let bytes: [u8; 8] = rand::random();
    hex::encode(bytes)
}

/// Directory-safe form of an owner name.
fn owner_dir(owner: &str) -> String {
    owner
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Shrink to fit within the bounds, keeping aspect ratio. Smaller images are left alone.
fn shrink_to_fit(img: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    if img.width() <= max_width && img.height() <= max_height {
        return img;
    }
    img.thumbnail(max_width, max_height)
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn store(
        &self,
        kind: ImageKind,
        owner: &str,
        upload: ImageUpload,
    ) -> Result<String, ImageError> {
        let ext = allowed_extension(&upload.filename)?;

        let owner = owner_dir(owner);
        let mut dir = self.root.join(kind.directory());
        if !owner.is_empty() {
            dir.push(&owner);
        }
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ImageError::Io(e.to_string()))?;

        let file_name = format!("{}.{}", random_stem(), ext);
        let path = dir.join(&file_name);
        let (max_width, max_height) = kind.bounds();

        let saved_to = path.clone();
        tokio::task::spawn_blocking(move || {
            let img = image::load_from_memory(&upload.bytes)
                .map_err(|e| ImageError::Decode(e.to_string()))?;
            let img = shrink_to_fit(img, max_width, max_height);
            // JPEG has no alpha channel.
            let img = if ext == "png" {
                img
            } else {
                DynamicImage::ImageRgb8(img.to_rgb8())
            };
            img.save(&path).map_err(|e| ImageError::Io(e.to_string()))
        })
        .await
        .map_err(|e| ImageError::Io(e.to_string()))??;

        tracing::debug!(path = %saved_to.display(), ?kind, "Stored image");

        Ok(if owner.is_empty() {
            file_name
        } else {
            format!("{owner}/{file_name}")
        })
    }
}
