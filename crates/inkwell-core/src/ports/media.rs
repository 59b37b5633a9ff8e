//! Image storage port.

use async_trait::async_trait;

/// What an uploaded image is used for; decides its bounds and location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    ProfilePicture,
    PostImage,
}

impl ImageKind {
    /// Maximum (width, height). Images are shrunk to fit, never enlarged.
    pub fn bounds(&self) -> (u32, u32) {
        match self {
            ImageKind::ProfilePicture => (125, 125),
            ImageKind::PostImage => (800, 600),
        }
    }

    /// Directory below the media root.
    pub fn directory(&self) -> &'static str {
        match self {
            ImageKind::ProfilePicture => "profile_pics",
            ImageKind::PostImage => "news_pics",
        }
    }
}

/// Raw uploaded file.
#[derive(Clone)]
pub struct ImageUpload {
    /// Client-supplied file name; only its extension is kept.
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Resize-and-store capability for uploaded pictures.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store a thumbnail of `upload` and return its file reference, relative to
    /// the directory of `kind`. `owner` scopes profile pictures per user.
    async fn store(
        &self,
        kind: ImageKind,
        owner: &str,
        upload: ImageUpload,
    ) -> Result<String, ImageError>;
}

/// Image storage errors.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Unsupported image type: {0}")]
    UnsupportedFormat(String),

    #[error("Could not decode image: {0}")]
    Decode(String),

    #[error("Could not store image: {0}")]
    Io(String),
}

impl From<ImageError> for crate::DomainError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::Io(msg) => crate::DomainError::Internal(msg),
            other => crate::DomainError::Validation(other.to_string()),
        }
    }
}
