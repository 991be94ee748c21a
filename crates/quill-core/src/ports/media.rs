//! Media storage port.

use async_trait::async_trait;

use crate::media::Attachment;

/// Storage backend for uploaded images.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Persist the attachment under a freshly generated name and return the
    /// public path it is served from (e.g. `/uploads/<name>`).
    async fn store(&self, attachment: &Attachment) -> Result<String, MediaError>;
}

/// Media ingestion errors.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Only image files are allowed (got {0})")]
    UnsupportedType(String),

    #[error("Uploaded file is empty")]
    Empty,

    #[error("Failed to store upload: {0}")]
    Io(String),
}
