//! Filesystem-backed media storage.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use quill_core::media::Attachment;
use quill_core::ports::{MediaError, MediaStore};

/// Stores uploads flat inside one directory under `<uuid>.<ext>` names.
///
/// Files are never removed: replacing or deleting a post leaves its image on disk.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
    public_prefix: String,
}

impl LocalMediaStore {
    /// Initialise storage rooted at `root`, creating the directory if necessary.
    /// Stored files are reported as `<public_prefix>/<file name>`.
    pub fn new(root: impl Into<PathBuf>, public_prefix: &str) -> Result<Self, std::io::Error> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn generate_file_name(attachment: &Attachment) -> String {
        let identifier = Uuid::new_v4();
        match extension_for(attachment) {
            Some(ext) => format!("{identifier}.{ext}"),
            None => identifier.to_string(),
        }
    }
}

/// Extension for the stored file, taken from the checked `image/*` type only.
/// The client's file name never decides how the file is served back.
/// Types without an entry are stored bare and served as octet-stream.
fn extension_for(attachment: &Attachment) -> Option<&'static str> {
    let mime = attachment.content_type.as_ref()?;
    if mime.type_() != "image" {
        return None;
    }
    let ext = match mime.subtype().as_str() {
        "png" => "png",
        "jpeg" | "pjpeg" => "jpg",
        "gif" => "gif",
        "webp" => "webp",
        "avif" => "avif",
        "bmp" => "bmp",
        "tiff" => "tiff",
        _ => return None,
    };
    Some(ext)
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn store(&self, attachment: &Attachment) -> Result<String, MediaError> {
        attachment.check()?;

        let file_name = Self::generate_file_name(attachment);
        let absolute = self.root.join(&file_name);

        fs::write(&absolute, &attachment.data)
            .await
            .map_err(|e| MediaError::Io(e.to_string()))?;

        tracing::info!(
            file = %file_name,
            size = attachment.data.len(),
            "Stored uploaded image"
        );

        Ok(format!("{}/{}", self.public_prefix, file_name))
    }
}
