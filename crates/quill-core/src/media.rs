//! Media ingestion: turn whatever image a write carries into the single
//! `featured_image` value that gets persisted.

use bytes::Bytes;
use mime::Mime;

use crate::ports::{MediaError, MediaStore};

/// A binary file received with a post write.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: Option<String>,
    pub content_type: Option<Mime>,
    pub data: Bytes,
}

impl Attachment {
    pub fn new(file_name: Option<String>, content_type: Option<Mime>, data: Bytes) -> Self {
        Self {
            file_name,
            content_type,
            data,
        }
    }

    /// Only non-empty `image/*` payloads are accepted.
    pub fn check(&self) -> Result<(), MediaError> {
        match &self.content_type {
            Some(mime) if mime.type_() == mime::IMAGE => {}
            Some(mime) => return Err(MediaError::UnsupportedType(mime.essence_str().to_string())),
            None => return Err(MediaError::UnsupportedType("unknown".to_string())),
        }

        if self.data.is_empty() {
            return Err(MediaError::Empty);
        }

        Ok(())
    }
}

/// The image part of a post write, as decoded at the transport boundary.
#[derive(Debug, Clone, Default)]
pub enum ImageInput {
    /// The payload carries no image field at all.
    #[default]
    Absent,
    /// A URL string, possibly empty.
    Url(String),
    /// An uploaded file.
    Upload(Attachment),
}

impl ImageInput {
    /// Combine the two channels a request can carry an image on.
    /// An attached file always wins over a URL.
    pub fn from_parts(url: Option<String>, file: Option<Attachment>) -> Self {
        match (file, url) {
            (Some(file), _) => ImageInput::Upload(file),
            (None, Some(url)) => ImageInput::Url(url),
            (None, None) => ImageInput::Absent,
        }
    }

    /// Reject unusable uploads before anything is written.
    pub fn check(&self) -> Result<(), MediaError> {
        match self {
            ImageInput::Upload(attachment) => attachment.check(),
            _ => Ok(()),
        }
    }
}

/// Resolve the image for a newly created post.
pub async fn ingest_for_create(
    input: ImageInput,
    store: &dyn MediaStore,
) -> Result<String, MediaError> {
    match input {
        ImageInput::Upload(attachment) => store.store(&attachment).await,
        ImageInput::Url(url) => Ok(url.trim().to_string()),
        ImageInput::Absent => Ok(String::new()),
    }
}

/// Resolve the image for an update. `None` leaves the stored value untouched.
pub async fn ingest_for_update(
    input: ImageInput,
    store: &dyn MediaStore,
) -> Result<Option<String>, MediaError> {
    match input {
        ImageInput::Upload(attachment) => store.store(&attachment).await.map(Some),
        ImageInput::Url(url) => Ok(Some(url.trim().to_string())),
        ImageInput::Absent => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    #[derive(Default)]
    struct RecordingStore {
        stored: Mutex<Vec<Option<String>>>,
    }

    #[async_trait]
    impl MediaStore for RecordingStore {
        async fn store(&self, attachment: &Attachment) -> Result<String, MediaError> {
            self.stored
                .lock()
                .unwrap()
                .push(attachment.file_name.clone());
            Ok("/uploads/generated.png".to_string())
        }
    }

    fn png() -> Attachment {
        Attachment::new(
            Some("cat.png".to_string()),
            Some(mime::IMAGE_PNG),
            Bytes::from_static(b"\x89PNG"),
        )
    }

    #[tokio::test]
    async fn upload_wins_over_url() {
        let store = RecordingStore::default();
        let input = ImageInput::from_parts(Some("https://example.com/a.jpg".into()), Some(png()));

        let image = ingest_for_create(input, &store).await.unwrap();

        assert_eq!(image, "/uploads/generated.png");
        assert_eq!(store.stored.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_trims_url_and_defaults_to_empty() {
        let store = RecordingStore::default();

        let url = ingest_for_create(ImageInput::Url("  https://x.io/p.jpg ".into()), &store)
            .await
            .unwrap();
        assert_eq!(url, "https://x.io/p.jpg");

        let blank = ingest_for_create(ImageInput::Url("   ".into()), &store)
            .await
            .unwrap();
        assert_eq!(blank, "");

        let absent = ingest_for_create(ImageInput::Absent, &store).await.unwrap();
        assert_eq!(absent, "");
        assert!(store.stored.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_distinguishes_absent_from_empty() {
        let store = RecordingStore::default();

        assert_eq!(
            ingest_for_update(ImageInput::Absent, &store).await.unwrap(),
            None
        );
        assert_eq!(
            ingest_for_update(ImageInput::Url(String::new()), &store)
                .await
                .unwrap(),
            Some(String::new())
        );
    }

    #[test]
    fn non_images_are_rejected() {
        let text = Attachment::new(
            Some("notes.txt".into()),
            Some(mime::TEXT_PLAIN),
            Bytes::from_static(b"hi"),
        );
        assert!(matches!(
            ImageInput::Upload(text).check(),
            Err(MediaError::UnsupportedType(_))
        ));

        let empty = Attachment::new(None, Some(mime::IMAGE_JPEG), Bytes::new());
        assert!(matches!(empty.check(), Err(MediaError::Empty)));

        assert!(ImageInput::Url("x".into()).check().is_ok());
    }
}
