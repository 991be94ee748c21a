//! Decoding of post write bodies.
//!
//! A post write arrives either as JSON (`featuredImage` is a URL string) or as
//! `multipart/form-data`, where `featuredImage` may be a file part or a plain
//! text part. Both shapes end up as [`PostFields`] plus an [`ImageInput`].

use actix_multipart::{Multipart, MultipartError};
use actix_web::{HttpRequest, http::header::CONTENT_TYPE, web};
use bytes::{Bytes, BytesMut};
use futures::{StreamExt, TryStreamExt};
use quill_core::media::{Attachment, ImageInput};
use quill_core::validation::PostFields;
use quill_shared::dto::PostPayload;

use crate::middleware::error::{AppError, AppResult};

const IMAGE_FIELD: &str = "featuredImage";

/// A decoded post write.
#[derive(Debug)]
pub struct PostWrite {
    pub fields: PostFields,
    pub image: ImageInput,
}

impl PostWrite {
    fn from_parts(payload: PostPayload, file: Option<Attachment>) -> Self {
        Self {
            fields: PostFields {
                title: payload.title,
                content: payload.content,
                category: payload.category,
            },
            image: ImageInput::from_parts(payload.featured_image, file),
        }
    }
}

/// Read a post write body of at most `limit` bytes.
pub async fn read_post_write(
    req: &HttpRequest,
    payload: web::Payload,
    limit: usize,
) -> AppResult<PostWrite> {
    if is_multipart(req) {
        read_multipart(req, payload, limit).await
    } else {
        read_json(payload, limit).await
    }
}

fn is_multipart(req: &HttpRequest) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| {
            ct.trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        })
        .unwrap_or(false)
}

fn too_large(limit: usize) -> AppError {
    AppError::PayloadTooLarge(format!("Request body exceeds {limit} bytes"))
}

fn multipart_error(err: MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid multipart body: {err}"))
}

async fn read_json(mut payload: web::Payload, limit: usize) -> AppResult<PostWrite> {
    let mut body = BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| AppError::BadRequest(e.to_string()))?;
        if body.len() + chunk.len() > limit {
            return Err(too_large(limit));
        }
        body.extend_from_slice(&chunk);
    }

    let dto = if body.iter().all(u8::is_ascii_whitespace) {
        PostPayload::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?
    };

    Ok(PostWrite::from_parts(dto, None))
}

async fn read_multipart(
    req: &HttpRequest,
    payload: web::Payload,
    limit: usize,
) -> AppResult<PostWrite> {
    let mut multipart = Multipart::new(req.headers(), payload);
    let mut dto = PostPayload::default();
    let mut file = None;
    let mut total = 0usize;

    while let Some(mut field) = multipart.try_next().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(String::from);
        let content_type = field.content_type().cloned();

        let mut data = BytesMut::new();
        while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
            total += chunk.len();
            if total > limit {
                return Err(too_large(limit));
            }
            data.extend_from_slice(&chunk);
        }
        let data: Bytes = data.freeze();

        match file_name {
            // Browsers send an empty file part when nothing was picked.
            Some(file_name) if file_name.is_empty() && data.is_empty() => {}
            Some(file_name) if name == IMAGE_FIELD => {
                file = Some(Attachment::new(Some(file_name), content_type, data));
            }
            Some(_) => {
                return Err(AppError::BadRequest(format!(
                    "Unexpected file field: {name}"
                )));
            }
            None => {
                let text = String::from_utf8(data.to_vec()).map_err(|_| {
                    AppError::BadRequest(format!("Field {name} is not valid UTF-8"))
                })?;
                match name.as_str() {
                    "title" => dto.title = Some(text),
                    "content" => dto.content = Some(text),
                    "category" => dto.category = Some(text),
                    IMAGE_FIELD => dto.featured_image = Some(text),
                    _ => {}
                }
            }
        }
    }

    Ok(PostWrite::from_parts(dto, file))
}
