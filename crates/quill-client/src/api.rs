//! HTTP transport for the blog API.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use quill_shared::dto::{CategoryPayload, CategoryResponse, PostPayload, PostQuery, PostResponse};
use quill_shared::{ApiResponse, ErrorResponse};

use crate::config::ClientConfig;
use crate::error::ClientError;

const IMAGE_FIELD: &str = "featuredImage";

/// What a post write says about the featured image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageField {
    /// Leave the stored image alone (create: no image).
    #[default]
    Unchanged,
    /// A remote URL; an empty string clears the image.
    Url(String),
    /// A binary upload, sent as multipart.
    File {
        file_name: String,
        content_type: String,
        bytes: Bytes,
    },
}

/// A post create or update as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub image: ImageField,
}

impl PostForm {
    /// The JSON body for this form. `None` when the image is a file and the
    /// form has to go out as multipart instead.
    pub fn json_payload(&self) -> Option<PostPayload> {
        let featured_image = match &self.image {
            ImageField::Unchanged => None,
            ImageField::Url(url) => Some(url.clone()),
            ImageField::File { .. } => return None,
        };

        Some(PostPayload {
            title: self.title.clone(),
            content: self.content.clone(),
            category: self.category.clone(),
            featured_image,
        })
    }

    fn multipart(self) -> Result<Form, ClientError> {
        let mut form = Form::new();
        for (name, value) in [
            ("title", self.title),
            ("content", self.content),
            ("category", self.category),
        ] {
            if let Some(value) = value {
                form = form.text(name, value);
            }
        }

        match self.image {
            ImageField::Unchanged => {}
            ImageField::Url(url) => form = form.text(IMAGE_FIELD, url),
            ImageField::File {
                file_name,
                content_type,
                bytes,
            } => {
                let part = Part::bytes(bytes.to_vec())
                    .file_name(file_name)
                    .mime_str(&content_type)?;
                form = form.part(IMAGE_FIELD, part);
            }
        }

        Ok(form)
    }
}

/// Operations the client state container needs from the server.
#[async_trait]
pub trait BlogApi: Send + Sync {
    async fn list_posts(&self, query: &PostQuery) -> Result<Vec<PostResponse>, ClientError>;

    async fn get_post(&self, id: Uuid) -> Result<PostResponse, ClientError>;

    async fn create_post(&self, form: PostForm) -> Result<PostResponse, ClientError>;

    async fn update_post(&self, id: Uuid, form: PostForm) -> Result<PostResponse, ClientError>;

    async fn delete_post(&self, id: Uuid) -> Result<(), ClientError>;

    async fn list_categories(&self) -> Result<Vec<CategoryResponse>, ClientError>;

    async fn create_category(&self, name: &str) -> Result<CategoryResponse, ClientError>;
}

/// [`BlogApi`] over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpBlogApi {
    client: Client,
    base_url: String,
}

impl HttpBlogApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("quill-client/", env!("CARGO_PKG_VERSION"))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    async fn send_form(
        &self,
        method: Method,
        path: &str,
        form: PostForm,
    ) -> Result<PostResponse, ClientError> {
        let req = self.request(method, path);
        let req = match form.json_payload() {
            Some(payload) => req.json(&payload),
            None => req.multipart(form.multipart()?),
        };
        handle(req.send().await?).await
    }
}

/// Unwrap the `data` of a success envelope, or surface the server's message.
async fn handle<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    let bytes = resp.bytes().await?;
    if !status.is_success() {
        return Err(api_error(status.as_u16(), &bytes));
    }

    let envelope: ApiResponse<T> =
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))?;
    Ok(envelope.data)
}

fn api_error(status: u16, body: &[u8]) -> ClientError {
    let message = serde_json::from_slice::<ErrorResponse>(body)
        .map(|err| err.message)
        .unwrap_or_else(|_| format!("Request failed with status {status}"));
    ClientError::Api { status, message }
}

#[async_trait]
impl BlogApi for HttpBlogApi {
    async fn list_posts(&self, query: &PostQuery) -> Result<Vec<PostResponse>, ClientError> {
        tracing::debug!(?query, "Listing posts");
        let resp = self.request(Method::GET, "posts").query(query).send().await?;
        handle(resp).await
    }

    async fn get_post(&self, id: Uuid) -> Result<PostResponse, ClientError> {
        let resp = self
            .request(Method::GET, &format!("posts/{id}"))
            .send()
            .await?;
        handle(resp).await
    }

    async fn create_post(&self, form: PostForm) -> Result<PostResponse, ClientError> {
        self.send_form(Method::POST, "posts", form).await
    }

    async fn update_post(&self, id: Uuid, form: PostForm) -> Result<PostResponse, ClientError> {
        self.send_form(Method::PUT, &format!("posts/{id}"), form)
            .await
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), ClientError> {
        let resp = self
            .request(Method::DELETE, &format!("posts/{id}"))
            .send()
            .await?;
        let _: serde_json::Value = handle(resp).await?;
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<CategoryResponse>, ClientError> {
        let resp = self.request(Method::GET, "categories").send().await?;
        handle(resp).await
    }

    async fn create_category(&self, name: &str) -> Result<CategoryResponse, ClientError> {
        let payload = CategoryPayload {
            name: Some(name.to_string()),
        };
        let resp = self
            .request(Method::POST, "categories")
            .json(&payload)
            .send()
            .await?;
        handle(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_and_path() {
        let api = HttpBlogApi::new(&ClientConfig::new("http://localhost:5000/api/")).unwrap();
        assert_eq!(api.url("posts"), "http://localhost:5000/api/posts");
        assert_eq!(api.url("/categories"), "http://localhost:5000/api/categories");
    }

    #[test]
    fn url_and_absent_images_go_out_as_json() {
        let form = PostForm {
            title: Some("Hi".into()),
            image: ImageField::Url(String::new()),
            ..Default::default()
        };
        let payload = form.json_payload().expect("json body");
        assert_eq!(payload.title.as_deref(), Some("Hi"));
        assert_eq!(payload.featured_image.as_deref(), Some(""));

        let untouched = PostForm::default().json_payload().expect("json body");
        assert!(untouched.featured_image.is_none());
    }

    #[test]
    fn files_switch_to_multipart() {
        let form = PostForm {
            image: ImageField::File {
                file_name: "cover.png".into(),
                content_type: "image/png".into(),
                bytes: Bytes::from_static(b"png"),
            },
            ..Default::default()
        };
        assert!(form.json_payload().is_none());
        assert!(form.multipart().is_ok());
    }

    #[test]
    fn error_body_message_is_kept_verbatim() {
        let err = api_error(404, br#"{"success":false,"message":"Post not found"}"#);
        assert_eq!(err.to_string(), "Post not found");
        assert_eq!(err.status(), Some(404));

        let err = api_error(502, b"<html>bad gateway</html>");
        assert_eq!(err.to_string(), "Request failed with status 502");
    }
}
