//! # Quill Client
//!
//! Talks to the blog API over HTTP and keeps a local view of posts and
//! categories for a UI to render.

pub mod api;
pub mod config;
pub mod error;
pub mod images;
pub mod state;
pub mod store;

pub use api::{BlogApi, HttpBlogApi, ImageField, PostForm};
pub use config::ClientConfig;
pub use error::ClientError;
pub use images::resolve_image_url;
pub use state::{Action, BlogState, reduce};
pub use store::BlogStore;
