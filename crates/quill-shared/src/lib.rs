//! # Quill Shared
//!
//! Wire types shared between the API server and its clients.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};

/// URL path prefix under which uploaded images are served.
pub const UPLOADS_PREFIX: &str = "/uploads";
