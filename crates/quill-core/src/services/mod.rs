//! Application services - the operations the HTTP layer exposes.

mod categories;
mod posts;

pub use categories::{CategoryService, DUPLICATE_CATEGORY_MESSAGE};
pub use posts::PostService;
