//! Domain entities - the core business objects.

mod category;
mod post;

pub use category::{Category, CategorySummary, derive_slug};
pub use post::{Post, PostFilter, PostWithCategory};
