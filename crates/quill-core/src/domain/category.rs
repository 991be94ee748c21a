use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slug::slugify;
use uuid::Uuid;

/// Category entity - a named tag referenced by posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new category, deriving its slug from the name.
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            slug: derive_slug(&name),
            name,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Lowercase the name and collapse every run of non-alphanumerics into one hyphen.
pub fn derive_slug(name: &str) -> String {
    slugify(name)
}

/// The slice of a category that is embedded in post responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl From<&Category> for CategorySummary {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            slug: category.slug.clone(),
        }
    }
}
