use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::{Category, CategorySummary};

/// Post entity - a blog entry filed under exactly one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category_id: Uuid,
    /// Empty, an external URL, or an `/uploads/...` path.
    pub featured_image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post.
    pub fn new(title: String, content: String, category_id: Uuid, featured_image: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            content,
            category_id,
            featured_image,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A post together with the name and slug of its category.
///
/// `category` is `None` only when the referenced category vanished between
/// the existence check and the read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostWithCategory {
    pub post: Post,
    pub category: Option<CategorySummary>,
}

impl PostWithCategory {
    pub fn new(post: Post, category: Option<&Category>) -> Self {
        Self {
            post,
            category: category.map(CategorySummary::from),
        }
    }
}

/// Listing criteria. Both filters are optional and intersect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    /// Case-insensitive substring matched against title or content.
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        if let Some(category_id) = self.category_id {
            if post.category_id != category_id {
                return false;
            }
        }

        match &self.search {
            Some(needle) => {
                let needle = needle.to_lowercase();
                post.title.to_lowercase().contains(&needle)
                    || post.content.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, content: &str, category_id: Uuid) -> Post {
        Post::new(title.into(), content.into(), category_id, String::new())
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_content() {
        let cat = Uuid::new_v4();
        let filter = PostFilter {
            search: Some("FoO".to_string()),
            category_id: None,
        };

        assert!(filter.matches(&post("all about foo", "x", cat)));
        assert!(filter.matches(&post("x", "Some FOOD here", cat)));
        assert!(!filter.matches(&post("bar", "baz", cat)));
    }

    #[test]
    fn filters_intersect() {
        let tech = Uuid::new_v4();
        let life = Uuid::new_v4();
        let filter = PostFilter {
            search: Some("rust".to_string()),
            category_id: Some(tech),
        };

        assert!(filter.matches(&post("Rust tips", "x", tech)));
        assert!(!filter.matches(&post("Rust tips", "x", life)));
        assert!(!filter.matches(&post("Go tips", "x", tech)));
    }
}
