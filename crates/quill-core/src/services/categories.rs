use std::sync::Arc;

use crate::domain::Category;
use crate::error::{DomainError, RepoError};
use crate::ports::CategoryRepository;
use crate::validation::{CategoryFields, NewCategory};

pub const DUPLICATE_CATEGORY_MESSAGE: &str = "Category with this name already exists";

#[derive(Clone)]
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    /// All categories, ordered by name.
    pub async fn list(&self) -> Result<Vec<Category>, DomainError> {
        self.categories.ping().await?;
        Ok(self.categories.find_all().await?)
    }

    /// Create a category. Uniqueness is enforced by the store, not by a prior lookup.
    pub async fn create(&self, fields: CategoryFields) -> Result<Category, DomainError> {
        let new_category = NewCategory::parse(fields)?;
        let category = Category::new(new_category.name);

        self.categories.create(category).await.map_err(|e| match e {
            RepoError::Constraint(_) => {
                DomainError::Duplicate(DUPLICATE_CATEGORY_MESSAGE.to_string())
            }
            other => other.into(),
        })
    }
}
