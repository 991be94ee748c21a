//! In-memory repositories - used when no database is configured.
//!
//! Note: Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Category, Post, PostFilter};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CategoryRepository, PostRepository};

/// In-memory category store. Enforces name uniqueness like the SQL unique index.
#[derive(Default)]
pub struct InMemoryCategoryRepository {
    store: RwLock<HashMap<Uuid, Category>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Category, Uuid> for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn create(&self, category: Category) -> Result<Category, RepoError> {
        let mut store = self.store.write().await;

        if store.values().any(|c| c.name == category.name) {
            return Err(RepoError::Constraint(format!(
                "duplicate key value violates unique constraint: name={}",
                category.name
            )));
        }

        store.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, category: Category) -> Result<Category, RepoError> {
        let mut store = self.store.write().await;

        if store
            .values()
            .any(|c| c.name == category.name && c.id != category.id)
        {
            return Err(RepoError::Constraint(format!(
                "duplicate key value violates unique constraint: name={}",
                category.name
            )));
        }

        match store.get_mut(&category.id) {
            Some(slot) => {
                *slot = category.clone();
                Ok(category)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }

    async fn ping(&self) -> Result<(), RepoError> {
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_all(&self) -> Result<Vec<Category>, RepoError> {
        let mut categories: Vec<Category> = self.store.read().await.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }
}

/// In-memory post store.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn create(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;

        if store.contains_key(&post.id) {
            return Err(RepoError::Constraint(format!("duplicate post id {}", post.id)));
        }

        store.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        match self.store.write().await.get_mut(&post.id) {
            Some(slot) => {
                *slot = post.clone();
                Ok(post)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }

    async fn ping(&self) -> Result<(), RepoError> {
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn search(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self
            .store
            .read()
            .await
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    #[tokio::test]
    async fn test_duplicate_category_name_is_a_constraint_violation() {
        let repo = InMemoryCategoryRepository::new();
        repo.create(Category::new("Tech".into())).await.unwrap();

        let err = repo.create(Category::new("Tech".into())).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));

        // Comparison is exact, so a different case is a different name.
        repo.create(Category::new("tech".into())).await.unwrap();
        assert_eq!(repo.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_categories_sorted_by_name() {
        let repo = InMemoryCategoryRepository::new();
        for name in ["Travel", "Art", "Food"] {
            repo.create(Category::new(name.into())).await.unwrap();
        }

        let names: Vec<_> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Art", "Food", "Travel"]);
    }

    #[tokio::test]
    async fn test_search_is_newest_first() {
        let repo = InMemoryPostRepository::new();
        let category_id = Uuid::new_v4();

        let mut older = Post::new("older".into(), "x".into(), category_id, String::new());
        older.created_at = Utc::now() - Duration::minutes(5);
        let newer = Post::new("newer".into(), "x".into(), category_id, String::new());

        repo.create(older).await.unwrap();
        repo.create(newer).await.unwrap();

        let titles: Vec<_> = repo
            .search(&PostFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["newer", "older"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_post() {
        let repo = InMemoryPostRepository::new();
        let post = Post::new("t".into(), "c".into(), Uuid::new_v4(), String::new());

        assert!(matches!(
            repo.update(post.clone()).await,
            Err(RepoError::NotFound)
        ));
        assert!(matches!(
            repo.delete(post.id).await,
            Err(RepoError::NotFound)
        ));
    }
}
