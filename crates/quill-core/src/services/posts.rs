use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Category, CategorySummary, Post, PostFilter, PostWithCategory};
use crate::error::{DomainError, RepoError};
use crate::media::{self, ImageInput};
use crate::ports::{CategoryRepository, MediaStore, PostRepository};
use crate::validation::{self, NewPost, PostChanges, PostFields};

const POST: &str = "Post";
const CATEGORY: &str = "Category";

/// Orchestrates validation, category checks, media ingestion and persistence
/// for posts.
///
/// The category existence check and the following write are two separate
/// store calls; a category removed in between is not detected.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    media: Arc<dyn MediaStore>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            posts,
            categories,
            media,
        }
    }

    /// Newest-first listing. Empty filter values are ignored.
    pub async fn list(
        &self,
        search: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<PostWithCategory>, DomainError> {
        self.posts.ping().await?;

        let search = search.filter(|s| !s.is_empty()).map(String::from);
        let category_id = match category.filter(|c| !c.is_empty()) {
            Some(raw) => match Uuid::parse_str(raw) {
                Ok(id) => Some(id),
                // Nothing can be filed under an id that does not parse.
                Err(_) => return Ok(Vec::new()),
            },
            None => None,
        };

        let filter = PostFilter {
            search,
            category_id,
        };
        let posts = self.posts.search(&filter).await?;
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let summaries: HashMap<Uuid, CategorySummary> = self
            .categories
            .find_all()
            .await?
            .iter()
            .map(|c| (c.id, CategorySummary::from(c)))
            .collect();

        Ok(posts
            .into_iter()
            .map(|post| {
                let category = summaries.get(&post.category_id).cloned();
                PostWithCategory { post, category }
            })
            .collect())
    }

    pub async fn get(&self, id: &str) -> Result<PostWithCategory, DomainError> {
        let id = parse_id(POST, id)?;
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found(POST))?;

        self.enrich(post).await
    }

    pub async fn create(
        &self,
        fields: PostFields,
        image: ImageInput,
    ) -> Result<PostWithCategory, DomainError> {
        let new_post = NewPost::parse(fields)?;
        image.check()?;

        let category = self.require_category(&new_post.category).await?;
        let featured_image = media::ingest_for_create(image, self.media.as_ref()).await?;

        let post = Post::new(
            new_post.title,
            new_post.content,
            category.id,
            featured_image,
        );
        let saved = self.posts.create(post).await?;

        Ok(PostWithCategory::new(saved, Some(&category)))
    }

    pub async fn update(
        &self,
        id: &str,
        fields: PostFields,
        image: ImageInput,
    ) -> Result<PostWithCategory, DomainError> {
        let id = parse_id(POST, id)?;
        let changes = PostChanges::parse(fields)?;
        image.check()?;

        let category = match &changes.category {
            Some(raw) => Some(self.require_category(raw).await?),
            None => None,
        };

        let mut post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found(POST))?;

        if let Some(featured_image) =
            media::ingest_for_update(image, self.media.as_ref()).await?
        {
            post.featured_image = featured_image;
        }
        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(content) = changes.content {
            post.content = content;
        }
        if let Some(category) = &category {
            post.category_id = category.id;
        }
        post.touch();
        validation::check_post(&post)?;

        let saved = self.posts.update(post).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found(POST),
            other => other.into(),
        })?;

        match category {
            Some(category) => Ok(PostWithCategory::new(saved, Some(&category))),
            None => self.enrich(saved).await,
        }
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let id = parse_id(POST, id)?;
        self.posts.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found(POST),
            other => other.into(),
        })
    }

    async fn require_category(&self, raw: &str) -> Result<Category, DomainError> {
        let Ok(id) = Uuid::parse_str(raw) else {
            return Err(DomainError::not_found(CATEGORY));
        };

        self.categories
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found(CATEGORY))
    }

    async fn enrich(&self, post: Post) -> Result<PostWithCategory, DomainError> {
        let category = self.categories.find_by_id(post.category_id).await?;
        Ok(PostWithCategory::new(post, category.as_ref()))
    }
}

fn parse_id(entity: &'static str, raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw).map_err(|_| DomainError::InvalidId {
        entity,
        value: raw.to_string(),
    })
}
