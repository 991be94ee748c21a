//! The client state container.

use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use quill_shared::dto::{CategoryResponse, PostResponse};

use crate::api::{BlogApi, PostForm};
use crate::error::ClientError;
use crate::state::{Action, BlogState, reduce};

/// Holds a [`BlogState`] and runs API calls against it.
///
/// Every operation marks a request in flight and clears the previous error
/// before calling the API. On failure the server message is stored and the
/// error returned. The in-flight mark is dropped either way.
pub struct BlogStore {
    api: Arc<dyn BlogApi>,
    state: RwLock<BlogState>,
}

impl BlogStore {
    pub fn new(api: Arc<dyn BlogApi>) -> Self {
        Self {
            api,
            state: RwLock::new(BlogState::default()),
        }
    }

    async fn dispatch(&self, action: Action) {
        let mut state = self.state.write().await;
        let current = std::mem::take(&mut *state);
        *state = reduce(current, action);
    }

    async fn settle<T>(&self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        if let Err(err) = &result {
            tracing::warn!(error = %err, "Blog API request failed");
            self.dispatch(Action::RequestFailed(err.to_string())).await;
        }
        self.dispatch(Action::RequestFinished).await;
        result
    }

    /// Reload the post list with the current search term and category filter.
    /// A response that arrives after a newer list request started is dropped.
    pub async fn fetch_posts(&self) -> Result<(), ClientError> {
        let (generation, query) = {
            let mut state = self.state.write().await;
            let current = std::mem::take(&mut *state);
            let next = reduce(
                reduce(current, Action::RequestStarted),
                Action::PostsRequested,
            );
            let started = (next.posts_generation, next.post_query());
            *state = next;
            started
        };

        let result = self.api.list_posts(&query).await;

        let mut state = self.state.write().await;
        let current = std::mem::take(&mut *state);
        let stale = generation != current.posts_generation;
        let next = match &result {
            Ok(posts) => reduce(
                current,
                Action::PostsLoaded {
                    generation,
                    posts: posts.clone(),
                },
            ),
            Err(_) if stale => current,
            Err(err) => reduce(current, Action::RequestFailed(err.to_string())),
        };
        *state = reduce(next, Action::RequestFinished);

        if stale {
            tracing::debug!(generation, "Discarded stale post list");
        }
        result.map(|_| ())
    }

    /// Fetch one post. The held list is not touched.
    pub async fn fetch_post(&self, id: Uuid) -> Result<PostResponse, ClientError> {
        self.dispatch(Action::RequestStarted).await;
        let result = self.api.get_post(id).await;
        self.settle(result).await
    }

    pub async fn add_post(&self, form: PostForm) -> Result<PostResponse, ClientError> {
        self.dispatch(Action::RequestStarted).await;
        let result = self.api.create_post(form).await;
        if let Ok(post) = &result {
            self.dispatch(Action::PostAdded(post.clone())).await;
        }
        self.settle(result).await
    }

    pub async fn edit_post(&self, id: Uuid, form: PostForm) -> Result<PostResponse, ClientError> {
        self.dispatch(Action::RequestStarted).await;
        let result = self.api.update_post(id, form).await;
        if let Ok(post) = &result {
            self.dispatch(Action::PostUpdated(post.clone())).await;
        }
        self.settle(result).await
    }

    pub async fn remove_post(&self, id: Uuid) -> Result<(), ClientError> {
        self.dispatch(Action::RequestStarted).await;
        let result = self.api.delete_post(id).await;
        if result.is_ok() {
            self.dispatch(Action::PostRemoved(id)).await;
        }
        self.settle(result).await
    }

    pub async fn fetch_categories(&self) -> Result<(), ClientError> {
        self.dispatch(Action::RequestStarted).await;
        let result = self.api.list_categories().await;
        if let Ok(categories) = &result {
            self.dispatch(Action::CategoriesLoaded(categories.clone()))
                .await;
        }
        self.settle(result).await.map(|_| ())
    }

    pub async fn add_category(&self, name: &str) -> Result<CategoryResponse, ClientError> {
        self.dispatch(Action::RequestStarted).await;
        let result = self.api.create_category(name).await;
        if let Ok(category) = &result {
            self.dispatch(Action::CategoryAdded(category.clone())).await;
        }
        self.settle(result).await
    }

    /// Load categories and the unfiltered post list.
    pub async fn load(&self) -> Result<(), ClientError> {
        let (posts, categories) = tokio::join!(self.fetch_posts(), self.fetch_categories());
        posts.and(categories)
    }

    pub async fn set_search_term(&self, term: impl Into<String>) -> Result<(), ClientError> {
        self.dispatch(Action::SearchTermChanged(term.into())).await;
        self.fetch_posts().await
    }

    pub async fn set_selected_category(
        &self,
        category: impl Into<String>,
    ) -> Result<(), ClientError> {
        self.dispatch(Action::SelectedCategoryChanged(category.into()))
            .await;
        self.fetch_posts().await
    }

    pub async fn snapshot(&self) -> BlogState {
        self.state.read().await.clone()
    }

    pub async fn posts(&self) -> Vec<PostResponse> {
        self.state.read().await.posts.clone()
    }

    pub async fn categories(&self) -> Vec<CategoryResponse> {
        self.state.read().await.categories.clone()
    }

    pub async fn loading(&self) -> bool {
        self.state.read().await.loading()
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }
}
