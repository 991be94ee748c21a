//! Client-side blog state and the reducer that evolves it.

use uuid::Uuid;

use quill_shared::dto::{CategoryResponse, PostQuery, PostResponse};

/// Everything the UI renders from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogState {
    pub posts: Vec<PostResponse>,
    pub categories: Vec<CategoryResponse>,
    /// Requests started and not yet finished.
    pub in_flight: usize,
    pub error: Option<String>,
    pub search_term: String,
    pub selected_category: String,
    /// Generation of the newest post-list request. Older responses are dropped.
    pub posts_generation: u64,
}

impl BlogState {
    pub fn loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Query for the current search term and category filter; empty values
    /// are left out.
    pub fn post_query(&self) -> PostQuery {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        PostQuery {
            search: non_empty(&self.search_term),
            category: non_empty(&self.selected_category),
        }
    }

    pub fn post(&self, id: Uuid) -> Option<&PostResponse> {
        self.posts.iter().find(|p| p.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    RequestStarted,
    RequestFinished,
    RequestFailed(String),
    PostsRequested,
    PostsLoaded {
        generation: u64,
        posts: Vec<PostResponse>,
    },
    PostAdded(PostResponse),
    PostUpdated(PostResponse),
    PostRemoved(Uuid),
    CategoriesLoaded(Vec<CategoryResponse>),
    CategoryAdded(CategoryResponse),
    SearchTermChanged(String),
    SelectedCategoryChanged(String),
}

pub fn reduce(mut state: BlogState, action: Action) -> BlogState {
    match action {
        Action::RequestStarted => {
            state.in_flight += 1;
            state.error = None;
        }
        Action::RequestFinished => {
            state.in_flight = state.in_flight.saturating_sub(1);
        }
        Action::RequestFailed(message) => {
            state.error = Some(message);
        }
        Action::PostsRequested => {
            state.posts_generation += 1;
        }
        Action::PostsLoaded { generation, posts } => {
            if generation == state.posts_generation {
                state.posts = posts;
            }
        }
        Action::PostAdded(post) => {
            state.posts.insert(0, post);
        }
        Action::PostUpdated(post) => {
            if let Some(slot) = state.posts.iter_mut().find(|p| p.id == post.id) {
                *slot = post;
            }
        }
        Action::PostRemoved(id) => {
            state.posts.retain(|p| p.id != id);
        }
        Action::CategoriesLoaded(categories) => {
            state.categories = categories;
        }
        Action::CategoryAdded(category) => {
            let at = state
                .categories
                .partition_point(|c| c.name.as_str() < category.name.as_str());
            state.categories.insert(at, category);
        }
        Action::SearchTermChanged(term) => {
            state.search_term = term;
        }
        Action::SelectedCategoryChanged(category) => {
            state.selected_category = category;
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn post(title: &str) -> PostResponse {
        let now = Utc::now();
        PostResponse {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: "body".to_string(),
            category: None,
            featured_image: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn category(name: &str) -> CategoryResponse {
        let now = Utc::now();
        CategoryResponse {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: name.to_lowercase(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn loading_tracks_overlapping_requests() {
        let state = reduce(BlogState::default(), Action::RequestStarted);
        let state = reduce(state, Action::RequestStarted);
        let state = reduce(state, Action::RequestFinished);
        assert!(state.loading());

        let state = reduce(state, Action::RequestFinished);
        let state = reduce(state, Action::RequestFinished);
        assert!(!state.loading());
        assert_eq!(state.in_flight, 0);
    }

    #[test]
    fn starting_a_request_clears_the_error() {
        let state = reduce(BlogState::default(), Action::RequestFailed("boom".into()));
        assert_eq!(state.error.as_deref(), Some("boom"));

        let state = reduce(state, Action::RequestStarted);
        assert!(state.error.is_none());
    }

    #[test]
    fn stale_post_lists_are_ignored() {
        let state = reduce(BlogState::default(), Action::PostsRequested);
        let state = reduce(state, Action::PostsRequested);

        let state = reduce(
            state,
            Action::PostsLoaded {
                generation: 2,
                posts: vec![post("new")],
            },
        );
        let state = reduce(
            state,
            Action::PostsLoaded {
                generation: 1,
                posts: vec![post("old"), post("older")],
            },
        );

        assert_eq!(state.posts.len(), 1);
        assert_eq!(state.posts[0].title, "new");
    }

    #[test]
    fn mutations_prepend_replace_and_remove() {
        let first = post("first");
        let state = BlogState {
            posts: vec![first.clone()],
            ..Default::default()
        };

        let second = post("second");
        let state = reduce(state, Action::PostAdded(second.clone()));
        assert_eq!(state.posts[0].id, second.id);

        let renamed = PostResponse {
            title: "renamed".into(),
            ..first.clone()
        };
        let state = reduce(state, Action::PostUpdated(renamed));
        assert_eq!(state.post(first.id).unwrap().title, "renamed");
        assert_eq!(state.posts.len(), 2);

        let state = reduce(state, Action::PostRemoved(second.id));
        assert_eq!(state.posts.len(), 1);
        assert!(state.post(second.id).is_none());
    }

    #[test]
    fn added_categories_keep_name_order() {
        let state = reduce(
            BlogState::default(),
            Action::CategoriesLoaded(vec![category("Art"), category("Tech")]),
        );
        let state = reduce(state, Action::CategoryAdded(category("Life")));

        let names: Vec<&str> = state.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Art", "Life", "Tech"]);
    }

    #[test]
    fn post_query_skips_empty_filters() {
        let state = reduce(BlogState::default(), Action::SearchTermChanged("rust".into()));
        let query = state.post_query();
        assert_eq!(query.search.as_deref(), Some("rust"));
        assert!(query.category.is_none());
    }
}
