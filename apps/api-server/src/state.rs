//! Application state - shared across all handlers.

#[cfg(test)]
use std::path::Path;
use std::sync::Arc;

use quill_core::ports::{CategoryRepository, MediaStore, PostRepository};
use quill_core::services::{CategoryService, PostService};
use quill_infra::database::DatabaseConfig;
use quill_infra::{InMemoryCategoryRepository, InMemoryPostRepository, LocalMediaStore};
use quill_shared::UPLOADS_PREFIX;

use crate::config::AppConfig;

#[cfg(feature = "postgres")]
use quill_infra::{DisconnectedStore, PostgresCategoryRepository, PostgresPostRepository};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub categories: CategoryService,
    /// Upper bound for post write bodies, JSON or multipart.
    pub max_body_bytes: usize,
}

type Repositories = (Arc<dyn PostRepository>, Arc<dyn CategoryRepository>);

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> std::io::Result<Self> {
        let media: Arc<dyn MediaStore> =
            Arc::new(LocalMediaStore::new(&config.upload_dir, UPLOADS_PREFIX)?);
        let (posts, categories) = repositories(config.database.as_ref()).await;

        tracing::info!(
            upload_dir = %config.upload_dir.display(),
            "Application state initialized"
        );

        Ok(Self::assemble(posts, categories, media, config.max_body_bytes))
    }

    /// State backed by the in-memory store, with uploads written to `upload_dir`.
    #[cfg(test)]
    pub fn in_memory(upload_dir: &Path, max_body_bytes: usize) -> std::io::Result<Self> {
        let media: Arc<dyn MediaStore> = Arc::new(LocalMediaStore::new(upload_dir, UPLOADS_PREFIX)?);
        let (posts, categories) = in_memory_repositories();
        Ok(Self::assemble(posts, categories, media, max_body_bytes))
    }

    fn assemble(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        media: Arc<dyn MediaStore>,
        max_body_bytes: usize,
    ) -> Self {
        Self {
            posts: PostService::new(posts, categories.clone(), media),
            categories: CategoryService::new(categories),
            max_body_bytes,
        }
    }
}

fn in_memory_repositories() -> Repositories {
    let posts: Arc<dyn PostRepository> = Arc::new(InMemoryPostRepository::new());
    let categories: Arc<dyn CategoryRepository> = Arc::new(InMemoryCategoryRepository::new());
    (posts, categories)
}

#[cfg(feature = "postgres")]
async fn repositories(db_config: Option<&DatabaseConfig>) -> Repositories {
    use migration::{Migrator, MigratorTrait};

    let Some(config) = db_config else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return in_memory_repositories();
    };

    match quill_infra::database::connect(config).await {
        Ok(conn) => {
            if let Err(e) = Migrator::up(&conn, None).await {
                tracing::error!("Failed to apply migrations: {}", e);
            }
            let conn = Arc::new(conn);
            let posts: Arc<dyn PostRepository> =
                Arc::new(PostgresPostRepository::new(conn.clone()));
            let categories: Arc<dyn CategoryRepository> =
                Arc::new(PostgresCategoryRepository::new(conn));
            (posts, categories)
        }
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Requests will report the store as unavailable.",
                e
            );
            let store = Arc::new(DisconnectedStore::new(e.to_string()));
            let posts: Arc<dyn PostRepository> = store.clone();
            let categories: Arc<dyn CategoryRepository> = store;
            (posts, categories)
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn repositories(db_config: Option<&DatabaseConfig>) -> Repositories {
    if db_config.is_some() {
        tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
    }
    tracing::info!("Running without postgres feature - using in-memory repository");
    in_memory_repositories()
}
