//! Store used when a database is configured but could not be reached at
//! startup. The server keeps running and every call reports a connection error.

use async_trait::async_trait;
use uuid::Uuid;

use quill_core::domain::{Category, Post, PostFilter};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CategoryRepository, PostRepository};

#[derive(Debug, Clone)]
pub struct DisconnectedStore {
    reason: String,
}

impl DisconnectedStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> RepoError {
        RepoError::Connection(self.reason.clone())
    }
}

macro_rules! disconnected_base {
    ($entity:ty) => {
        #[async_trait]
        impl BaseRepository<$entity, Uuid> for DisconnectedStore {
            async fn find_by_id(&self, _id: Uuid) -> Result<Option<$entity>, RepoError> {
                Err(self.error())
            }

            async fn create(&self, _entity: $entity) -> Result<$entity, RepoError> {
                Err(self.error())
            }

            async fn update(&self, _entity: $entity) -> Result<$entity, RepoError> {
                Err(self.error())
            }

            async fn delete(&self, _id: Uuid) -> Result<(), RepoError> {
                Err(self.error())
            }

            async fn ping(&self) -> Result<(), RepoError> {
                Err(self.error())
            }
        }
    };
}

disconnected_base!(Category);
disconnected_base!(Post);

#[async_trait]
impl CategoryRepository for DisconnectedStore {
    async fn find_all(&self) -> Result<Vec<Category>, RepoError> {
        Err(self.error())
    }
}

#[async_trait]
impl PostRepository for DisconnectedStore {
    async fn search(&self, _filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        Err(self.error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_call_reports_connection_error() {
        let store = DisconnectedStore::new("connection refused");

        let ping = BaseRepository::<Post, Uuid>::ping(&store).await;
        assert!(matches!(ping, Err(RepoError::Connection(msg)) if msg == "connection refused"));
        assert!(matches!(
            store.find_all().await,
            Err(RepoError::Connection(_))
        ));
    }
}
