use async_trait::async_trait;

use crate::db::models::Community;
use crate::error::AppError;

/// Repository trait for workplace communities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommunityRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Community>, AppError>;

    /// Insert or replace a community. Only used for seeding.
    async fn create_or_update(&self, community: &Community) -> Result<(), AppError>;
}

/// MongoDB implementation of the CommunityRepository.
pub struct MongoCommunityRepository {
    collection: mongodb::Collection<Community>,
}

impl MongoCommunityRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("communities"),
        }
    }
}

#[async_trait]
impl CommunityRepository for MongoCommunityRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Community>, AppError> {
        use mongodb::bson::doc;

        self.collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn create_or_update(&self, community: &Community) -> Result<(), AppError> {
        use mongodb::bson::doc;
        use mongodb::options::ReplaceOptions;

        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(doc! { "_id": community.id }, community)
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
