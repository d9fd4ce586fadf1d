use async_trait::async_trait;

use crate::db::models::User;
use crate::error::AppError;

/// Repository trait for user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Find the user linked to the given external workplace identity.
    async fn find_by_workplace_id(&self, workplace_id: &str) -> Result<Option<User>, AppError>;

    /// Persist `user`, inserting it if it does not exist yet.
    async fn save(&self, user: &User) -> Result<(), AppError>;
}

/// MongoDB implementation of the UserRepository.
pub struct MongoUserRepository {
    collection: mongodb::Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("users"),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        use mongodb::bson::doc;

        self.collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn find_by_workplace_id(&self, workplace_id: &str) -> Result<Option<User>, AppError> {
        use mongodb::bson::doc;

        self.collection
            .find_one(doc! { "workplace_id": workplace_id })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn save(&self, user: &User) -> Result<(), AppError> {
        use mongodb::bson::doc;
        use mongodb::options::ReplaceOptions;

        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(doc! { "_id": user.id }, user)
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
