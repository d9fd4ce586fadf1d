use async_trait::async_trait;
use chrono::Utc;

use crate::db::counters::MongoSequence;
use crate::db::models::{Document, NewDocument, Privacy};
use crate::error::AppError;

/// Repository trait for document operations.
///
/// This trait allows mocking the database layer in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Insert a new document, assigning its id and `updated_at`.
    async fn create(&self, doc: NewDocument) -> Result<Document, AppError>;

    /// Find a document by its id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Document>, AppError>;

    /// List the documents owned by `user_id` together with every public
    /// document, most recently updated first.
    async fn list_visible_to(&self, user_id: i64) -> Result<Vec<Document>, AppError>;
}

/// MongoDB implementation of the DocumentRepository.
pub struct MongoDocumentRepository {
    collection: mongodb::Collection<Document>,
    ids: MongoSequence,
}

impl MongoDocumentRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("documents"),
            ids: MongoSequence::new(db),
        }
    }
}

#[async_trait]
impl DocumentRepository for MongoDocumentRepository {
    async fn create(&self, new: NewDocument) -> Result<Document, AppError> {
        let doc = Document {
            id: self.ids.next("documents").await?,
            name: new.name,
            content: new.content,
            privacy: new.privacy,
            owner_id: new.owner_id,
            updated_at: Utc::now(),
        };

        self.collection
            .insert_one(&doc)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(doc)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Document>, AppError> {
        use mongodb::bson::doc;

        self.collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn list_visible_to(&self, user_id: i64) -> Result<Vec<Document>, AppError> {
        use futures::TryStreamExt;
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        let filter = doc! {
            "$or": [
                { "owner_id": user_id },
                { "privacy": Privacy::Public.as_str() }
            ]
        };

        let options = FindOptions::builder()
            .sort(doc! { "updated_at": -1 })
            .build();

        let cursor = self
            .collection
            .find(filter)
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        cursor
            .try_collect::<Vec<Document>>()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
