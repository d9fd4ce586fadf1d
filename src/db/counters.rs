use mongodb::bson::{doc, Document as BsonDocument};
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};

use crate::error::AppError;

/// Allocates increasing numeric ids, one sequence per collection name.
///
/// Each sequence is a `{ _id: <name>, seq: <i64> }` entry in the `counters`
/// collection, bumped atomically with `$inc`.
pub struct MongoSequence {
    collection: mongodb::Collection<BsonDocument>,
}

impl MongoSequence {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("counters"),
        }
    }

    /// Return the next id of sequence `name`, starting at 1.
    pub async fn next(&self, name: &str) -> Result<i64, AppError> {
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let counter = self
            .collection
            .find_one_and_update(doc! { "_id": name }, doc! { "$inc": { "seq": 1_i64 } })
            .with_options(options)
            .await?
            .ok_or_else(|| AppError::Database(format!("Sequence '{}' was not created", name)))?;

        counter
            .get_i64("seq")
            .map_err(|e| AppError::Database(format!("Corrupt sequence '{}': {}", name, e)))
    }
}
