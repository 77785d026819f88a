use mongodb::bson;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Mongo error: {0}")]
    MongoError(#[from] mongodb::error::Error),

    #[error("Failed to serialize document: {0}")]
    BsonSerializationError(#[from] bson::ser::Error),

    #[error("Failed to deserialize document: {0}")]
    BsonDeserializationError(#[from] bson::de::Error),

    #[error("Item already exists: {0}")]
    ItemAlreadyExists(String),
}
