pub mod json;
#[cfg(test)]
pub mod memory;

use crate::models::{Collection, DeleteOutcome, InsertOutcome, UpdateOutcome};
use crate::utils::AppError;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::{Client, Database, IndexModel};
use mongodb::options::IndexOptions;

pub use json::*;

/// Single-collection CRUD surface the handlers and the admin gate rely on.
/// Each call is one store operation; atomicity is per document only.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: Collection, filter: Document) -> Result<Vec<Document>, AppError>;

    async fn find_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Option<Document>, AppError>;

    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertOutcome, AppError>;

    /// Applies `changes` with `$set` to the first match. With `upsert`, a
    /// missing document is created from the filter plus the changes.
    async fn update_one(
        &self,
        collection: Collection,
        filter: Document,
        changes: Document,
        upsert: bool,
    ) -> Result<UpdateOutcome, AppError>;

    async fn delete_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<DeleteOutcome, AppError>;

    /// Round-trip to the backing store, used by the health check.
    async fn ping(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, AppError> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // One pool shared by every request
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await;

        Ok(mongodb)
    }

    /// Index failures are logged and ignored; the service works without them.
    async fn ensure_indexes(&self) {
        log::info!("🔧 Creating database indexes...");

        // users(uid) unique - upserts must never produce two profiles
        let users_index = IndexModel::builder()
            .keys(doc! { "uid": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match self.raw(Collection::Users).create_index(users_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(uid)"),
            // Usually means duplicate uids are already stored
            Err(e) => log::warn!("   ⚠️  Unique index users(uid) not created: {}", e),
        }

        for collection in [Collection::Reviews, Collection::Bookings] {
            let index = IndexModel::builder().keys(doc! { "uid": 1 }).build();

            match self.raw(collection).create_index(index).await {
                Ok(_) => log::info!("   ✅ Index created: {}(uid)", collection),
                Err(e) => log::debug!("   ℹ️  Index {}(uid) not created: {}", collection, e),
            }
        }

        log::info!("✅ Database indexes ready");
    }

    fn raw(&self, collection: Collection) -> mongodb::Collection<Document> {
        self.db.collection(collection.name())
    }
}

#[async_trait]
impl DocumentStore for MongoDB {
    async fn find(&self, collection: Collection, filter: Document) -> Result<Vec<Document>, AppError> {
        let cursor = self.raw(collection).find(filter).await?;
        Ok(cursor.try_collect::<Vec<Document>>().await?)
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Option<Document>, AppError> {
        Ok(self.raw(collection).find_one(filter).await?)
    }

    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertOutcome, AppError> {
        let result = self.raw(collection).insert_one(document).await?;
        Ok(InsertOutcome {
            acknowledged: true,
            inserted_id: bson_to_json(result.inserted_id),
        })
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: Document,
        changes: Document,
        upsert: bool,
    ) -> Result<UpdateOutcome, AppError> {
        let result = self
            .raw(collection)
            .update_one(filter, doc! { "$set": changes })
            .upsert(upsert)
            .await?;

        Ok(UpdateOutcome {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: u64::from(result.upserted_id.is_some()),
            upserted_id: bson_to_json(result.upserted_id.unwrap_or(Bson::Null)),
        })
    }

    async fn delete_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<DeleteOutcome, AppError> {
        let result = self.raw(collection).delete_one(filter).await?;
        Ok(DeleteOutcome {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
