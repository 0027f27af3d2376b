use async_trait::async_trait;
use sea_orm::ActiveModelTrait;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveValue::{Set, Unchanged},
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};
use uuid::Uuid;

use crate::db::entities::{collection, item};
use crate::error::AppError;

/// Port for the inventory data store, covering both items and the
/// collections that own them.
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    // Items
    async fn get_item_by_id(&self, item_id: Uuid) -> Result<Option<item::Model>, AppError>;
    async fn list_all_items(&self) -> Result<Vec<item::Model>, AppError>;
    async fn list_items_by_status(&self, is_active: bool) -> Result<Vec<item::Model>, AppError>;
    async fn get_items_by_collection_id(
        &self,
        collection_id: Uuid,
    ) -> Result<Vec<item::Model>, AppError>;
    /// Case-insensitive keyword search across the item's descriptive fields.
    async fn search_items(&self, query: &str) -> Result<Vec<item::Model>, AppError>;
    async fn count_items(&self, is_active: Option<bool>) -> Result<u64, AppError>;
    async fn add_item(&self, item: item::Model) -> Result<(), AppError>;
    async fn update_item(&self, item: item::Model) -> Result<(), AppError>;
    async fn delete_item(&self, item_id: Uuid) -> Result<u64, AppError>;

    // Collections
    async fn get_collection_by_id(
        &self,
        collection_id: Uuid,
    ) -> Result<Option<collection::Model>, AppError>;
    async fn list_collections_with_items(
        &self,
        is_active: Option<bool>,
    ) -> Result<Vec<(collection::Model, Vec<item::Model>)>, AppError>;
    async fn add_collection(&self, collection: collection::Model) -> Result<(), AppError>;
    async fn update_collection(&self, collection: collection::Model) -> Result<(), AppError>;
    /// Removes the collection; the schema cascades the delete to its items.
    async fn delete_collection(&self, collection_id: Uuid) -> Result<u64, AppError>;
}

#[derive(Clone)]
pub struct SeaOrmInventoryRepository {
    db: DatabaseConnection,
}

impl SeaOrmInventoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InventoryRepository for SeaOrmInventoryRepository {
    async fn get_item_by_id(&self, item_id: Uuid) -> Result<Option<item::Model>, AppError> {
        Ok(item::Entity::find_by_id(item_id).one(&self.db).await?)
    }

    async fn list_all_items(&self) -> Result<Vec<item::Model>, AppError> {
        Ok(item::Entity::find().all(&self.db).await?)
    }

    async fn list_items_by_status(&self, is_active: bool) -> Result<Vec<item::Model>, AppError> {
        Ok(item::Entity::find()
            .filter(item::Column::IsActive.eq(is_active))
            .all(&self.db)
            .await?)
    }

    async fn get_items_by_collection_id(
        &self,
        collection_id: Uuid,
    ) -> Result<Vec<item::Model>, AppError> {
        Ok(item::Entity::find()
            .filter(item::Column::CollectionId.eq(collection_id))
            .all(&self.db)
            .await?)
    }

    async fn search_items(&self, query: &str) -> Result<Vec<item::Model>, AppError> {
        let mut condition = Condition::any();
        for keyword in query.split_whitespace() {
            let pattern = format!("%{keyword}%");
            condition = condition
                .add(Expr::col(item::Column::Name).ilike(pattern.clone()))
                .add(Expr::col(item::Column::Hostname).ilike(pattern.clone()))
                .add(Expr::col(item::Column::Location).ilike(pattern.clone()))
                .add(Expr::col(item::Column::Brand).ilike(pattern.clone()))
                .add(Expr::col(item::Column::Model).ilike(pattern.clone()))
                .add(Expr::col(item::Column::SerialNumber).ilike(pattern));
        }
        Ok(item::Entity::find().filter(condition).all(&self.db).await?)
    }

    async fn count_items(&self, is_active: Option<bool>) -> Result<u64, AppError> {
        let mut select = item::Entity::find();
        if let Some(active) = is_active {
            select = select.filter(item::Column::IsActive.eq(active));
        }
        Ok(select.count(&self.db).await?)
    }

    async fn add_item(&self, item: item::Model) -> Result<(), AppError> {
        let active = item::ActiveModel {
            id: Set(item.id),
            name: Set(item.name),
            hostname: Set(item.hostname),
            version: Set(item.version),
            brand: Set(item.brand),
            model: Set(item.model),
            serial_number: Set(item.serial_number),
            location: Set(item.location),
            collection_id: Set(item.collection_id),
            is_active: Set(item.is_active),
        };
        active.insert(&self.db).await?;
        Ok(())
    }

    async fn update_item(&self, item: item::Model) -> Result<(), AppError> {
        let active = item::ActiveModel {
            id: Unchanged(item.id),
            name: Set(item.name),
            hostname: Set(item.hostname),
            version: Set(item.version),
            brand: Set(item.brand),
            model: Set(item.model),
            serial_number: Set(item.serial_number),
            location: Set(item.location),
            collection_id: Set(item.collection_id),
            is_active: Set(item.is_active),
        };
        active.update(&self.db).await?;
        Ok(())
    }

    async fn delete_item(&self, item_id: Uuid) -> Result<u64, AppError> {
        let result = item::Entity::delete_by_id(item_id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }

    async fn get_collection_by_id(
        &self,
        collection_id: Uuid,
    ) -> Result<Option<collection::Model>, AppError> {
        Ok(collection::Entity::find_by_id(collection_id)
            .one(&self.db)
            .await?)
    }

    async fn list_collections_with_items(
        &self,
        is_active: Option<bool>,
    ) -> Result<Vec<(collection::Model, Vec<item::Model>)>, AppError> {
        let mut select = collection::Entity::find();
        if let Some(active) = is_active {
            select = select.filter(collection::Column::IsActive.eq(active));
        }
        Ok(select.find_with_related(item::Entity).all(&self.db).await?)
    }

    async fn add_collection(&self, collection: collection::Model) -> Result<(), AppError> {
        let active = collection::ActiveModel {
            id: Set(collection.id),
            name: Set(collection.name),
            description: Set(collection.description),
            is_active: Set(collection.is_active),
        };
        active.insert(&self.db).await?;
        Ok(())
    }

    async fn update_collection(&self, collection: collection::Model) -> Result<(), AppError> {
        let active = collection::ActiveModel {
            id: Unchanged(collection.id),
            name: Set(collection.name),
            description: Set(collection.description),
            is_active: Set(collection.is_active),
        };
        active.update(&self.db).await?;
        Ok(())
    }

    async fn delete_collection(&self, collection_id: Uuid) -> Result<u64, AppError> {
        let result = collection::Entity::delete_by_id(collection_id)
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
