use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::entities::{collection, item};
use crate::error::AppError;
use crate::inventory::repository::InventoryRepository;

pub const MAX_FIELD_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;

fn validate_field(field: &'static str, value: &str, max: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{field} must not be empty")));
    }
    if value.len() > max {
        return Err(AppError::InvalidInput(format!(
            "{field} must be at most {max} characters long"
        )));
    }
    Ok(())
}

// --- Item commands ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItemCommand {
    pub name: String,
    pub hostname: String,
    pub version: String,
    pub brand: String,
    pub model: String,
    pub serial_number: String,
    pub location: String,
    pub collection_id: Uuid,
}

impl CreateItemCommand {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_field("name", &self.name, MAX_FIELD_LEN)?;
        validate_field("hostname", &self.hostname, MAX_FIELD_LEN)?;
        validate_field("version", &self.version, MAX_FIELD_LEN)?;
        validate_field("brand", &self.brand, MAX_FIELD_LEN)?;
        validate_field("model", &self.model, MAX_FIELD_LEN)?;
        validate_field("serial_number", &self.serial_number, MAX_FIELD_LEN)?;
        validate_field("location", &self.location, MAX_FIELD_LEN)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateItemCommand {
    pub id: Uuid,
    pub name: String,
    pub hostname: String,
    pub version: String,
    pub brand: String,
    pub model: String,
    pub serial_number: String,
    pub location: String,
    pub collection_id: Uuid,
}

impl UpdateItemCommand {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_field("name", &self.name, MAX_FIELD_LEN)?;
        validate_field("hostname", &self.hostname, MAX_FIELD_LEN)?;
        validate_field("version", &self.version, MAX_FIELD_LEN)?;
        validate_field("brand", &self.brand, MAX_FIELD_LEN)?;
        validate_field("model", &self.model, MAX_FIELD_LEN)?;
        validate_field("serial_number", &self.serial_number, MAX_FIELD_LEN)?;
        validate_field("location", &self.location, MAX_FIELD_LEN)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteItemCommand {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateItemStatusCommand {
    pub id: Uuid,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveItemsCommand {
    pub item_ids: Vec<Uuid>,
    pub target_collection_id: Uuid,
}

// --- Collection commands ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCollectionCommand {
    pub name: String,
    pub description: String,
}

impl CreateCollectionCommand {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_field("name", &self.name, MAX_FIELD_LEN)?;
        validate_field("description", &self.description, MAX_DESCRIPTION_LEN)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCollectionCommand {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

fn default_delete_items() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCollectionCommand {
    pub id: Uuid,
    #[serde(default = "default_delete_items")]
    pub delete_items: bool,
}

// --- Item command handlers ---

pub struct CreateItemHandler<R> {
    repository: R,
}

impl<R: InventoryRepository> CreateItemHandler<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, command: CreateItemCommand) -> Result<item::Model, AppError> {
        command.validate()?;

        if self
            .repository
            .get_collection_by_id(command.collection_id)
            .await?
            .is_none()
        {
            return Err(AppError::not_found("Collection", command.collection_id));
        }

        let item = item::Model {
            id: Uuid::new_v4(),
            name: command.name,
            hostname: command.hostname,
            version: command.version,
            brand: command.brand,
            model: command.model,
            serial_number: command.serial_number,
            location: command.location,
            collection_id: command.collection_id,
            is_active: true,
        };
        self.repository.add_item(item.clone()).await?;
        info!(item_id = %item.id, name = %item.name, "item created");
        Ok(item)
    }
}

pub struct UpdateItemHandler<R> {
    repository: R,
}

impl<R: InventoryRepository> UpdateItemHandler<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, command: UpdateItemCommand) -> Result<item::Model, AppError> {
        command.validate()?;

        let mut item = self
            .repository
            .get_item_by_id(command.id)
            .await?
            .ok_or_else(|| AppError::not_found("Item", command.id))?;

        if command.collection_id != item.collection_id
            && self
                .repository
                .get_collection_by_id(command.collection_id)
                .await?
                .is_none()
        {
            return Err(AppError::not_found("Collection", command.collection_id));
        }

        item.name = command.name;
        item.hostname = command.hostname;
        item.version = command.version;
        item.brand = command.brand;
        item.model = command.model;
        item.serial_number = command.serial_number;
        item.location = command.location;
        item.collection_id = command.collection_id;

        self.repository.update_item(item.clone()).await?;
        info!(item_id = %item.id, "item updated");
        Ok(item)
    }
}

pub struct DeleteItemHandler<R> {
    repository: R,
}

impl<R: InventoryRepository> DeleteItemHandler<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, command: DeleteItemCommand) -> Result<(), AppError> {
        let rows = self.repository.delete_item(command.id).await?;
        if rows == 0 {
            warn!(item_id = %command.id, "item not found for deletion, skipping");
        } else {
            info!(item_id = %command.id, "item deleted");
        }
        Ok(())
    }
}

pub struct UpdateItemStatusHandler<R> {
    repository: R,
}

impl<R: InventoryRepository> UpdateItemStatusHandler<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        command: UpdateItemStatusCommand,
    ) -> Result<item::Model, AppError> {
        let mut item = self
            .repository
            .get_item_by_id(command.id)
            .await?
            .ok_or_else(|| AppError::not_found("Item", command.id))?;

        item.is_active = command.is_active;
        self.repository.update_item(item.clone()).await?;
        info!(item_id = %item.id, is_active = item.is_active, "item status updated");
        Ok(item)
    }
}

pub struct MoveItemsHandler<R> {
    repository: R,
}

impl<R: InventoryRepository> MoveItemsHandler<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Reassigns the given items to the target collection. Missing items are
    /// skipped with a log line; the target collection must exist. Returns how
    /// many items were actually moved.
    pub async fn handle(&self, command: MoveItemsCommand) -> Result<usize, AppError> {
        if self
            .repository
            .get_collection_by_id(command.target_collection_id)
            .await?
            .is_none()
        {
            return Err(AppError::not_found(
                "Collection",
                command.target_collection_id,
            ));
        }

        let mut moved = 0;
        for item_id in command.item_ids {
            match self.repository.get_item_by_id(item_id).await? {
                Some(mut item) => {
                    item.collection_id = command.target_collection_id;
                    self.repository.update_item(item).await?;
                    moved += 1;
                }
                None => warn!(item_id = %item_id, "item not found while moving, skipping"),
            }
        }
        info!(
            moved,
            target_collection_id = %command.target_collection_id,
            "items moved"
        );
        Ok(moved)
    }
}

// --- Collection command handlers ---

pub struct CreateCollectionHandler<R> {
    repository: R,
}

impl<R: InventoryRepository> CreateCollectionHandler<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        command: CreateCollectionCommand,
    ) -> Result<collection::Model, AppError> {
        command.validate()?;

        let collection = collection::Model {
            id: Uuid::new_v4(),
            name: command.name,
            description: command.description,
            is_active: true,
        };
        self.repository.add_collection(collection.clone()).await?;
        info!(collection_id = %collection.id, name = %collection.name, "collection created");
        Ok(collection)
    }
}

pub struct UpdateCollectionHandler<R> {
    repository: R,
}

impl<R: InventoryRepository> UpdateCollectionHandler<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        command: UpdateCollectionCommand,
    ) -> Result<collection::Model, AppError> {
        validate_field("name", &command.name, MAX_FIELD_LEN)?;
        validate_field("description", &command.description, MAX_DESCRIPTION_LEN)?;

        let mut collection = self
            .repository
            .get_collection_by_id(command.id)
            .await?
            .ok_or_else(|| AppError::not_found("Collection", command.id))?;

        collection.name = command.name;
        collection.description = command.description;

        self.repository.update_collection(collection.clone()).await?;
        info!(collection_id = %collection.id, "collection updated");
        Ok(collection)
    }
}

pub struct DeleteCollectionHandler<R> {
    repository: R,
}

impl<R: InventoryRepository> DeleteCollectionHandler<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// With `delete_items` the delete cascades to the collection's items;
    /// without it a non-empty collection is refused.
    pub async fn handle(&self, command: DeleteCollectionCommand) -> Result<(), AppError> {
        if self
            .repository
            .get_collection_by_id(command.id)
            .await?
            .is_none()
        {
            warn!(collection_id = %command.id, "collection not found for deletion, skipping");
            return Ok(());
        }

        if !command.delete_items {
            let items = self.repository.get_items_by_collection_id(command.id).await?;
            if !items.is_empty() {
                return Err(AppError::InvalidState(format!(
                    "collection {} still contains {} item(s)",
                    command.id,
                    items.len()
                )));
            }
        }

        self.repository.delete_collection(command.id).await?;
        info!(collection_id = %command.id, "collection deleted");
        Ok(())
    }
}
