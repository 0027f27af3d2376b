use lapin::Channel;
use tracing::info;

use crate::error::AppError;
use crate::inventory::commands::{CreateItemCommand, DeleteItemCommand, UpdateItemCommand};
use crate::messaging::{
    self, CREATE_ITEM_ROUTING_KEY, CREATE_USER_ROUTING_KEY, DELETE_ITEM_ROUTING_KEY,
    INVENTORY_COMMANDS_EXCHANGE, UPDATE_ITEM_ROUTING_KEY, USER_COMMANDS_EXCHANGE,
};
use crate::users::commands::CreateUserCommand;

/// Publishes user commands to the users context exchange.
pub struct UserCommandPublisher {
    channel: Channel,
}

impl UserCommandPublisher {
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }

    pub async fn publish_create_user(&self, command: &CreateUserCommand) -> Result<(), AppError> {
        let body = serde_json::to_vec(command)?;
        messaging::publish_message(
            &self.channel,
            USER_COMMANDS_EXCHANGE,
            CREATE_USER_ROUTING_KEY,
            &body,
        )
        .await?;
        info!(email = %command.email, "CreateUserCommand published");
        Ok(())
    }
}

/// Publishes item commands to the inventory context exchange, mirroring the
/// synchronous HTTP mutations for external producers.
pub struct InventoryCommandPublisher {
    channel: Channel,
}

impl InventoryCommandPublisher {
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }

    pub async fn publish_create_item(&self, command: &CreateItemCommand) -> Result<(), AppError> {
        let body = serde_json::to_vec(command)?;
        messaging::publish_message(
            &self.channel,
            INVENTORY_COMMANDS_EXCHANGE,
            CREATE_ITEM_ROUTING_KEY,
            &body,
        )
        .await?;
        info!(name = %command.name, "CreateItemCommand published");
        Ok(())
    }

    pub async fn publish_update_item(&self, command: &UpdateItemCommand) -> Result<(), AppError> {
        let body = serde_json::to_vec(command)?;
        messaging::publish_message(
            &self.channel,
            INVENTORY_COMMANDS_EXCHANGE,
            UPDATE_ITEM_ROUTING_KEY,
            &body,
        )
        .await?;
        info!(item_id = %command.id, "UpdateItemCommand published");
        Ok(())
    }

    pub async fn publish_delete_item(&self, command: &DeleteItemCommand) -> Result<(), AppError> {
        let body = serde_json::to_vec(command)?;
        messaging::publish_message(
            &self.channel,
            INVENTORY_COMMANDS_EXCHANGE,
            DELETE_ITEM_ROUTING_KEY,
            &body,
        )
        .await?;
        info!(item_id = %command.id, "DeleteItemCommand published");
        Ok(())
    }
}
