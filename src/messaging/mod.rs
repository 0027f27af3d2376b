//! AMQP plumbing: connection pool, topology declaration and publishing.
//!
//! Commands travel as JSON over durable direct exchanges, one exchange per
//! bundle context.

use backon::{BackoffBuilder, ExponentialBuilder};
use deadpool_lapin::{Manager, Pool, PoolError};
use lapin::{
    BasicProperties, Channel, ConnectionProperties, ExchangeKind,
    options::{
        BasicPublishOptions, ExchangeDeclareOptions, QueueBindOptions, QueueDeclareOptions,
    },
    types::FieldTable,
};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::AppError;

pub mod consumer;
pub mod publisher;

// Users context topology
pub const USER_COMMANDS_EXCHANGE: &str = "user_commands_exchange";
pub const CREATE_USER_QUEUE: &str = "create_user_queue";
pub const CREATE_USER_ROUTING_KEY: &str = "user.command.create";

// Inventory context topology
pub const INVENTORY_COMMANDS_EXCHANGE: &str = "inventory_commands_exchange";
pub const CREATE_ITEM_QUEUE: &str = "create_item_queue";
pub const CREATE_ITEM_ROUTING_KEY: &str = "inventory.command.create";
pub const UPDATE_ITEM_QUEUE: &str = "update_item_queue";
pub const UPDATE_ITEM_ROUTING_KEY: &str = "inventory.command.update";
pub const DELETE_ITEM_QUEUE: &str = "delete_item_queue";
pub const DELETE_ITEM_ROUTING_KEY: &str = "inventory.command.delete";

const MAX_CONNECT_ATTEMPTS: usize = 5;

fn connect_backoff() -> impl Iterator<Item = Duration> {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(500))
        .with_max_delay(Duration::from_secs(10))
        .with_max_times(MAX_CONNECT_ATTEMPTS)
        .with_jitter()
        .build()
}

/// Build the connection pool and verify a connection can be established,
/// retrying with exponential backoff and jitter.
pub async fn connect(url: &str) -> Result<Pool, AppError> {
    let manager = Manager::new(url.to_owned(), ConnectionProperties::default());
    let pool = Pool::builder(manager)
        .max_size(10)
        .build()
        .map_err(|e| AppError::MessagingError(format!("failed to create AMQP pool: {e}")))?;

    let mut backoff = connect_backoff();
    loop {
        match pool.get().await {
            Ok(_) => {
                info!(url = %url, "connected to RabbitMQ");
                return Ok(pool);
            }
            Err(e) => match backoff.next() {
                Some(delay) => {
                    warn!(
                        error = %e,
                        backoff_ms = %delay.as_millis(),
                        "failed to connect to RabbitMQ, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    return Err(AppError::MessagingError(format!(
                        "failed to connect to RabbitMQ after {MAX_CONNECT_ATTEMPTS} attempts: {e}"
                    )));
                }
            },
        }
    }
}

pub async fn get_channel(pool: &Pool) -> Result<Channel, AppError> {
    let conn = pool.get().await.map_err(|e: PoolError| {
        AppError::MessagingError(format!("failed to get connection from pool: {e}"))
    })?;
    Ok(conn.create_channel().await?)
}

async fn declare_exchange(channel: &Channel, exchange: &str) -> Result<(), AppError> {
    channel
        .exchange_declare(
            exchange,
            ExchangeKind::Direct,
            ExchangeDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await?;
    Ok(())
}

async fn declare_bound_queue(
    channel: &Channel,
    exchange: &str,
    queue: &str,
    routing_key: &str,
) -> Result<(), AppError> {
    channel
        .queue_declare(
            queue,
            QueueDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await?;
    channel
        .queue_bind(
            queue,
            exchange,
            routing_key,
            QueueBindOptions::default(),
            FieldTable::default(),
        )
        .await?;
    debug!(queue = %queue, exchange = %exchange, routing_key = %routing_key, "queue bound");
    Ok(())
}

/// Declare every exchange, queue and binding the application uses. All
/// declarations are idempotent, so both the server and the consumer run this
/// at startup.
pub async fn declare_topology(channel: &Channel) -> Result<(), AppError> {
    declare_exchange(channel, USER_COMMANDS_EXCHANGE).await?;
    declare_bound_queue(
        channel,
        USER_COMMANDS_EXCHANGE,
        CREATE_USER_QUEUE,
        CREATE_USER_ROUTING_KEY,
    )
    .await?;

    declare_exchange(channel, INVENTORY_COMMANDS_EXCHANGE).await?;
    declare_bound_queue(
        channel,
        INVENTORY_COMMANDS_EXCHANGE,
        CREATE_ITEM_QUEUE,
        CREATE_ITEM_ROUTING_KEY,
    )
    .await?;
    declare_bound_queue(
        channel,
        INVENTORY_COMMANDS_EXCHANGE,
        UPDATE_ITEM_QUEUE,
        UPDATE_ITEM_ROUTING_KEY,
    )
    .await?;
    declare_bound_queue(
        channel,
        INVENTORY_COMMANDS_EXCHANGE,
        DELETE_ITEM_QUEUE,
        DELETE_ITEM_ROUTING_KEY,
    )
    .await?;

    info!("messaging topology declared");
    Ok(())
}

/// Publish a persistent JSON message and wait for the broker confirmation.
pub async fn publish_message(
    channel: &Channel,
    exchange: &str,
    routing_key: &str,
    body: &[u8],
) -> Result<(), AppError> {
    let properties = BasicProperties::default()
        .with_content_type("application/json".into())
        .with_delivery_mode(2); // persistent

    channel
        .basic_publish(
            exchange,
            routing_key,
            BasicPublishOptions::default(),
            body,
            properties,
        )
        .await?
        .await?;

    debug!(exchange = %exchange, routing_key = %routing_key, "message published");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_keys_follow_context_convention() {
        assert_eq!(CREATE_USER_ROUTING_KEY, "user.command.create");
        assert_eq!(CREATE_ITEM_ROUTING_KEY, "inventory.command.create");
        assert_eq!(UPDATE_ITEM_ROUTING_KEY, "inventory.command.update");
        assert_eq!(DELETE_ITEM_ROUTING_KEY, "inventory.command.delete");
    }

    #[test]
    fn test_connect_backoff_is_bounded() {
        let delays: Vec<_> = connect_backoff().collect();
        assert_eq!(delays.len(), MAX_CONNECT_ATTEMPTS);
        assert!(delays.iter().all(|d| *d <= Duration::from_secs(20)));
    }
}
