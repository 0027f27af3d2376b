use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};
use tracing::info;

pub mod entities;

use entities::{collection, item, user};

pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url.to_owned());
    opt.max_connections(10);
    let db = Database::connect(opt).await?;
    info!("database connection established");
    Ok(db)
}

/// Create the tables for all entities if they do not exist yet. Collections
/// go first so the item foreign key has something to point at.
pub async fn init_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut collections = schema.create_table_from_entity(collection::Entity);
    collections.if_not_exists();
    db.execute(backend.build(&collections)).await?;

    let mut items = schema.create_table_from_entity(item::Entity);
    items.if_not_exists();
    db.execute(backend.build(&items)).await?;

    let mut users = schema.create_table_from_entity(user::Entity);
    users.if_not_exists();
    db.execute(backend.build(&users)).await?;

    info!("database schema initialized");
    Ok(())
}
