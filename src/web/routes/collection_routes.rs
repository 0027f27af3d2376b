use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::inventory::commands::{
    CreateCollectionCommand, CreateCollectionHandler, DeleteCollectionCommand,
    DeleteCollectionHandler, UpdateCollectionCommand, UpdateCollectionHandler,
};
use crate::inventory::queries::{
    CollectionDto, GetItemsByCollectionHandler, GetItemsByCollectionQuery, ItemDto,
    ListCollectionsHandler, ListCollectionsQuery,
};
use crate::inventory::repository::SeaOrmInventoryRepository;
use crate::web::AppState;

pub fn create_collection_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_collections).post(create_collection))
        .route("/active", get(list_active_collections))
        .route(
            "/{collection_id}",
            put(update_collection).delete(delete_collection),
        )
        .route("/{collection_id}/items", get(list_items_in_collection))
}

fn repository(state: &AppState) -> SeaOrmInventoryRepository {
    SeaOrmInventoryRepository::new(state.db_pool.clone())
}

async fn list_collections(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CollectionDto>>, AppError> {
    let handler = ListCollectionsHandler::new(repository(&state));
    Ok(Json(handler.handle(ListCollectionsQuery::default()).await?))
}

async fn list_active_collections(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CollectionDto>>, AppError> {
    let handler = ListCollectionsHandler::new(repository(&state));
    Ok(Json(
        handler
            .handle(ListCollectionsQuery {
                is_active: Some(true),
            })
            .await?,
    ))
}

async fn create_collection(
    State(state): State<Arc<AppState>>,
    Json(command): Json<CreateCollectionCommand>,
) -> Result<impl IntoResponse, AppError> {
    let handler = CreateCollectionHandler::new(repository(&state));
    let created = handler.handle(command).await?;
    Ok((
        StatusCode::CREATED,
        Json(CollectionDto::from((created, Vec::new()))),
    ))
}

async fn update_collection(
    State(state): State<Arc<AppState>>,
    Path(collection_id): Path<Uuid>,
    Json(command): Json<UpdateCollectionCommand>,
) -> Result<Json<CollectionDto>, AppError> {
    if command.id != collection_id {
        return Err(AppError::InvalidInput(
            "path and body collection IDs do not match".to_string(),
        ));
    }

    let repo = repository(&state);
    let updated = UpdateCollectionHandler::new(repo.clone()).handle(command).await?;
    let items = GetItemsByCollectionHandler::new(repo)
        .handle(GetItemsByCollectionQuery { collection_id })
        .await?;

    let mut dto = CollectionDto::from((updated, Vec::new()));
    dto.items = items;
    Ok(Json(dto))
}

async fn delete_collection(
    State(state): State<Arc<AppState>>,
    Path(collection_id): Path<Uuid>,
    Json(command): Json<DeleteCollectionCommand>,
) -> Result<StatusCode, AppError> {
    if command.id != collection_id {
        return Err(AppError::InvalidInput(
            "path and body collection IDs do not match".to_string(),
        ));
    }

    let handler = DeleteCollectionHandler::new(repository(&state));
    handler.handle(command).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_items_in_collection(
    State(state): State<Arc<AppState>>,
    Path(collection_id): Path<Uuid>,
) -> Result<Json<Vec<ItemDto>>, AppError> {
    let handler = GetItemsByCollectionHandler::new(repository(&state));
    Ok(Json(
        handler
            .handle(GetItemsByCollectionQuery { collection_id })
            .await?,
    ))
}
