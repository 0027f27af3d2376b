use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::inventory::commands::{
    CreateItemCommand, CreateItemHandler, DeleteItemCommand, DeleteItemHandler,
    MoveItemsCommand, MoveItemsHandler, UpdateItemCommand, UpdateItemHandler,
    UpdateItemStatusCommand, UpdateItemStatusHandler,
};
use crate::inventory::queries::{
    CountItemsHandler, CountItemsQuery, GetItemByIdHandler, GetItemByIdQuery, ItemDto,
    ListItemsHandler, ListItemsQuery, SearchItemsHandler, SearchItemsQuery,
};
use crate::inventory::repository::SeaOrmInventoryRepository;
use crate::web::AppState;

pub fn create_item_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/search", get(search_items))
        .route("/count", get(count_items))
        .route("/move", post(move_items))
        .route(
            "/{item_id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/{item_id}/status", patch(update_item_status))
}

fn repository(state: &AppState) -> SeaOrmInventoryRepository {
    SeaOrmInventoryRepository::new(state.db_pool.clone())
}

// --- Command endpoints ---

async fn create_item(
    State(state): State<Arc<AppState>>,
    Json(command): Json<CreateItemCommand>,
) -> Result<impl IntoResponse, AppError> {
    let handler = CreateItemHandler::new(repository(&state));
    let created = handler.handle(command).await?;
    Ok((StatusCode::CREATED, Json(ItemDto::from(created))))
}

#[derive(Deserialize)]
struct UpdateItemPayload {
    name: String,
    hostname: String,
    version: String,
    brand: String,
    model: String,
    serial_number: String,
    location: String,
    collection_id: Uuid,
}

async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<UpdateItemPayload>,
) -> Result<Json<ItemDto>, AppError> {
    let handler = UpdateItemHandler::new(repository(&state));
    let updated = handler
        .handle(UpdateItemCommand {
            id: item_id,
            name: payload.name,
            hostname: payload.hostname,
            version: payload.version,
            brand: payload.brand,
            model: payload.model,
            serial_number: payload.serial_number,
            location: payload.location,
            collection_id: payload.collection_id,
        })
        .await?;
    Ok(Json(ItemDto::from(updated)))
}

async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let handler = DeleteItemHandler::new(repository(&state));
    handler.handle(DeleteItemCommand { id: item_id }).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
struct UpdateItemStatusPayload {
    is_active: bool,
}

async fn update_item_status(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<UpdateItemStatusPayload>,
) -> Result<Json<ItemDto>, AppError> {
    let handler = UpdateItemStatusHandler::new(repository(&state));
    let updated = handler
        .handle(UpdateItemStatusCommand {
            id: item_id,
            is_active: payload.is_active,
        })
        .await?;
    Ok(Json(ItemDto::from(updated)))
}

async fn move_items(
    State(state): State<Arc<AppState>>,
    Json(command): Json<MoveItemsCommand>,
) -> Result<impl IntoResponse, AppError> {
    let handler = MoveItemsHandler::new(repository(&state));
    let moved = handler.handle(command).await?;
    Ok(Json(serde_json::json!({ "moved": moved })))
}

// --- Query endpoints ---

async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<ItemDto>, AppError> {
    let handler = GetItemByIdHandler::new(repository(&state));
    let item = handler
        .handle(GetItemByIdQuery { item_id })
        .await?
        .ok_or_else(|| AppError::not_found("Item", item_id))?;
    Ok(Json(item))
}

async fn list_items(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListItemsQuery>,
) -> Result<Json<Vec<ItemDto>>, AppError> {
    let handler = ListItemsHandler::new(repository(&state));
    Ok(Json(handler.handle(query).await?))
}

#[derive(Deserialize)]
struct SearchParams {
    q: String,
}

async fn search_items(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<ItemDto>>, AppError> {
    let handler = SearchItemsHandler::new(repository(&state));
    Ok(Json(handler.handle(SearchItemsQuery { query: params.q }).await?))
}

async fn count_items(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CountItemsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let handler = CountItemsHandler::new(repository(&state));
    let count = handler.handle(query).await?;
    Ok(Json(serde_json::json!({ "count": count })))
}
