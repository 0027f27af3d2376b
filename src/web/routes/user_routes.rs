use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::messaging::{self, publisher::UserCommandPublisher};
use crate::users::commands::{
    CreateUserCommand, DeleteUserCommand, DeleteUserHandler, UpdateUserCommand,
    UpdateUserHandler,
};
use crate::users::queries::{
    GetUserByIdHandler, GetUserByIdQuery, ListUsersHandler, ListUsersQuery, UserDto,
};
use crate::users::repository::SeaOrmUserRepository;
use crate::web::AppState;

pub fn create_user_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_users).post(register_user))
        .route(
            "/{user_id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

/// Queue-backed registration: the command is validated and published, the
/// consumer performs the actual insert.
async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(command): Json<CreateUserCommand>,
) -> Result<impl IntoResponse, AppError> {
    command.validate()?;

    let channel = messaging::get_channel(&state.amqp_pool).await?;
    let publisher = UserCommandPublisher::new(channel);
    publisher.publish_create_user(&command).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({
            "message": "user creation request accepted",
            "email": command.email,
        })),
    ))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserDto>, AppError> {
    let handler = GetUserByIdHandler::new(SeaOrmUserRepository::new(state.db_pool.clone()));
    let user = handler
        .handle(GetUserByIdQuery { user_id })
        .await?
        .ok_or_else(|| AppError::not_found("User", user_id))?;
    Ok(Json(user))
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Vec<UserDto>>, AppError> {
    let handler = ListUsersHandler::new(SeaOrmUserRepository::new(state.db_pool.clone()));
    Ok(Json(handler.handle(query).await?))
}

#[derive(Deserialize)]
struct UpdateUserPayload {
    name: Option<String>,
    is_active: Option<bool>,
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<Json<UserDto>, AppError> {
    let handler = UpdateUserHandler::new(SeaOrmUserRepository::new(state.db_pool.clone()));
    let updated = handler
        .handle(UpdateUserCommand {
            user_id,
            name: payload.name,
            is_active: payload.is_active,
        })
        .await?;
    Ok(Json(UserDto::from(updated)))
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let handler = DeleteUserHandler::new(SeaOrmUserRepository::new(state.db_pool.clone()));
    handler.handle(DeleteUserCommand { user_id }).await?;
    Ok(StatusCode::NO_CONTENT)
}
