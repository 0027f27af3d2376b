use axum::{Json, Router, extract::State, http::Method, response::IntoResponse, routing::get};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Settings;

pub mod middleware;
pub mod models;
pub mod routes;

use routes::{auth_routes, collection_routes, item_routes, user_routes};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: DatabaseConnection,
    pub amqp_pool: deadpool_lapin::Pool,
    pub config: Arc<Settings>,
}

async fn root_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "message": format!("Welcome to {}!", state.config.app_name),
        "environment": state.config.environment,
    }))
}

async fn health_check_handler() -> &'static str {
    "OK"
}

pub fn create_router(
    db_pool: DatabaseConnection,
    amqp_pool: deadpool_lapin::Pool,
    config: Arc<Settings>,
) -> Router {
    let app_state = Arc::new(AppState {
        db_pool,
        amqp_pool,
        config,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check_handler))
        .nest("/auth", auth_routes::create_auth_router(app_state.clone()))
        .nest("/users", user_routes::create_user_router())
        .nest("/items", item_routes::create_item_router())
        .nest(
            "/collections",
            collection_routes::create_collection_router(),
        )
        .with_state(app_state)
        .layer(cors)
}
