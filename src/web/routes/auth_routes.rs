use axum::{
    Extension, Form, Json, Router,
    extract::State,
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use std::sync::Arc;

use crate::auth::{self, AuthenticateUserRequest};
use crate::error::AppError;
use crate::users::queries::UserDto;
use crate::users::repository::{SeaOrmUserRepository, UserRepository};
use crate::web::{AppState, middleware, models::AuthenticatedUser};

pub fn create_auth_router(app_state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/token", post(login_for_access_token))
        .route(
            "/me",
            get(read_current_user).route_layer(axum_middleware::from_fn_with_state(
                app_state,
                middleware::auth,
            )),
        )
}

async fn login_for_access_token(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AuthenticateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let repository = SeaOrmUserRepository::new(state.db_pool.clone());
    let token = auth::authenticate_user(
        &repository,
        form,
        &state.config.secret_key,
        state.config.access_token_expire_minutes,
    )
    .await?;

    let auth_cookie = Cookie::build(("token", token.access_token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(true)
        .build();

    let mut response = Json(token).into_response();
    response.headers_mut().insert(
        axum::http::header::SET_COOKIE,
        auth_cookie.to_string().parse().unwrap(),
    );

    Ok(response)
}

async fn read_current_user(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<UserDto>, AppError> {
    let repository = SeaOrmUserRepository::new(state.db_pool.clone());

    // The token may outlive the account it was issued for.
    let user = repository
        .get_by_id(auth_user.id)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !user.is_active {
        return Err(AppError::InactiveUser);
    }

    Ok(Json(UserDto::from(user)))
}
