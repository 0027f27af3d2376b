use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application-wide error type. The HTTP layer maps it to a status code via
/// `IntoResponse`; the message consumer uses [`AppError::is_domain_error`] to
/// decide between reject (domain failure, redelivery is pointless) and nack
/// (infrastructure failure).
#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{entity} with ID {id} not found")]
    EntityNotFound { entity: &'static str, id: String },
    #[error("{0}")]
    AlreadyExists(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("inactive user")]
    InactiveUser,
    #[error("password hashing failed: {0}")]
    PasswordHashingError(String),
    #[error("token creation failed: {0}")]
    TokenCreationError(String),
    #[error("database error: {0}")]
    DatabaseError(String),
    #[error("messaging error: {0}")]
    MessagingError(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl AppError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        AppError::EntityNotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Domain errors come from the command itself (bad payload, conflict,
    /// missing entity); infrastructure errors might succeed on another run.
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            AppError::InvalidInput(_)
                | AppError::EntityNotFound { .. }
                | AppError::AlreadyExists(_)
                | AppError::InvalidState(_)
                | AppError::InvalidCredentials
                | AppError::InactiveUser
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::EntityNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::InvalidState(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::InactiveUser => StatusCode::BAD_REQUEST,
            AppError::PasswordHashingError(_)
            | AppError::TokenCreationError(_)
            | AppError::DatabaseError(_)
            | AppError::MessagingError(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalServerError(format!("JSON serialization/deserialization error: {err}"))
    }
}

impl From<lapin::Error> for AppError {
    fn from(err: lapin::Error) -> Self {
        AppError::MessagingError(err.to_string())
    }
}
