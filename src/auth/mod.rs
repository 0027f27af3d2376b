//! Auth bundle context: credential verification and token issuance. Leans on
//! the Users context repository for the account store.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::AppError;
use crate::users::repository::UserRepository;

pub mod security;

/// Standard OAuth2 password form: `username` carries the email.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticateUserRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenDto {
    pub access_token: String,
    pub token_type: String,
}

/// Verifies credentials and issues an access token. Unknown users, wrong
/// passwords and inactive accounts all collapse to `InvalidCredentials` so
/// the endpoint cannot be used to probe which emails exist.
pub async fn authenticate_user<R: UserRepository>(
    repository: &R,
    request: AuthenticateUserRequest,
    secret: &str,
    expire_minutes: i64,
) -> Result<TokenDto, AppError> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(AppError::InvalidCredentials);
    }

    let user = match repository.get_by_email(&request.username).await? {
        Some(user) => user,
        None => {
            warn!(email = %request.username, "authentication failed: unknown user");
            return Err(AppError::InvalidCredentials);
        }
    };

    if !security::verify_password(&request.password, &user.hashed_password)? {
        warn!(email = %request.username, "authentication failed: wrong password");
        return Err(AppError::InvalidCredentials);
    }

    if !user.is_active {
        warn!(email = %request.username, "authentication failed: inactive user");
        return Err(AppError::InvalidCredentials);
    }

    let token = security::create_access_token(
        &user.id.to_string(),
        &user.email,
        secret,
        expire_minutes,
    )?;
    info!(user_id = %user.id, "user authenticated");

    Ok(TokenDto {
        access_token: token,
        token_type: "bearer".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::entities::user;
    use crate::users::repository::testing::InMemoryUserRepository;
    use uuid::Uuid;

    const SECRET: &str = "test-secret";

    fn account(password: &str, is_active: bool) -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            hashed_password: security::hash_password(password).unwrap(),
            is_active,
        }
    }

    fn request(password: &str) -> AuthenticateUserRequest {
        AuthenticateUserRequest {
            username: "ana@example.com".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_authenticate_issues_decodable_token() {
        let user = account("secretpassword", true);
        let repo = InMemoryUserRepository::with_users(vec![user.clone()]);

        let token = authenticate_user(&repo, request("secretpassword"), SECRET, 30)
            .await
            .unwrap();

        assert_eq!(token.token_type, "bearer");
        let claims = security::decode_access_token(&token.access_token, SECRET).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, user.email);
    }

    #[tokio::test]
    async fn test_authenticate_rejects_wrong_password() {
        let repo = InMemoryUserRepository::with_users(vec![account("secretpassword", true)]);
        let err = authenticate_user(&repo, request("wrongpassword"), SECRET, 30)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_unknown_user() {
        let repo = InMemoryUserRepository::default();
        let err = authenticate_user(&repo, request("secretpassword"), SECRET, 30)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_inactive_user() {
        let repo = InMemoryUserRepository::with_users(vec![account("secretpassword", false)]);
        let err = authenticate_user(&repo, request("secretpassword"), SECRET, 30)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }
}
