use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// JWT claims: `sub` carries the user id, HS256 signed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

pub fn hash_password(plain: &str) -> Result<String, AppError> {
    hash(plain, DEFAULT_COST).map_err(|e| AppError::PasswordHashingError(e.to_string()))
}

pub fn verify_password(plain: &str, hashed: &str) -> Result<bool, AppError> {
    verify(plain, hashed).map_err(|e| AppError::PasswordHashingError(e.to_string()))
}

pub fn create_access_token(
    user_id: &str,
    email: &str,
    secret: &str,
    expire_minutes: i64,
) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::minutes(expire_minutes)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| AppError::TokenCreationError(e.to_string()))
}

/// Any decode failure (bad signature, expiry, malformed token) collapses to
/// `InvalidCredentials` so callers answer a uniform 401.
pub fn decode_access_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_password_hash_roundtrip() {
        let hashed = hash_password("secretpassword").unwrap();
        assert_ne!(hashed, "secretpassword");
        assert!(verify_password("secretpassword", &hashed).unwrap());
        assert!(!verify_password("wrongpassword", &hashed).unwrap());
    }

    #[test]
    fn test_token_roundtrip() {
        let token =
            create_access_token("7f9c0a44-0000-0000-0000-000000000000", "a@b.com", SECRET, 30)
                .unwrap();
        let claims = decode_access_token(&token, SECRET).unwrap();

        assert_eq!(claims.sub, "7f9c0a44-0000-0000-0000-000000000000");
        assert_eq!(claims.email, "a@b.com");
        assert!(claims.exp > claims.iat);
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let token = create_access_token("user-id", "a@b.com", SECRET, 30).unwrap();
        let result = decode_access_token(&token, "other-secret");
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = create_access_token("user-id", "a@b.com", SECRET, -5).unwrap();
        let result = decode_access_token(&token, SECRET);
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }
}
