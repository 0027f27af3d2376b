use uuid::Uuid;

/// Identity extracted from a validated token, inserted into request
/// extensions by the auth middleware.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
}
