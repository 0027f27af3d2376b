use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::security;
use crate::db::entities::user;
use crate::error::AppError;
use crate::users::repository::UserRepository;

pub const MAX_NAME_LEN: usize = 100;
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserCommand {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl CreateUserCommand {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        if self.password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::InvalidInput(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters long"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserCommand {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteUserCommand {
    pub user_id: Uuid,
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::InvalidInput("name must not be empty".to_string()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(AppError::InvalidInput(format!(
            "name must be at most {MAX_NAME_LEN} characters long"
        )));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if well_formed {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "'{email}' is not a valid email address"
        )))
    }
}

pub struct CreateUserHandler<R> {
    repository: R,
}

impl<R: UserRepository> CreateUserHandler<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, command: CreateUserCommand) -> Result<user::Model, AppError> {
        command.validate()?;

        if self.repository.get_by_email(&command.email).await?.is_some() {
            return Err(AppError::AlreadyExists(format!(
                "user with email '{}' already exists",
                command.email
            )));
        }

        let user = user::Model {
            id: Uuid::new_v4(),
            name: command.name,
            email: command.email,
            hashed_password: security::hash_password(&command.password)?,
            is_active: true,
        };
        self.repository.add(user.clone()).await?;
        info!(user_id = %user.id, email = %user.email, "user created");
        Ok(user)
    }
}

pub struct UpdateUserHandler<R> {
    repository: R,
}

impl<R: UserRepository> UpdateUserHandler<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, command: UpdateUserCommand) -> Result<user::Model, AppError> {
        let mut user = self
            .repository
            .get_by_id(command.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User", command.user_id))?;

        if let Some(name) = command.name {
            validate_name(&name)?;
            user.name = name;
        }
        if let Some(is_active) = command.is_active {
            if is_active {
                if user.is_active {
                    return Err(AppError::InvalidState("user is already active".to_string()));
                }
                user.is_active = true;
            } else {
                if !user.is_active {
                    return Err(AppError::InvalidState(
                        "user is already inactive".to_string(),
                    ));
                }
                user.is_active = false;
            }
        }

        self.repository.update(user.clone()).await?;
        info!(user_id = %user.id, "user updated");
        Ok(user)
    }
}

pub struct DeleteUserHandler<R> {
    repository: R,
}

impl<R: UserRepository> DeleteUserHandler<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Deleting a missing user is a no-op, matching at-least-once redelivery
    /// of delete commands.
    pub async fn handle(&self, command: DeleteUserCommand) -> Result<(), AppError> {
        let rows = self.repository.delete(command.user_id).await?;
        if rows == 0 {
            warn!(user_id = %command.user_id, "user not found for deletion, skipping");
        } else {
            info!(user_id = %command.user_id, "user deleted");
        }
        Ok(())
    }
}
