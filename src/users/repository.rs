use async_trait::async_trait;
use sea_orm::{
    ActiveValue::{Set, Unchanged},
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use sea_orm::ActiveModelTrait;
use uuid::Uuid;

use crate::db::entities::user;
use crate::error::AppError;

/// Port for the user data store. The application layer only ever talks to
/// this trait; the SeaORM adapter below is the single implementation.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn add(&self, user: user::Model) -> Result<(), AppError>;
    async fn get_by_id(&self, user_id: Uuid) -> Result<Option<user::Model>, AppError>;
    async fn get_by_email(&self, email: &str) -> Result<Option<user::Model>, AppError>;
    async fn list_all(&self) -> Result<Vec<user::Model>, AppError>;
    async fn update(&self, user: user::Model) -> Result<(), AppError>;
    /// Returns the number of rows removed (0 when the user was already gone).
    async fn delete(&self, user_id: Uuid) -> Result<u64, AppError>;
}

#[derive(Clone)]
pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn add(&self, user: user::Model) -> Result<(), AppError> {
        let active = user::ActiveModel {
            id: Set(user.id),
            name: Set(user.name),
            email: Set(user.email),
            hashed_password: Set(user.hashed_password),
            is_active: Set(user.is_active),
        };
        active.insert(&self.db).await?;
        Ok(())
    }

    async fn get_by_id(&self, user_id: Uuid) -> Result<Option<user::Model>, AppError> {
        Ok(user::Entity::find_by_id(user_id).one(&self.db).await?)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<user::Model>, AppError> {
        Ok(user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }

    async fn list_all(&self) -> Result<Vec<user::Model>, AppError> {
        Ok(user::Entity::find()
            .order_by_asc(user::Column::Name)
            .all(&self.db)
            .await?)
    }

    async fn update(&self, user: user::Model) -> Result<(), AppError> {
        let active = user::ActiveModel {
            id: Unchanged(user.id),
            name: Set(user.name),
            email: Set(user.email),
            hashed_password: Set(user.hashed_password),
            is_active: Set(user.is_active),
        };
        active.update(&self.db).await?;
        Ok(())
    }

    async fn delete(&self, user_id: Uuid) -> Result<u64, AppError> {
        let result = user::Entity::delete_by_id(user_id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Vec-backed repository for handler tests. Clones share storage.
    #[derive(Clone, Default)]
    pub struct InMemoryUserRepository {
        users: Arc<Mutex<Vec<user::Model>>>,
    }

    impl InMemoryUserRepository {
        pub fn with_users(users: Vec<user::Model>) -> Self {
            Self {
                users: Arc::new(Mutex::new(users)),
            }
        }

        pub fn snapshot(&self) -> Vec<user::Model> {
            self.users.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn add(&self, user: user::Model) -> Result<(), AppError> {
            self.users.lock().unwrap().push(user);
            Ok(())
        }

        async fn get_by_id(&self, user_id: Uuid) -> Result<Option<user::Model>, AppError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == user_id)
                .cloned())
        }

        async fn get_by_email(&self, email: &str) -> Result<Option<user::Model>, AppError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn list_all(&self) -> Result<Vec<user::Model>, AppError> {
            let mut users = self.users.lock().unwrap().clone();
            users.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(users)
        }

        async fn update(&self, user: user::Model) -> Result<(), AppError> {
            let mut users = self.users.lock().unwrap();
            match users.iter_mut().find(|u| u.id == user.id) {
                Some(stored) => {
                    *stored = user;
                    Ok(())
                }
                None => Err(AppError::DatabaseError(
                    "none of the records are updated".to_string(),
                )),
            }
        }

        async fn delete(&self, user_id: Uuid) -> Result<u64, AppError> {
            let mut users = self.users.lock().unwrap();
            let before = users.len();
            users.retain(|u| u.id != user_id);
            Ok((before - users.len()) as u64)
        }
    }
}
