use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::entities::user;
use crate::error::AppError;
use crate::users::repository::UserRepository;

pub const MAX_PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_active: bool,
}

impl From<user::Model> for UserDto {
    fn from(model: user::Model) -> Self {
        UserDto {
            id: model.id,
            name: model.name,
            email: model.email,
            is_active: model.is_active,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetUserByIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub is_active: Option<bool>,
}

fn default_limit() -> usize {
    100
}

impl Default for ListUsersQuery {
    fn default() -> Self {
        ListUsersQuery {
            limit: default_limit(),
            offset: 0,
            is_active: None,
        }
    }
}

impl ListUsersQuery {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.limit == 0 || self.limit > MAX_PAGE_SIZE {
            return Err(AppError::InvalidInput(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(())
    }
}

pub struct GetUserByIdHandler<R> {
    repository: R,
}

impl<R: UserRepository> GetUserByIdHandler<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetUserByIdQuery) -> Result<Option<UserDto>, AppError> {
        Ok(self
            .repository
            .get_by_id(query.user_id)
            .await?
            .map(UserDto::from))
    }
}

pub struct ListUsersHandler<R> {
    repository: R,
}

impl<R: UserRepository> ListUsersHandler<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Filters and paginates in memory over the repository's full list.
    pub async fn handle(&self, query: ListUsersQuery) -> Result<Vec<UserDto>, AppError> {
        query.validate()?;

        let users = self.repository.list_all().await?;
        let dtos = users
            .into_iter()
            .filter(|u| query.is_active.is_none_or(|active| u.is_active == active))
            .skip(query.offset)
            .take(query.limit)
            .map(UserDto::from)
            .collect();
        Ok(dtos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repository::testing::InMemoryUserRepository;

    fn sample_users() -> Vec<user::Model> {
        (0..5)
            .map(|i| user::Model {
                id: Uuid::new_v4(),
                name: format!("User {i}"),
                email: format!("user{i}@example.com"),
                hashed_password: "$2b$12$fakehash".to_string(),
                is_active: i % 2 == 0,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_get_user_by_id_absent() {
        let handler = GetUserByIdHandler::new(InMemoryUserRepository::default());
        let result = handler
            .handle(GetUserByIdQuery {
                user_id: Uuid::new_v4(),
            })
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_get_user_by_id_present() {
        let users = sample_users();
        let wanted = users[2].clone();
        let handler = GetUserByIdHandler::new(InMemoryUserRepository::with_users(users));

        let dto = handler
            .handle(GetUserByIdQuery { user_id: wanted.id })
            .await
            .unwrap()
            .expect("user should exist");
        assert_eq!(dto, UserDto::from(wanted));
    }

    #[tokio::test]
    async fn test_list_users_filters_by_status() {
        let handler = ListUsersHandler::new(InMemoryUserRepository::with_users(sample_users()));

        let active = handler
            .handle(ListUsersQuery {
                is_active: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(active.len(), 3);
        assert!(active.iter().all(|u| u.is_active));

        let inactive = handler
            .handle(ListUsersQuery {
                is_active: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(inactive.len(), 2);
    }

    #[tokio::test]
    async fn test_list_users_pagination_window() {
        let handler = ListUsersHandler::new(InMemoryUserRepository::with_users(sample_users()));

        let page = handler
            .handle(ListUsersQuery {
                limit: 2,
                offset: 1,
                is_active: None,
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
        // Repository lists by name, so the window starts at "User 1".
        assert_eq!(page[0].name, "User 1");
        assert_eq!(page[1].name, "User 2");

        let past_the_end = handler
            .handle(ListUsersQuery {
                limit: 10,
                offset: 99,
                is_active: None,
            })
            .await
            .unwrap();
        assert!(past_the_end.is_empty());
    }

    #[tokio::test]
    async fn test_list_users_rejects_bad_limit() {
        let handler = ListUsersHandler::new(InMemoryUserRepository::default());

        for limit in [0, MAX_PAGE_SIZE + 1] {
            let err = handler
                .handle(ListUsersQuery {
                    limit,
                    offset: 0,
                    is_active: None,
                })
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)));
        }
    }
}
