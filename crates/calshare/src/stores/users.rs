use std::sync::Arc;

use calshare_core::calendar::{
    validation::{check_email, check_string},
    CreateUserRequest, User, Validator,
};
use calshare_core::storage::{RepositoryError, StoreError, StoreResult, UserRepository};

use super::parse_id;

/// Registration and lookup of users.
#[derive(Clone)]
pub struct UserStore {
    users: Arc<dyn UserRepository>,
}

impl UserStore {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Registers a user. Emails are stored lowercased and must be unique.
    pub async fn create_user(&self, payload: CreateUserRequest) -> StoreResult<User> {
        let mut validator = Validator::new();
        let email = validator.check(check_email(&payload.email, "email"));
        let display_name = validator.check(check_string(&payload.display_name, "Display Name"));
        let (Some(email), Some(display_name)) = (email, display_name) else {
            return Err(validator.into());
        };

        if self.users.get_user_by_email(&email).await?.is_some() {
            return Err(StoreError::conflict(format!(
                "A user with email {email} already exists"
            )));
        }

        let user = User::new(email, display_name);
        self.users.create_user(&user).await.map_err(|e| match e {
            RepositoryError::AlreadyExists { id, .. } => {
                StoreError::conflict(format!("A user with email {id} already exists"))
            }
            other => other.into(),
        })?;

        tracing::info!(user_id = %user.id, email = %user.email, "Created user");

        Ok(user)
    }

    pub async fn get_user(&self, id: &str) -> StoreResult<Option<User>> {
        let id = parse_id(id, "userId")?;
        Ok(self.users.get_user(&id).await?)
    }

    pub async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let email = check_email(email, "email").map_err(StoreError::validation)?;
        Ok(self.users.get_user_by_email(&email).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::test_support::{stores, user};

    #[tokio::test]
    async fn test_create_user_normalizes_email() {
        let s = stores();

        let created = s
            .users
            .create_user(CreateUserRequest {
                email: " Ada@Example.COM ".to_string(),
                display_name: "Ada".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(created.email, "ada@example.com");
        assert!(created.events.is_empty());

        let found = s.users.get_user_by_email("ADA@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(created.id));
    }

    #[tokio::test]
    async fn test_create_user_collects_validation_errors() {
        let s = stores();

        let err = s
            .users
            .create_user(CreateUserRequest {
                email: "not-an-email".to_string(),
                display_name: "   ".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.messages().len(), 2);
        assert_eq!(err.kind(), "validation");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let s = stores();
        user(&s, "ada@example.com").await;

        let err = s
            .users
            .create_user(CreateUserRequest {
                email: "ada@example.com".to_string(),
                display_name: "Another Ada".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_get_user_rejects_malformed_id() {
        let s = stores();

        let err = s.users.get_user("42").await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let missing = s.users.get_user("65a1b2c3d4e5f60718293a4b").await.unwrap();
        assert!(missing.is_none());
    }
}
