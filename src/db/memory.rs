/// In-memory account repository backing tests and local development
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::User;

use super::UserRepository;

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_alias(&self, alias: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.alias == alias).cloned())
    }

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.reset_token.as_deref() == Some(token))
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn store_reset_token(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("account {user_id}")))?;

        user.reset_token = Some(token.to_string());
        user.reset_token_expires_at = Some(expires_at);
        Ok(())
    }

    async fn update_password_and_clear_reset_token(
        &self,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("account {user_id}")))?;

        user.password_hash = password_hash.to_string();
        user.reset_token = None;
        user.reset_token_expires_at = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_user(email: &str, alias: &str) -> User {
        User::new(email.to_string(), alias.to_string(), None, "hash".to_string())
    }

    #[tokio::test]
    async fn test_reset_token_fields_move_together() {
        let repo = InMemoryUserRepository::new();
        let user = test_user("user@example.com", "user123");
        repo.create(&user).await.unwrap();

        let expires_at = Utc::now() + Duration::hours(1);
        repo.store_reset_token(user.id, "token-1", expires_at)
            .await
            .unwrap();

        let stored = repo.find_by_email("user@example.com").await.unwrap().unwrap();
        assert_eq!(stored.reset_token.as_deref(), Some("token-1"));
        assert_eq!(stored.reset_token_expires_at, Some(expires_at));

        repo.update_password_and_clear_reset_token(user.id, "new-hash")
            .await
            .unwrap();

        let stored = repo.find_by_email("user@example.com").await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "new-hash");
        assert!(stored.reset_token.is_none());
        assert!(stored.reset_token_expires_at.is_none());
    }

    #[tokio::test]
    async fn test_reissue_overwrites_previous_token() {
        let repo = InMemoryUserRepository::new();
        let user = test_user("user@example.com", "user123");
        repo.create(&user).await.unwrap();

        let expires_at = Utc::now() + Duration::hours(1);
        repo.store_reset_token(user.id, "token-1", expires_at)
            .await
            .unwrap();
        repo.store_reset_token(user.id, "token-2", expires_at)
            .await
            .unwrap();

        assert!(repo.find_by_reset_token("token-1").await.unwrap().is_none());
        assert!(repo.find_by_reset_token("token-2").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_store_reset_token_for_unknown_account() {
        let repo = InMemoryUserRepository::new();
        let result = repo
            .store_reset_token(Uuid::new_v4(), "token", Utc::now())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
