//! `SeaORM` implementation of the `AuthService` trait.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task;
use tracing::info;

use crate::config::{Config, SecurityConfig};
use crate::db::{Store, User, repositories::user::hash_password};
use crate::services::auth_service::{AuthError, AuthService, LoginResult, UserInfo};
use async_trait::async_trait;

pub struct SeaOrmAuthService {
    store: Store,
    config: Arc<RwLock<Config>>,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, config: Arc<RwLock<Config>>) -> Self {
        Self { store, config }
    }

    async fn security(&self) -> SecurityConfig {
        self.config.read().await.security.clone()
    }

    async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let security = self.security().await;
        let password = password.to_string();

        let hash = task::spawn_blocking(move || hash_password(&password, &security))
            .await
            .map_err(|e| AuthError::Internal(format!("Hashing task panicked: {e}")))??;

        Ok(hash)
    }

    async fn require_user(&self, user_id: i32) -> Result<User, AuthError> {
        self.store
            .get_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

/// Rejects a password shorter than the configured minimum.
fn check_length(password: &str, min: usize) -> Result<(), AuthError> {
    if password.chars().count() < min {
        return Err(AuthError::Validation(format!(
            "Password must be at least {min} characters."
        )));
    }
    Ok(())
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserInfo, AuthError> {
        let username = username.trim();
        let email = email.trim();

        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AuthError::Validation("All fields are required.".to_string()));
        }
        if !email.contains('@') {
            return Err(AuthError::Validation("Please enter a valid email.".to_string()));
        }
        check_length(password, self.security().await.min_password_length)?;

        let hash = self.hash(password).await?;
        let user = self
            .store
            .create_user(username, email, &hash)
            .await?
            .ok_or(AuthError::AlreadyExists)?;

        info!(user_id = user.id, username = %user.username, "Registered new user");
        Ok(UserInfo::from(user))
    }

    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError> {
        let is_valid = self
            .store
            .verify_user_password(username, password)
            .await?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(LoginResult {
            user_id: user.id,
            username: user.username,
            api_key: user.api_key,
        })
    }

    async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>, AuthError> {
        if api_key.trim().is_empty() {
            return Ok(None);
        }
        Ok(self.store.get_user_by_api_key(api_key.trim()).await?)
    }

    async fn get_user_info(&self, user_id: i32) -> Result<UserInfo, AuthError> {
        self.require_user(user_id).await.map(UserInfo::from)
    }

    async fn change_password(
        &self,
        user_id: i32,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        check_length(new_password, self.security().await.min_password_length)?;

        if current_password == new_password {
            return Err(AuthError::Validation(
                "New password must be different from current password".to_string(),
            ));
        }

        let user = self.require_user(user_id).await?;
        let is_valid = self
            .store
            .verify_user_password(&user.username, current_password)
            .await?;

        if !is_valid {
            return Err(AuthError::Validation("Current password is incorrect".to_string()));
        }

        let hash = self.hash(new_password).await?;
        self.store.update_user_password_hash(user_id, hash).await?;

        info!(user_id, "Password changed");
        Ok(())
    }

    async fn get_api_key(&self, user_id: i32) -> Result<String, AuthError> {
        self.require_user(user_id).await.map(|u| u.api_key)
    }

    async fn regenerate_api_key(&self, user_id: i32) -> Result<String, AuthError> {
        self.require_user(user_id).await?;
        Ok(self.store.regenerate_user_api_key(user_id).await?)
    }

    async fn delete_account(&self, user_id: i32, password: &str) -> Result<(), AuthError> {
        let user = self.require_user(user_id).await?;
        let is_valid = self
            .store
            .verify_user_password(&user.username, password)
            .await?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        if !self.store.delete_user(user_id).await? {
            return Err(AuthError::UserNotFound);
        }

        info!(user_id, username = %user.username, "Account deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service() -> SeaOrmAuthService {
        let path = std::env::temp_dir().join(format!("newspulse-auth-{}.db", uuid::Uuid::new_v4()));
        let store = Store::new(&format!("sqlite:{}", path.display()))
            .await
            .unwrap();

        let mut config = Config::default();
        config.security.argon2_memory_cost_kib = 1024;
        config.security.argon2_time_cost = 1;

        SeaOrmAuthService::new(store, Arc::new(RwLock::new(config)))
    }

    #[tokio::test]
    async fn test_register_validation() {
        let auth = service().await;

        let err = auth.register("", "a@b.c", "secret1").await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        let err = auth.register("alice", "not-an-email", "secret1").await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        let err = auth.register("alice", "a@b.c", "short").await.unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 characters.");
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let auth = service().await;

        let info = auth.register(" alice ", "Alice@Example.com", "secret1").await.unwrap();
        assert_eq!(info.username, "alice");
        assert_eq!(info.email, "alice@example.com");

        let dup = auth.register("alice", "other@example.com", "secret1").await.unwrap_err();
        assert!(matches!(dup, AuthError::AlreadyExists));

        let login = auth.login("alice", "secret1").await.unwrap();
        assert_eq!(login.user_id, info.id);
        assert_eq!(login.api_key.len(), 64);

        let bad = auth.login("alice", "wrong-pass").await.unwrap_err();
        assert!(matches!(bad, AuthError::InvalidCredentials));

        let found = auth.verify_api_key(&login.api_key).await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(info.id));
    }

    #[tokio::test]
    async fn test_change_password() {
        let auth = service().await;
        let info = auth.register("bob", "bob@example.com", "secret1").await.unwrap();

        let same = auth.change_password(info.id, "secret1", "secret1").await;
        assert!(matches!(same, Err(AuthError::Validation(_))));

        let wrong = auth.change_password(info.id, "nope-nope", "secret2").await;
        assert!(matches!(wrong, Err(AuthError::Validation(_))));

        auth.change_password(info.id, "secret1", "secret2").await.unwrap();
        assert!(auth.login("bob", "secret2").await.is_ok());
        assert!(auth.login("bob", "secret1").await.is_err());
    }

    #[tokio::test]
    async fn test_regenerate_and_delete() {
        let auth = service().await;
        let info = auth.register("carol", "carol@example.com", "secret1").await.unwrap();

        let old = auth.get_api_key(info.id).await.unwrap();
        let new = auth.regenerate_api_key(info.id).await.unwrap();
        assert_ne!(old, new);
        assert!(auth.verify_api_key(&old).await.unwrap().is_none());

        let refused = auth.delete_account(info.id, "wrong-pass").await;
        assert!(matches!(refused, Err(AuthError::InvalidCredentials)));

        auth.delete_account(info.id, "secret1").await.unwrap();
        assert!(matches!(
            auth.get_user_info(info.id).await,
            Err(AuthError::UserNotFound)
        ));
    }
}
