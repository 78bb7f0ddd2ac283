//! In-memory repositories
//!
//! Used by the test suites and when the service runs without `DATABASE_URL`.
//! Nothing survives a restart.

use std::collections::HashMap;
use std::sync::Arc;

use folio_core::{AppError, Profile, UserRecord};
use tokio::sync::RwLock;

use super::{ProfileRepository, UserRepository};

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, AppError> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, AppError> {
        Ok(self.users.read().await.contains_key(username))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(email)))
    }

    async fn create(&self, user: UserRecord) -> Result<UserRecord, AppError> {
        let mut users = self.users.write().await;
        let taken = users.contains_key(&user.username)
            || users
                .values()
                .any(|u| u.email.eq_ignore_ascii_case(&user.email));
        if taken {
            return Err(AppError::BadRequest(
                "Username or email is already taken".to_string(),
            ));
        }
        users.insert(user.username.clone(), user.clone());
        Ok(user)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryProfileRepository {
    profiles: Arc<RwLock<HashMap<String, Profile>>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn find_by_owner(&self, username: &str) -> Result<Option<Profile>, AppError> {
        Ok(self.profiles.read().await.get(username).cloned())
    }

    async fn save(&self, profile: Profile) -> Result<Profile, AppError> {
        self.profiles
            .write()
            .await
            .insert(profile.username.clone(), profile.clone());
        Ok(profile)
    }

    async fn delete_by_owner(&self, username: &str) -> Result<bool, AppError> {
        Ok(self.profiles.write().await.remove(username).is_some())
    }

    async fn exists_by_owner(&self, username: &str) -> Result<bool, AppError> {
        Ok(self.profiles.read().await.contains_key(username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, email: &str) -> UserRecord {
        UserRecord::new(name.to_string(), email.to_string(), "hash".to_string())
    }

    #[tokio::test]
    async fn test_duplicate_username_or_email_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("alice", "alice@example.com")).await.unwrap();

        assert!(matches!(
            repo.create(user("alice", "other@example.com")).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            repo.create(user("alice2", "ALICE@example.com")).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(repo.exists_by_email("Alice@Example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_lookup_by_username() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(user("bob", "bob@example.com")).await.unwrap();

        let found = repo.find_by_username("bob").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(repo.find_by_username("carol").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_profile_save_replaces_and_delete_reports() {
        let repo = InMemoryProfileRepository::new();
        let mut profile = Profile::new("alice", uuid::Uuid::new_v4().to_string());
        repo.save(profile.clone()).await.unwrap();

        profile.selected_template = Some("cardiologist".to_string());
        repo.save(profile).await.unwrap();

        let stored = repo.find_by_owner("alice").await.unwrap().unwrap();
        assert_eq!(stored.selected_template.as_deref(), Some("cardiologist"));
        assert!(repo.exists_by_owner("alice").await.unwrap());

        assert!(repo.delete_by_owner("alice").await.unwrap());
        assert!(!repo.delete_by_owner("alice").await.unwrap());
    }
}
