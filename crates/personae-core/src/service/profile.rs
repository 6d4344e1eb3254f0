//! Profile service: creating users, resolving bearer tokens, renaming.
//!
//! Token generation and hashing happen in the API layer; this service only
//! ever sees the SHA-256 digest.

use chrono::Utc;
use personae_types::error::RepositoryError;
use personae_types::profile::{Profile, ProfileRole};
use tracing::info;
use uuid::Uuid;

use crate::repository::profile::ProfileRepository;

pub struct ProfileService<P: ProfileRepository> {
    repo: P,
}

impl<P: ProfileRepository> ProfileService<P> {
    pub fn new(repo: P) -> Self {
        Self { repo }
    }

    /// Create a profile and register the digest of its access token.
    pub async fn create_profile(
        &self,
        username: Option<&str>,
        role: ProfileRole,
        token_hash: &str,
    ) -> Result<Profile, RepositoryError> {
        let profile = Profile {
            id: Uuid::now_v7(),
            username: clean_username(username),
            role,
            created_at: Utc::now(),
        };
        let profile = self.repo.create(&profile).await?;
        self.repo.store_token_hash(&profile.id, token_hash).await?;
        info!(profile_id = %profile.id, %role, "profile created");
        Ok(profile)
    }

    /// Resolve a token digest to the profile it belongs to.
    pub async fn authenticate(&self, token_hash: &str) -> Result<Option<Profile>, RepositoryError> {
        self.repo.find_by_token_hash(token_hash).await
    }

    pub async fn list_profiles(&self) -> Result<Vec<Profile>, RepositoryError> {
        self.repo.list().await
    }

    /// Change (or clear, with a blank value) a profile's username.
    pub async fn update_username(
        &self,
        id: &Uuid,
        username: Option<&str>,
    ) -> Result<Profile, RepositoryError> {
        let username = clean_username(username);
        self.repo.update_username(id, username.as_deref()).await
    }
}

fn clean_username(username: Option<&str>) -> Option<String> {
    username
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemProfiles;

    #[tokio::test]
    async fn test_create_and_authenticate() {
        let svc = ProfileService::new(MemProfiles::default());
        let profile = svc
            .create_profile(Some(" ana "), ProfileRole::Creator, "digest-1")
            .await
            .unwrap();
        assert_eq!(profile.username.as_deref(), Some("ana"));

        let found = svc.authenticate("digest-1").await.unwrap().unwrap();
        assert_eq!(found.id, profile.id);
        assert!(svc.authenticate("digest-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_username_blank_clears() {
        let svc = ProfileService::new(MemProfiles::default());
        let profile = svc
            .create_profile(Some("ana"), ProfileRole::User, "d")
            .await
            .unwrap();
        let updated = svc.update_username(&profile.id, Some("   ")).await.unwrap();
        assert!(updated.username.is_none());
    }

    #[tokio::test]
    async fn test_update_username_conflict() {
        let svc = ProfileService::new(MemProfiles::default());
        svc.create_profile(Some("ana"), ProfileRole::User, "a")
            .await
            .unwrap();
        let bob = svc
            .create_profile(Some("bob"), ProfileRole::User, "b")
            .await
            .unwrap();
        let err = svc.update_username(&bob.id, Some("ana")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }
}
