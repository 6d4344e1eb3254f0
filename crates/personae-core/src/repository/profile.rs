//! Profile and access-token repository trait definition.

use personae_types::error::RepositoryError;
use personae_types::profile::Profile;
use uuid::Uuid;

pub trait ProfileRepository: Send + Sync {
    fn create(
        &self,
        profile: &Profile,
    ) -> impl std::future::Future<Output = Result<Profile, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Profile>, RepositoryError>> + Send;

    fn list(&self) -> impl std::future::Future<Output = Result<Vec<Profile>, RepositoryError>> + Send;

    /// Set or clear the username. `Conflict` if another profile already uses it.
    fn update_username(
        &self,
        id: &Uuid,
        username: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Profile, RepositoryError>> + Send;

    /// Store the SHA-256 hex digest of a bearer token for a profile.
    fn store_token_hash(
        &self,
        profile_id: &Uuid,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Resolve a token digest to its profile.
    fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<Option<Profile>, RepositoryError>> + Send;
}
