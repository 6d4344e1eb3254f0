//! Object store trait for uploaded file bytes.

use personae_types::error::FileError;

/// Key/value blob storage addressed by relative keys such as
/// `{agent_id}/{file_id}.txt`.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait ObjectStore: Send + Sync {
    /// Write `data` under `key`, replacing any existing object.
    fn put(
        &self,
        key: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<(), FileError>> + Send;

    fn get(&self, key: &str) -> impl std::future::Future<Output = Result<Vec<u8>, FileError>> + Send;

    /// Remove the object under `key`. Removing a missing object is not an error.
    fn delete(&self, key: &str) -> impl std::future::Future<Output = Result<(), FileError>> + Send;

    /// Remove every object whose key starts with `{prefix}/`.
    fn delete_prefix(
        &self,
        prefix: &str,
    ) -> impl std::future::Future<Output = Result<(), FileError>> + Send;
}
