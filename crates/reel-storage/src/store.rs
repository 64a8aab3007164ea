//! Asset store abstraction.

use async_trait::async_trait;
use tracing::debug;

use crate::client::R2Client;
use crate::error::{StorageError, StorageResult};

/// Persistent store the orchestrator copies finished renders into.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Upload `bytes` to `path`.
    ///
    /// With `upsert = false` an existing object is an error instead of being
    /// overwritten.
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> StorageResult<()>;

    /// Publicly reachable URL of `path`.
    fn public_url(&self, path: &str) -> String;
}

#[async_trait]
impl AssetStore for R2Client {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> StorageResult<()> {
        if !upsert && self.exists(path).await? {
            debug!(key = path, "Refusing to overwrite existing object");
            return Err(StorageError::AlreadyExists(path.to_string()));
        }
        self.upload_bytes(bytes, path, content_type).await
    }

    fn public_url(&self, path: &str) -> String {
        self.object_url(path)
    }
}
