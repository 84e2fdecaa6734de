//! Port for the path-addressed blob store.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use super::macros::define_port_error;

/// Callback invoked with a 0–100 percentage as bytes transfer.
///
/// Adapters must report a non-decreasing sequence and finish with 100 on a
/// successful upload. A caller may drop its observer at any time; nothing is
/// cleaned up on abandonment.
pub type ProgressObserver = Arc<dyn Fn(u8) + Send + Sync>;

/// Observer that ignores every report.
#[must_use]
pub fn silent_progress() -> ProgressObserver {
    Arc::new(|_| {})
}

define_port_error! {
    /// Errors raised by blob store adapters.
    pub enum BlobStoreError {
        /// Store could not be reached.
        Connection { message: String } =>
            "blob store connection failed: {message}",
        /// The transfer failed partway through.
        Transfer { message: String } =>
            "blob transfer failed: {message}",
    }
}

/// Port for resumable, path-addressed binary storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stream the bytes to the given path, reporting progress, and return a
    /// download locator for the stored blob.
    async fn put(
        &self,
        path: &str,
        bytes: Bytes,
        progress: ProgressObserver,
    ) -> Result<String, BlobStoreError>;

    /// Delete the blob at the given path. Deleting an absent blob is not an
    /// error.
    async fn delete(&self, path: &str) -> Result<(), BlobStoreError>;
}
