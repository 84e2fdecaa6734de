//! Blob-store port implementation over an in-memory map.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::ports::{BlobStore, BlobStoreError, ProgressObserver};

use super::{MemoryPlatform, write_guard};

/// Transfer chunk size used for progress reporting.
const CHUNK_BYTES: usize = 64 * 1024;

#[async_trait]
impl BlobStore for MemoryPlatform {
    async fn put(
        &self,
        path: &str,
        bytes: Bytes,
        progress: ProgressObserver,
    ) -> Result<String, BlobStoreError> {
        let total = bytes.len();
        if total == 0 {
            progress(100);
        } else {
            let mut transferred = 0_usize;
            while transferred < total {
                transferred = usize::min(transferred + CHUNK_BYTES, total);
                #[allow(
                    clippy::integer_division,
                    clippy::cast_possible_truncation,
                    reason = "progress percent is bounded 0..=100"
                )]
                let pct = (transferred as u128 * 100 / total as u128) as u8;
                progress(pct);
            }
        }

        write_guard(&self.blobs).insert(path.to_owned(), bytes);
        Ok(format!("memory://{path}"))
    }

    async fn delete(&self, path: &str) -> Result<(), BlobStoreError> {
        write_guard(&self.blobs).remove(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Behavioural coverage for the in-memory blob store.
    use super::*;
    use crate::domain::ports::silent_progress;
    use mockable::DefaultClock;
    use std::sync::{Arc, Mutex};

    fn platform() -> MemoryPlatform {
        MemoryPlatform::new(Arc::new(DefaultClock))
    }

    #[tokio::test]
    async fn progress_is_non_decreasing_and_finishes_at_100() {
        let reports: Arc<Mutex<Vec<u8>>> = Arc::default();
        let sink = Arc::clone(&reports);
        let observer: ProgressObserver = Arc::new(move |pct| {
            sink.lock().expect("report lock").push(pct);
        });

        let platform = platform();
        let megabyte = Bytes::from(vec![0_u8; 1024 * 1024]);
        platform
            .put("clients/c-1/documents/d-1/big.bin", megabyte, observer)
            .await
            .expect("upload succeeds");

        let reports = reports.lock().expect("report lock");
        assert!(!reports.is_empty());
        assert!(reports.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(reports.last().copied(), Some(100));
    }

    #[tokio::test]
    async fn empty_files_still_complete() {
        let reports: Arc<Mutex<Vec<u8>>> = Arc::default();
        let sink = Arc::clone(&reports);
        let observer: ProgressObserver = Arc::new(move |pct| {
            sink.lock().expect("report lock").push(pct);
        });

        platform()
            .put("clients/c-1/documents/d-1/empty.bin", Bytes::new(), observer)
            .await
            .expect("upload succeeds");
        assert_eq!(*reports.lock().expect("report lock"), vec![100]);
    }

    #[tokio::test]
    async fn deleting_an_absent_blob_is_not_an_error() {
        platform()
            .delete("clients/c-1/documents/d-404/none.bin")
            .await
            .expect("delete succeeds");
    }

    #[tokio::test]
    async fn stored_blobs_are_retrievable_by_path() {
        let platform = platform();
        let path = "clients/c-1/documents/d-1/note.txt";
        let url = platform
            .put(path, Bytes::from_static(b"hello"), silent_progress())
            .await
            .expect("upload succeeds");
        assert_eq!(url, format!("memory://{path}"));
    }
}
