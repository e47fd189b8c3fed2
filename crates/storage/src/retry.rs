//! Bounded retry and timeout wrappers for object-store calls.
//!
//! `put` is the only retried operation: keys are content-addressed, so a
//! replayed write is harmless. An application-level timeout bounds every
//! wrapped call; a timeout is surfaced as `StorageError::Timeout` and is
//! treated by callers exactly like any other write/delete failure.

use crate::error::{StorageError, StorageResult};
use crate::traits::ObjectStore;
use bytes::Bytes;
use std::time::Duration;

/// Backoff between put retries.
const RETRY_BACKOFF: Duration = Duration::from_millis(200);

/// Run a storage future under an application-level timeout.
pub async fn with_timeout<T, F>(timeout: Duration, fut: F) -> StorageResult<T>
where
    F: Future<Output = StorageResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(StorageError::Timeout(timeout)),
    }
}

/// Put with a bounded retry count, each attempt under `timeout`.
///
/// Invalid-key errors are not retryable and fail immediately; transient
/// I/O, S3, and timeout errors are retried up to `attempts` times total.
pub async fn put_with_retry(
    store: &dyn ObjectStore,
    key: &str,
    data: Bytes,
    attempts: u32,
    timeout: Duration,
) -> StorageResult<()> {
    let attempts = attempts.max(1);
    let mut last_error = None;

    for attempt in 1..=attempts {
        match with_timeout(timeout, store.put(key, data.clone())).await {
            Ok(()) => return Ok(()),
            Err(e @ StorageError::InvalidKey(_)) => return Err(e),
            Err(e) => {
                tracing::warn!(
                    key,
                    attempt,
                    attempts,
                    backend = store.backend_name(),
                    error = %e,
                    "storage put failed"
                );
                last_error = Some(e);
                if attempt < attempts {
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
            }
        }
    }

    // attempts >= 1, so last_error is always set here
    Err(last_error.unwrap_or_else(|| StorageError::Timeout(timeout)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ObjectMeta;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Backend that fails a configurable number of puts before succeeding.
    struct FlakyBackend {
        failures: AtomicU32,
        puts: AtomicU32,
    }

    impl FlakyBackend {
        fn new(failures: u32) -> Self {
            Self {
                failures: AtomicU32::new(failures),
                puts: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl ObjectStore for FlakyBackend {
        async fn exists(&self, _key: &str) -> StorageResult<bool> {
            Ok(false)
        }

        async fn head(&self, key: &str) -> StorageResult<ObjectMeta> {
            Err(StorageError::NotFound(key.to_string()))
        }

        async fn get(&self, key: &str) -> StorageResult<Bytes> {
            Err(StorageError::NotFound(key.to_string()))
        }

        async fn put(&self, _key: &str, _data: Bytes) -> StorageResult<()> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            if self.failures.load(Ordering::SeqCst) > 0 {
                self.failures.fetch_sub(1, Ordering::SeqCst);
                return Err(StorageError::Io(std::io::Error::other("flaky")));
            }
            Ok(())
        }

        async fn delete(&self, _key: &str) -> StorageResult<()> {
            Ok(())
        }

        async fn list(&self, _prefix: &str) -> StorageResult<Vec<String>> {
            Ok(Vec::new())
        }

        fn backend_name(&self) -> &'static str {
            "flaky"
        }
    }

    #[tokio::test]
    async fn put_retries_until_success() {
        let backend = FlakyBackend::new(2);
        put_with_retry(
            &backend,
            "media/ab/abcd",
            Bytes::from_static(b"x"),
            3,
            Duration::from_secs(1),
        )
        .await
        .unwrap();
        assert_eq!(backend.puts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn put_gives_up_after_bounded_attempts() {
        let backend = FlakyBackend::new(10);
        let err = put_with_retry(
            &backend,
            "media/ab/abcd",
            Bytes::from_static(b"x"),
            3,
            Duration::from_secs(1),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
        assert_eq!(backend.puts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn timeout_maps_to_timeout_error() {
        let result = with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(StorageError::Timeout(_))));
    }
}
