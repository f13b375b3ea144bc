use std::error::Error;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::storage::config::PollConfig;

/// Connection-level failures worth another attempt.
fn is_transient<E: Error>(error: &E) -> bool {
    let error_msg = format!("{:?}", error);
    ["ConnectionReset", "BrokenPipe", "Interrupted", "TimedOut"]
        .iter()
        .any(|marker| error_msg.contains(marker))
}

/// Retry `operation` on transient connection errors, with exponential backoff.
///
/// Non-transient errors are returned right away.
pub async fn retry_transient<F, Fut, T, E>(
    max_retries: usize,
    operation_name: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Error + Send + Sync,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt < max_retries && is_transient(&e) => {
                warn!(
                    "Retryable error in {} (attempt {}/{}): {:?}",
                    operation_name,
                    attempt + 1,
                    max_retries,
                    e
                );
                // 100ms, 200ms, 400ms, ... capped at ~100s
                let backoff_ms = 100 * (1u64 << attempt.min(10));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Probe until it reports `true` or the poll budget runs out.
///
/// Returns `Ok(false)` when every attempt answered `false`; probe errors
/// are returned as is.
pub async fn poll_until<F, Fut, E>(poll: PollConfig, target: &str, mut probe: F) -> Result<bool, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    for attempt in 1..=poll.max_attempts {
        if probe().await? {
            return Ok(true);
        }
        debug!(
            "{} not confirmed yet (attempt {}/{})",
            target, attempt, poll.max_attempts
        );
        if attempt < poll.max_attempts {
            tokio::time::sleep(poll.delay).await;
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone)]
    struct TestError {
        message: String,
    }

    impl fmt::Display for TestError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.message)
        }
    }

    impl Error for TestError {}

    fn error(message: &str) -> TestError {
        TestError {
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn test_retry_success_on_first_attempt() {
        let result =
            retry_transient(3, "test_operation", || async { Ok::<i32, TestError>(42) }).await;

        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_retry_success_after_transient_errors() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);

        let result = retry_transient(5, "test_operation", move || {
            let counter = Arc::clone(&counter_clone);
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(error("ConnectionReset error"))
                } else {
                    Ok(100)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 100);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_non_transient_error() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);

        let result = retry_transient(5, "test_operation", move || {
            let counter = Arc::clone(&counter_clone);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<i32, TestError>(error("NotFound error"))
            }
        })
        .await;

        assert_eq!(result.unwrap_err().message, "NotFound error");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max_retries() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);

        let result = retry_transient(2, "test_operation", move || {
            let counter = Arc::clone(&counter_clone);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<i32, TestError>(error("TimedOut error"))
            }
        })
        .await;

        assert!(result.is_err());
        // initial attempt + 2 retries
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_poll_confirms_on_later_attempt() {
        let counter = AtomicUsize::new(0);
        let counter_ref = &counter;
        let poll = PollConfig::new(3, Duration::from_millis(1));

        let found = poll_until(poll, "bucket", move || async move {
            Ok::<bool, TestError>(counter_ref.fetch_add(1, Ordering::SeqCst) == 1)
        })
        .await
        .unwrap();

        assert!(found);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_poll_exhausts_budget() {
        let counter = AtomicUsize::new(0);
        let counter_ref = &counter;
        let poll = PollConfig::new(3, Duration::ZERO);

        let found = poll_until(poll, "bucket", move || async move {
            counter_ref.fetch_add(1, Ordering::SeqCst);
            Ok::<bool, TestError>(false)
        })
        .await
        .unwrap();

        assert!(!found);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_poll_propagates_probe_error() {
        let poll = PollConfig::new(3, Duration::ZERO);
        let result = poll_until(poll, "bucket", || async {
            Err::<bool, TestError>(error("AccessDenied"))
        })
        .await;

        assert_eq!(result.unwrap_err().message, "AccessDenied");
    }
}
