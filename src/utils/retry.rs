use std::future::Future;

/// 最多執行 `operation` `max_attempts` 次，暫時性錯誤立即重試 (不等待)
///
/// 非暫時性錯誤直接回傳；次數用盡時回傳最後一次的暫時性錯誤。
///
/// closure 收到的嘗試次數從 1 開始。
pub async fn with_retries<T, E, F, Fut, C>(
    max_attempts: u32,
    is_transient: C,
    mut operation: F,
) -> std::result::Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    C: Fn(&E) -> bool,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_attempts && is_transient(&err) => {
                tracing::debug!("Attempt {}/{} failed, retrying", attempt, max_attempts);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, PartialEq)]
    enum Failure {
        Transient,
        Fatal,
    }

    fn transient(err: &Failure) -> bool {
        *err == Failure::Transient
    }

    #[tokio::test]
    async fn test_succeeds_after_one_transient_failure() {
        let calls = AtomicU32::new(0);

        let result = with_retries(2, transient, |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 1 {
                    Err(Failure::Transient)
                } else {
                    Ok("done")
                }
            }
        })
        .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_budget() {
        let calls = AtomicU32::new(0);

        let result: std::result::Result<(), Failure> = with_retries(2, transient, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Failure::Transient) }
        })
        .await;

        assert_eq!(result, Err(Failure::Transient));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fatal_failure_is_not_retried() {
        let calls = AtomicU32::new(0);

        let result: std::result::Result<(), Failure> = with_retries(2, transient, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Failure::Fatal) }
        })
        .await;

        assert_eq!(result, Err(Failure::Fatal));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_budget_still_makes_one_attempt() {
        let calls = AtomicU32::new(0);

        let result: std::result::Result<(), Failure> = with_retries(0, transient, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Failure::Transient) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
