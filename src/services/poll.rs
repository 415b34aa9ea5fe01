use std::future::Future;
use std::time::Duration;

/// Runs `probe` up to `attempts` times, sleeping `interval` between runs,
/// until it yields a value. Returns `None` once the budget is exhausted.
///
/// The probe runs exactly `attempts` times in the worst case, with no sleep
/// after the final attempt. A probe error ends the poll immediately; the
/// host page going away mid-poll is not something more attempts can fix.
pub async fn poll_until<T, E, F, Fut>(
    attempts: u32,
    interval: Duration,
    mut probe: F,
) -> Result<Option<T>, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    for attempt in 0..attempts {
        if let Some(value) = probe().await? {
            return Ok(Some(value));
        }
        if attempt + 1 < attempts {
            tokio::time::sleep(interval).await;
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn returns_first_hit_without_extra_probes() {
        let calls = AtomicU32::new(0);
        let result: Result<Option<u32>, ()> = poll_until(5, Duration::ZERO, || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Ok(if n == 3 { Some(n) } else { None }) }
        })
        .await;
        assert_eq!(result, Ok(Some(3)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausts_exactly_the_attempt_budget() {
        let calls = AtomicU32::new(0);
        let result: Result<Option<u32>, ()> = poll_until(4, Duration::ZERO, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(None) }
        })
        .await;
        assert_eq!(result, Ok(None));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn probe_error_stops_the_poll() {
        let calls = AtomicU32::new(0);
        let result: Result<Option<u32>, &str> = poll_until(4, Duration::ZERO, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("gone") }
        })
        .await;
        assert_eq!(result, Err("gone"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_attempts_never_probes() {
        let calls = AtomicU32::new(0);
        let result: Result<Option<u32>, ()> = poll_until(0, Duration::ZERO, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(Some(1)) }
        })
        .await;
        assert_eq!(result, Ok(None));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
