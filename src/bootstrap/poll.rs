use std::time::Duration;

use crate::host::Sleeper;

/// 有界轮询：最多探测 `max_attempts` 次（至少一次），两次探测之间让出 `interval`
///
/// 返回首个 Some 结果及已探测次数；全部落空时返回 None。
pub async fn poll_until<T, F>(
    sleeper: &dyn Sleeper,
    interval: Duration,
    max_attempts: u32,
    mut probe: F,
) -> (Option<T>, u32)
where
    F: FnMut() -> Option<T>,
{
    let max_attempts = max_attempts.max(1);
    for attempt in 1..=max_attempts {
        if let Some(value) = probe() {
            return (Some(value), attempt);
        }
        if attempt < max_attempts {
            sleeper.sleep(interval).await;
        }
    }
    (None, max_attempts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSleeper {
        naps: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.naps.lock().unwrap().push(duration);
        }
    }

    #[tokio::test]
    async fn returns_immediately_when_ready() {
        let sleeper = RecordingSleeper::default();
        let (value, attempts) =
            poll_until(&sleeper, Duration::from_millis(100), 30, || Some(7)).await;
        assert_eq!(value, Some(7));
        assert_eq!(attempts, 1);
        assert!(sleeper.naps.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn succeeds_after_a_few_attempts() {
        let sleeper = RecordingSleeper::default();
        let mut calls = 0;
        let (value, attempts) = poll_until(&sleeper, Duration::from_millis(100), 30, || {
            calls += 1;
            (calls == 4).then_some("factory")
        })
        .await;
        assert_eq!(value, Some("factory"));
        assert_eq!(attempts, 4);
        assert_eq!(sleeper.naps.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let sleeper = RecordingSleeper::default();
        let mut calls = 0;
        let (value, attempts) = poll_until(&sleeper, Duration::from_millis(100), 5, || {
            calls += 1;
            None::<()>
        })
        .await;
        assert!(value.is_none());
        assert_eq!(attempts, 5);
        assert_eq!(calls, 5);
        assert_eq!(sleeper.naps.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn zero_attempts_still_probes_once() {
        let sleeper = RecordingSleeper::default();
        let (value, attempts) = poll_until(&sleeper, Duration::ZERO, 0, || Some(())).await;
        assert!(value.is_some());
        assert_eq!(attempts, 1);
    }
}
