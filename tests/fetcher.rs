mod common;

#[cfg(test)]
mod tests {
    use super::common::{idle_data, online, FakeApi, VIN};
    use carwatch::libs::fetcher::{BackoffConfig, ExponentialBackoff, FetchError, ResilientFetcher};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::Instant;
    use tokio_util::sync::CancellationToken;

    fn deterministic(max_interval_ms: u64, max_elapsed_ms: Option<u64>) -> BackoffConfig {
        BackoffConfig {
            initial_interval_ms: 500,
            multiplier: 2.0,
            randomization_factor: 0.0,
            max_interval_ms,
            max_elapsed_ms,
        }
    }

    #[test]
    fn test_backoff_defaults() {
        let config = BackoffConfig::default();
        assert_eq!(config.initial_interval_ms, 500);
        assert_eq!(config.multiplier, 2.0);
        assert_eq!(config.max_interval_ms, 120_000);
        assert_eq!(config.max_elapsed_ms, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_grows_and_caps() {
        let mut backoff = ExponentialBackoff::new(&deterministic(3_000, None));
        let delays: Vec<u128> = (0..6).map(|_| backoff.next_backoff().unwrap().as_millis()).collect();
        assert_eq!(delays, vec![500, 1_000, 2_000, 3_000, 3_000, 3_000]);

        backoff.reset();
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(500)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_randomized_delays_stay_in_bounds() {
        for _ in 0..50 {
            let mut backoff = ExponentialBackoff::new(&BackoffConfig::default());
            let first = backoff.next_backoff().unwrap().as_millis();
            let second = backoff.next_backoff().unwrap().as_millis();
            let third = backoff.next_backoff().unwrap().as_millis();
            assert!((400..=600).contains(&first), "first delay {}", first);
            assert!((800..=1_200).contains(&second), "second delay {}", second);
            assert!((1_600..=2_400).contains(&third), "third delay {}", third);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_failures_then_success() {
        let api = Arc::new(FakeApi::new());
        api.push_failure("timeout");
        api.push_failure("bad gateway");
        api.push_data(idle_data(VIN));
        let fetcher = ResilientFetcher::new(Arc::clone(&api), BackoffConfig::default());

        let mut notifications = Vec::new();
        let data = fetcher
            .fetch_notify(&online(VIN), &CancellationToken::new(), |error, delay| {
                notifications.push((error.to_string(), delay));
            })
            .await
            .unwrap();

        assert_eq!(data.vin, VIN);
        assert_eq!(api.fetches(), 3);
        assert_eq!(notifications.len(), 2);
        assert!(notifications[0].0.contains("timeout"));
        assert!(notifications[1].0.contains("bad gateway"));
        assert!(notifications[0].1 < notifications[1].1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_fetch_retries_twice_then_succeeds() {
        let api = Arc::new(FakeApi::new());
        api.push_failure("timeout");
        api.push_failure("bad gateway");
        api.push_data(idle_data(VIN));
        let fetcher = ResilientFetcher::new(Arc::clone(&api), deterministic(120_000, None));
        let started = Instant::now();

        let data = fetcher.fetch(&online(VIN), &CancellationToken::new()).await.unwrap();
        assert_eq!(data.vin, VIN);
        assert_eq!(api.fetches(), 3);
        // Exactly two retry sleeps: 500ms, then 1s.
        assert_eq!(started.elapsed(), Duration::from_millis(1_500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_multiplier_saturates_at_max_interval() {
        let config = BackoffConfig {
            multiplier: 1e300,
            randomization_factor: 0.0,
            ..Default::default()
        };
        let mut backoff = ExponentialBackoff::new(&config);
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(500)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(120_000)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(120_000)));

        let wild = BackoffConfig {
            multiplier: f64::INFINITY,
            randomization_factor: f64::NAN,
            ..Default::default()
        };
        let mut backoff = ExponentialBackoff::new(&wild);
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(500)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(120_000)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_multiplier_does_not_break_retries() {
        let api = Arc::new(FakeApi::new());
        api.push_failure("timeout");
        api.push_failure("timeout");
        api.push_data(idle_data(VIN));
        let config = BackoffConfig {
            multiplier: 1e300,
            randomization_factor: 0.0,
            ..Default::default()
        };
        let fetcher = ResilientFetcher::new(Arc::clone(&api), config);
        let started = Instant::now();

        let data = fetcher.fetch(&online(VIN), &CancellationToken::new()).await.unwrap();
        assert_eq!(data.vin, VIN);
        assert_eq!(started.elapsed(), Duration::from_millis(120_500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_backoff_sleep() {
        let api = Arc::new(FakeApi::new());
        let fetcher = ResilientFetcher::new(Arc::clone(&api), deterministic(120_000, None));
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let result = fetcher.fetch(&online(VIN), &cancel).await;
        assert!(matches!(result, Err(FetchError::Cancelled { .. })));
        assert_eq!(api.fetches(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_elapsed() {
        let api = Arc::new(FakeApi::new());
        let fetcher = ResilientFetcher::new(Arc::clone(&api), deterministic(120_000, Some(1_000)));

        let result = fetcher.fetch(&online(VIN), &CancellationToken::new()).await;
        match result {
            Err(FetchError::GaveUp { vin, attempts, .. }) => {
                assert_eq!(vin, VIN);
                assert_eq!(attempts, 3);
            }
            other => panic!("expected GaveUp, got {:?}", other.map(|data| data.vin)),
        }
    }
}
