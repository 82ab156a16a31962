mod common;

#[cfg(test)]
mod tests {
    use super::common::{idle_data, moving_data, online, FakeApi, VIN};
    use carwatch::libs::fetcher::{BackoffConfig, FetchError, ResilientFetcher};
    use carwatch::libs::tracker::Tracker;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::Instant;
    use tokio_util::sync::CancellationToken;

    fn tracker(api: &Arc<FakeApi>, backoff: BackoffConfig) -> Tracker<FakeApi> {
        Tracker::new(ResilientFetcher::new(Arc::clone(api), backoff), online(VIN))
    }

    #[tokio::test(start_paused = true)]
    async fn test_publishes_until_receiver_is_dropped() {
        let api = Arc::new(FakeApi::new());
        for _ in 0..4 {
            api.push_data(moving_data(VIN));
        }
        let (sender, mut receiver) = mpsc::channel(8);
        let started = Instant::now();
        let handle = tokio::spawn(tracker(&api, BackoffConfig::default()).run(sender, CancellationToken::new()));

        let first = receiver.recv().await.unwrap();
        assert_eq!(first.vin, VIN);
        assert_eq!(started.elapsed(), Duration::ZERO);

        receiver.recv().await.unwrap();
        assert_eq!(started.elapsed(), Duration::from_secs(15));
        let third = receiver.recv().await.unwrap();
        assert_eq!(started.elapsed(), Duration::from_secs(30));
        assert_eq!(third.activity, "Moving");

        drop(receiver);
        assert!(handle.await.unwrap().is_ok());
        assert_eq!(api.fetches(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_on_cancel() {
        let api = Arc::new(FakeApi::new());
        api.push_data(idle_data(VIN));
        let (sender, mut receiver) = mpsc::channel(8);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(tracker(&api, BackoffConfig::default()).run(sender, cancel.clone()));

        assert_eq!(receiver.recv().await.unwrap().activity, "Idle");
        cancel.cancel();

        assert!(handle.await.unwrap().is_ok());
        assert!(receiver.recv().await.is_none());
        assert_eq!(api.fetches(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_is_returned() {
        let api = Arc::new(FakeApi::new());
        let backoff = BackoffConfig {
            randomization_factor: 0.0,
            max_elapsed_ms: Some(1_000),
            ..Default::default()
        };
        let (sender, _receiver) = mpsc::channel(8);

        let result = tracker(&api, backoff).run(sender, CancellationToken::new()).await;
        assert!(matches!(result, Err(FetchError::GaveUp { .. })));
    }
}
