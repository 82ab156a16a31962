use crate::api::VehicleApi;
use crate::libs::activity::{classify, DEFAULT_IDLE_SAMPLING_FREQUENCY};
use crate::libs::fetcher::{FetchError, ResilientFetcher};
use crate::libs::messages::Message;
use crate::libs::rate_limiter::RateLimiter;
use crate::libs::snapshot::Snapshot;
use crate::libs::vehicle::VehicleSummary;
use crate::{msg_info, msg_warning};
use chrono::Utc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Publishes a snapshot of one vehicle at the rate chosen by [`RateLimiter`].
pub struct Tracker<A: VehicleApi> {
    fetcher: ResilientFetcher<A>,
    vehicle: VehicleSummary,
    limiter: RateLimiter,
}

impl<A: VehicleApi> Tracker<A> {
    pub fn new(fetcher: ResilientFetcher<A>, vehicle: VehicleSummary) -> Self {
        Self {
            fetcher,
            vehicle,
            limiter: RateLimiter::new(),
        }
    }

    /// Runs until `cancel` fires or the receiving side of `sender` is dropped.
    pub async fn run(mut self, sender: mpsc::Sender<Snapshot>, cancel: CancellationToken) -> Result<(), FetchError> {
        msg_info!(Message::TrackerStarted(self.vehicle.vin.clone()));

        loop {
            let data = match self.fetcher.fetch(&self.vehicle, &cancel).await {
                Ok(data) => data,
                Err(FetchError::Cancelled { .. }) => break,
                Err(error) => return Err(error),
            };
            let classification = classify(&data, DEFAULT_IDLE_SAMPLING_FREQUENCY);
            let snapshot = Snapshot::new(&data, &classification, Utc::now());

            if sender.send(snapshot.clone()).await.is_err() {
                msg_warning!(Message::TrackerConsumerGone(self.vehicle.vin.clone()));
                break;
            }
            if !self.limiter.rate_limit(&snapshot, &cancel).await {
                break;
            }
        }

        msg_info!(Message::TrackerStopped(self.vehicle.vin.clone()));
        Ok(())
    }
}
