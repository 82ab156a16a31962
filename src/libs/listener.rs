//! Reactions to coarse vehicle state changes.
//!
//! A [`ListenerChain`] runs an ordered list of [`Decorator`]s in front of a
//! terminal [`Listener`]. Each decorator either forwards the change to the
//! next stage or stops it there. The chain wired up by the watch command is:
//!
//! ```text
//! VinFilter ─▶ CountInvocations ─▶ GreetOnFirst ─▶ RecordWhileOnline
//!     ─▶ [IgnoreFirst] ─▶ LogAndNotify ─▶ Noop
//! ```
//!
//! Decorators keep their own counters and flags behind `&mut self`. The
//! poller wraps each chain in a mutex, so one chain never runs twice at
//! the same time.

use crate::api::VehicleApi;
use crate::db::storage::Storage;
use crate::libs::messages::Message;
use crate::libs::notify::Notifier;
use crate::libs::recorder::{RecordError, Recorder, SessionEnd};
use crate::libs::vehicle::VehicleSummary;
use crate::{msg_debug, msg_info, msg_warning};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Receives every reported state change.
pub trait Listener: Send {
    fn on_change(&mut self, vehicle: &VehicleSummary);
}

/// Whether a decorator passes a change on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Forward,
    Stop,
}

/// One stage in front of a listener.
pub trait Decorator: Send {
    fn handle(&mut self, vehicle: &VehicleSummary) -> Flow;
}

pub struct ListenerChain {
    decorators: Vec<Box<dyn Decorator>>,
    handler: Box<dyn Listener>,
}

impl Listener for ListenerChain {
    fn on_change(&mut self, vehicle: &VehicleSummary) {
        for decorator in self.decorators.iter_mut() {
            if decorator.handle(vehicle) == Flow::Stop {
                return;
            }
        }
        self.handler.on_change(vehicle);
    }
}

#[derive(Default)]
pub struct ChainBuilder {
    decorators: Vec<Box<dyn Decorator>>,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, decorator: impl Decorator + 'static) -> Self {
        self.decorators.push(Box::new(decorator));
        self
    }

    /// Adds `decorator` only when `enabled`.
    pub fn with_if(self, enabled: bool, decorator: impl Decorator + 'static) -> Self {
        if enabled {
            self.with(decorator)
        } else {
            self
        }
    }

    pub fn build(self, handler: impl Listener + 'static) -> ListenerChain {
        ListenerChain {
            decorators: self.decorators,
            handler: Box::new(handler),
        }
    }
}

/// Terminal handler that does nothing.
pub struct Noop;

impl Listener for Noop {
    fn on_change(&mut self, _vehicle: &VehicleSummary) {}
}

/// Passes only changes of one VIN, and only if monitoring is enabled for it.
pub struct VinFilter {
    vin: String,
    monitor: bool,
}

impl VinFilter {
    pub fn new(vin: &str, monitor: bool) -> Self {
        Self {
            vin: vin.to_string(),
            monitor,
        }
    }
}

impl Decorator for VinFilter {
    fn handle(&mut self, vehicle: &VehicleSummary) -> Flow {
        if !vehicle.vin.eq_ignore_ascii_case(&self.vin) {
            return Flow::Stop;
        }
        if !self.monitor {
            msg_debug!(Message::IgnoredMonitoringDisabled(vehicle.vin.clone()));
            return Flow::Stop;
        }
        Flow::Forward
    }
}

/// Counts the changes passing through.
#[derive(Default)]
pub struct CountInvocations {
    count: Arc<AtomicU64>,
}

impl CountInvocations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the counter, readable after the decorator moved into a chain.
    pub fn counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.count)
    }
}

impl Decorator for CountInvocations {
    fn handle(&mut self, vehicle: &VehicleSummary) -> Flow {
        let count = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        msg_debug!(Message::ListenerCount {
            name: vehicle.display_name.clone(),
            count,
        });
        Flow::Forward
    }
}

/// Stops the very first change, typically the state found at startup.
#[derive(Default)]
pub struct IgnoreFirst {
    seen: bool,
}

impl IgnoreFirst {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decorator for IgnoreFirst {
    fn handle(&mut self, vehicle: &VehicleSummary) -> Flow {
        if !self.seen {
            self.seen = true;
            msg_debug!(Message::IgnoredFirstChange(vehicle.vin.clone()));
            return Flow::Stop;
        }
        Flow::Forward
    }
}

/// Sends a "monitoring is ready" notification on the first change.
pub struct GreetOnFirst<N: Notifier> {
    notifier: Arc<N>,
    tasks: TaskTracker,
    greeted: bool,
}

impl<N: Notifier> GreetOnFirst<N> {
    pub fn new(notifier: Arc<N>, tasks: TaskTracker) -> Self {
        Self {
            notifier,
            tasks,
            greeted: false,
        }
    }
}

impl<N: Notifier> Decorator for GreetOnFirst<N> {
    fn handle(&mut self, vehicle: &VehicleSummary) -> Flow {
        if !self.greeted {
            self.greeted = true;
            send_notification(
                &self.notifier,
                &self.tasks,
                Message::GreetingTitle(vehicle.state_string()).to_string(),
                Message::GreetingBody(vehicle.display_name.clone()).to_string(),
            );
        }
        Flow::Forward
    }
}

/// Starts a background recording session when the vehicle comes online and
/// reports the outcome once it ends.
pub struct RecordWhileOnline<A: VehicleApi, S: Storage, N: Notifier> {
    recorder: Recorder<A, S>,
    notifier: Arc<N>,
    tasks: TaskTracker,
    cancel: CancellationToken,
}

impl<A: VehicleApi, S: Storage, N: Notifier> RecordWhileOnline<A, S, N> {
    pub fn new(recorder: Recorder<A, S>, notifier: Arc<N>, tasks: TaskTracker, cancel: CancellationToken) -> Self {
        Self {
            recorder,
            notifier,
            tasks,
            cancel,
        }
    }
}

impl<A: VehicleApi, S: Storage, N: Notifier> Decorator for RecordWhileOnline<A, S, N> {
    fn handle(&mut self, vehicle: &VehicleSummary) -> Flow {
        if !vehicle.is_online() {
            msg_debug!(Message::NotRecordingOffline(vehicle.display_name.clone()));
            return Flow::Forward;
        }
        if self.recorder.is_recording(&vehicle.vin) {
            msg_debug!(Message::AlreadyRecording(vehicle.vin.clone()));
            return Flow::Forward;
        }

        let recorder = self.recorder.clone();
        let notifier = Arc::clone(&self.notifier);
        let cancel = self.cancel.clone();
        let vehicle = vehicle.clone();
        self.tasks.spawn(async move {
            let body = match recorder.record_while_in_use(&vehicle, &cancel).await {
                Ok(SessionEnd::IdleExpired { .. }) => Message::SessionSucceeded,
                Ok(SessionEnd::Cancelled) => Message::SessionCancelled,
                Err(RecordError::AlreadyRecording { .. }) => return,
                Err(error) => Message::SessionFailed(error.to_string()),
            };
            let title = Message::DoneMonitoringTitle(vehicle.display_name.clone()).to_string();
            if let Err(error) = notifier.notify(&title, &body.to_string()).await {
                msg_warning!(Message::NotificationFailed(error.to_string()));
            }
        });
        Flow::Forward
    }
}

/// Logs the change and sends a notification about it.
pub struct LogAndNotify<N: Notifier> {
    notifier: Arc<N>,
    tasks: TaskTracker,
}

impl<N: Notifier> LogAndNotify<N> {
    pub fn new(notifier: Arc<N>, tasks: TaskTracker) -> Self {
        Self { notifier, tasks }
    }
}

impl<N: Notifier> Decorator for LogAndNotify<N> {
    fn handle(&mut self, vehicle: &VehicleSummary) -> Flow {
        let message = Message::ChangeTitle {
            name: vehicle.display_name.clone(),
            state: vehicle.state_string(),
        };
        msg_info!(message);
        send_notification(&self.notifier, &self.tasks, message.to_string(), vehicle.vin.clone());
        Flow::Forward
    }
}

fn send_notification<N: Notifier>(notifier: &Arc<N>, tasks: &TaskTracker, title: String, body: String) {
    let notifier = Arc::clone(notifier);
    tasks.spawn(async move {
        if let Err(error) = notifier.notify(&title, &body).await {
            msg_warning!(Message::NotificationFailed(error.to_string()));
        }
    });
}
