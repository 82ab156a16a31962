/// Every user-facing and log message emitted by carwatch.
///
/// Text lives in the `Display` implementation (see `display.rs`); call sites
/// only pick a variant and supply its parameters.
#[derive(Debug, Clone)]
pub enum Message {
    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigLoaded(String), // path
    ConfigMissingApi,
    ConfigNoVehicles,
    ConfigNoMonitoredVehicles,
    ConfigZeroInterval(String), // setting name
    ConfigInvalidBackoff(String),
    ConfigModuleApi,
    ConfigModuleVehicles,
    ConfigModuleStorage,
    ConfigModulePushover,
    ConfigModuleTimings,

    // === PROMPTS ===
    PromptSelectModules,
    PromptApiUrl,
    PromptAccessToken,
    PromptVin,
    PromptMonitorVehicle,
    PromptAddAnotherVehicle,
    PromptStorageBackend,
    PromptSqlitePath,
    PromptInfluxAddress,
    PromptInfluxUsername,
    PromptInfluxPassword,
    PromptInfluxDatabase,
    PromptPushoverToken,
    PromptPushoverUser,
    PromptIdleTimeBeforeSleep,
    PromptIdleSamplingFrequency,
    PromptPollInterval,

    // === VEHICLE API MESSAGES ===
    VehicleFound(String), // vin
    VehicleNotFound(String),
    NoVehiclesFound,
    VehiclesHeader,

    // === FETCHER MESSAGES ===
    FetchRetrying {
        vin: String,
        delay_ms: u128,
        error: String,
    },
    FetchCancelled(String), // vin
    FetchGaveUp {
        vin: String,
        attempts: u32,
    },

    // === ACTIVITY MESSAGES ===
    VehicleActivity {
        vin: String,
        activity: String,
        interval_secs: u64,
    },

    // === RECORDER MESSAGES ===
    RecordingStarted(String), // vin
    RecordingEndsIn {
        vin: String,
        remaining: u64,
    },
    RecordingDone(String),
    RecordingCancelled(String),
    RecordingStopped {
        vin: String,
        error: String,
    },
    RecorderNotReentrant(String),
    SnapshotSaved {
        vin: String,
        timestamp: i64,
    },

    // === POLLER MESSAGES ===
    PollingVehicles,
    PollFailed(String), // error
    VehicleStatusFound {
        vin: String,
        state: String,
    },
    NothingToReport(String), // vin
    VehicleStateChanged {
        name: String,
        state: String,
    },
    MissingVehicleState(String), // vin
    ListenerPanicked(String),
    PollerSleeping(u64), // seconds
    PollerStopped,

    // === LISTENER MESSAGES ===
    ListenerCount {
        name: String,
        count: u64,
    },
    IgnoredMonitoringDisabled(String), // vin
    IgnoredFirstChange(String),        // vin
    NotRecordingOffline(String),       // display name
    AlreadyRecording(String),          // vin
    GreetingTitle(String),             // state
    GreetingBody(String),              // display name
    ChangeTitle {
        name: String,
        state: String,
    },
    DoneMonitoringTitle(String), // display name
    SessionSucceeded,
    SessionFailed(String),
    SessionCancelled,
    NotificationFailed(String),
    NotificationLogged {
        title: String,
        body: String,
    },

    // === TRACKER MESSAGES ===
    RefreshDriving(u64),
    RefreshCharging(u64),
    RefreshChargeComplete,
    RefreshParked(u64),
    TrackerStarted(String), // vin
    TrackerStopped(String),
    TrackerConsumerGone(String),

    // === STORAGE MESSAGES ===
    StorageOpened(String), // description
    InfluxWriteSucceeded,
    NoSnapshotsStored,
    SnapshotHeader(String), // vin
    SnapshotStoreFailed(String),

    // === WATCHER MESSAGES ===
    WatcherStarting(usize), // vehicle count
    WatcherReceivedSigterm,
    WatcherReceivedSigint,
    WatcherReceivedCtrlC,
    WatcherCtrlCListenFailed(String),
    WatcherSignalHandlingNotSupported,
    FailedToCreateSigtermHandler,
    FailedToCreateSigintHandler,
    MonitorExitedNormally,
    MonitorShuttingDown,
    MonitorTaskPanicked(String),
}
