#[derive(Debug, Clone)]
pub enum Message {
    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigModuleServer,
    ConfigModuleUpdate,
    ConfigChangedKeys(Vec<&'static str>),
    ConfigReloadRequired(Vec<&'static str>),
    ConfigReloadDeclined,
    ConfigChangeAppliedLive,

    // === WATCH MESSAGES ===
    WatchStarted(u64), // poll interval in seconds
    WatchStopped,
    WatchReceivedCtrlC,

    // === UPDATE MESSAGES ===
    UpdateManagedExternally(String), // explicit server path
    NoUpdateRequired,
    UpdateAlreadyInFlight,
    UpdateDeclined,
    UpdateFailed {
        channel: String,
        repository: String,
        error: String,
    },
    NightlyUpToDate(String),             // release date
    ReinstallingStable(String),          // repository
    FetchingReleaseInfo(String, String), // repository, tag
    DownloadingArtifact(String),         // file name
    DownloadProgress(u64, u64),          // received, total bytes
    DownloadCompleted(String),           // path
    InstallingArtifact(String),          // path
    InstalledRelease {
        tag: String,
        date: String,
    },
    ArtifactRemoved(String), // path
    RestartingProcess,

    // === STATUS MESSAGES ===
    StatusHeader,
    ServerNotInstalled,

    // === PROMPT MESSAGES ===
    PromptSelectModules,
    PromptServerPath,
    PromptServerFeatures,
    PromptStaticHighlighting,
    PromptInlayHints,
    PromptUpdateChannel,
    PromptRepoOwner,
    PromptRepoName,
    ConfirmSwitchToStable,
    ConfirmSwitchToNightly,
    ConfirmNightlyUpdate(String), // persisted release date

    // === ERROR MESSAGES ===
    InvalidReleaseTag(String),
    RestartFailed(String),
}
