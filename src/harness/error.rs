/// Anything that stops a check (or the whole run) from producing an outcome
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("Could not open main website. Please allow popups.")]
    PopupBlocked,

    #[error("test window was closed")]
    WindowClosed,

    #[error("could not access website: {0}")]
    Inaccessible(String),

    #[error("pattern evaluation failed: {0}")]
    Pattern(String),

    #[error("script error: {0}")]
    Js(String),

    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("could not read snapshot: {0}")]
    Io(#[from] std::io::Error),
}

impl From<fancy_regex::Error> for HarnessError {
    fn from(e: fancy_regex::Error) -> Self {
        HarnessError::Pattern(e.to_string())
    }
}
