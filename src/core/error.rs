use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Storage init failed at '{}': {reason}", path.display())]
    StorageInit { path: PathBuf, reason: String },

    #[error("Backend is not open")]
    NotOpen,

    #[error("Backend already open at '{}', refusing '{}'", open.display(), requested.display())]
    AlreadyOpen { open: PathBuf, requested: PathBuf },

    #[error("Method '{0}' not found")]
    MethodNotFound(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Lock error: {0}")]
    Lock(String),
}

pub type Result<T> = std::result::Result<T, BridgeError>;

impl BridgeError {
    /// Short machine-usable identifier for the failure class.
    pub fn code(&self) -> &'static str {
        match self {
            Self::StorageInit { .. } => "storage_init",
            Self::NotOpen => "not_open",
            Self::AlreadyOpen { .. } => "already_open",
            Self::MethodNotFound(_) => "method_not_found",
            Self::Backend(_) => "backend",
            Self::Lock(_) => "lock",
        }
    }

    /// Whether this failure is allowed to abort host startup.
    ///
    /// Everything else must be caught at the dispatch boundary and turned
    /// into a structured error result.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::StorageInit { .. })
    }
}

impl<T> From<std::sync::PoisonError<T>> for BridgeError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::Lock(err.to_string())
    }
}
