use core_config::ConfigError;
use std::time::Duration;
use thiserror::Error;

/// Server error code for `replSetInitiate` on an initiated set
pub const ALREADY_INITIALIZED: i32 = 23;

/// Server error code for `replSetGetStatus` before initiation
pub const NOT_YET_INITIALIZED: i32 = 94;

/// Server error code for `createUser` with a taken (username, database)
pub const USER_ALREADY_EXISTS: i32 = 51003;

/// What an administrative command failure means for an idempotent re-run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminErrorKind {
    AlreadyInitialized,
    NotYetInitialized,
    UserAlreadyExists,
    Other,
}

impl AdminErrorKind {
    /// Classify by server error code, falling back to the message for servers
    /// that report these conditions under a different code.
    pub fn classify(code: Option<i32>, message: &str) -> Self {
        match code {
            Some(ALREADY_INITIALIZED) => return Self::AlreadyInitialized,
            Some(NOT_YET_INITIALIZED) => return Self::NotYetInitialized,
            Some(USER_ALREADY_EXISTS) => return Self::UserAlreadyExists,
            _ => {}
        }

        let message = message.to_ascii_lowercase();
        if message.contains("already initialized") {
            Self::AlreadyInitialized
        } else if message.contains("no replset config") || message.contains("not yet initialized") {
            Self::NotYetInitialized
        } else if message.contains("user") && message.contains("already exists") {
            Self::UserAlreadyExists
        } else {
            Self::Other
        }
    }
}

/// A failed administrative command
#[derive(Debug, Clone, Error)]
#[error("{command} failed: {message}")]
pub struct AdminError {
    pub command: &'static str,
    pub kind: AdminErrorKind,
    pub code: Option<i32>,
    pub message: String,
}

impl AdminError {
    pub fn new(command: &'static str, code: Option<i32>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            command,
            kind: AdminErrorKind::classify(code, &message),
            code,
            message,
        }
    }

    pub fn is(&self, kind: AdminErrorKind) -> bool {
        self.kind == kind
    }
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Admin(#[from] AdminError),

    #[error("Replica set not ready after {attempts} attempts ({waited:?})")]
    ReadinessTimeout { attempts: u32, waited: Duration },

    #[error("{0} must be set explicitly")]
    MissingCredential(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type BootstrapResult<T> = Result<T, BootstrapError>;
