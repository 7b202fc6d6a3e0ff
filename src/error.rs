use thiserror::Error;

/// Unified error type for git-autotag operations
#[derive(Error, Debug)]
pub enum AutotagError {
    #[error("{0}")]
    Config(String),

    #[error("Tag repository request failed: {0}")]
    Upstream(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("{0}")]
    Parse(String),

    #[error("{0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse failure category, one per stage of the error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Upstream,
    Parse,
    NotFound,
    Io,
}

/// Convenience type alias for Results in git-autotag
pub type Result<T> = std::result::Result<T, AutotagError>;

impl AutotagError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        AutotagError::Config(msg.into())
    }

    /// Create an upstream (tag repository) error with context
    pub fn upstream(msg: impl Into<String>) -> Self {
        AutotagError::Upstream(msg.into())
    }

    /// Create a version parsing error with context
    pub fn parse(msg: impl Into<String>) -> Self {
        AutotagError::Parse(msg.into())
    }

    /// Create a not-found error with context
    pub fn not_found(msg: impl Into<String>) -> Self {
        AutotagError::NotFound(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AutotagError::Config(_) => ErrorKind::Config,
            AutotagError::Upstream(_) | AutotagError::Http(_) | AutotagError::Git(_) => {
                ErrorKind::Upstream
            }
            AutotagError::Parse(_) => ErrorKind::Parse,
            AutotagError::NotFound(_) => ErrorKind::NotFound,
            AutotagError::Io(_) => ErrorKind::Io,
        }
    }
}
