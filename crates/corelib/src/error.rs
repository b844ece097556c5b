//! Error types shared by the admin core and its collaborators.
//!
//! Collaborator traits return this same [`Error`], so the admin core hands
//! their failures back to the caller with `?` and the variant (and
//! message) survives all the way to the wire.

use thiserror::Error;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while serving an admin request.
#[derive(Debug, Error)]
pub enum Error {
    /// Alias, chain or route lookup miss
    #[error("not found: {0}")]
    NotFound(String),
    /// CPU profile start while one is already running
    #[error("cpu profile already in progress")]
    AlreadyInProgress,
    /// CPU profile stop while none is running
    #[error("cpu profile not in progress")]
    NotInProgress,
    /// Profile file could not be created or written
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Alias is already bound to something else
    #[error("alias {0} is already in use")]
    AliasInUse(String),
    /// Malformed argument (bad id, empty alias, ...)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Any other failure raised inside a collaborator
    #[error(transparent)]
    Collaborator(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap a foreign error raised by a collaborator implementation.
    pub fn collaborator(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Collaborator(err.into())
    }

    /// Stable label for the variant, used in wire error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::NotFound(_) => "not_found",
            Error::AlreadyInProgress => "already_in_progress",
            Error::NotInProgress => "not_in_progress",
            Error::Io(_) => "io",
            Error::AliasInUse(_) => "alias_in_use",
            Error::InvalidArgument(_) => "invalid_argument",
            Error::Collaborator(_) => "collaborator",
        }
    }
}
