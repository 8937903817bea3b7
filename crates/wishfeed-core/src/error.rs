//! Error types for wishfeed-core

use thiserror::Error;

use crate::config::ConfigError;
use crate::remote::HttpError;
use crate::submission::SubmitError;
use crate::sync::PollFailure;

/// Result type alias using wishfeed-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in wishfeed-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// HTTP client construction error
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Submission was refused locally
    #[error(transparent)]
    Submit(#[from] SubmitError),

    /// Background refresh failed
    #[error(transparent)]
    Poll(#[from] PollFailure),
}
