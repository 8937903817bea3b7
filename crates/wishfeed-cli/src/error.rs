use std::io;

use thiserror::Error;
use wishfeed_core::config::ConfigError;
use wishfeed_core::sync::PollFailure;
use wishfeed_core::SubmitError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] wishfeed_core::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error("Could not load wishes: {0}")]
    Poll(#[from] PollFailure),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Wish was not accepted: {0}")]
    Rejected(String),
}
