use quota::{RecordError, SelectionError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid {key} value: {reason}")]
    Config { key: String, reason: String },

    #[error("Unknown package: {0}")]
    UnknownPackage(String),

    #[error("Invalid quota list: {0}")]
    QuotaList(String),

    #[error("Raffle record has no id")]
    MissingRaffleId,

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("Could not read raffle file: {0}")]
    Io(#[from] std::io::Error),
}
