use thiserror::Error;

use crate::messages;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid API URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("unsupported URL scheme {0:?} (expected http or https)")]
    UnsupportedScheme(String),

    #[error("API URL {0:?} has no host")]
    MissingHost(String),
}

/// Local rejection of a file before anything is sent.
///
/// `Display` is the message shown to the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("{}", messages::NO_FILE_SELECTED)]
    NoFileSelected,

    #[error("{}", messages::FILE_TOO_LARGE)]
    TooLarge { size: u64 },

    #[error("{}", messages::UNSUPPORTED_EXTENSION)]
    UnsupportedExtension(String),

    #[error("Não foi possível ler o arquivo: {0}")]
    Unreadable(String),
}
