use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Broad category of a fetch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Filesystem,
    Network,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Config => write!(f, "config error"),
            ErrorKind::Filesystem => write!(f, "filesystem error"),
            ErrorKind::Network => write!(f, "network error"),
        }
    }
}

/// Every way a fetch can fail. The `Display` text is what the user sees
/// right before the process exits.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url")]
    InvalidUrl { input: String },

    #[error("no filename was provided on destination")]
    MissingFilename { path: PathBuf },

    #[error("error checking existence of directory: {source}")]
    InspectDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to create directory: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error getting the file")]
    Client(#[source] reqwest::Error),

    #[error("Error getting the file")]
    Request(#[source] reqwest::Error),

    #[error("Error getting the file")]
    Status(reqwest::StatusCode),

    #[error("unable to create the file")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to write the file")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::InvalidUrl { .. } | FetchError::MissingFilename { .. } => ErrorKind::Config,
            FetchError::InspectDir { .. }
            | FetchError::CreateDir { .. }
            | FetchError::CreateFile { .. }
            | FetchError::WriteFile { .. } => ErrorKind::Filesystem,
            FetchError::Client(_) | FetchError::Request(_) | FetchError::Status(_) => {
                ErrorKind::Network
            }
        }
    }
}
