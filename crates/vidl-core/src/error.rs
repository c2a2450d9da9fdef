//! Failure taxonomy shared by every pipeline stage.

use std::path::{Path, PathBuf};

/// Coarse failure class, used by callers that only need to branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Parse,
    MissingLink,
    Filesystem,
    Interrupted,
}

/// Error returned by a single stage (search, convert, prepare, download).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Curl reported a transport error (connect, timeout, reset, ...).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },
    /// The server answered with a non-2xx status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u32 },
    /// Response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Parse(String),
    /// The convert endpoint answered without a usable `dlink`.
    #[error("no download link in conversion response")]
    MissingLink,
    #[error("{}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cancelled by user")]
    Interrupted,
}

impl Error {
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Transport { .. } | Error::Status { .. } => FailureKind::Network,
            Error::Parse(_) => FailureKind::Parse,
            Error::MissingLink => FailureKind::MissingLink,
            Error::Filesystem { .. } => FailureKind::Filesystem,
            Error::Interrupted => FailureKind::Interrupted,
        }
    }

    pub(crate) fn transport(url: &str, source: curl::Error) -> Self {
        Error::Transport {
            url: url.to_string(),
            source,
        }
    }

    pub(crate) fn fs(path: &Path, source: std::io::Error) -> Self {
        Error::Filesystem {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
