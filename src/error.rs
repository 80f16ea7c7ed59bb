use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The token file could not be opened or read.
///
/// Covers a missing file, denied permissions, an I/O failure mid-read and
/// content that is not valid UTF-8. There is no fallback credential, so this
/// is always handed back to the caller.
#[derive(Error, Debug)]
#[error("failed to read token file '{}': {source}", path.display())]
pub struct CredentialReadError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl CredentialReadError {
    pub fn new(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self { path: path.into(), source }
    }

    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }
}

/// Errors from building an `Authorization` header
#[derive(Error, Debug)]
pub enum AuthError {
    #[error(transparent)]
    Read(#[from] CredentialReadError),

    /// Token contains bytes that are not allowed in a header value
    #[error("token is not a valid header value: {0}")]
    InvalidHeader(#[from] http::header::InvalidHeaderValue),
}
