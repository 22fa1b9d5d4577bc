//! Fatal errors for a run. Per-pair failures are not errors; see
//! [`crate::upload::UploadOutcome`].

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Problems with the collected configuration, detected before any client exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// One of access key ID, secret access key or endpoint URL is empty.
    #[error("Missing required credentials: {field} is empty")]
    MissingCredentials { field: &'static str },

    /// Every region was left blank.
    #[error("No bucket names provided")]
    NoBuckets,
}

/// Errors that abort a whole run.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The storage client could not be built.
    #[error("Failed to create R2 client: {message}")]
    ClientConstruction { message: String },

    /// A required local file is absent before the upload phase. `dir` is the
    /// directory that was searched.
    #[error("File {} not found in {}", .path.display(), searched_dir(.dir))]
    MissingLocalFile { path: PathBuf, dir: PathBuf },
}

fn searched_dir(dir: &Path) -> String {
    if dir == Path::new(".") {
        "current directory".to_string()
    } else {
        dir.display().to_string()
    }
}

impl RunError {
    pub fn client(err: impl std::fmt::Display) -> Self {
        RunError::ClientConstruction {
            message: err.to_string(),
        }
    }
}
