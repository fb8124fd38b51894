//! Catalogue seed file loading.

use std::path::{Path, PathBuf};

use enrollment_backend::domain::CourseSeed;

/// Errors raised while reading a seed file.
#[derive(Debug, thiserror::Error)]
pub enum SeedFileError {
    /// The file could not be read.
    #[error("failed to read catalogue seed at {path}: {source}")]
    Read {
        /// Seed file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not a JSON array of course entries.
    #[error("invalid catalogue seed at {path}: {source}")]
    Parse {
        /// Seed file path.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Read course entries from a JSON seed file.
pub fn load_catalogue_seed(path: &Path) -> Result<Vec<CourseSeed>, SeedFileError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SeedFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| SeedFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
