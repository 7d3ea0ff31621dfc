//! Scoped temporary file allocation
//!
//! The report creator never chooses its own output location; it asks the
//! injected provider for one. Providers must leave the allocated file on
//! disk - ownership of the written artifact transfers to the filesystem and
//! the subsystem never deletes it.

use gantry_errors::{Error, ReportError};
use std::path::{Path, PathBuf};

/// Facility allocating uniquely named output files
pub trait TempFileProvider: Send + Sync {
    /// Allocate a uniquely named file with the given prefix and suffix.
    ///
    /// The file exists (empty) when this returns and persists after the
    /// handle used to create it is gone.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing location cannot be created or the
    /// file cannot be allocated.
    fn create_file(&self, prefix: &str, suffix: &str) -> Result<PathBuf, Error>;
}

/// Disk-backed provider rooted at a scoped directory
#[derive(Debug, Clone)]
pub struct DiskTempFiles {
    root: PathBuf,
}

impl DiskTempFiles {
    /// Provider rooted at `root`. The directory is created on demand.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Provider rooted at the system temporary directory.
    #[must_use]
    pub fn system() -> Self {
        Self::new(std::env::temp_dir())
    }

    /// The directory files are allocated under.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TempFileProvider for DiskTempFiles {
    fn create_file(&self, prefix: &str, suffix: &str) -> Result<PathBuf, Error> {
        std::fs::create_dir_all(&self.root).map_err(|error| ReportError::DirectoryCreate {
            path: self.root.display().to_string(),
            message: error.to_string(),
        })?;
        let file = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile_in(&self.root)
            .map_err(|error| ReportError::TempFile {
                message: error.to_string(),
            })?;
        // Detach the file from its guard so it survives on disk.
        let (_, path) = file.keep().map_err(|error| ReportError::TempFile {
            message: error.to_string(),
        })?;
        Ok(path)
    }
}
