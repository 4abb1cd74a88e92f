//! File locations for tracker state.
//!
//! # Invariants
//! - The data file and key file live side by side in one directory unless a
//!   caller overrides them explicitly.

use std::path::{Path, PathBuf};

/// Default name of the encrypted record blob.
pub const DATA_FILE_NAME: &str = "period_data.csv";
/// Default name of the raw key file.
pub const KEY_FILE_NAME: &str = "secret.key";
/// Default log sub-directory under the data directory.
pub const LOG_DIR_NAME: &str = "logs";

/// Where the encrypted data and its key are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub data_file: PathBuf,
    pub key_file: PathBuf,
}

impl StorePaths {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            data_file: dir.join(DATA_FILE_NAME),
            key_file: dir.join(KEY_FILE_NAME),
        }
    }

    /// Default log directory next to the data file.
    pub fn log_dir(&self) -> PathBuf {
        self.data_file
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(LOG_DIR_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::StorePaths;
    use std::path::Path;

    #[test]
    fn in_dir_places_files_side_by_side() {
        let paths = StorePaths::in_dir("/var/lib/cycletrack");
        assert_eq!(paths.data_file, Path::new("/var/lib/cycletrack/period_data.csv"));
        assert_eq!(paths.key_file, Path::new("/var/lib/cycletrack/secret.key"));
        assert_eq!(paths.log_dir(), Path::new("/var/lib/cycletrack/logs"));
    }
}
