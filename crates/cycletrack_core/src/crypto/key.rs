//! Key-file bootstrap.
//!
//! # Responsibility
//! - Generate a fresh 32-byte key from the OS CSPRNG.
//! - Load an existing key file or create one when absent.
//!
//! # Invariants
//! - A key file of the wrong length is rejected, never truncated or padded.
//! - A newly written key file is only visible once fully written.

use crate::store::atomic::write_atomically;
use log::{error, info};
use ring::rand::{SecureRandom, SystemRandom};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

/// Key length in bytes (ChaCha20-Poly1305).
pub const KEY_LEN: usize = 32;

/// Error raised while obtaining key material.
#[derive(Debug)]
pub enum KeyError {
    /// Reading or writing the key file failed.
    Io { path: PathBuf, source: io::Error },
    /// Key file exists but does not hold exactly `KEY_LEN` bytes.
    InvalidLength { expected: usize, actual: usize },
    /// The system random source failed.
    Generation,
}

impl Display for KeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "key file `{}` I/O failed: {source}", path.display())
            }
            Self::InvalidLength { expected, actual } => write!(
                f,
                "key file must contain {expected} bytes, found {actual}"
            ),
            Self::Generation => write!(f, "system random source failed to generate a key"),
        }
    }
}

impl Error for KeyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::InvalidLength { .. } | Self::Generation => None,
        }
    }
}

/// The tracker's symmetric key.
///
/// Owned by the caller and handed to `RecordStore::open`; there is no
/// process-wide key.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    bytes: [u8; KEY_LEN],
}

impl Debug for KeyMaterial {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("KeyMaterial([redacted])")
    }
}

impl KeyMaterial {
    /// Wraps raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Generates a fresh key from the system CSPRNG.
    pub fn generate() -> Result<Self, KeyError> {
        let rng = SystemRandom::new();
        let mut bytes = [0u8; KEY_LEN];
        rng.fill(&mut bytes).map_err(|_| KeyError::Generation)?;
        Ok(Self { bytes })
    }

    /// Reads a key file written by `load_or_generate`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, KeyError> {
        let path = path.as_ref();
        let raw = std::fs::read(path).map_err(|source| KeyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let bytes: [u8; KEY_LEN] =
            raw.as_slice()
                .try_into()
                .map_err(|_| KeyError::InvalidLength {
                    expected: KEY_LEN,
                    actual: raw.len(),
                })?;
        Ok(Self { bytes })
    }

    /// Loads the key at `path`, generating and persisting one if the file
    /// does not exist yet.
    ///
    /// # Side effects
    /// - May create parent directories and the key file.
    /// - Emits `key_load` logging events (never key bytes).
    pub fn load_or_generate(path: impl AsRef<Path>) -> Result<Self, KeyError> {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(key) => {
                info!("event=key_load module=crypto status=ok source=file");
                Ok(key)
            }
            Err(KeyError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                let key = Self::generate()?;
                key.persist(path)?;
                info!("event=key_load module=crypto status=ok source=generated");
                Ok(key)
            }
            Err(err) => {
                error!(
                    "event=key_load module=crypto status=error error_code=key_unreadable error={}",
                    err
                );
                Err(err)
            }
        }
    }

    /// Writes the key bytes to `path`, owner-readable only on unix.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<(), KeyError> {
        let path = path.as_ref();
        let io_err = |source| KeyError::Io {
            path: path.to_path_buf(),
            source,
        };
        write_atomically(path, &self.bytes).map_err(io_err)?;
        restrict_permissions(path).map_err(io_err)?;
        Ok(())
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}
