//! Encrypted record persistence.
//!
//! # Responsibility
//! - Own the ordered in-memory record sequence.
//! - Load/decrypt and encrypt/save the whole sequence as one blob.
//!
//! # Invariants
//! - Records are sorted ascending by `start_date` (stable on ties) after
//!   every mutation.
//! - In-memory state only changes after the matching blob hit the disk.
//! - Decrypt/parse failures are surfaced, never masked as an empty store.

pub(crate) mod atomic;
pub mod codec;
mod record_store;

use crate::crypto::CryptoError;
use crate::model::period::RecordValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

pub use record_store::RecordStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for record store load/mutate/save operations.
#[derive(Debug)]
pub enum StoreError {
    /// Rejected input on add; the store is unchanged.
    InvalidRecord(RecordValidationError),
    /// Blob could not be decrypted (wrong key or corrupted file).
    Decryption(CryptoError),
    /// Payload could not be encrypted; nothing was written.
    Encryption(CryptoError),
    /// Decrypted payload is not a valid record table.
    CorruptPayload(String),
    /// Reading or writing the data file failed.
    Persistence { path: PathBuf, source: io::Error },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRecord(err) => write!(f, "{err}"),
            Self::Decryption(err) => write!(
                f,
                "{err}; the data file was left untouched (wrong key or corrupted file)"
            ),
            Self::Encryption(err) => write!(f, "{err}"),
            Self::CorruptPayload(message) => write!(f, "corrupt record payload: {message}"),
            Self::Persistence { path, source } => {
                write!(f, "data file `{}` I/O failed: {source}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidRecord(err) => Some(err),
            Self::Decryption(err) | Self::Encryption(err) => Some(err),
            Self::CorruptPayload(_) => None,
            Self::Persistence { source, .. } => Some(source),
        }
    }
}

impl From<RecordValidationError> for StoreError {
    fn from(value: RecordValidationError) -> Self {
        Self::InvalidRecord(value)
    }
}

impl StoreError {
    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRecord(_) => "invalid_record",
            Self::Decryption(_) => "decrypt_failed",
            Self::Encryption(_) => "encrypt_failed",
            Self::CorruptPayload(_) => "corrupt_payload",
            Self::Persistence { .. } => "io_failed",
        }
    }
}
