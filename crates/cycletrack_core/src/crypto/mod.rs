//! Symmetric key material and at-rest encryption for the record blob.
//!
//! # Responsibility
//! - Generate, persist and load the single tracker key.
//! - Seal/open whole-store payloads with an authenticated cipher.
//!
//! # Invariants
//! - Key bytes are never logged or printed through `Debug`.
//! - Opening a foreign or damaged blob returns an error, never panics.

mod cipher;
mod key;

pub use cipher::{CryptoError, RecordCipher, NONCE_LEN, TAG_LEN};
pub use key::{KeyError, KeyMaterial, KEY_LEN};
