//! Authenticated encryption of store payloads.
//!
//! Blob layout: `nonce (12) || ciphertext || tag (16)`.

use super::key::KeyMaterial;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, CHACHA20_POLY1305};
use ring::rand::{SecureRandom, SystemRandom};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const NONCE_LEN: usize = ring::aead::NONCE_LEN;
pub const TAG_LEN: usize = 16;

/// Cipher-level failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    InvalidKey,
    Encrypt(&'static str),
    /// Wrong key, truncated blob or tampered ciphertext.
    Decrypt(&'static str),
}

impl Display for CryptoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKey => write!(f, "key material rejected by cipher"),
            Self::Encrypt(reason) => write!(f, "encryption failed: {reason}"),
            Self::Decrypt(reason) => write!(f, "decryption failed: {reason}"),
        }
    }
}

impl Error for CryptoError {}

/// Seals and opens whole-store payloads with one key.
pub struct RecordCipher {
    key: LessSafeKey,
    rng: SystemRandom,
}

impl RecordCipher {
    pub fn new(key: &KeyMaterial) -> Result<Self, CryptoError> {
        let unbound =
            UnboundKey::new(&CHACHA20_POLY1305, key.as_bytes()).map_err(|_| CryptoError::InvalidKey)?;
        Ok(Self {
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }

    /// Encrypts `plaintext` under a fresh random nonce.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| CryptoError::Encrypt("nonce generation failed"))?;
        let nonce = Nonce::assume_unique_for_key(nonce_bytes);

        let mut in_out = plaintext.to_vec();
        self.key
            .seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| CryptoError::Encrypt("seal failed"))?;

        let mut blob = Vec::with_capacity(NONCE_LEN + in_out.len());
        blob.extend_from_slice(&nonce_bytes);
        blob.extend(in_out);
        Ok(blob)
    }

    /// Decrypts and authenticates a blob produced by `seal`.
    pub fn open(&self, blob: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if blob.len() < NONCE_LEN + TAG_LEN {
            return Err(CryptoError::Decrypt("blob too short"));
        }

        let (nonce_bytes, sealed) = blob.split_at(NONCE_LEN);
        let nonce_array: [u8; NONCE_LEN] = nonce_bytes
            .try_into()
            .map_err(|_| CryptoError::Decrypt("invalid nonce"))?;
        let nonce = Nonce::assume_unique_for_key(nonce_array);

        let mut in_out = sealed.to_vec();
        let plaintext = self
            .key
            .open_in_place(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| CryptoError::Decrypt("authentication failed"))?;
        Ok(plaintext.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::{CryptoError, RecordCipher, NONCE_LEN, TAG_LEN};
    use crate::crypto::KeyMaterial;

    fn cipher() -> RecordCipher {
        RecordCipher::new(&KeyMaterial::generate().unwrap()).unwrap()
    }

    #[test]
    fn sealed_blob_carries_nonce_and_tag() {
        let cipher = cipher();
        let blob = cipher.seal(b"start_date,end_date,flow,symptoms\n").unwrap();
        assert_eq!(blob.len(), NONCE_LEN + 34 + TAG_LEN);
        assert_eq!(
            cipher.open(&blob).unwrap(),
            b"start_date,end_date,flow,symptoms\n".to_vec()
        );
    }

    #[test]
    fn nonces_differ_between_seals() {
        let cipher = cipher();
        let first = cipher.seal(b"same").unwrap();
        let second = cipher.seal(b"same").unwrap();
        assert_ne!(first[..NONCE_LEN], second[..NONCE_LEN]);
    }

    #[test]
    fn open_rejects_wrong_key_short_and_tampered_blobs() {
        let owner = cipher();
        let stranger = cipher();
        let mut blob = owner.seal(b"payload").unwrap();

        assert!(matches!(stranger.open(&blob), Err(CryptoError::Decrypt(_))));
        assert!(matches!(
            owner.open(&blob[..NONCE_LEN + TAG_LEN - 1]),
            Err(CryptoError::Decrypt("blob too short"))
        ));

        let last = blob.len() - 1;
        blob[last] ^= 0x01;
        assert!(matches!(owner.open(&blob), Err(CryptoError::Decrypt(_))));
    }
}
