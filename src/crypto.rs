//! Symmetric encryption of opaque payloads under the process-wide key.
//!
//! Credentials are encrypted before they are written to the session store so
//! that the store never holds a usable access token in the clear.
//!
//! # Format
//!
//! ```text
//! ciphertext = IV (16 bytes) || AES-256-CFB(key, IV, plaintext)
//! ```
//!
//! * The key is the SHA-256 digest of the configured secret, so operators may
//!   use any string as the secret.
//! * A fresh random IV is drawn for every call to [`encrypt`]. Reusing an IV
//!   under the same key would break confidentiality of the stream.
//! * No authentication tag is computed. A tampered ciphertext decrypts to
//!   garbage instead of being rejected; [`open`] catches this when the
//!   garbage is not the JSON it expected.
//!
//! # Randomness
//!
//! IVs come from the thread-local RNG, which is seeded by the operating
//! system. If the OS cannot provide randomness the RNG panics, and there is
//! no safe way to continue encrypting, so that panic is not caught.

use std::fmt;

use aes::{
    Aes256,
    cipher::{AsyncStreamCipher, KeyIvInit},
};
use rand::RngCore;
use serde::{Serialize, de::DeserializeOwned};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Cipher block size in bytes, which is also the IV length.
pub const BLOCK_SIZE: usize = 16;

/// Length of the derived key in bytes.
pub const KEY_LENGTH: usize = 32;

type Aes256CfbEnc = cfb_mode::Encryptor<Aes256>;
type Aes256CfbDec = cfb_mode::Decryptor<Aes256>;

#[derive(Debug, Error)]
pub enum CryptoError {
    /// The input is too short to contain an IV.
    #[error("ciphertext too short: {len} bytes, need at least {BLOCK_SIZE}")]
    MalformedCiphertext { len: usize },

    /// The plaintext did not decode into the expected value. This happens for
    /// tampered data and for data encrypted under another key.
    #[error("decrypted payload is unintelligible: {0}")]
    Unintelligible(serde_json::Error),

    #[error("cannot serialize payload: {0}")]
    Serialize(serde_json::Error),
}

/// Process-wide symmetric key.
///
/// Derived once at startup and read-only afterwards. The `Debug` output never
/// shows key material.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptionKey([u8; KEY_LENGTH]);

impl EncryptionKey {
    /// Reduces an arbitrary-length secret to a fixed-size key.
    pub fn derive(secret: &str) -> Self {
        let digest = Sha256::digest(secret.as_bytes());
        let mut key = [0u8; KEY_LENGTH];
        key.copy_from_slice(&digest);
        Self(key)
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(<redacted>)")
    }
}

/// Encrypts `plaintext` and returns `IV || ciphertext`.
pub fn encrypt(key: &EncryptionKey, plaintext: &[u8]) -> Vec<u8> {
    let mut iv = [0u8; BLOCK_SIZE];
    rand::rng().fill_bytes(&mut iv);

    let mut output = Vec::with_capacity(BLOCK_SIZE + plaintext.len());
    output.extend_from_slice(&iv);
    output.extend_from_slice(plaintext);

    Aes256CfbEnc::new(&key.0.into(), &iv.into()).encrypt(&mut output[BLOCK_SIZE..]);
    output
}

/// Splits off the IV and inverts the stream.
///
/// # Errors
///
/// Returns [`CryptoError::MalformedCiphertext`] when `ciphertext` is shorter
/// than one block. Any longer input decrypts, although the result is
/// meaningless if the data was corrupted or encrypted under another key.
pub fn decrypt(key: &EncryptionKey, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if ciphertext.len() < BLOCK_SIZE {
        return Err(CryptoError::MalformedCiphertext {
            len: ciphertext.len(),
        });
    }

    let (iv, body) = ciphertext.split_at(BLOCK_SIZE);
    let iv: [u8; BLOCK_SIZE] = iv
        .try_into()
        .map_err(|_| CryptoError::MalformedCiphertext {
            len: ciphertext.len(),
        })?;

    let mut plaintext = body.to_vec();
    Aes256CfbDec::new(&key.0.into(), &iv.into()).decrypt(&mut plaintext);
    Ok(plaintext)
}

/// Serializes `value` as JSON and encrypts it.
pub fn seal<T: Serialize>(key: &EncryptionKey, value: &T) -> Result<Vec<u8>, CryptoError> {
    let json = serde_json::to_vec(value).map_err(CryptoError::Serialize)?;
    Ok(encrypt(key, &json))
}

/// Decrypts `ciphertext` and deserializes the JSON inside.
pub fn open<T: DeserializeOwned>(key: &EncryptionKey, ciphertext: &[u8]) -> Result<T, CryptoError> {
    let json = decrypt(key, ciphertext)?;
    serde_json::from_slice(&json).map_err(CryptoError::Unintelligible)
}
