//! # Message Envelope Codec
//!
//! Symmetric encryption of message bodies into the versioned wire envelope.
//!
//! ## Wire Format
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       ENVELOPE WIRE FORMAT                              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   "v1"  :  base64(nonce)  :  base64(ciphertext ‖ tag)                   │
//! │   ────     ─────────────     ────────────────────────                   │
//! │   version  12 bytes          AES-256-GCM output                         │
//! │                              (plaintext length + 16-byte tag)           │
//! │                                                                         │
//! │  Exactly three colon-separated fields. Anything else — wrong field      │
//! │  count, unknown version, undecodable base64, short nonce — is a         │
//! │  format error, reported separately from authentication failures.       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ledger never inspects envelope contents; it stores the string
//! opaquely and checks only non-emptiness. Parsing and authentication both
//! happen client-side in this module.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce as AesNonce,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::RngCore;

use crate::crypto::SymmetricKey;
use crate::error::{Error, Result};

/// Version tag carried in every envelope
pub const ENVELOPE_VERSION: &str = "v1";

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Encrypt a message body into a `v1` envelope
///
/// A fresh random nonce is generated per call. **Never reuse a nonce with
/// the same key** — nonce reuse breaks both confidentiality and integrity
/// of AES-GCM. Random 96-bit nonces are safe for up to 2^32 messages per
/// key, far beyond any group's message count here.
pub fn encrypt_envelope(plaintext: &str, key: &SymmetricKey) -> Result<String> {
    let mut nonce = [0u8; NONCE_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut nonce);

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| Error::EncryptionFailed(format!("invalid key: {e}")))?;

    let ciphertext = cipher
        .encrypt(AesNonce::from_slice(&nonce), plaintext.as_bytes())
        .map_err(|e| Error::EncryptionFailed(format!("AEAD encryption failed: {e}")))?;

    Ok(format!(
        "{ENVELOPE_VERSION}:{}:{}",
        BASE64.encode(nonce),
        BASE64.encode(ciphertext)
    ))
}

/// Decrypt a `v1` envelope back into the message body
///
/// ## Errors
///
/// - [`Error::UnsupportedEnvelopeFormat`] if the envelope does not parse
///   into exactly three colon-separated fields with version `v1`, or the
///   base64 fields do not decode, or the nonce has the wrong length.
/// - [`Error::AuthenticationFailure`] if the AEAD tag does not verify:
///   wrong key, corrupted data, or tampering. This is surfaced distinctly
///   and never returns garbage plaintext.
pub fn decrypt_envelope(envelope: &str, key: &SymmetricKey) -> Result<String> {
    let parts: Vec<&str> = envelope.split(':').collect();
    if parts.len() != 3 || parts[0] != ENVELOPE_VERSION {
        return Err(Error::UnsupportedEnvelopeFormat);
    }

    let nonce = BASE64
        .decode(parts[1])
        .map_err(|_| Error::UnsupportedEnvelopeFormat)?;
    let ciphertext = BASE64
        .decode(parts[2])
        .map_err(|_| Error::UnsupportedEnvelopeFormat)?;

    if nonce.len() != NONCE_SIZE {
        return Err(Error::UnsupportedEnvelopeFormat);
    }

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| Error::EncryptionFailed(format!("invalid key: {e}")))?;

    let plaintext = cipher
        .decrypt(AesNonce::from_slice(&nonce), ciphertext.as_ref())
        .map_err(|_| {
            tracing::warn!("envelope authentication failed");
            Error::AuthenticationFailure
        })?;

    String::from_utf8(plaintext)
        .map_err(|e| Error::Internal(format!("authenticated plaintext is not UTF-8: {e}")))
}

// ============================================================================
// TESTS
// ============================================================================
