//! # Key Derivation
//!
//! Deterministic derivation of the group's message cipher key from its
//! recovered key material.
//!
//! The material is a 20-byte address-shaped secret. Derivation hashes the
//! normalized raw bytes once with SHA-256 and imports the digest as an
//! AES-256-GCM key:
//!
//! ```text
//! "0x1f98...f984"  ──parse/normalize──►  [u8; 20]  ──SHA-256──►  [u8; 32]
//! ```
//!
//! This is intentionally **not** a secret-stretching function. The entropy
//! source is the homomorphically protected key material, not a password, so
//! no salt and no per-call randomness is ever mixed in — every member must
//! arrive at the identical key from the identical material.

use sha2::{Digest, Sha256};
use zeroize::ZeroizeOnDrop;

use crate::error::{Error, Result};
use crate::types::Address;

/// Size of the message cipher key in bytes (256 bits)
pub const KEY_SIZE: usize = 32;

/// An AES-256-GCM message cipher key
///
/// Zeroized when dropped.
#[derive(ZeroizeOnDrop)]
pub struct SymmetricKey([u8; KEY_SIZE]);

impl SymmetricKey {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw key bytes
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl Clone for SymmetricKey {
    fn clone(&self) -> Self {
        Self(self.0)
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SymmetricKey([redacted])")
    }
}

/// Derive the message cipher key from parsed key material
pub fn derive_message_key(material: &Address) -> SymmetricKey {
    let digest = Sha256::digest(material.as_bytes());
    SymmetricKey(digest.into())
}

/// Derive the message cipher key from key material in textual address form
///
/// The text is normalized (trimmed, lowercased) before the raw bytes are
/// hashed, so any textual casing of the same material yields the same key.
///
/// ## Errors
///
/// Fails with [`Error::InvalidKeyMaterial`] if the text is not exactly a
/// 20-byte value in `0x`-prefixed hex form.
pub fn derive_message_key_from_text(material: &str) -> Result<SymmetricKey> {
    let address = Address::parse(material).map_err(|e| match e {
        Error::InvalidAddress(msg) => Error::InvalidKeyMaterial(msg),
        other => other,
    })?;
    Ok(derive_message_key(&address))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivation_is_deterministic() {
        let material = Address::parse("0x1f9840a85d5af5bf1d1762f925bdaddc4201f984").unwrap();
        let k1 = derive_message_key(&material);
        let k2 = derive_message_key(&material);
        assert_eq!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn test_different_material_different_keys() {
        let k1 = derive_message_key(&Address::from_bytes([1u8; 20]));
        let k2 = derive_message_key(&Address::from_bytes([2u8; 20]));
        assert_ne!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn test_textual_casing_is_normalized() {
        let lower = derive_message_key_from_text("0x1f9840a85d5af5bf1d1762f925bdaddc4201f984")
            .unwrap();
        let upper = derive_message_key_from_text("0x1F9840A85D5AF5BF1D1762F925BDADDC4201F984")
            .unwrap();
        assert_eq!(lower.as_bytes(), upper.as_bytes());
    }

    #[test]
    fn test_invalid_material_rejected() {
        let err = derive_message_key_from_text("not-an-address").unwrap_err();
        assert!(matches!(err, Error::InvalidKeyMaterial(_)));

        let err = derive_message_key_from_text("0x1f9840").unwrap_err();
        assert!(matches!(err, Error::InvalidKeyMaterial(_)));
    }

    #[test]
    fn test_known_digest() {
        // SHA-256 of 20 zero bytes
        let key = derive_message_key(&Address::from_bytes([0u8; 20]));
        assert_eq!(
            hex::encode(key.as_bytes()),
            "de47c9b27eb8d300dbb5f2c353e632c393262cf06340c4fa7f1b40c4cbd36f90"
        );
    }
}
