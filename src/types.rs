//! # Core Types
//!
//! Shared value types for the protocol: ledger addresses and homomorphic
//! ciphertext handles.
//!
//! ## Address Format
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         ADDRESS FORMAT                                  │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Textual form:  0x  +  40 lowercase hex characters                      │
//! │                 ──     ────────────────────────                         │
//! │                 prefix  20 raw bytes                                    │
//! │                                                                         │
//! │  Example:  0x1f9840a85d5af5bf1d1762f925bdaddc4201f984                   │
//! │                                                                         │
//! │  Parsing normalizes: leading/trailing whitespace is trimmed and         │
//! │  uppercase hex is lowercased. Any other shape is rejected.              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Addresses play two roles in the protocol:
//!
//! 1. **Identity** — the caller of every ledger transition and the sender
//!    recorded on every message.
//! 2. **Key material** — each group's symmetric key is seeded from a random
//!    address-shaped 20-byte value, kept on the ledger only as a
//!    homomorphic ciphertext referenced by a [`CiphertextHandle`].

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Size of a raw address in bytes (160 bits)
pub const ADDRESS_SIZE: usize = 20;

/// Size of a ciphertext handle in bytes (256 bits)
pub const HANDLE_SIZE: usize = 32;

/// A 20-byte ledger address
///
/// Used both as a participant identity and as the shape of group key
/// material. Comparison and hashing operate on the raw bytes, so two
/// addresses that differ only in textual case are equal after parsing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; ADDRESS_SIZE]);

impl Address {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    /// Generate a random address from the OS CSPRNG
    ///
    /// This is how fresh group key material is minted: 160 bits of entropy
    /// in address shape, encrypted client-side before it ever leaves the
    /// creator's process.
    pub fn random() -> Self {
        let mut bytes = [0u8; ADDRESS_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Parse and normalize a textual address
    ///
    /// Accepts `0x` + 40 hex characters in either case, with surrounding
    /// whitespace tolerated. Fails with [`Error::InvalidAddress`] for any
    /// other shape.
    pub fn parse(value: &str) -> Result<Self> {
        let normalized = value.trim().to_lowercase();
        let hex_part = normalized
            .strip_prefix("0x")
            .ok_or_else(|| Error::InvalidAddress(format!("missing 0x prefix: {value:?}")))?;

        if hex_part.len() != ADDRESS_SIZE * 2 {
            return Err(Error::InvalidAddress(format!(
                "expected {} hex characters, got {}",
                ADDRESS_SIZE * 2,
                hex_part.len()
            )));
        }

        let raw = hex::decode(hex_part)
            .map_err(|e| Error::InvalidAddress(format!("non-hex characters: {e}")))?;

        let mut bytes = [0u8; ADDRESS_SIZE];
        bytes.copy_from_slice(&raw);
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.to_string()
    }
}

/// An opaque reference to a homomorphically encrypted value on the ledger
///
/// The handle itself reveals nothing about the plaintext; only addresses
/// holding a decryption grant can resolve it through the oracle. Handles are
/// minted by the substrate and compared byte-wise.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CiphertextHandle([u8; HANDLE_SIZE]);

impl CiphertextHandle {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; HANDLE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; HANDLE_SIZE] {
        &self.0
    }

    /// Mint a random handle
    ///
    /// Used by the substrate when importing an external ciphertext; handle
    /// values carry no structure.
    pub fn random() -> Self {
        let mut bytes = [0u8; HANDLE_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Parse a `0x`-prefixed 64-character hex handle
    ///
    /// Handle text arrives from untrusted sources (deserialized ledger
    /// state, oracle responses); any other shape fails with
    /// [`Error::InvalidHandle`].
    pub fn parse(value: &str) -> Result<Self> {
        let normalized = value.trim().to_lowercase();
        let hex_part = normalized
            .strip_prefix("0x")
            .ok_or_else(|| Error::InvalidHandle(format!("missing 0x prefix: {value:?}")))?;

        if hex_part.len() != HANDLE_SIZE * 2 {
            return Err(Error::InvalidHandle(format!(
                "expected {} hex characters, got {}",
                HANDLE_SIZE * 2,
                hex_part.len()
            )));
        }

        let raw = hex::decode(hex_part)
            .map_err(|e| Error::InvalidHandle(format!("non-hex characters: {e}")))?;

        let mut bytes = [0u8; HANDLE_SIZE];
        bytes.copy_from_slice(&raw);
        Ok(Self(bytes))
    }
}

impl fmt::Display for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CiphertextHandle({self})")
    }
}

impl TryFrom<String> for CiphertextHandle {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<CiphertextHandle> for String {
    fn from(handle: CiphertextHandle) -> Self {
        handle.to_string()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        let addr = Address::random();
        let parsed = Address::parse(&addr.to_string()).unwrap();
        assert_eq!(addr, parsed);
    }

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        let text = "  0x1F9840A85D5AF5BF1D1762F925BDADDC4201F984  ";
        let addr = Address::parse(text).unwrap();
        assert_eq!(
            addr.to_string(),
            "0x1f9840a85d5af5bf1d1762f925bdaddc4201f984"
        );
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert!(Address::parse("").is_err());
        assert!(Address::parse("1f9840a85d5af5bf1d1762f925bdaddc4201f984").is_err());
        assert!(Address::parse("0x1f9840").is_err());
        assert!(Address::parse("0xzz9840a85d5af5bf1d1762f925bdaddc4201f984").is_err());
    }

    #[test]
    fn test_random_addresses_differ() {
        assert_ne!(Address::random(), Address::random());
    }

    #[test]
    fn test_handle_round_trip() {
        let handle = CiphertextHandle::random();
        let parsed = CiphertextHandle::parse(&handle.to_string()).unwrap();
        assert_eq!(handle, parsed);
    }

    #[test]
    fn test_handle_parse_rejects_bad_shapes() {
        for bad in [
            "",
            "0x1f9840",
            "1f9840a85d5af5bf1d1762f925bdaddc4201f9841f9840a85d5af5bf1d1762f9",
            "0xzz9840a85d5af5bf1d1762f925bdaddc4201f9841f9840a85d5af5bf1d1762",
        ] {
            let err = CiphertextHandle::parse(bad).unwrap_err();
            assert!(
                matches!(err, Error::InvalidHandle(_)),
                "expected InvalidHandle for {bad:?}, got {err:?}"
            );
        }

        // The serde string path reports the same validation error
        let err = serde_json::from_str::<CiphertextHandle>("\"0xnope\"").unwrap_err();
        assert!(err.to_string().contains("Invalid ciphertext handle"));
    }

    #[test]
    fn test_address_serde_as_string() {
        let addr = Address::parse("0x1f9840a85d5af5bf1d1762f925bdaddc4201f984").unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0x1f9840a85d5af5bf1d1762f925bdaddc4201f984\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, back);
    }
}
