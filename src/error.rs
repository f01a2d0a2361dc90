//! # Error Handling
//!
//! This module provides the error types for Murmur Core.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (top-level)                                                     │
//! │  │                                                                      │
//! │  ├── Ledger Authorization Errors                                       │
//! │  │   ├── GroupDoesNotExist     - No group with the given id            │
//! │  │   ├── AlreadyMember         - Caller already in the member set      │
//! │  │   ├── NotMember             - Caller not in the member set          │
//! │  │   └── InvalidKeyProof       - Ciphertext validity proof rejected    │
//! │  │                                                                      │
//! │  ├── Input Validation Errors                                           │
//! │  │   ├── EmptyGroupName        - Group name must be non-empty          │
//! │  │   ├── EmptyCiphertext       - Message ciphertext must be non-empty  │
//! │  │   ├── InvalidAddress        - Not a 0x-prefixed 20-byte address     │
//! │  │   ├── InvalidHandle         - Not a 0x-prefixed 32-byte handle      │
//! │  │   ├── InvalidKeyMaterial    - Key material not address-shaped       │
//! │  │   ├── SignerCallerMismatch  - Session signer / caller diverge       │
//! │  │   └── UnsupportedEnvelopeFormat - Envelope failed to parse          │
//! │  │                                                                      │
//! │  ├── Cryptographic Errors                                              │
//! │  │   ├── AuthenticationFailure - AEAD tag did not verify               │
//! │  │   ├── EncryptionFailed      - AEAD encryption failed                │
//! │  │   └── SignatureRejected     - Authorization signature invalid       │
//! │  │                                                                      │
//! │  └── Availability / Access Errors                                      │
//! │      ├── DecryptionUnavailable - Oracle omitted the requested handle   │
//! │      ├── OracleUnreachable     - Oracle could not be reached           │
//! │      ├── LedgerUnreachable     - Ledger read/submit failed             │
//! │      └── SigningCancelled      - Requester declined to sign            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Authorization errors are deterministic rejections of ledger transitions
//! and are never retried by the program. Validation errors are local and the
//! caller must fix the input. Cryptographic-integrity failures are fatal for
//! the attempt and surfaced distinctly from format errors — a repeated
//! [`Error::AuthenticationFailure`] almost always means the wrong key, not a
//! transient fault. Availability errors may be transient; the client
//! distinguishes "no grant" from "oracle down" by checking membership state.

use thiserror::Error;

use crate::types::Address;

/// Result type alias for Murmur Core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Murmur Core
///
/// All errors are categorized by domain to make error handling clearer and
/// to provide meaningful error messages to callers.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Ledger Authorization Errors (100-199)
    // ========================================================================

    /// No group exists with the given id
    #[error("Group {0} does not exist.")]
    GroupDoesNotExist(u64),

    /// Caller is already a member of the group
    #[error("Address {member} is already a member of group {group_id}.")]
    AlreadyMember {
        /// The group the caller tried to join
        group_id: u64,
        /// The caller's address
        member: Address,
    },

    /// Caller is not a member of the group
    #[error("Address {member} is not a member of group {group_id}.")]
    NotMember {
        /// The group the caller tried to act on
        group_id: u64,
        /// The caller's address
        member: Address,
    },

    /// The validity proof for an externally encrypted key was rejected
    #[error("Encrypted key proof rejected: {0}")]
    InvalidKeyProof(String),

    // ========================================================================
    // Input Validation Errors (200-299)
    // ========================================================================

    /// Group name must be non-empty
    #[error("Group name must not be empty.")]
    EmptyGroupName,

    /// Message ciphertext must be non-empty
    #[error("Message ciphertext must not be empty.")]
    EmptyCiphertext,

    /// Not a valid 0x-prefixed 20-byte address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Key material is not a 20-byte value in textual address form
    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// Message envelope does not parse as `v1:<base64>:<base64>`
    #[error("Unsupported envelope format.")]
    UnsupportedEnvelopeFormat,

    /// Message index out of range for the group's log
    #[error("Message {index} does not exist in group {group_id}.")]
    MessageDoesNotExist {
        /// Group whose log was indexed
        group_id: u64,
        /// The out-of-range index
        index: u64,
    },

    /// Not a valid 0x-prefixed 32-byte ciphertext handle
    #[error("Invalid ciphertext handle: {0}")]
    InvalidHandle(String),

    /// The session's signer does not control the connection's caller address
    #[error("Signer address {signer} does not match connection caller {caller}.")]
    SignerCallerMismatch {
        /// The address the connection submits transitions as
        caller: Address,
        /// The address the authorization signer controls
        signer: Address,
    },

    // ========================================================================
    // Cryptographic Errors (300-399)
    // ========================================================================

    /// AEAD authentication tag did not verify (wrong key, corruption, or tampering)
    #[error("Message authentication failed: ciphertext was not produced under this key or was tampered with.")]
    AuthenticationFailure,

    /// AEAD encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Authorization signature did not verify
    #[error("Authorization signature rejected: {0}")]
    SignatureRejected(String),

    // ========================================================================
    // Availability / Access Errors (400-499)
    // ========================================================================

    /// The oracle's result omitted the requested handle — the observable
    /// effect of the requester lacking a decryption grant
    #[error("Decryption unavailable for handle {handle}: no grant for this requester.")]
    DecryptionUnavailable {
        /// The handle the oracle declined to decrypt
        handle: String,
    },

    /// The decryption oracle could not be reached
    #[error("Decryption oracle unreachable: {0}")]
    OracleUnreachable(String),

    /// The ledger could not be reached
    #[error("Ledger unreachable: {0}")]
    LedgerUnreachable(String),

    /// The requester declined (or abandoned) the authorization signature
    #[error("Authorization signing was cancelled by the requester.")]
    SigningCancelled,

    // ========================================================================
    // Internal Errors (900-999)
    // ========================================================================

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the numeric error code
    ///
    /// Error codes are organized by category:
    /// - 100-199: Ledger authorization
    /// - 200-299: Input validation
    /// - 300-399: Cryptography
    /// - 400-499: Availability / access
    /// - 900-999: Internal
    pub fn code(&self) -> i32 {
        match self {
            // Ledger authorization (100-199)
            Error::GroupDoesNotExist(_) => 100,
            Error::AlreadyMember { .. } => 101,
            Error::NotMember { .. } => 102,
            Error::InvalidKeyProof(_) => 103,

            // Input validation (200-299)
            Error::EmptyGroupName => 200,
            Error::EmptyCiphertext => 201,
            Error::InvalidAddress(_) => 202,
            Error::InvalidKeyMaterial(_) => 203,
            Error::UnsupportedEnvelopeFormat => 204,
            Error::MessageDoesNotExist { .. } => 205,
            Error::InvalidHandle(_) => 206,
            Error::SignerCallerMismatch { .. } => 207,

            // Cryptography (300-399)
            Error::AuthenticationFailure => 300,
            Error::EncryptionFailed(_) => 301,
            Error::SignatureRejected(_) => 302,

            // Availability / access (400-499)
            Error::DecryptionUnavailable { .. } => 400,
            Error::OracleUnreachable(_) => 401,
            Error::LedgerUnreachable(_) => 402,
            Error::SigningCancelled => 403,

            // Internal (900-999)
            Error::Internal(_) => 900,
        }
    }

    /// Check if this error means "access denied" rather than "try again"
    ///
    /// Access denials are deterministic: the caller lacks membership or a
    /// decryption grant, and retrying without a state change cannot succeed.
    pub fn is_access_denied(&self) -> bool {
        matches!(
            self,
            Error::NotMember { .. } | Error::DecryptionUnavailable { .. }
        )
    }

    /// Check if this error is potentially recoverable by retrying
    ///
    /// Only availability errors qualify. Cryptographic-integrity failures are
    /// deliberately excluded: repeated AEAD failures indicate the wrong key,
    /// not a transient fault.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::OracleUnreachable(_) | Error::LedgerUnreachable(_)
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::GroupDoesNotExist(1).code(), 100);
        assert_eq!(Error::EmptyGroupName.code(), 200);
        assert_eq!(Error::InvalidHandle("0xnope".into()).code(), 206);
        assert_eq!(
            Error::SignerCallerMismatch {
                caller: Address::from_bytes([1u8; 20]),
                signer: Address::from_bytes([2u8; 20]),
            }
            .code(),
            207
        );
        assert_eq!(Error::AuthenticationFailure.code(), 300);
        assert_eq!(
            Error::DecryptionUnavailable {
                handle: "0xabc".into()
            }
            .code(),
            400
        );
        assert_eq!(Error::Internal("test".into()).code(), 900);
    }

    #[test]
    fn test_access_denied_classification() {
        let denied = Error::DecryptionUnavailable {
            handle: "0xabc".into(),
        };
        assert!(denied.is_access_denied());
        assert!(!denied.is_recoverable());

        assert!(Error::OracleUnreachable("timeout".into()).is_recoverable());
        assert!(!Error::AuthenticationFailure.is_recoverable());
    }
}
