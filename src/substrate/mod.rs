//! # Homomorphic Substrate
//!
//! Interface to the homomorphic-encryption coprocessor that guards group
//! key material.
//!
//! ## Capability Model
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     SUBSTRATE CAPABILITIES                              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  CLIENT SIDE (KeyEncryptor)                                            │
//! │  ──────────────────────────                                             │
//! │  encrypt_key_material(material, author, contract)                      │
//! │    → ExternalEncryptedKey { handle, proof }                            │
//! │                                                                         │
//! │  The proof attests the ciphertext is validly formed AND bound to       │
//! │  (author, contract) — a ciphertext minted for one contract cannot      │
//! │  be replayed into another, nor submitted by a different author.        │
//! │                                                                         │
//! │  LEDGER SIDE (KeyVault)                                                │
//! │  ──────────────────────                                                 │
//! │  import_external(external, author, contract) → handle                 │
//! │    verifies the proof; rejects with InvalidKeyProof otherwise          │
//! │                                                                         │
//! │  grant_decrypt(handle, grantee)                                        │
//! │    extends the decryption ACL; the oracle honors exactly this set      │
//! │                                                                         │
//! │  is_granted(handle, user) → bool                                       │
//! │    ACL query (what the oracle consults before revealing plaintext)     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The real substrate is an external service; this crate programs against
//! the two traits and ships a complete in-memory implementation
//! ([`memory::InMemoryFhe`]) so the whole protocol runs hermetically in
//! tests and local development.

pub mod memory;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{Address, CiphertextHandle};

/// A client-side encrypted group key, ready for submission to the ledger
///
/// Produced by [`KeyEncryptor::encrypt_key_material`]; consumed once by
/// [`KeyVault::import_external`] during group creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalEncryptedKey {
    /// Handle referencing the encrypted key material
    pub handle: CiphertextHandle,
    /// Validity proof binding the ciphertext to its author and target contract
    pub proof: Vec<u8>,
}

/// Client-side input encryption capability
pub trait KeyEncryptor: Send + Sync {
    /// Encrypt 20-byte key material into an external ciphertext bound to
    /// `(author, contract)`.
    fn encrypt_key_material(
        &self,
        material: &Address,
        author: Address,
        contract: Address,
    ) -> Result<ExternalEncryptedKey>;
}

/// Ledger-side ciphertext custody and access control
pub trait KeyVault: Send + Sync {
    /// Verify an external ciphertext's proof and take custody of the handle.
    ///
    /// Fails with [`crate::Error::InvalidKeyProof`] if the proof does not
    /// attest a validly formed ciphertext authored by `author` for
    /// `contract`.
    fn import_external(
        &self,
        external: &ExternalEncryptedKey,
        author: Address,
        contract: Address,
    ) -> Result<CiphertextHandle>;

    /// Grant `grantee` the right to recover the plaintext behind `handle`.
    ///
    /// Grants are monotonic: there is no revocation in this design.
    fn grant_decrypt(&self, handle: &CiphertextHandle, grantee: Address) -> Result<()>;

    /// Check whether `user` holds a decryption grant on `handle`.
    fn is_granted(&self, handle: &CiphertextHandle, user: Address) -> bool;
}
