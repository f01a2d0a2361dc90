//! # In-Memory Substrate
//!
//! A hermetic stand-in for the homomorphic coprocessor, used by tests and
//! local development. It keeps plaintexts, import state, and the decryption
//! ACL in a shared table behind a lock, and enforces the same observable
//! contract the real substrate does:
//!
//! - proofs are bound to `(handle, author, contract)` and verified on import;
//! - only imported handles can be granted;
//! - plaintext is revealed (to the oracle) only for granted addresses.
//!
//! Clone handles share state, so the ledger program, the client's encryptor,
//! and the oracle fake can all observe one coherent substrate — mirroring
//! the single coprocessor a real deployment talks to.

use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::substrate::{ExternalEncryptedKey, KeyEncryptor, KeyVault};
use crate::types::{Address, CiphertextHandle};

/// Domain tag mixed into every input proof
const PROOF_DOMAIN: &[u8] = b"murmur-input-proof-v1";

#[derive(Default)]
struct Inner {
    /// Plaintext key material behind each minted handle
    plaintexts: HashMap<CiphertextHandle, Address>,
    /// Handles that passed proof verification and are in ledger custody
    imported: HashSet<CiphertextHandle>,
    /// Decryption ACL: handle → granted addresses
    grants: HashMap<CiphertextHandle, HashSet<Address>>,
}

/// Shared in-memory FHE substrate
#[derive(Clone, Default)]
pub struct InMemoryFhe {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryFhe {
    /// Create an empty substrate
    pub fn new() -> Self {
        Self::default()
    }

    /// Reveal the plaintext behind `handle` for `user`, honoring the ACL
    ///
    /// Returns `None` when the handle is unknown or `user` holds no grant —
    /// the oracle turns that absence into its access-denied signal.
    pub fn decrypt_for(&self, handle: &CiphertextHandle, user: Address) -> Option<Address> {
        let inner = self.inner.read();
        if !inner
            .grants
            .get(handle)
            .is_some_and(|granted| granted.contains(&user))
        {
            return None;
        }
        inner.plaintexts.get(handle).copied()
    }

    fn proof_for(handle: &CiphertextHandle, author: Address, contract: Address) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(PROOF_DOMAIN);
        hasher.update(handle.as_bytes());
        hasher.update(author.as_bytes());
        hasher.update(contract.as_bytes());
        hasher.finalize().to_vec()
    }
}

impl KeyEncryptor for InMemoryFhe {
    fn encrypt_key_material(
        &self,
        material: &Address,
        author: Address,
        contract: Address,
    ) -> Result<ExternalEncryptedKey> {
        let handle = CiphertextHandle::random();
        let proof = Self::proof_for(&handle, author, contract);

        self.inner.write().plaintexts.insert(handle, *material);

        Ok(ExternalEncryptedKey { handle, proof })
    }
}

impl KeyVault for InMemoryFhe {
    fn import_external(
        &self,
        external: &ExternalEncryptedKey,
        author: Address,
        contract: Address,
    ) -> Result<CiphertextHandle> {
        let mut inner = self.inner.write();

        if !inner.plaintexts.contains_key(&external.handle) {
            return Err(Error::InvalidKeyProof(format!(
                "unknown ciphertext handle {}",
                external.handle
            )));
        }

        let expected = Self::proof_for(&external.handle, author, contract);
        if external.proof != expected {
            return Err(Error::InvalidKeyProof(
                "proof does not bind this author and contract".into(),
            ));
        }

        inner.imported.insert(external.handle);
        Ok(external.handle)
    }

    fn grant_decrypt(&self, handle: &CiphertextHandle, grantee: Address) -> Result<()> {
        let mut inner = self.inner.write();

        if !inner.imported.contains(handle) {
            return Err(Error::Internal(format!(
                "grant on handle {handle} before import"
            )));
        }

        inner.grants.entry(*handle).or_default().insert(grantee);
        Ok(())
    }

    fn is_granted(&self, handle: &CiphertextHandle, user: Address) -> bool {
        self.inner
            .read()
            .grants
            .get(handle)
            .is_some_and(|granted| granted.contains(&user))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_import_grant_decrypt() {
        let fhe = InMemoryFhe::new();
        let author = Address::random();
        let contract = Address::random();
        let material = Address::random();

        let external = fhe
            .encrypt_key_material(&material, author, contract)
            .unwrap();
        let handle = fhe.import_external(&external, author, contract).unwrap();

        // No grant yet: plaintext stays hidden
        assert_eq!(fhe.decrypt_for(&handle, author), None);

        fhe.grant_decrypt(&handle, author).unwrap();
        assert_eq!(fhe.decrypt_for(&handle, author), Some(material));

        // Other addresses still see nothing
        assert_eq!(fhe.decrypt_for(&handle, Address::random()), None);
    }

    #[test]
    fn test_proof_binds_author_and_contract() {
        let fhe = InMemoryFhe::new();
        let author = Address::random();
        let contract = Address::random();
        let material = Address::random();

        let external = fhe
            .encrypt_key_material(&material, author, contract)
            .unwrap();

        // Replayed by a different author
        let err = fhe
            .import_external(&external, Address::random(), contract)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidKeyProof(_)));

        // Replayed into a different contract
        let err = fhe
            .import_external(&external, author, Address::random())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidKeyProof(_)));
    }

    #[test]
    fn test_unknown_handle_rejected() {
        let fhe = InMemoryFhe::new();
        let author = Address::random();
        let contract = Address::random();

        let forged = ExternalEncryptedKey {
            handle: CiphertextHandle::random(),
            proof: vec![0u8; 32],
        };
        let err = fhe.import_external(&forged, author, contract).unwrap_err();
        assert!(matches!(err, Error::InvalidKeyProof(_)));
    }

    #[test]
    fn test_clones_share_state() {
        let fhe = InMemoryFhe::new();
        let other = fhe.clone();
        let author = Address::random();
        let contract = Address::random();
        let material = Address::random();

        let external = fhe
            .encrypt_key_material(&material, author, contract)
            .unwrap();
        let handle = other.import_external(&external, author, contract).unwrap();
        other.grant_decrypt(&handle, author).unwrap();

        assert!(fhe.is_granted(&handle, author));
    }
}
