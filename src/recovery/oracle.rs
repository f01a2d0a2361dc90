//! # Decryption Oracle
//!
//! The external service that resolves ciphertext handles for authorized
//! requesters, plus a hermetic in-memory implementation.
//!
//! The oracle's contract is deliberately quiet about denial: a handle the
//! requester is not granted is simply **omitted** from the result mapping.
//! Callers must treat that omission as "access denied" — not as a transient
//! fault — which [`super::KeyRecoveryClient`] does.

use std::collections::HashMap;
use std::sync::Arc;

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::recovery::DecryptionAuthorization;
use crate::substrate::memory::InMemoryFhe;
use crate::types::{Address, CiphertextHandle};

/// One `(handle, contract)` pair to resolve
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandleContractPair {
    /// The ciphertext handle to decrypt
    pub handle: CiphertextHandle,
    /// The contract the handle lives under
    pub contract_address: Address,
}

/// A user-decryption request, as submitted to the oracle
///
/// Carries the full authorization material: the ephemeral keypair (the
/// private half lets the oracle seal its response to this channel), the
/// requester's signature over the authorization digest, the contract scope,
/// and the validity window.
pub struct UserDecryptRequest {
    /// Handles to resolve, each scoped to its contract
    pub handle_contract_pairs: Vec<HandleContractPair>,
    /// Ephemeral public key from the authorization
    pub public_key: [u8; 32],
    /// Ephemeral private key (response channel)
    pub private_key: [u8; 32],
    /// Requester's signature over the authorization digest
    pub signature: Vec<u8>,
    /// Contracts the authorization covers
    pub contract_addresses: Vec<Address>,
    /// The requesting address
    pub requester: Address,
    /// Start of the validity window (Unix seconds)
    pub start_time: i64,
    /// Validity window length, in days
    pub duration_days: u64,
}

impl UserDecryptRequest {
    /// Reconstruct the authorization record this request claims to carry
    pub fn authorization(&self) -> DecryptionAuthorization {
        DecryptionAuthorization {
            public_key: self.public_key,
            contracts: self.contract_addresses.clone(),
            start_time: self.start_time,
            duration_days: self.duration_days,
        }
    }
}

/// The decryption-oracle capability
#[async_trait::async_trait]
pub trait DecryptionOracle: Send + Sync {
    /// Resolve every granted handle in the request to its clear value
    ///
    /// Returns a mapping from handle to clear value (key material in
    /// textual address form). Handles the requester holds no grant for are
    /// omitted, not errored.
    async fn user_decrypt(
        &self,
        request: UserDecryptRequest,
    ) -> Result<HashMap<CiphertextHandle, String>>;
}

/// An in-memory oracle over a shared [`InMemoryFhe`] substrate
///
/// Verifies the authorization exactly the way a real oracle does — known
/// requester key, valid signature, live window, in-scope contract — then
/// consults the substrate's grant ACL per handle.
pub struct InMemoryOracle {
    fhe: InMemoryFhe,
    signers: RwLock<HashMap<Address, VerifyingKey>>,
}

impl InMemoryOracle {
    /// Create an oracle over the given substrate
    pub fn new(fhe: InMemoryFhe) -> Self {
        Self {
            fhe,
            signers: RwLock::new(HashMap::new()),
        }
    }

    /// Create a shared oracle handle
    pub fn shared(fhe: InMemoryFhe) -> Arc<Self> {
        Arc::new(Self::new(fhe))
    }

    /// Register the verification key for a requester address
    ///
    /// Models the wallet-address binding a real oracle learns from signature
    /// recovery; requests from unregistered addresses are rejected.
    pub fn register_signer(&self, address: Address, key: VerifyingKey) {
        self.signers.write().insert(address, key);
    }

    fn verify_request(&self, request: &UserDecryptRequest) -> Result<()> {
        let verifying_key = self
            .signers
            .read()
            .get(&request.requester)
            .copied()
            .ok_or_else(|| {
                Error::SignatureRejected(format!("unknown requester {}", request.requester))
            })?;

        let signature = Signature::from_slice(&request.signature)
            .map_err(|e| Error::SignatureRejected(format!("malformed signature: {e}")))?;

        let authorization = request.authorization();
        let digest = authorization.signing_digest(request.requester);
        verifying_key
            .verify(&digest, &signature)
            .map_err(|_| Error::SignatureRejected("digest mismatch".into()))?;

        let now = crate::time::now_timestamp();
        if !authorization.is_valid_at(now) {
            return Err(Error::SignatureRejected(
                "authorization window is not live".into(),
            ));
        }

        for pair in &request.handle_contract_pairs {
            if !request.contract_addresses.contains(&pair.contract_address) {
                return Err(Error::SignatureRejected(format!(
                    "contract {} outside authorized scope",
                    pair.contract_address
                )));
            }
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl DecryptionOracle for InMemoryOracle {
    async fn user_decrypt(
        &self,
        request: UserDecryptRequest,
    ) -> Result<HashMap<CiphertextHandle, String>> {
        self.verify_request(&request)?;

        let mut result = HashMap::new();
        for pair in &request.handle_contract_pairs {
            // Ungranted handles are omitted, not errored
            if let Some(material) = self.fhe.decrypt_for(&pair.handle, request.requester) {
                result.insert(pair.handle, material.to_string());
            }
        }

        Ok(result)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recovery::{AuthorizationSigner, EphemeralKeypair, LocalSigner};
    use crate::substrate::{KeyEncryptor, KeyVault};

    struct Fixture {
        fhe: InMemoryFhe,
        oracle: InMemoryOracle,
        signer: LocalSigner,
        contract: Address,
        handle: CiphertextHandle,
        material: Address,
    }

    fn granted_fixture() -> Fixture {
        let fhe = InMemoryFhe::new();
        let oracle = InMemoryOracle::new(fhe.clone());
        let signer = LocalSigner::random();
        let contract = Address::random();
        let material = Address::random();

        oracle.register_signer(signer.address(), signer.verifying_key());

        let external = fhe
            .encrypt_key_material(&material, signer.address(), contract)
            .unwrap();
        let handle = fhe
            .import_external(&external, signer.address(), contract)
            .unwrap();
        fhe.grant_decrypt(&handle, signer.address()).unwrap();

        Fixture {
            fhe,
            oracle,
            signer,
            contract,
            handle,
            material,
        }
    }

    async fn signed_request(fx: &Fixture, requester: Address) -> UserDecryptRequest {
        let keypair = EphemeralKeypair::generate();
        let authorization = DecryptionAuthorization {
            public_key: keypair.public_bytes(),
            contracts: vec![fx.contract],
            start_time: crate::time::now_timestamp(),
            duration_days: 10,
        };
        let signature = fx
            .signer
            .sign_authorization(&authorization)
            .await
            .unwrap();

        UserDecryptRequest {
            handle_contract_pairs: vec![HandleContractPair {
                handle: fx.handle,
                contract_address: fx.contract,
            }],
            public_key: keypair.public_bytes(),
            private_key: keypair.secret_bytes(),
            signature,
            contract_addresses: vec![fx.contract],
            requester,
            start_time: authorization.start_time,
            duration_days: authorization.duration_days,
        }
    }

    #[tokio::test]
    async fn test_granted_requester_recovers_material() {
        let fx = granted_fixture();
        let request = signed_request(&fx, fx.signer.address()).await;

        let result = fx.oracle.user_decrypt(request).await.unwrap();
        assert_eq!(result.get(&fx.handle), Some(&fx.material.to_string()));
    }

    #[tokio::test]
    async fn test_ungranted_handle_is_omitted() {
        let fx = granted_fixture();

        // A second handle the signer is NOT granted
        let other_material = Address::random();
        let external = fx
            .fhe
            .encrypt_key_material(&other_material, fx.signer.address(), fx.contract)
            .unwrap();
        let other_handle = fx
            .fhe
            .import_external(&external, fx.signer.address(), fx.contract)
            .unwrap();

        let mut request = signed_request(&fx, fx.signer.address()).await;
        request.handle_contract_pairs.push(HandleContractPair {
            handle: other_handle,
            contract_address: fx.contract,
        });

        let result = fx.oracle.user_decrypt(request).await.unwrap();
        assert!(result.contains_key(&fx.handle));
        assert!(!result.contains_key(&other_handle));
    }

    #[tokio::test]
    async fn test_signature_bound_to_requester() {
        let fx = granted_fixture();

        // The signature covers the signer's digest; claiming a different
        // requester must fail verification
        let imposter = LocalSigner::random();
        fx.oracle
            .register_signer(imposter.address(), imposter.verifying_key());
        let request = signed_request(&fx, imposter.address()).await;

        let err = fx.oracle.user_decrypt(request).await.unwrap_err();
        assert!(matches!(err, Error::SignatureRejected(_)));
    }

    #[tokio::test]
    async fn test_unknown_requester_rejected() {
        let fx = granted_fixture();
        let request = signed_request(&fx, Address::random()).await;

        let err = fx.oracle.user_decrypt(request).await.unwrap_err();
        assert!(matches!(err, Error::SignatureRejected(_)));
    }

    #[tokio::test]
    async fn test_expired_window_rejected() {
        let fx = granted_fixture();
        let mut request = signed_request(&fx, fx.signer.address()).await;

        // Re-sign an authorization whose window ended long ago
        let authorization = DecryptionAuthorization {
            public_key: request.public_key,
            contracts: request.contract_addresses.clone(),
            start_time: 1_000_000,
            duration_days: 1,
        };
        request.start_time = authorization.start_time;
        request.duration_days = authorization.duration_days;
        request.signature = fx
            .signer
            .sign_authorization(&authorization)
            .await
            .unwrap();

        let err = fx.oracle.user_decrypt(request).await.unwrap_err();
        assert!(matches!(err, Error::SignatureRejected(_)));
    }

    #[tokio::test]
    async fn test_out_of_scope_contract_rejected() {
        let fx = granted_fixture();
        let mut request = signed_request(&fx, fx.signer.address()).await;
        request.handle_contract_pairs[0].contract_address = Address::random();

        let err = fx.oracle.user_decrypt(request).await.unwrap_err();
        assert!(matches!(err, Error::SignatureRejected(_)));
    }
}
