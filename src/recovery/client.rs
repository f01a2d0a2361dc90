//! # Key Recovery Client
//!
//! Drives the authorization-and-decrypt handshake for one
//! `(contract, requester)` pair. See the module docs of [`crate::recovery`]
//! for the full protocol.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::recovery::{
    AuthorizationSigner, DecryptionAuthorization, DecryptionOracle, EphemeralKeypair,
    HandleContractPair, RecoveryConfig, UserDecryptRequest,
};
use crate::types::{Address, CiphertextHandle};

/// Client for recovering clear key material from ciphertext handles
///
/// Scoped to one ledger contract and one requester (the signer's address).
/// Each [`recover_key`](Self::recover_key) call runs a complete, independent
/// handshake with a fresh ephemeral keypair; nothing is reused or persisted
/// between calls, and no ledger writes ever happen — dropping the returned
/// future cancels the attempt cleanly.
pub struct KeyRecoveryClient {
    oracle: Arc<dyn DecryptionOracle>,
    signer: Arc<dyn AuthorizationSigner>,
    contract: Address,
    config: RecoveryConfig,
}

impl KeyRecoveryClient {
    /// Create a client for `contract`, requesting as the signer's address
    pub fn new(
        oracle: Arc<dyn DecryptionOracle>,
        signer: Arc<dyn AuthorizationSigner>,
        contract: Address,
        config: RecoveryConfig,
    ) -> Self {
        Self {
            oracle,
            signer,
            contract,
            config,
        }
    }

    /// The requester address this client recovers keys for
    pub fn requester(&self) -> Address {
        self.signer.address()
    }

    /// Recover the clear key material behind `handle`
    ///
    /// ## Errors
    ///
    /// - [`Error::SigningCancelled`] if the requester declines the
    ///   authorization signature
    /// - [`Error::DecryptionUnavailable`] if the oracle's result omits the
    ///   handle — the requester holds no grant; treat as access denied
    /// - [`Error::InvalidKeyMaterial`] if the oracle returns a clear value
    ///   that is not address-shaped
    pub async fn recover_key(&self, handle: &CiphertextHandle) -> Result<Address> {
        let requester = self.signer.address();
        let keypair = EphemeralKeypair::generate();

        let authorization = DecryptionAuthorization {
            public_key: keypair.public_bytes(),
            contracts: vec![self.contract],
            start_time: crate::time::now_timestamp(),
            duration_days: self.config.duration_days,
        };

        tracing::debug!(%handle, %requester, "requesting decryption authorization signature");
        // Suspend point: may wait on human approval with unbounded latency
        let signature = self.signer.sign_authorization(&authorization).await?;

        let request = UserDecryptRequest {
            handle_contract_pairs: vec![HandleContractPair {
                handle: *handle,
                contract_address: self.contract,
            }],
            public_key: keypair.public_bytes(),
            private_key: keypair.secret_bytes(),
            signature,
            contract_addresses: vec![self.contract],
            requester,
            start_time: authorization.start_time,
            duration_days: authorization.duration_days,
        };

        let mut result = self.oracle.user_decrypt(request).await?;

        let clear = result
            .remove(handle)
            .ok_or_else(|| Error::DecryptionUnavailable {
                handle: handle.to_string(),
            })?;

        // The oracle returns key material in textual address form; a
        // malformed value must surface as such, never as a garbage key
        let material = Address::parse(&clear).map_err(|e| match e {
            Error::InvalidAddress(msg) => Error::InvalidKeyMaterial(msg),
            other => other,
        })?;

        tracing::debug!(%handle, %requester, "key material recovered");
        Ok(material)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recovery::{InMemoryOracle, LocalSigner};
    use crate::substrate::memory::InMemoryFhe;
    use crate::substrate::{KeyEncryptor, KeyVault};

    struct Fixture {
        fhe: InMemoryFhe,
        oracle: Arc<InMemoryOracle>,
        contract: Address,
        handle: CiphertextHandle,
        material: Address,
    }

    fn fixture_with_owner(owner: &LocalSigner) -> Fixture {
        let fhe = InMemoryFhe::new();
        let oracle = InMemoryOracle::shared(fhe.clone());
        let contract = Address::random();
        let material = Address::random();

        oracle.register_signer(owner.address(), owner.verifying_key());

        let external = fhe
            .encrypt_key_material(&material, owner.address(), contract)
            .unwrap();
        let handle = fhe
            .import_external(&external, owner.address(), contract)
            .unwrap();
        fhe.grant_decrypt(&handle, owner.address()).unwrap();

        Fixture {
            fhe,
            oracle,
            contract,
            handle,
            material,
        }
    }

    #[tokio::test]
    async fn test_granted_requester_recovers_key() {
        let owner = LocalSigner::random();
        let fx = fixture_with_owner(&owner);

        let client = KeyRecoveryClient::new(
            fx.oracle.clone(),
            Arc::new(owner),
            fx.contract,
            RecoveryConfig::default(),
        );

        let recovered = client.recover_key(&fx.handle).await.unwrap();
        assert_eq!(recovered, fx.material);
    }

    #[tokio::test]
    async fn test_ungranted_requester_gets_access_denied() {
        let owner = LocalSigner::random();
        let fx = fixture_with_owner(&owner);

        let outsider = LocalSigner::random();
        fx.oracle
            .register_signer(outsider.address(), outsider.verifying_key());

        let client = KeyRecoveryClient::new(
            fx.oracle.clone(),
            Arc::new(outsider),
            fx.contract,
            RecoveryConfig::default(),
        );

        let err = client.recover_key(&fx.handle).await.unwrap_err();
        assert!(matches!(err, Error::DecryptionUnavailable { .. }));
        assert!(err.is_access_denied());
    }

    #[tokio::test]
    async fn test_grant_flips_outcome() {
        let owner = LocalSigner::random();
        let fx = fixture_with_owner(&owner);

        let joiner = LocalSigner::random();
        let joiner_address = joiner.address();
        fx.oracle
            .register_signer(joiner_address, joiner.verifying_key());

        let client = KeyRecoveryClient::new(
            fx.oracle.clone(),
            Arc::new(joiner),
            fx.contract,
            RecoveryConfig::default(),
        );

        assert!(client.recover_key(&fx.handle).await.is_err());

        fx.fhe.grant_decrypt(&fx.handle, joiner_address).unwrap();
        let recovered = client.recover_key(&fx.handle).await.unwrap();
        assert_eq!(recovered, fx.material);
    }
}
