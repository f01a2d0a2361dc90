//! # Decryption Authorization
//!
//! The ephemeral keypair and the signed, time-bounded authorization record
//! that together gate a decryption-oracle request.
//!
//! The signature commits to every field of the record **and** to the
//! requester's identity through a domain-separated digest, so a captured
//! signature cannot be replayed for another contract, another time window,
//! another ephemeral public key, or another requester.

use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use sha2::{Digest, Sha256};
use x25519_dalek::{PublicKey, StaticSecret};

use crate::error::Result;
use crate::types::Address;

/// Default validity window for a decryption authorization, in days
pub const DEFAULT_DURATION_DAYS: u64 = 10;

/// Domain tag for authorization signing digests
const AUTHORIZATION_DOMAIN: &[u8] = b"murmur-user-decrypt-authorization-v1";

/// Configuration for the key-recovery handshake
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Validity window of each authorization, in days
    pub duration_days: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            duration_days: DEFAULT_DURATION_DAYS,
        }
    }
}

/// A fresh, single-use x25519 keypair for the oracle channel
///
/// Generated per recovery attempt, used once, discarded. Never reuse one
/// across attempts (the channel's forward secrecy depends on it) and never
/// persist it.
pub struct EphemeralKeypair {
    secret: StaticSecret,
    public: PublicKey,
}

impl EphemeralKeypair {
    /// Generate from the OS CSPRNG
    pub fn generate() -> Self {
        let secret = StaticSecret::random_from_rng(rand::rngs::OsRng);
        let public = PublicKey::from(&secret);
        Self { secret, public }
    }

    /// Public half, as raw bytes
    pub fn public_bytes(&self) -> [u8; 32] {
        self.public.to_bytes()
    }

    /// Private half, as raw bytes (submitted to the oracle so it can seal
    /// the response to this channel)
    pub(crate) fn secret_bytes(&self) -> [u8; 32] {
        self.secret.to_bytes()
    }
}

/// A time-bounded authorization to decrypt handles scoped to specific contracts
///
/// Ephemeral and client-side only: built per recovery attempt, signed once,
/// never written to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptionAuthorization {
    /// Ephemeral public key the oracle response is bound to
    pub public_key: [u8; 32],
    /// Contracts whose handles this authorization may decrypt
    pub contracts: Vec<Address>,
    /// Start of the validity window (Unix seconds)
    pub start_time: i64,
    /// Length of the validity window, in days
    pub duration_days: u64,
}

impl DecryptionAuthorization {
    /// End of the validity window (exclusive), in Unix seconds
    pub fn expires_at(&self) -> i64 {
        self.start_time + (self.duration_days as i64) * 86_400
    }

    /// Whether `timestamp` falls inside `[start_time, start_time + duration)`
    pub fn is_valid_at(&self, timestamp: i64) -> bool {
        timestamp >= self.start_time && timestamp < self.expires_at()
    }

    /// The domain-separated digest the requester signs
    ///
    /// Commits to the requester identity, the ephemeral public key, the full
    /// contract scope (length-prefixed), and the validity window. Any field
    /// change produces a different digest.
    pub fn signing_digest(&self, requester: Address) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(AUTHORIZATION_DOMAIN);
        hasher.update(requester.as_bytes());
        hasher.update(self.public_key);
        hasher.update((self.contracts.len() as u32).to_be_bytes());
        for contract in &self.contracts {
            hasher.update(contract.as_bytes());
        }
        hasher.update(self.start_time.to_be_bytes());
        hasher.update(self.duration_days.to_be_bytes());
        hasher.finalize().into()
    }
}

/// A signing capability for decryption authorizations
///
/// In production this is a wallet: the sign call may wait on human approval
/// with unbounded latency, which is why it is async — the caller can race it
/// against a timeout or drop the future to cancel, with no ledger side
/// effects.
#[async_trait::async_trait]
pub trait AuthorizationSigner: Send + Sync {
    /// The requester address this signer controls
    fn address(&self) -> Address;

    /// Sign the authorization's structured digest
    ///
    /// May fail with [`crate::Error::SigningCancelled`] if the requester
    /// declines.
    async fn sign_authorization(&self, authorization: &DecryptionAuthorization)
        -> Result<Vec<u8>>;
}

/// An in-process signer holding its own ed25519 key
///
/// Stands in for wallet typed-data signing in tests and local development;
/// signs immediately, without user interaction.
pub struct LocalSigner {
    address: Address,
    key: SigningKey,
}

impl LocalSigner {
    /// Create a signer for `address` with the given key
    pub fn new(address: Address, key: SigningKey) -> Self {
        Self { address, key }
    }

    /// Generate a signer with a random address and key
    pub fn random() -> Self {
        Self {
            address: Address::random(),
            key: SigningKey::generate(&mut rand::rngs::OsRng),
        }
    }

    /// The verification half, for registering with an oracle
    pub fn verifying_key(&self) -> VerifyingKey {
        self.key.verifying_key()
    }
}

#[async_trait::async_trait]
impl AuthorizationSigner for LocalSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign_authorization(
        &self,
        authorization: &DecryptionAuthorization,
    ) -> Result<Vec<u8>> {
        let digest = authorization.signing_digest(self.address);
        Ok(self.key.sign(&digest).to_bytes().to_vec())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature, Verifier};

    fn sample_authorization() -> DecryptionAuthorization {
        DecryptionAuthorization {
            public_key: [3u8; 32],
            contracts: vec![Address::from_bytes([9u8; 20])],
            start_time: 1_700_000_000,
            duration_days: 10,
        }
    }

    #[test]
    fn test_validity_window() {
        let auth = sample_authorization();
        assert_eq!(auth.expires_at(), 1_700_000_000 + 10 * 86_400);
        assert!(auth.is_valid_at(auth.start_time));
        assert!(auth.is_valid_at(auth.expires_at() - 1));
        assert!(!auth.is_valid_at(auth.start_time - 1));
        assert!(!auth.is_valid_at(auth.expires_at()));
    }

    #[test]
    fn test_digest_commits_to_every_field() {
        let requester = Address::from_bytes([1u8; 20]);
        let base = sample_authorization();
        let digest = base.signing_digest(requester);

        let mut other_key = base.clone();
        other_key.public_key = [4u8; 32];
        assert_ne!(digest, other_key.signing_digest(requester));

        let mut other_scope = base.clone();
        other_scope.contracts = vec![Address::from_bytes([8u8; 20])];
        assert_ne!(digest, other_scope.signing_digest(requester));

        let mut other_window = base.clone();
        other_window.start_time += 1;
        assert_ne!(digest, other_window.signing_digest(requester));

        let mut other_duration = base.clone();
        other_duration.duration_days += 1;
        assert_ne!(digest, other_duration.signing_digest(requester));

        assert_ne!(
            digest,
            base.signing_digest(Address::from_bytes([2u8; 20]))
        );
    }

    #[test]
    fn test_ephemeral_keypairs_are_unique() {
        let a = EphemeralKeypair::generate();
        let b = EphemeralKeypair::generate();
        assert_ne!(a.public_bytes(), b.public_bytes());
    }

    #[tokio::test]
    async fn test_local_signer_produces_verifiable_signature() {
        let signer = LocalSigner::random();
        let auth = sample_authorization();

        let bytes = signer.sign_authorization(&auth).await.unwrap();
        let signature = Signature::from_slice(&bytes).unwrap();
        let digest = auth.signing_digest(signer.address());

        assert!(signer.verifying_key().verify(&digest, &signature).is_ok());

        // Not valid for a different requester's digest
        let other_digest = auth.signing_digest(Address::random());
        assert!(signer
            .verifying_key()
            .verify(&other_digest, &signature)
            .is_err());
    }
}
