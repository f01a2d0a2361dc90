//! # Client Module
//!
//! The high-level member session: everything a participant does, bound
//! together over the ledger connection, the substrate encryptor, and the
//! key-recovery handshake.
//!
//! ## Session Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         GROUP SESSION FLOW                              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  CREATE                                                                │
//! │  ──────                                                                 │
//! │  mint 20-byte key material ─► encrypt client-side (handle + proof)     │
//! │  ─► createGroup transition ─► derive cipher key locally (fast path:    │
//! │  the creator never needs the oracle for its own group)                 │
//! │                                                                         │
//! │  JOIN + READ                                                           │
//! │  ───────────                                                            │
//! │  joinGroup transition (membership + decryption grant, atomically)      │
//! │  ─► key-recovery handshake ─► derive cipher key ─► decrypt envelopes   │
//! │                                                                         │
//! │  CACHING (session lifetime only, never persisted)                      │
//! │  ────────────────────────────────────────────────                       │
//! │  keys:       group_id → cipher key          (unbounded: keys never     │
//! │                                              rotate, one per group)    │
//! │  plaintexts: (group_id, index) → text       (bounded, insertion-order  │
//! │                                              eviction)                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Catalog reads (`list_groups`, `list_messages`) issue per-item requests
//! concurrently and reconcile purely by the entity's own id/index — results
//! may resolve in any order.

mod cache;
mod connection;

pub use connection::{InProcessLedger, LedgerConnection};

use std::sync::Arc;

use futures::future::try_join_all;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::client::cache::BoundedCache;
use crate::crypto::{decrypt_envelope, derive_message_key, encrypt_envelope, SymmetricKey};
use crate::error::{Error, Result};
use crate::ledger::GroupInfo;
use crate::recovery::{
    AuthorizationSigner, DecryptionOracle, KeyRecoveryClient, RecoveryConfig,
};
use crate::substrate::KeyEncryptor;
use crate::types::Address;

/// Default capacity of the decrypted-plaintext cache
pub const DEFAULT_PLAINTEXT_CACHE_CAPACITY: usize = 1024;

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Key-recovery handshake settings
    pub recovery: RecoveryConfig,
    /// Capacity of the decrypted-plaintext cache (0 disables it)
    pub plaintext_cache_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            recovery: RecoveryConfig::default(),
            plaintext_cache_capacity: DEFAULT_PLAINTEXT_CACHE_CAPACITY,
        }
    }
}

/// A group entry from [`GroupSession::list_groups`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// The group's id
    pub group_id: u64,
    /// The group's public view
    pub info: GroupInfo,
}

/// A decrypted message from the session's perspective
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptedMessage {
    /// Message index within the group's log
    pub index: u64,
    /// Sending member
    pub sender: Address,
    /// Send timestamp captured by the ledger
    pub timestamp: i64,
    /// Decrypted message body
    pub text: String,
}

/// A participant's session against one group ledger contract
///
/// Owns the session-lifetime caches; a fresh process starts empty and
/// re-runs the key-recovery handshake per group on first use.
pub struct GroupSession {
    ledger: Arc<dyn LedgerConnection>,
    encryptor: Arc<dyn KeyEncryptor>,
    recovery: KeyRecoveryClient,
    contract: Address,
    keys: Mutex<std::collections::HashMap<u64, SymmetricKey>>,
    plaintexts: Mutex<BoundedCache<(u64, u64), String>>,
}

impl std::fmt::Debug for GroupSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupSession")
            .field("contract", &self.contract)
            .finish_non_exhaustive()
    }
}

impl GroupSession {
    /// Create a session
    ///
    /// The signer's address must match the connection's caller — the ledger
    /// records transitions under one identity, the oracle authorizes the
    /// other, and the protocol only works when they are the same. A
    /// mismatched pair would write as one identity while recovering keys as
    /// another, so construction fails with
    /// [`Error::SignerCallerMismatch`] instead of producing a split session.
    pub fn new(
        ledger: Arc<dyn LedgerConnection>,
        encryptor: Arc<dyn KeyEncryptor>,
        oracle: Arc<dyn DecryptionOracle>,
        signer: Arc<dyn AuthorizationSigner>,
        contract: Address,
        config: SessionConfig,
    ) -> Result<Self> {
        if ledger.caller() != signer.address() {
            return Err(Error::SignerCallerMismatch {
                caller: ledger.caller(),
                signer: signer.address(),
            });
        }

        let recovery = KeyRecoveryClient::new(oracle, signer, contract, config.recovery);
        Ok(Self {
            ledger,
            encryptor,
            recovery,
            contract,
            keys: Mutex::new(std::collections::HashMap::new()),
            plaintexts: Mutex::new(BoundedCache::new(config.plaintext_cache_capacity)),
        })
    }

    /// The address this session acts as
    pub fn address(&self) -> Address {
        self.ledger.caller()
    }

    // ========================================================================
    // TRANSITIONS
    // ========================================================================

    /// Create a group and seed its cipher key locally
    ///
    /// Mints fresh 20-byte key material, encrypts it client-side into an
    /// external ciphertext bound to this caller and contract, and submits
    /// the `createGroup` transition. The derived cipher key is cached
    /// immediately — the creator never runs the oracle handshake for its
    /// own group.
    pub async fn create_group(&self, name: &str) -> Result<u64> {
        let material = Address::random();
        let encrypted =
            self.encryptor
                .encrypt_key_material(&material, self.address(), self.contract)?;

        let group_id = self.ledger.create_group(name, encrypted).await?;

        self.keys
            .lock()
            .insert(group_id, derive_message_key(&material));

        tracing::info!(group_id, name, "group created and key cached");
        Ok(group_id)
    }

    /// Join a group
    pub async fn join_group(&self, group_id: u64) -> Result<()> {
        self.ledger.join_group(group_id).await
    }

    /// Encrypt and send a message to a group
    ///
    /// Recovers the group key first if this session does not hold it yet.
    pub async fn send_message(&self, group_id: u64, text: &str) -> Result<u64> {
        let key = self.group_key(group_id).await?;
        let envelope = encrypt_envelope(text, &key)?;

        let index = self.ledger.send_message(group_id, envelope).await?;
        self.plaintexts
            .lock()
            .insert((group_id, index), text.to_owned());

        Ok(index)
    }

    // ========================================================================
    // READS
    // ========================================================================

    /// Fetch and decrypt one message
    pub async fn read_message(&self, group_id: u64, index: u64) -> Result<String> {
        if let Some(text) = self.plaintexts.lock().get(&(group_id, index)) {
            tracing::debug!(group_id, index, "plaintext cache hit");
            return Ok(text.clone());
        }

        let stored = self.ledger.get_message(group_id, index).await?;
        let key = self.group_key(group_id).await?;
        let text = decrypt_envelope(&stored.ciphertext, &key)?;

        self.plaintexts
            .lock()
            .insert((group_id, index), text.clone());
        Ok(text)
    }

    /// Fetch every group's public view, concurrently per group
    pub async fn list_groups(&self) -> Result<Vec<GroupSummary>> {
        let count = self.ledger.group_count().await?;

        let mut groups = try_join_all((1..=count).map(|group_id| async move {
            Ok::<_, Error>(GroupSummary {
                group_id,
                info: self.ledger.get_group(group_id).await?,
            })
        }))
        .await?;

        // Reads may resolve in any order; reconcile by id
        groups.sort_by_key(|summary| summary.group_id);
        Ok(groups)
    }

    /// Fetch and decrypt a group's full message log, concurrently per message
    pub async fn list_messages(&self, group_id: u64) -> Result<Vec<DecryptedMessage>> {
        // Resolve the key once up front so per-message tasks share it
        let key = self.group_key(group_id).await?;
        let count = self.ledger.message_count(group_id).await?;

        let key = &key;
        let mut messages = try_join_all((0..count).map(|index| async move {
            let stored = self.ledger.get_message(group_id, index).await?;

            let text = match self.plaintexts.lock().get(&(group_id, index)) {
                Some(text) => text.clone(),
                None => decrypt_envelope(&stored.ciphertext, key)?,
            };
            self.plaintexts
                .lock()
                .insert((group_id, index), text.clone());

            Ok::<_, Error>(DecryptedMessage {
                index,
                sender: stored.sender,
                timestamp: stored.timestamp,
                text,
            })
        }))
        .await?;

        messages.sort_by_key(|message| message.index);
        Ok(messages)
    }

    /// Whether this session's address is currently a member
    pub async fn is_member(&self, group_id: u64) -> Result<bool> {
        self.ledger.is_member(group_id, self.address()).await
    }

    // ========================================================================
    // KEY MANAGEMENT
    // ========================================================================

    /// Resolve the group's cipher key, running the recovery handshake on a
    /// cache miss
    ///
    /// When the oracle denies access, membership state disambiguates the
    /// failure: a non-member gets [`Error::NotMember`] (permanent until they
    /// join), a member gets the raw [`Error::DecryptionUnavailable`] (the
    /// grant exists, so something else is wrong — worth retrying or
    /// reporting).
    pub async fn group_key(&self, group_id: u64) -> Result<SymmetricKey> {
        if let Some(key) = self.keys.lock().get(&group_id) {
            tracing::debug!(group_id, "group key cache hit");
            return Ok(key.clone());
        }

        let handle = self.ledger.get_group_encrypted_key(group_id).await?;

        let material = match self.recovery.recover_key(&handle).await {
            Ok(material) => material,
            Err(denied @ Error::DecryptionUnavailable { .. }) => {
                if self.ledger.is_member(group_id, self.address()).await? {
                    return Err(denied);
                }
                return Err(Error::NotMember {
                    group_id,
                    member: self.address(),
                });
            }
            Err(other) => return Err(other),
        };

        let key = derive_message_key(&material);
        self.keys.lock().insert(group_id, key.clone());
        Ok(key)
    }
}

// ============================================================================
// TESTS
// ============================================================================
