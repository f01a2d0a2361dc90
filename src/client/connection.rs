//! # Ledger Connection
//!
//! The client's view of the group ledger program: its full contract surface
//! as an async trait, bound to a caller address (a connected wallet, in
//! production terms).
//!
//! The bundled [`InProcessLedger`] wraps a [`GroupLedger`] instance behind a
//! lock — enough for tests, local development, and embedding; a networked
//! implementation would submit transactions and read node state instead.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::ledger::{GroupInfo, GroupLedger, StoredMessage};
use crate::substrate::ExternalEncryptedKey;
use crate::types::{Address, CiphertextHandle};

/// An authenticated connection to the group ledger program
///
/// Mutating calls submit consensus-ordered transitions as `caller()`;
/// read-only calls may be issued concurrently and resolve in any order —
/// results carry their own id/index, and callers reconcile by those.
#[async_trait::async_trait]
pub trait LedgerConnection: Send + Sync {
    /// The address transitions are submitted as
    fn caller(&self) -> Address;

    /// Submit a `createGroup` transition
    async fn create_group(
        &self,
        name: &str,
        encrypted_key: ExternalEncryptedKey,
    ) -> Result<u64>;

    /// Submit a `joinGroup` transition
    async fn join_group(&self, group_id: u64) -> Result<()>;

    /// Submit a `sendMessage` transition
    async fn send_message(&self, group_id: u64, ciphertext: String) -> Result<u64>;

    /// Read the number of groups
    async fn group_count(&self) -> Result<u64>;

    /// Read a group's public view
    async fn get_group(&self, group_id: u64) -> Result<GroupInfo>;

    /// Read the handle of a group's encrypted key
    async fn get_group_encrypted_key(&self, group_id: u64) -> Result<CiphertextHandle>;

    /// Read a group's message count
    async fn message_count(&self, group_id: u64) -> Result<u64>;

    /// Read a stored message
    async fn get_message(&self, group_id: u64, index: u64) -> Result<StoredMessage>;

    /// Check membership
    async fn is_member(&self, group_id: u64, user: Address) -> Result<bool>;
}

/// An in-process connection to a shared [`GroupLedger`]
///
/// The lock stands in for consensus ordering: transitions acquire it
/// exclusively and apply atomically.
pub struct InProcessLedger {
    ledger: Arc<RwLock<GroupLedger>>,
    caller: Address,
}

impl InProcessLedger {
    /// Connect to `ledger` as `caller`
    pub fn new(ledger: Arc<RwLock<GroupLedger>>, caller: Address) -> Self {
        Self { ledger, caller }
    }
}

#[async_trait::async_trait]
impl LedgerConnection for InProcessLedger {
    fn caller(&self) -> Address {
        self.caller
    }

    async fn create_group(
        &self,
        name: &str,
        encrypted_key: ExternalEncryptedKey,
    ) -> Result<u64> {
        self.ledger
            .write()
            .create_group(self.caller, name, &encrypted_key)
    }

    async fn join_group(&self, group_id: u64) -> Result<()> {
        self.ledger.write().join_group(self.caller, group_id)
    }

    async fn send_message(&self, group_id: u64, ciphertext: String) -> Result<u64> {
        self.ledger
            .write()
            .send_message(self.caller, group_id, &ciphertext)
    }

    async fn group_count(&self) -> Result<u64> {
        Ok(self.ledger.read().group_count())
    }

    async fn get_group(&self, group_id: u64) -> Result<GroupInfo> {
        self.ledger.read().get_group(group_id)
    }

    async fn get_group_encrypted_key(&self, group_id: u64) -> Result<CiphertextHandle> {
        self.ledger.read().get_group_encrypted_key(group_id)
    }

    async fn message_count(&self, group_id: u64) -> Result<u64> {
        self.ledger.read().message_count(group_id)
    }

    async fn get_message(&self, group_id: u64, index: u64) -> Result<StoredMessage> {
        self.ledger.read().get_message(group_id, index)
    }

    async fn is_member(&self, group_id: u64, user: Address) -> Result<bool> {
        Ok(self.ledger.read().is_member(group_id, user))
    }
}
