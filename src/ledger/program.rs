//! # Group Ledger Program
//!
//! The state machine for groups, membership, encrypted key slots, and
//! message logs.
//!
//! ## State Lifecycle
//!
//! ```text
//! Groups:    does not exist ──createGroup──► exists            (no deletion)
//! Members:   not a member ────joinGroup────► member            (no removal)
//! Messages:  log length n ───sendMessage───► log length n + 1  (append-only)
//! ```
//!
//! All three relations are monotonic; the confidentiality argument relies on
//! it (a decryption grant, once extended, always corresponds to a recorded
//! member). Every mutating operation validates completely before touching
//! state — a failed transition leaves the program byte-identical to before.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ledger::LedgerEvent;
use crate::substrate::{ExternalEncryptedKey, KeyVault};
use crate::types::{Address, CiphertextHandle};

/// Public view of a group, as returned by [`GroupLedger::get_group`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupInfo {
    /// Group name, set once at creation
    pub name: String,
    /// Creating address (implicitly a member)
    pub creator: Address,
    /// Timestamp captured when the group was created
    pub created_at: i64,
    /// Current size of the member set
    pub member_count: u64,
}

/// A stored message, as returned by [`GroupLedger::get_message`]
///
/// The ciphertext is an opaque envelope; the ledger checks only that it is
/// non-empty and never inspects its content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    /// Member that sent the message
    pub sender: Address,
    /// Timestamp captured when the send transition was applied
    pub timestamp: i64,
    /// Opaque message envelope
    pub ciphertext: String,
}

/// Internal group record: registry entry + member set + message log
struct GroupRecord {
    name: String,
    creator: Address,
    created_at: i64,
    key_handle: CiphertextHandle,
    members: HashSet<Address>,
    messages: Vec<StoredMessage>,
}

/// The ledger-resident group program
///
/// Owns every `Group` and `Message` record exclusively; the host ledger's
/// transaction ordering serializes calls to the mutating methods. Group ids
/// are dense, 1-based, and never reused (the arena index is `id - 1`).
pub struct GroupLedger {
    /// Address this program instance is deployed at (proof binding target)
    contract: Address,
    /// Substrate custody of encrypted key material
    vault: Arc<dyn KeyVault>,
    groups: Vec<GroupRecord>,
    events: Vec<LedgerEvent>,
}

impl GroupLedger {
    /// Create a program instance deployed at `contract`, backed by `vault`
    pub fn new(contract: Address, vault: Arc<dyn KeyVault>) -> Self {
        Self {
            contract,
            vault,
            groups: Vec::new(),
            events: Vec::new(),
        }
    }

    /// The address this program instance is deployed at
    pub fn contract(&self) -> Address {
        self.contract
    }

    // ========================================================================
    // MUTATING TRANSITIONS
    // ========================================================================

    /// Create a group with a client-side encrypted symmetric key
    ///
    /// Verifies the key ciphertext's validity proof, allocates the next
    /// dense group id, records the creator as the first member, and grants
    /// the creator decryption rights over the stored handle — all in one
    /// transition.
    ///
    /// ## Errors
    ///
    /// - [`Error::EmptyGroupName`] if `name` is empty
    /// - [`Error::InvalidKeyProof`] if the proof does not attest a valid
    ///   ciphertext authored by `caller` for this contract
    pub fn create_group(
        &mut self,
        caller: Address,
        name: &str,
        encrypted_key: &ExternalEncryptedKey,
    ) -> Result<u64> {
        if name.is_empty() {
            return Err(Error::EmptyGroupName);
        }

        // Fallible substrate steps happen before any state is touched
        let key_handle = self
            .vault
            .import_external(encrypted_key, caller, self.contract)?;
        self.vault.grant_decrypt(&key_handle, caller)?;

        let group_id = self.groups.len() as u64 + 1;
        let mut members = HashSet::new();
        members.insert(caller);

        self.groups.push(GroupRecord {
            name: name.to_owned(),
            creator: caller,
            created_at: crate::time::now_timestamp(),
            key_handle,
            members,
            messages: Vec::new(),
        });

        self.events.push(LedgerEvent::GroupCreated {
            group_id,
            creator: caller,
            name: name.to_owned(),
        });

        tracing::info!(group_id, creator = %caller, name, "group created");
        Ok(group_id)
    }

    /// Join an existing group
    ///
    /// Adds the caller to the member set and extends the decryption grant on
    /// the group's key handle in the same transition — membership in the
    /// public registry and decryption authority over the secret key are
    /// never allowed to diverge.
    ///
    /// ## Errors
    ///
    /// - [`Error::GroupDoesNotExist`] if no such group
    /// - [`Error::AlreadyMember`] if the caller already belongs to it
    pub fn join_group(&mut self, caller: Address, group_id: u64) -> Result<()> {
        let record = self.record(group_id)?;
        if record.members.contains(&caller) {
            return Err(Error::AlreadyMember {
                group_id,
                member: caller,
            });
        }

        // Grant first (fallible), then record membership
        self.vault.grant_decrypt(&record.key_handle, caller)?;

        self.record_mut(group_id)?.members.insert(caller);
        self.events.push(LedgerEvent::GroupJoined {
            group_id,
            member: caller,
        });

        tracing::info!(group_id, member = %caller, "member joined");
        Ok(())
    }

    /// Append a message to a group's log
    ///
    /// ## Errors
    ///
    /// - [`Error::GroupDoesNotExist`] if no such group
    /// - [`Error::NotMember`] if the caller is not a member
    /// - [`Error::EmptyCiphertext`] if `ciphertext` is empty
    pub fn send_message(
        &mut self,
        caller: Address,
        group_id: u64,
        ciphertext: &str,
    ) -> Result<u64> {
        let record = self.record(group_id)?;
        if !record.members.contains(&caller) {
            return Err(Error::NotMember {
                group_id,
                member: caller,
            });
        }
        if ciphertext.is_empty() {
            return Err(Error::EmptyCiphertext);
        }

        let record = self.record_mut(group_id)?;
        let index = record.messages.len() as u64;
        record.messages.push(StoredMessage {
            sender: caller,
            timestamp: crate::time::now_timestamp(),
            ciphertext: ciphertext.to_owned(),
        });

        self.events.push(LedgerEvent::MessageSent {
            group_id,
            index,
            sender: caller,
        });

        tracing::info!(group_id, index, sender = %caller, "message appended");
        Ok(index)
    }

    // ========================================================================
    // READ-ONLY QUERIES
    // ========================================================================

    /// Number of groups created so far
    pub fn group_count(&self) -> u64 {
        self.groups.len() as u64
    }

    /// Public view of a group
    pub fn get_group(&self, group_id: u64) -> Result<GroupInfo> {
        let record = self.record(group_id)?;
        Ok(GroupInfo {
            name: record.name.clone(),
            creator: record.creator,
            created_at: record.created_at,
            member_count: record.members.len() as u64,
        })
    }

    /// Whether `user` is a member of the group
    ///
    /// Returns `false` for nonexistent groups — membership queries are
    /// total.
    pub fn is_member(&self, group_id: u64, user: Address) -> bool {
        self.record(group_id)
            .map(|record| record.members.contains(&user))
            .unwrap_or(false)
    }

    /// The opaque handle of the group's encrypted symmetric key
    pub fn get_group_encrypted_key(&self, group_id: u64) -> Result<CiphertextHandle> {
        Ok(self.record(group_id)?.key_handle)
    }

    /// Number of messages in the group's log
    pub fn message_count(&self, group_id: u64) -> Result<u64> {
        Ok(self.record(group_id)?.messages.len() as u64)
    }

    /// A stored message by `(group_id, index)`
    pub fn get_message(&self, group_id: u64, index: u64) -> Result<StoredMessage> {
        let record = self.record(group_id)?;
        record
            .messages
            .get(index as usize)
            .cloned()
            .ok_or(Error::MessageDoesNotExist { group_id, index })
    }

    /// All events emitted so far, in commit order
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    // ========================================================================
    // INTERNAL
    // ========================================================================

    fn record(&self, group_id: u64) -> Result<&GroupRecord> {
        group_id
            .checked_sub(1)
            .and_then(|idx| self.groups.get(idx as usize))
            .ok_or(Error::GroupDoesNotExist(group_id))
    }

    fn record_mut(&mut self, group_id: u64) -> Result<&mut GroupRecord> {
        group_id
            .checked_sub(1)
            .and_then(|idx| self.groups.get_mut(idx as usize))
            .ok_or(Error::GroupDoesNotExist(group_id))
    }
}

// ============================================================================
// TESTS
// ============================================================================
