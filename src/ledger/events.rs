//! # Ledger Events
//!
//! Append-only events emitted by successful state transitions. Off-ledger
//! observers (indexers, UIs, tests) reconcile against these rather than
//! polling full state.

use serde::{Deserialize, Serialize};

use crate::types::Address;

/// An event emitted by a committed ledger transition
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// A group was created
    GroupCreated {
        /// Id allocated to the new group
        group_id: u64,
        /// Address that created the group
        creator: Address,
        /// Group name
        name: String,
    },
    /// An address joined a group
    GroupJoined {
        /// The joined group
        group_id: u64,
        /// The new member
        member: Address,
    },
    /// A message was appended to a group's log
    MessageSent {
        /// The target group
        group_id: u64,
        /// Index assigned to the message
        index: u64,
        /// The sending member
        sender: Address,
    },
}
