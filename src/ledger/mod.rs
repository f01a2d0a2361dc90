//! # Ledger Module
//!
//! The ledger-resident group state machine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        GROUP LEDGER PROGRAM                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────┐   ┌──────────────┐   ┌──────────────┐                 │
//! │  │   Groups    │   │  Membership  │   │  Message Log │                 │
//! │  │             │   │              │   │              │                 │
//! │  │ - dense ids │   │ - monotonic  │   │ - append-only│                 │
//! │  │ - immutable │   │ - creator    │   │ - dense per- │                 │
//! │  │   name/key  │   │   implicit   │   │   group index│                 │
//! │  └──────┬──────┘   └──────┬───────┘   └──────┬───────┘                 │
//! │         │                 │                  │                         │
//! │         └────────────┬────┴──────────────────┘                         │
//! │                      ▼                                                  │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  KeyVault (substrate)                                           │   │
//! │  │  • import + proof check at creation                             │   │
//! │  │  • decryption grant extended in the SAME transition as every    │   │
//! │  │    membership change — no window where a recorded member lacks  │   │
//! │  │    decrypt rights, or holds rights without being recorded       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The host ledger's consensus ordering is the only lock: transitions are
//! applied one at a time, atomically and completely. The program itself is a
//! plain struct with exclusive-mutation methods — callers inject and own the
//! instance, there is no ambient global state.

mod events;
mod program;

pub use events::LedgerEvent;
pub use program::{GroupInfo, GroupLedger, StoredMessage};
