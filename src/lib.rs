//! # Murmur Core
//!
//! Confidential group messaging over a public append-only ledger.
//!
//! Groups, membership, and message envelopes live in plain sight on the
//! ledger; the one secret — each group's symmetric key material — is stored
//! only as a homomorphic ciphertext handle, and every membership change
//! extends a decryption grant in the same atomic transition. Members recover
//! the key material through an off-ledger oracle handshake and decrypt
//! locally.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          MURMUR ARCHITECTURE                            │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │                        ┌──────────────────┐                             │
//! │                        │   GroupSession   │  client                     │
//! │                        │  create / join / │                             │
//! │                        │  send / read     │                             │
//! │                        └────────┬─────────┘                             │
//! │              ┌──────────────────┼──────────────────┐                    │
//! │              ▼                  ▼                  ▼                    │
//! │  ┌────────────────────┐ ┌──────────────┐ ┌──────────────────┐          │
//! │  │  LedgerConnection  │ │    crypto    │ │ KeyRecoveryClient│          │
//! │  │  (async trait)     │ │ SHA-256 KDF  │ │  authorization + │          │
//! │  └─────────┬──────────┘ │ AES-256-GCM  │ │  oracle request  │          │
//! │            ▼            │  envelopes   │ └────────┬─────────┘          │
//! │  ┌────────────────────┐ └──────────────┘          ▼                    │
//! │  │    GroupLedger     │                 ┌──────────────────┐           │
//! │  │  groups/members/   │                 │ DecryptionOracle │           │
//! │  │  message log       │                 │  (async trait)   │           │
//! │  └─────────┬──────────┘                 └────────┬─────────┘           │
//! │            ▼                                     ▼                     │
//! │  ┌─────────────────────────────────────────────────────────┐           │
//! │  │          Homomorphic substrate (KeyVault / ACL)         │           │
//! │  │   the only party ever holding clear group key material  │           │
//! │  └─────────────────────────────────────────────────────────┘           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use parking_lot::RwLock;
//! use murmur_core::{
//!     Address, AuthorizationSigner, GroupLedger, GroupSession, InMemoryFhe,
//!     InMemoryOracle, InProcessLedger, LocalSigner, SessionConfig,
//! };
//!
//! # async fn demo() -> murmur_core::Result<()> {
//! let fhe = InMemoryFhe::new();
//! let contract = Address::random();
//! let ledger = Arc::new(RwLock::new(GroupLedger::new(contract, Arc::new(fhe.clone()))));
//! let oracle = InMemoryOracle::shared(fhe.clone());
//!
//! let signer = LocalSigner::random();
//! oracle.register_signer(signer.address(), signer.verifying_key());
//!
//! let session = GroupSession::new(
//!     Arc::new(InProcessLedger::new(ledger, signer.address())),
//!     Arc::new(fhe),
//!     oracle,
//!     Arc::new(signer),
//!     contract,
//!     SessionConfig::default(),
//! )?;
//!
//! let group_id = session.create_group("Team").await?;
//! session.send_message(group_id, "hello").await?;
//! # Ok(())
//! # }
//! ```
//!
//! There is no ambient global state: every component is constructed
//! explicitly and owned by the caller, so multiple independent sessions and
//! ledgers coexist in one process.

// ============================================================================
// MODULES
// ============================================================================

pub mod client;
pub mod crypto;
pub mod error;
pub mod ledger;
pub mod recovery;
pub mod substrate;
pub mod time;
pub mod types;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use client::{
    DecryptedMessage, GroupSession, GroupSummary, InProcessLedger, LedgerConnection,
    SessionConfig,
};
pub use crypto::{decrypt_envelope, derive_message_key, encrypt_envelope, SymmetricKey};
pub use error::{Error, Result};
pub use ledger::{GroupInfo, GroupLedger, LedgerEvent, StoredMessage};
pub use recovery::{
    AuthorizationSigner, DecryptionAuthorization, DecryptionOracle, InMemoryOracle,
    KeyRecoveryClient, LocalSigner, RecoveryConfig,
};
pub use substrate::memory::InMemoryFhe;
pub use substrate::{ExternalEncryptedKey, KeyEncryptor, KeyVault};
pub use types::{Address, CiphertextHandle};
