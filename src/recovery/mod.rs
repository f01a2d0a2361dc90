//! # Key Recovery Module
//!
//! The off-ledger handshake that turns a grant-gated homomorphic ciphertext
//! handle into clear group key material.
//!
//! ## Handshake
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     KEY RECOVERY HANDSHAKE                              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  REQUESTER (group member)                                              │
//! │  ─────────────────────────────────────────────────────────────          │
//! │                                                                         │
//! │  1. Generate fresh single-use x25519 keypair (pub, priv)               │
//! │                                                                         │
//! │  2. Build DecryptionAuthorization                                      │
//! │     ┌───────────────────────────────────────────────────────────┐      │
//! │     │  public_key   = pub                                       │      │
//! │     │  contracts    = { group ledger contract }                 │      │
//! │     │  start_time   = now                                       │      │
//! │     │  duration     = 10 days (configurable)                    │      │
//! │     └───────────────────────────────────────────────────────────┘      │
//! │                                                                         │
//! │  3. Sign the authorization (domain-separated structured digest)        │
//! │     — may wait on a human wallet approval: an explicit async           │
//! │       suspend point, cancellable by dropping the future                │
//! │                                                                         │
//! │  4. Submit {handle, contract}, priv, pub, signature, scope,            │
//! │     requester, window to the decryption oracle                         │
//! │                                                                         │
//! │  ORACLE                                                                │
//! │  ─────────────────────────────────────────────────────────────          │
//! │                                                                         │
//! │  5. Verify signature, window, and scope; consult the grant ACL;        │
//! │     return handle → clear value for every GRANTED handle               │
//! │                                                                         │
//! │  6. Absence of the requested handle in the result = access denied      │
//! │     (the requester holds no grant — NOT a transient fault)             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The handshake performs no ledger writes; cancelling it mid-flight has no
//! side effects. The ephemeral keypair is never reused across attempts and
//! never persisted.

mod authorization;
mod client;
mod oracle;

pub use authorization::{
    AuthorizationSigner, DecryptionAuthorization, EphemeralKeypair, LocalSigner, RecoveryConfig,
    DEFAULT_DURATION_DAYS,
};
pub use client::KeyRecoveryClient;
pub use oracle::{DecryptionOracle, HandleContractPair, InMemoryOracle, UserDecryptRequest};
