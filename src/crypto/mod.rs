//! # Cryptography Module
//!
//! Cryptographic primitives for the message layer.
//!
//! ## Encryption Scheme
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    MESSAGE CIPHER ARCHITECTURE                          │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    KEY DERIVATION                               │   │
//! │  ├─────────────────────────────────────────────────────────────────┤   │
//! │  │                                                                 │   │
//! │  │  Group Key Material (20 bytes, address-shaped)                 │   │
//! │  │  • minted randomly by the group creator                        │   │
//! │  │  • stored on the ledger only as an FHE ciphertext              │   │
//! │  │  • recovered by members through the decryption oracle          │   │
//! │  │                          │                                      │   │
//! │  │                          ▼                                      │   │
//! │  │  SHA-256(raw 20 bytes) ──► 256-bit AES-GCM key                 │   │
//! │  │                                                                 │   │
//! │  │  Deterministic by design: same material, same key. The         │   │
//! │  │  entropy source is the FHE-protected material, not a user      │   │
//! │  │  password, so no salting or stretching is applied.             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 ENVELOPE FORMAT                                 │   │
//! │  ├─────────────────────────────────────────────────────────────────┤   │
//! │  │                                                                 │   │
//! │  │  AES-256-GCM                                                   │   │
//! │  │  • 96-bit nonce, random per message (never reused)             │   │
//! │  │  • 128-bit authentication tag                                  │   │
//! │  │                                                                 │   │
//! │  │  Wire form:  "v1:<base64 nonce>:<base64 ciphertext+tag>"       │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Algorithm Choices & Rationale
//!
//! | Algorithm | Purpose | Why Chosen |
//! |-----------|---------|------------|
//! | AES-256-GCM | Message encryption | Hardware acceleration, AEAD |
//! | SHA-256 | Key derivation | Matches the 256-bit AES key exactly |
//! | X25519 | Oracle channel keypair | Fast, small, single-use friendly |
//! | Ed25519 | Authorization signatures | Deterministic, widely audited |

mod envelope;
mod kdf;

pub use envelope::{decrypt_envelope, encrypt_envelope, ENVELOPE_VERSION, NONCE_SIZE};
pub use kdf::{derive_message_key, derive_message_key_from_text, SymmetricKey, KEY_SIZE};
