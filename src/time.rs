//! Time utilities.
//!
//! Ledger transitions capture timestamps at apply time; the key-recovery
//! authorization window is anchored at the current Unix time.

/// Returns the current Unix timestamp in seconds.
pub fn now_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}
