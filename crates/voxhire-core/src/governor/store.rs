//! Durable cooldown state
//!
//! The governor shares one timestamp — the completion time of the last
//! provider call — across every job it runs, and that timestamp must survive
//! process restarts. The store is injected so production can back it with
//! SQLite while tests substitute an in-memory fake.

use parking_lot::Mutex;
use thiserror::Error;

/// Durable slot for the governor's last-call timestamp (epoch millis).
///
/// Implementations are best-effort: a failing store degrades the governor to
/// its in-memory timestamp, it never stops the admission loop.
pub trait CooldownStore: Send + Sync {
    /// Read the persisted timestamp, if any.
    fn read(&self) -> Result<Option<i64>, StoreError>;
    /// Persist a new timestamp.
    fn write(&self, millis: i64) -> Result<(), StoreError>;
}

/// Cooldown store failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// The durable slot could not be read or written
    #[error("cooldown store unavailable: {0}")]
    Unavailable(String),
}

/// In-memory cooldown store.
///
/// Used by tests and as a fallback when no database is configured. Offers no
/// durability across restarts.
#[derive(Default)]
pub struct MemoryCooldownStore {
    value: Mutex<Option<i64>>,
}

impl CooldownStore for MemoryCooldownStore {
    fn read(&self) -> Result<Option<i64>, StoreError> {
        Ok(*self.value.lock())
    }

    fn write(&self, millis: i64) -> Result<(), StoreError> {
        *self.value.lock() = Some(millis);
        Ok(())
    }
}
