//! Durable cooldown timestamp for the request governor

use std::path::PathBuf;

use rusqlite::params;

use super::database::Database;
use crate::governor::{CooldownStore, StoreError};

const LAST_CALL_KEY: &str = "last_call_time_millis";

/// SQLite-backed [`CooldownStore`].
///
/// Opens a fresh connection per operation so the slot can be shared across
/// threads and processes; the governor reconciles whatever value it finds
/// before each admission.
pub struct ThrottleSlot {
    db_path: PathBuf,
}

impl ThrottleSlot {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    fn open(&self) -> Result<Database, StoreError> {
        Database::new(&self.db_path).map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

impl CooldownStore for ThrottleSlot {
    fn read(&self) -> Result<Option<i64>, StoreError> {
        let db = self.open()?;
        let raw: Result<String, rusqlite::Error> = db.conn().query_row(
            "SELECT value FROM throttle_state WHERE key = ?1",
            [LAST_CALL_KEY],
            |row| row.get(0),
        );

        match raw {
            // A value that does not parse is treated as absent, not fatal.
            Ok(value) => Ok(value.parse::<i64>().ok()),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Unavailable(e.to_string())),
        }
    }

    fn write(&self, timestamp_millis: i64) -> Result<(), StoreError> {
        let db = self.open()?;
        db.conn()
            .execute(
                "INSERT OR REPLACE INTO throttle_state (key, value) VALUES (?1, ?2)",
                params![LAST_CALL_KEY, timestamp_millis.to_string()],
            )
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(())
    }
}
