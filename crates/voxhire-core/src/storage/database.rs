//! Database connection and migrations

use std::path::Path;

use anyhow::Result;
use rusqlite::Connection;

/// SQLite database handle.
///
/// Connections are cheap to open; callers that need storage from async
/// contexts open one per operation rather than sharing a connection across
/// threads.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (creating if needed) and migrate the database at `path`.
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Self::migrate(&conn)?;

        Ok(Self { conn })
    }

    /// Get reference to the underlying connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn migrate(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS interviews (
                 id                   TEXT PRIMARY KEY,
                 candidate_name       TEXT NOT NULL,
                 candidate_email      TEXT,
                 professional_summary TEXT NOT NULL,
                 skills               TEXT NOT NULL,
                 status               TEXT NOT NULL DEFAULT 'in_progress',
                 final_score          REAL,
                 justification        TEXT,
                 created_at           TEXT NOT NULL,
                 updated_at           TEXT NOT NULL
             );

             CREATE TABLE IF NOT EXISTS answers (
                 id               INTEGER PRIMARY KEY AUTOINCREMENT,
                 interview_id     TEXT NOT NULL REFERENCES interviews(id) ON DELETE CASCADE,
                 question_number  INTEGER NOT NULL,
                 topic            TEXT NOT NULL,
                 difficulty       TEXT NOT NULL,
                 question         TEXT NOT NULL,
                 answer           TEXT NOT NULL,
                 technical_score  REAL NOT NULL,
                 clarity_score    REAL NOT NULL,
                 confidence_score REAL NOT NULL,
                 feedback         TEXT NOT NULL,
                 created_at       TEXT NOT NULL
             );

             CREATE TABLE IF NOT EXISTS throttle_state (
                 key   TEXT PRIMARY KEY,
                 value TEXT NOT NULL
             );",
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_and_migrates_a_fresh_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(&dir.path().join("test.db")).unwrap();

        // All three tables exist
        let count: i64 = db
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('interviews', 'answers', 'throttle_state')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn reopening_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        Database::new(&path).unwrap();
        Database::new(&path).unwrap();
    }
}
