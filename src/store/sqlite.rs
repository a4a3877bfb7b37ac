use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use rusqlite_migration::{Migrations, M};

use crate::app::{DriftError, Result};
use crate::domain::SourceState;
use crate::store::StateStore;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.lock()?;
        migrations
            .to_latest(&mut conn)
            .map_err(|_| DriftError::Store(rusqlite::Error::InvalidQuery))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            DriftError::Store(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| s.parse::<DateTime<Utc>>().ok())
    }
}

impl StateStore for SqliteStore {
    fn get(&self, source_id: &str) -> Result<Option<SourceState>> {
        let conn = self.lock()?;

        let result = conn
            .query_row(
                "SELECT fingerprint, etag, last_modified, last_seen_utc, last_item_key
                 FROM source_state WHERE source_id = ?1",
                params![source_id],
                |row| {
                    Ok(SourceState {
                        fingerprint: row.get(0)?,
                        etag: row.get(1)?,
                        last_modified: row.get(2)?,
                        last_seen_utc: row
                            .get::<_, String>(3)
                            .ok()
                            .and_then(|s| Self::parse_datetime(&s))
                            .unwrap_or_else(Utc::now),
                        last_item_key: row.get(4)?,
                    })
                },
            )
            .optional()?;

        Ok(result)
    }

    fn put(&self, source_id: &str, state: &SourceState) -> Result<()> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO source_state
                 (source_id, fingerprint, etag, last_modified, last_seen_utc, last_item_key)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(source_id) DO UPDATE SET
                 fingerprint = ?2,
                 etag = ?3,
                 last_modified = ?4,
                 last_seen_utc = ?5,
                 last_item_key = ?6",
            params![
                source_id,
                state.fingerprint,
                state.etag,
                state.last_modified,
                state.last_seen_utc.to_rfc3339(),
                state.last_item_key
            ],
        )?;

        Ok(())
    }
}
