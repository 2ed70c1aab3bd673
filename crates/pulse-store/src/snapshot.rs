use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use pulse_types::{FeedbackRecord, Identity};
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::error::{Result, StoreError};
use crate::migrations;

const SESSION_KEY: &str = "session";
const FEEDBACK_KEY: &str = "feedback";

/// What survives a reload: who is signed in and the admin's catalog overlays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub identity: Option<Identity>,
    #[serde(default)]
    pub hidden_ids: Vec<String>,
    #[serde(default)]
    pub featured_ids: Vec<String>,
}

/// Local durable key-value storage for the session snapshot and the
/// checkpointed feedback list.
pub struct SnapshotStore {
    conn: Mutex<Connection>,
}

impl SnapshotStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        migrations::run(&conn)?;

        info!("Session snapshot opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        f(&conn)
    }

    /// Read the snapshot. Missing or unreadable data yields the empty snapshot.
    pub fn load(&self) -> Result<SessionSnapshot> {
        Ok(self.read_json(SESSION_KEY)?.unwrap_or_default())
    }

    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        self.write_json(SESSION_KEY, snapshot)
    }

    pub fn checkpoint_feedback(&self, records: &[FeedbackRecord]) -> Result<()> {
        self.write_json(FEEDBACK_KEY, records)
    }

    pub fn load_feedback(&self) -> Result<Vec<FeedbackRecord>> {
        Ok(self.read_json(FEEDBACK_KEY)?.unwrap_or_default())
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let raw: Option<String> = self.with_conn(|conn| {
            Ok(conn
                .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
                .optional()?)
        })?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Discarding unreadable snapshot value for '{}': {}", key, e);
                Ok(None)
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        let now = Utc::now().to_rfc3339();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                (key, &json, &now),
            )?;
            Ok(())
        })
    }
}
