//! Key-value persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! Components depend on the KvStore trait and never execute SQL directly.
//! Anything that persists state takes a store as a parameter, so tests
//! substitute MemoryStore.

use crate::error::CentreResult;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::sync::Mutex;

/// Storage keys for persisted client state. One fixed key per record.
pub const THRESHOLDS_KEY: &str = "command-centre-alert-thresholds";
pub const ALERT_HISTORY_KEY: &str = "command-centre-alert-history";
pub const THEME_KEY: &str = "command-centre-theme";
pub const API_KEY_KEY: &str = "command-centre-api-key";

/// Minimal durable string store. Values are JSON-serialized by callers.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> CentreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> CentreResult<()>;
    fn remove(&self, key: &str) -> CentreResult<()>;
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the state database at `path`.
    pub fn open(path: &str) -> CentreResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode: better concurrent read performance.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> CentreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> CentreResult<()> {
        self.conn.lock().expect("store lock poisoned").execute_batch(
            "CREATE TABLE IF NOT EXISTS kv_state (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )?;
        Ok(())
    }
}

impl KvStore for SqliteStore {
    fn get(&self, key: &str) -> CentreResult<Option<String>> {
        let conn = self.conn.lock().expect("store lock poisoned");
        let mut stmt = conn.prepare("SELECT value FROM kv_state WHERE key = ?1")?;
        let value = stmt
            .query_row(params![key], |row| row.get::<_, String>(0))
            .ok();
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> CentreResult<()> {
        let conn = self.conn.lock().expect("store lock poisoned");
        conn.execute(
            "INSERT INTO kv_state (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> CentreResult<()> {
        let conn = self.conn.lock().expect("store lock poisoned");
        conn.execute("DELETE FROM kv_state WHERE key = ?1", params![key])?;
        Ok(())
    }
}

/// In-memory store for tests and for running with durable storage
/// unavailable. Persistence-touching components degrade to defaults
/// rather than failing when the backing store is gone.
#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> CentreResult<Option<String>> {
        Ok(self.map.lock().expect("map lock poisoned").get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CentreResult<()> {
        self.map
            .lock()
            .expect("map lock poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CentreResult<()> {
        self.map.lock().expect("map lock poisoned").remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_round_trip() {
        let store = SqliteStore::in_memory().unwrap();
        assert_eq!(store.get("missing").unwrap(), None);
        store.set("k", "v1").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v1"));
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn memory_round_trip() {
        let store = MemoryStore::new();
        store.set("theme", "dark").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        store.remove("theme").unwrap();
        assert_eq!(store.get("theme").unwrap(), None);
    }
}
