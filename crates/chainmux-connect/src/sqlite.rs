//! SQLite-backed `KvStore` for durable ABI caching.
//!
//! ## Feature flag
//! Only compiled with the `sqlite` feature:
//! ```toml
//! chainmux-connect = { version = "0.1", features = ["sqlite"] }
//! ```

use rusqlite::{params, Connection};
use std::{
    path::Path,
    sync::{Arc, Mutex},
};
use tracing::warn;

use chainmux_core::KvStore;

/// File-backed key-value store on SQLite.
///
/// Thread-safe via an internal `Arc<Mutex<Connection>>`; WAL mode is
/// enabled for read concurrency. Store operations are infallible per
/// the `KvStore` contract, so write failures are logged and dropped —
/// the cache degrades to fetch-through.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS mux_kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// In-memory store (tests).
    pub fn in_memory() -> Result<Self, rusqlite::Error> {
        Self::open(":memory:")
    }
}

impl KvStore for SqliteStore {
    fn get(&self, key: &str) -> Option<String> {
        self.conn
            .lock()
            .unwrap()
            .query_row(
                "SELECT value FROM mux_kv WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .ok()
    }

    fn put(&self, key: &str, value: &str) {
        let result = self.conn.lock().unwrap().execute(
            "INSERT OR REPLACE INTO mux_kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        );
        if let Err(e) = result {
            warn!(error = %e, key, "sqlite put failed");
        }
    }

    fn remove(&self, key: &str) {
        let result = self
            .conn
            .lock()
            .unwrap()
            .execute("DELETE FROM mux_kv WHERE key = ?1", params![key]);
        if let Err(e) = result {
            warn!(error = %e, key, "sqlite remove failed");
        }
    }
}
