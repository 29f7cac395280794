//! Cache-backed state-vector series.
//!
//! The series lives in a single SQLite table keyed by canonical epoch key.
//! It is populated in one bulk ingest the first time it is needed and is
//! never refreshed afterwards unless [`SeriesStore::clear`] empties it.

use crate::codec;
use orbit_core::{EpochKey, Error, Result, StateVector};
use orbit_ingestion::{FeedParser, FeedSource};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS state_vectors (
    epoch_key TEXT PRIMARY KEY NOT NULL,
    record    TEXT NOT NULL
)";

fn db_err(e: rusqlite::Error) -> Error {
    Error::database(e.to_string())
}

fn insert_all(conn: &Mutex<Connection>, vectors: &[StateVector]) -> Result<usize> {
    let mut conn = conn.lock();
    let tx = conn.transaction().map_err(db_err)?;
    {
        let mut stmt = tx
            .prepare("INSERT OR REPLACE INTO state_vectors (epoch_key, record) VALUES (?1, ?2)")
            .map_err(db_err)?;
        for sv in vectors {
            let record = codec::encode(sv)?;
            stmt.execute(params![sv.key().to_string(), record])
                .map_err(db_err)?;
        }
    }
    tx.commit().map_err(db_err)?;
    Ok(vectors.len())
}

/// Load-once state-vector cache.
pub struct SeriesStore {
    /// Backing connection, locked per statement.
    conn: Arc<Mutex<Connection>>,
    /// Upstream document source.
    source: Arc<dyn FeedSource>,
    parser: FeedParser,
    /// Single-flight guard for the populate step, holding the last failure.
    populate: tokio::sync::Mutex<Option<Error>>,
    /// Finished populate attempts.
    attempts: AtomicU64,
}

impl SeriesStore {
    /// Open a file-backed store, creating the table if needed.
    pub fn open(path: impl AsRef<Path>, source: Arc<dyn FeedSource>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(db_err)?;
        info!(path = %path.display(), "opened series cache");
        Self::with_connection(conn, source)
    }

    /// Open a store that lives only as long as the process.
    pub fn open_in_memory(source: Arc<dyn FeedSource>) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Self::with_connection(conn, source)
    }

    fn with_connection(conn: Connection, source: Arc<dyn FeedSource>) -> Result<Self> {
        conn.execute(SCHEMA, []).map_err(db_err)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            source,
            parser: FeedParser::new(),
            populate: tokio::sync::Mutex::new(None),
            attempts: AtomicU64::new(0),
        })
    }

    /// Populate the store from the feed if it is empty.
    ///
    /// Concurrent callers on a cold store share a single fetch: callers that
    /// queued while an attempt was running get that attempt's outcome, error
    /// included, instead of fetching again. A populated store is never
    /// refreshed. Returns the number of records held afterwards.
    pub async fn ensure_loaded(&self) -> Result<usize> {
        let count = self.count()?;
        if count > 0 {
            return Ok(count);
        }

        let seen = self.attempts.load(Ordering::Acquire);
        let mut last_failure = self.populate.lock().await;

        // Another caller may have populated while we waited.
        let count = self.count()?;
        if count > 0 {
            debug!(count, "series populated by a concurrent caller");
            return Ok(count);
        }
        if self.attempts.load(Ordering::Acquire) != seen {
            debug!("reusing outcome of a concurrent ingest");
            return match last_failure.as_ref() {
                Some(e) => Err(e.clone()),
                None => Ok(count),
            };
        }

        let outcome = self.ingest().await;
        *last_failure = outcome.as_ref().err().cloned();
        self.attempts.fetch_add(1, Ordering::Release);
        outcome
    }

    /// Fetch, parse and store the feed. Caller holds the populate guard.
    async fn ingest(&self) -> Result<usize> {
        info!(source = %self.source.describe(), "series cache is empty, ingesting feed");
        let document = self.source.fetch().await?;
        let vectors = self.parser.parse(&document).map_err(|e| {
            error!("feed rejected: {e}");
            e
        })?;
        let parsed = vectors.len();

        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || insert_all(&conn, &vectors))
            .await
            .map_err(|e| Error::database(format!("ingest task failed: {e}")))??;

        let count = self.count()?;
        info!(parsed, stored = count, "series cache populated");
        Ok(count)
    }

    /// Insert every record in one transaction, keyed by truncated epoch.
    ///
    /// Records sharing a key overwrite each other in input order.
    pub fn bulk_load(&self, vectors: &[StateVector]) -> Result<usize> {
        insert_all(&self.conn, vectors)
    }

    /// Every cached record in chronological order.
    pub fn get_all(&self) -> Result<Vec<StateVector>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare("SELECT record FROM state_vectors ORDER BY epoch_key")
            .map_err(db_err)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(db_err)?;

        let mut vectors = Vec::new();
        for row in rows {
            vectors.push(codec::decode(&row.map_err(db_err)?)?);
        }
        Ok(vectors)
    }

    /// Look up a record by epoch (feed layout or key layout).
    ///
    /// Sub-second precision in the request is dropped before the exact-key lookup.
    pub fn get_by_epoch(&self, epoch: &str) -> Result<StateVector> {
        let key: EpochKey = epoch.parse()?;
        self.get(&key)?
            .ok_or_else(|| Error::not_found(format!("no state vector at epoch {key}")))
    }

    /// Look up a record by key.
    pub fn get(&self, key: &EpochKey) -> Result<Option<StateVector>> {
        let conn = self.conn.lock();
        let raw: Option<String> = conn
            .query_row(
                "SELECT record FROM state_vectors WHERE epoch_key = ?1",
                params![key.to_string()],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_err)?;
        raw.as_deref().map(codec::decode).transpose()
    }

    /// Whether a record exists under `key`.
    pub fn contains(&self, key: &EpochKey) -> Result<bool> {
        let conn = self.conn.lock();
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM state_vectors WHERE epoch_key = ?1",
                params![key.to_string()],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_err)?;
        Ok(found.is_some())
    }

    /// Number of cached records.
    pub fn count(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM state_vectors", [], |row| row.get(0))
            .map_err(db_err)?;
        Ok(n as usize)
    }

    /// Drop every record so the next access re-ingests the feed.
    pub fn clear(&self) -> Result<()> {
        let conn = self.conn.lock();
        let removed = conn
            .execute("DELETE FROM state_vectors", [])
            .map_err(db_err)?;
        info!(removed, "series cache cleared");
        Ok(())
    }
}
