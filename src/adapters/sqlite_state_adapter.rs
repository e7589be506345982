//! SQLite state adapter.
//!
//! Keeps the whole portfolio document as one row of a key-value table.

use crate::adapters::state_document::{parse_document, render_document};
use crate::domain::error::FolioError;
use crate::domain::snapshot::PortfolioSnapshot;
use crate::ports::config_port::ConfigPort;
use crate::ports::state_port::StatePort;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};

pub const STATE_KEY: &str = "simfolio.state.v1";

pub struct SqliteStateAdapter {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteStateAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, FolioError> {
        let db_path =
            config
                .get_string("storage", "path")
                .ok_or_else(|| FolioError::ConfigMissing {
                    section: "storage".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("storage", "pool_size", 1) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(|e: r2d2::Error| FolioError::Storage {
                reason: e.to_string(),
            })?;

        let adapter = Self { pool };
        adapter.initialize_schema()?;
        Ok(adapter)
    }

    pub fn in_memory() -> Result<Self, FolioError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e: r2d2::Error| FolioError::Storage {
                reason: e.to_string(),
            })?;

        let adapter = Self { pool };
        adapter.initialize_schema()?;
        Ok(adapter)
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, FolioError> {
        self.pool.get().map_err(|e: r2d2::Error| FolioError::Storage {
            reason: e.to_string(),
        })
    }

    pub fn initialize_schema(&self) -> Result<(), FolioError> {
        self.conn()?
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS kv (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );",
            )
            .map_err(|e: rusqlite::Error| FolioError::StorageQuery {
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

impl StatePort for SqliteStateAdapter {
    fn load(&self) -> Result<Option<PortfolioSnapshot>, FolioError> {
        let conn = self.conn()?;
        let text: Option<String> = conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![STATE_KEY],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e: rusqlite::Error| FolioError::StorageQuery {
                reason: e.to_string(),
            })?;

        match text {
            Some(text) => Ok(Some(parse_document(&text)?)),
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &PortfolioSnapshot) -> Result<(), FolioError> {
        let text = render_document(snapshot)?;
        let mut conn = self.conn()?;
        let tx = conn
            .transaction()
            .map_err(|e: rusqlite::Error| FolioError::StorageQuery {
                reason: e.to_string(),
            })?;

        tx.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![STATE_KEY, text],
        )
        .map_err(|e: rusqlite::Error| FolioError::StorageQuery {
            reason: e.to_string(),
        })?;

        tx.commit()
            .map_err(|e: rusqlite::Error| FolioError::StorageQuery {
                reason: e.to_string(),
            })?;
        tracing::debug!(key = STATE_KEY, "saved state");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::instrument::Instrument;

    #[test]
    fn empty_store_loads_none() {
        let adapter = SqliteStateAdapter::in_memory().unwrap();
        assert!(adapter.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let adapter = SqliteStateAdapter::in_memory().unwrap();
        let mut snap = PortfolioSnapshot::new();
        snap.instruments.push(Instrument::new("AAA", "Alpha").with_price(100, 10.0));
        snap.record_purchase("AAA", 150, 5.0).unwrap();

        adapter.save(&snap).unwrap();
        assert_eq!(adapter.load().unwrap(), Some(snap));
    }

    #[test]
    fn save_overwrites_single_row() {
        let adapter = SqliteStateAdapter::in_memory().unwrap();
        let mut snap = PortfolioSnapshot::new();
        adapter.save(&snap).unwrap();
        snap.add_goal("g1".into(), "House", 1200.0, 100.0).unwrap();
        adapter.save(&snap).unwrap();

        let count: i64 = adapter
            .conn()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(adapter.load().unwrap().unwrap().goals.len(), 1);
    }
}
