//! SQLite-backed record store.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use paste_types::{PasteName, PasteRecord, SecretHash};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::error::{RecordError, RecordResult};
use crate::traits::RecordStore;

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS pastes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    hashed_url TEXT NOT NULL
)";

/// [`RecordStore`] over an `sqlx` SQLite pool.
///
/// Uniqueness of names is enforced by the `UNIQUE` constraint on
/// `pastes.name`; a losing concurrent insert surfaces as
/// [`RecordError::AlreadyExists`].
#[derive(Debug, Clone)]
pub struct SqliteRecordStore {
    pool: Pool<Sqlite>,
}

impl SqliteRecordStore {
    /// Connect using an `sqlx` SQLite URL (e.g. `sqlite:pastebin.db` or
    /// `sqlite::memory:`) and run the schema migration.
    pub async fn connect(url: &str, max_connections: u32) -> RecordResult<Self> {
        let opts = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        // An in-memory database lives and dies with its connection.
        let in_memory = url.contains(":memory:");
        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { max_connections.max(1) })
            .idle_timeout(if in_memory { None } else { Some(Duration::from_secs(600)) })
            .max_lifetime(if in_memory { None } else { Some(Duration::from_secs(1800)) })
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        tracing::debug!(url, "record store ready");
        Ok(store)
    }

    /// Open (creating if needed) a database file at `path`.
    pub async fn open(path: impl AsRef<Path>, max_connections: u32) -> RecordResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::connect(&format!("sqlite:{}", path.display()), max_connections).await
    }

    async fn migrate(&self) -> RecordResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn put(&self, record: &PasteRecord) -> RecordResult<()> {
        let result = sqlx::query("INSERT INTO pastes (name, hashed_url) VALUES (?, ?)")
            .bind(record.name.as_str())
            .bind(record.secret_hash.as_str())
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(RecordError::AlreadyExists {
                    name: record.name.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, name: &PasteName) -> RecordResult<Option<SecretHash>> {
        let row: Option<String> =
            sqlx::query_scalar("SELECT hashed_url FROM pastes WHERE name = ?")
                .bind(name.as_str())
                .fetch_optional(&self.pool)
                .await?;

        row.map(|hash| {
            SecretHash::new(hash).map_err(|e| RecordError::Corrupt {
                name: name.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
    }

    async fn exists(&self, name: &PasteName) -> RecordResult<bool> {
        let id: Option<i64> = sqlx::query_scalar("SELECT id FROM pastes WHERE name = ?")
            .bind(name.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(id.is_some())
    }

    async fn delete(&self, name: &PasteName) -> RecordResult<bool> {
        let result = sqlx::query("DELETE FROM pastes WHERE name = ?")
            .bind(name.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_if(&self, name: &PasteName, hash: &SecretHash) -> RecordResult<bool> {
        let result = sqlx::query("DELETE FROM pastes WHERE name = ? AND hashed_url = ?")
            .bind(name.as_str())
            .bind(hash.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> RecordResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
