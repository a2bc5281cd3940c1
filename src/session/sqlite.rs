use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::debug;

use super::TokenStorage;
use crate::config::DEFAULT_TOKEN_SLOT;

/// SQLite-based token storage.
///
/// Holds named slots in a single table; one instance reads and writes one slot.
pub struct SqliteTokenStorage {
    /// Path to the SQLite database file
    db_path: PathBuf,
    /// Slot this instance owns
    slot: String,
}

impl SqliteTokenStorage {
    /// Open storage at the given path using the default slot
    pub fn new(db_path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_slot(db_path, DEFAULT_TOKEN_SLOT)
    }

    /// Open storage at the given path for a named slot
    pub fn with_slot(db_path: impl Into<PathBuf>, slot: impl Into<String>) -> Result<Self> {
        let db_path = db_path.into();

        // Create parent directories if they don't exist
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }

        let storage = Self {
            db_path,
            slot: slot.into(),
        };
        storage.init_schema()?;

        Ok(storage)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    fn init_schema(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)
            .with_context(|| format!("failed to open database: {}", self.db_path.display()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS slots (
                name TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )
        .context("failed to create slots table")?;

        debug!(path = %self.db_path.display(), slot = %self.slot, "initialized token storage");

        Ok(())
    }
}

#[async_trait]
impl TokenStorage for SqliteTokenStorage {
    async fn read(&self) -> Result<Option<String>> {
        let db_path = self.db_path.clone();
        let slot = self.slot.clone();

        task::spawn_blocking(move || {
            let conn = Connection::open(&db_path)?;
            let mut stmt = conn.prepare("SELECT value FROM slots WHERE name = ?1")?;

            match stmt.query_row([&slot], |row| row.get::<_, String>(0)) {
                Ok(value) => {
                    debug!(slot = %slot, "read token slot");
                    Ok(Some(value))
                }
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .context("spawn_blocking failed")?
    }

    async fn write(&self, token: &str) -> Result<()> {
        let db_path = self.db_path.clone();
        let slot = self.slot.clone();
        let token = token.to_string();

        task::spawn_blocking(move || {
            let conn = Connection::open(&db_path)?;
            conn.execute(
                "INSERT OR REPLACE INTO slots (name, value, updated_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![slot, token, Utc::now().to_rfc3339()],
            )?;
            debug!(slot = %slot, "wrote token slot");
            Ok::<_, anyhow::Error>(())
        })
        .await
        .context("spawn_blocking failed")??;

        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        let db_path = self.db_path.clone();
        let slot = self.slot.clone();

        task::spawn_blocking(move || {
            let conn = Connection::open(&db_path)?;
            conn.execute("DELETE FROM slots WHERE name = ?1", [&slot])?;
            debug!(slot = %slot, "removed token slot");
            Ok::<_, anyhow::Error>(())
        })
        .await
        .context("spawn_blocking failed")??;

        Ok(())
    }
}
