//! Reminder memory persisted with redb.
//!
//! # Table design
//!
//! A single `REMINDERS` table maps the reminder key
//! (`craig:reminder:{recipient}:{task}`) to the expiry instant in Unix
//! milliseconds. A key whose expiry is at or before "now" is treated as
//! absent; expired rows are pruned when the store is opened and on every
//! `mark`.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use redb::{Database, DatabaseError, ReadableTable, TableDefinition};

use super::{reminder_key, reminder_window, DedupMemory};
use crate::clock::Clock;
use crate::error::{CraigError, Result};

// ---------------------------------------------------------------------------
// Table definition
// ---------------------------------------------------------------------------

/// Key: reminder key. Value: expiry as Unix epoch milliseconds.
const REMINDERS: TableDefinition<&str, i64> = TableDefinition::new("reminders");

fn store_err(e: impl std::fmt::Display) -> CraigError {
    CraigError::Memory(e.to_string())
}

fn expiry_ms(now: DateTime<Utc>) -> i64 {
    (now + reminder_window()).timestamp_millis()
}

// ---------------------------------------------------------------------------
// DurableMemory
// ---------------------------------------------------------------------------

pub struct DurableMemory {
    db: Database,
    clock: Arc<dyn Clock>,
}

impl DurableMemory {
    /// Open or create the redb database at `path`.
    ///
    /// Creates the `REMINDERS` table if it doesn't already exist and prunes
    /// expired rows.
    pub fn open(path: &Path, clock: Arc<dyn Clock>) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path).map_err(|e| match e {
            DatabaseError::DatabaseAlreadyOpen => {
                CraigError::MemoryLocked(path.display().to_string())
            }
            other => store_err(other),
        })?;
        let store = Self { db, clock };
        let pruned = store.prune_expired()?;
        if pruned > 0 {
            tracing::debug!(pruned, "pruned expired reminders");
        }
        Ok(store)
    }

    /// Remove rows whose window has closed. Returns the number removed.
    fn prune_expired(&self) -> Result<usize> {
        let now_ms = self.clock.now().timestamp_millis();
        let wt = self.db.begin_write().map_err(store_err)?;
        let removed = {
            let mut table = wt.open_table(REMINDERS).map_err(store_err)?;
            let mut expired = Vec::new();
            for entry in table.iter().map_err(store_err)? {
                let (k, v) = entry.map_err(store_err)?;
                if v.value() <= now_ms {
                    expired.push(k.value().to_string());
                }
            }
            for key in &expired {
                table.remove(key.as_str()).map_err(store_err)?;
            }
            expired.len()
        };
        wt.commit().map_err(store_err)?;
        Ok(removed)
    }
}

impl DedupMemory for DurableMemory {
    fn has(&self, recipient: &str, task_type: &str) -> Result<bool> {
        let key = reminder_key(recipient, task_type);
        let now_ms = self.clock.now().timestamp_millis();
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(REMINDERS).map_err(store_err)?;
        let expiry = table.get(key.as_str()).map_err(store_err)?;
        Ok(expiry.is_some_and(|v| v.value() > now_ms))
    }

    fn mark(&mut self, recipient: &str, task_type: &str) -> Result<()> {
        let key = reminder_key(recipient, task_type);
        let expires = expiry_ms(self.clock.now());
        let wt = self.db.begin_write().map_err(store_err)?;
        {
            let mut table = wt.open_table(REMINDERS).map_err(store_err)?;
            table.insert(key.as_str(), expires).map_err(store_err)?;
        }
        wt.commit().map_err(store_err)?;
        self.prune_expired()?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let wt = self.db.begin_write().map_err(store_err)?;
        wt.delete_table(REMINDERS).map_err(store_err)?;
        wt.open_table(REMINDERS).map_err(store_err)?;
        wt.commit().map_err(store_err)?;
        Ok(())
    }

    fn count(&self) -> Result<usize> {
        let now_ms = self.clock.now().timestamp_millis();
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(REMINDERS).map_err(store_err)?;
        let mut live = 0;
        for entry in table.iter().map_err(store_err)? {
            let (_, v) = entry.map_err(store_err)?;
            if v.value() > now_ms {
                live += 1;
            }
        }
        Ok(live)
    }

    fn backend(&self) -> &'static str {
        "durable"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
