//! Anti-spam memory: which (recipient, task) pairs were already notified
//! within the last 24 hours.
//!
//! Two interchangeable backends sit behind [`DedupMemory`]:
//!
//! - [`VolatileMemory`]: process-lifetime map, gone when the run exits.
//! - [`DurableMemory`]: redb file with a per-key expiry instant.
//!
//! [`open_memory`] builds the configured backend wrapped in a
//! [`ReminderMemory`], which falls back to volatile storage for the rest of
//! the run if the durable store stops answering.

pub mod durable;
pub mod volatile;

pub use durable::DurableMemory;
pub use volatile::VolatileMemory;

use crate::clock::Clock;
use crate::config::MemorySettings;
use crate::error::{CraigError, Result};
use crate::paths;
use chrono::Duration;
use std::cell::Cell;
use std::path::Path;
use std::sync::Arc;

/// How long a reminder suppresses repeats of the same (recipient, task).
pub fn reminder_window() -> Duration {
    Duration::hours(24)
}

/// Storage key for one recipient/task pair.
pub fn reminder_key(recipient: &str, task_type: &str) -> String {
    format!("craig:reminder:{recipient}:{task_type}")
}

pub trait DedupMemory {
    /// True if `(recipient, task_type)` was marked within the reminder window.
    fn has(&self, recipient: &str, task_type: &str) -> Result<bool>;

    /// Mark the pair as notified; re-marking restarts the window.
    fn mark(&mut self, recipient: &str, task_type: &str) -> Result<()>;

    /// Drop every entry. Test and reset use only.
    fn clear(&mut self) -> Result<()>;

    /// Number of entries still inside their window.
    fn count(&self) -> Result<usize>;

    fn backend(&self) -> &'static str;
}

// ---------------------------------------------------------------------------
// ReminderMemory
// ---------------------------------------------------------------------------

/// The memory handed to the engine: durable when available, volatile otherwise.
pub struct ReminderMemory {
    durable: Option<Box<dyn DedupMemory>>,
    degraded: Cell<bool>,
    volatile: VolatileMemory,
}

impl ReminderMemory {
    pub fn volatile(clock: Arc<dyn Clock>) -> Self {
        Self {
            durable: None,
            degraded: Cell::new(false),
            volatile: VolatileMemory::new(clock),
        }
    }

    pub fn with_durable(durable: DurableMemory, clock: Arc<dyn Clock>) -> Self {
        Self::with_store(Box::new(durable), clock)
    }

    fn with_store(store: Box<dyn DedupMemory>, clock: Arc<dyn Clock>) -> Self {
        Self {
            durable: Some(store),
            degraded: Cell::new(false),
            volatile: VolatileMemory::new(clock),
        }
    }

    fn active_durable(&self) -> Option<&dyn DedupMemory> {
        if self.degraded.get() {
            None
        } else {
            self.durable.as_deref()
        }
    }

    fn degrade(&self, err: &CraigError) {
        if !self.degraded.replace(true) {
            tracing::warn!(error = %err, "reminder store unavailable, using in-process memory for the rest of this run");
        }
    }
}

impl DedupMemory for ReminderMemory {
    fn has(&self, recipient: &str, task_type: &str) -> Result<bool> {
        if let Some(db) = self.active_durable() {
            match db.has(recipient, task_type) {
                Ok(found) => return Ok(found),
                Err(e) => self.degrade(&e),
            }
        }
        self.volatile.has(recipient, task_type)
    }

    fn mark(&mut self, recipient: &str, task_type: &str) -> Result<()> {
        if !self.degraded.get() {
            if let Some(db) = self.durable.as_deref_mut() {
                match db.mark(recipient, task_type) {
                    Ok(()) => return Ok(()),
                    Err(e) => self.degrade(&e),
                }
            }
        }
        self.volatile.mark(recipient, task_type)
    }

    fn clear(&mut self) -> Result<()> {
        if !self.degraded.get() {
            if let Some(db) = self.durable.as_deref_mut() {
                if let Err(e) = db.clear() {
                    self.degrade(&e);
                }
            }
        }
        self.volatile.clear()
    }

    fn count(&self) -> Result<usize> {
        if let Some(db) = self.active_durable() {
            match db.count() {
                Ok(n) => return Ok(n),
                Err(e) => self.degrade(&e),
            }
        }
        self.volatile.count()
    }

    fn backend(&self) -> &'static str {
        match self.active_durable() {
            Some(db) => db.backend(),
            None => self.volatile.backend(),
        }
    }
}

/// Build the configured reminder memory.
///
/// A durable store that cannot be opened degrades to volatile memory with a
/// warning, except when another run holds it: that is returned as
/// [`CraigError::MemoryLocked`] so overlapping runs cannot double-send.
pub fn open_memory(
    settings: &MemorySettings,
    root: &Path,
    clock: Arc<dyn Clock>,
) -> Result<ReminderMemory> {
    match settings {
        MemorySettings::Volatile => Ok(ReminderMemory::volatile(clock)),
        MemorySettings::Durable { path } => {
            let path = path
                .as_deref()
                .map(|p| paths::resolve(root, p))
                .unwrap_or_else(|| paths::default_reminders_db(root));
            match DurableMemory::open(&path, clock.clone()) {
                Ok(db) => {
                    tracing::debug!(path = %path.display(), "opened durable reminder store");
                    Ok(ReminderMemory::with_durable(db, clock))
                }
                Err(e @ CraigError::MemoryLocked(_)) => Err(e),
                Err(e) => {
                    tracing::warn!(error = %e, "durable reminder store failed to open, falling back to in-process memory");
                    Ok(ReminderMemory::volatile(clock))
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
