use super::{reminder_key, reminder_window, DedupMemory};
use crate::clock::Clock;
use crate::error::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

/// In-process reminder memory. Entries live until their window closes or the
/// process exits.
pub struct VolatileMemory {
    clock: Arc<dyn Clock>,
    expires_at: HashMap<String, DateTime<Utc>>,
}

impl VolatileMemory {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            expires_at: HashMap::new(),
        }
    }
}

impl DedupMemory for VolatileMemory {
    fn has(&self, recipient: &str, task_type: &str) -> Result<bool> {
        let now = self.clock.now();
        Ok(self
            .expires_at
            .get(&reminder_key(recipient, task_type))
            .is_some_and(|expiry| *expiry > now))
    }

    fn mark(&mut self, recipient: &str, task_type: &str) -> Result<()> {
        let now = self.clock.now();
        self.expires_at.retain(|_, expiry| *expiry > now);
        self.expires_at
            .insert(reminder_key(recipient, task_type), now + reminder_window());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.expires_at.clear();
        Ok(())
    }

    fn count(&self) -> Result<usize> {
        let now = self.clock.now();
        Ok(self.expires_at.values().filter(|e| **e > now).count())
    }

    fn backend(&self) -> &'static str {
        "volatile"
    }
}
