//! Where outstanding compliance work comes from.
//!
//! The engine and digest composer only see [`ComplianceSource`]. An empty
//! task list means everyone is compliant; it is not an error.

pub mod fixture;
pub mod http;

pub use fixture::FixtureSource;
pub use http::HttpSource;

use crate::config::SourceSettings;
use crate::error::Result;
use crate::paths;
use crate::task::{OutstandingTask, WeeklyDigestInput};
use std::path::Path;

pub trait ComplianceSource {
    /// Every outstanding task for the daily run.
    fn outstanding_tasks(&self) -> Result<Vec<OutstandingTask>>;

    /// Aggregates for the weekly digest. `None` when the source has no data
    /// for this week.
    fn weekly_digest(&self) -> Result<Option<WeeklyDigestInput>>;

    fn describe(&self) -> String;
}

/// Build the configured source. Relative fixture paths resolve against `root`.
pub fn open_source(settings: &SourceSettings, root: &Path) -> Result<Box<dyn ComplianceSource>> {
    match settings {
        SourceSettings::Http { base_url } => Ok(Box::new(HttpSource::from_env(base_url)?)),
        SourceSettings::Fixture { path } => Ok(Box::new(FixtureSource::load(&paths::resolve(
            root, path,
        ))?)),
    }
}
