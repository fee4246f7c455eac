use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const CRAIG_DIR: &str = ".craig";
pub const CONFIG_FILE: &str = ".craig/config.yaml";
pub const REMINDERS_DB: &str = ".craig/reminders.redb";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn craig_dir(root: &Path) -> PathBuf {
    root.join(CRAIG_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn default_reminders_db(root: &Path) -> PathBuf {
    root.join(REMINDERS_DB)
}

/// Resolve a path from the config file: absolute paths are kept, relative
/// paths are anchored at the project root.
pub fn resolve(root: &Path, configured: &Path) -> PathBuf {
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        root.join(configured)
    }
}
