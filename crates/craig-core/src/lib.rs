pub mod channel;
pub mod clock;
pub mod config;
pub mod digest;
pub mod engine;
pub mod error;
pub mod io;
pub mod memory;
pub mod paths;
pub mod source;
pub mod task;
pub mod templates;

pub use error::{CraigError, Result};
