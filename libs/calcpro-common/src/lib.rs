//! Calculator Pro+ Common Library
//!
//! Shared error type, logging bootstrap and layered configuration used by the
//! calculation engine and every surface built on top of it.

pub mod config;
pub mod error;
pub mod logging;

// Re-exports for convenience
pub use config::{load_config, CalcProConfig, LoggingSettings, StorageSettings};
pub use error::{Error, Result};
pub use logging::init_logging;

/// Common prelude for Calculator Pro+ crates
pub mod prelude {
    pub use crate::config::{CalcProConfig, StorageSettings};
    pub use crate::error::{Error, Result};
    pub use crate::logging::init_logging;
    pub use tracing::{debug, error, info, trace, warn};
}
