//! Logging setup for the terminal front-end.
//!
//! Everything logs through the `log` facade; `env_logger` is the only backend.

mod init;

pub use init::{init_logging, LoggingConfig};
