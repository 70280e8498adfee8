//! Common Infrastructure Module
//!
//! This module contains:
//! - Configuration loading from environment variables
//! - Structured logging setup
//! - The root error type

pub mod config;
pub mod error;
pub mod logging;

// Re-exports for convenience
pub use config::{ConfigError, Network, StakeIbcConfig, StoreBackend};
pub use error::{Result, StakeIbcError};
pub use logging::{
    callback_event, init_from_config, init_logging, log_callback_event, log_system_event,
    ErrorDetails, EventCategory, LogEvent, LogLevel, LoggingError,
};
