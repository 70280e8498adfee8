//! Structured Logging
//!
//! Provides structured logging with:
//! - JSON output for log aggregation
//! - Packet correlation IDs on every callback outcome
//!
//! # Usage
//!
//! ```rust,ignore
//! use stakeibc_callbacks::common::logging::{init_logging, LogLevel};
//!
//! init_logging(LogLevel::Info, true)?; // JSON mode for production
//! ```

use serde::Serialize;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::callbacks::CallbackError;
use crate::types::Packet;

// ============================================================================
// Log Levels
// ============================================================================

/// Application log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl From<&str> for LogLevel {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "trace" => LogLevel::Trace,
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" | "warning" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

// ============================================================================
// Structured Event Types
// ============================================================================

/// Event categories for structured logging
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    /// Acknowledgement callback outcomes
    Callback,
    /// System events (startup, shutdown)
    System,
}

/// Structured log event
#[derive(Debug, Serialize)]
pub struct LogEvent {
    /// Event timestamp (RFC 3339)
    pub timestamp: String,
    pub level: String,
    pub category: EventCategory,
    pub message: String,
    /// Packet correlation ID (`port/channel/sequence`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
}

/// Error details for error events
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

impl LogEvent {
    pub fn new(level: LogLevel, category: EventCategory, message: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            level: format!("{:?}", level).to_uppercase(),
            category,
            message: message.into(),
            correlation_id: None,
            data: None,
            error: None,
        }
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_error(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.error = Some(ErrorDetails {
            code: code.into(),
            message: message.into(),
        });
        self
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                "{{\"error\": \"failed to serialize log\", \"message\": \"{}\"}}",
                self.message
            )
        })
    }
}

// ============================================================================
// Callback Event Logging
// ============================================================================

/// Build the structured event describing one callback dispatch
pub fn callback_event(callback_id: &str, packet: &Packet, error: Option<&CallbackError>) -> LogEvent {
    let success = error.is_none();
    let level = if success { LogLevel::Info } else { LogLevel::Error };
    let event = LogEvent::new(level, EventCategory::Callback, format!("{} callback", callback_id))
        .with_correlation_id(packet.correlation_id())
        .with_data(serde_json::json!({
            "callback_id": callback_id,
            "data_hash": packet.data_hash(),
            "success": success,
            "retryable": error.map(CallbackError::is_retryable),
        }));

    match error {
        Some(err) => event.with_error(err.error_code(), err.to_string()),
        None => event,
    }
}

/// Log the outcome of one callback dispatch
pub fn log_callback_event(callback_id: &str, packet: &Packet, error: Option<&CallbackError>) {
    let event = callback_event(callback_id, packet, error);
    if error.is_some() {
        tracing::error!(target: "stakeibc::callbacks", "{}", event.to_json());
    } else {
        tracing::info!(target: "stakeibc::callbacks", "{}", event.to_json());
    }
}

/// Log a process-level event such as startup
pub fn log_system_event(message: &str, data: serde_json::Value) {
    let event = LogEvent::new(LogLevel::Info, EventCategory::System, message).with_data(data);
    tracing::info!(target: "stakeibc::system", "{}", event.to_json());
}

// ============================================================================
// Initialization
// ============================================================================

/// Initialize the logging system
///
/// `RUST_LOG` overrides `level` when set.
pub fn init_logging(level: LogLevel, json_format: bool) -> Result<(), LoggingError> {
    let level = format!("{:?}", level).to_lowercase();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("stakeibc={level},stakeibc_callbacks={level}"))
    });

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .map_err(|e| LoggingError::InitFailed(e.to_string()))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
            .map_err(|e| LoggingError::InitFailed(e.to_string()))?;
    }

    Ok(())
}

/// Initialize logging from StakeIbcConfig
pub fn init_from_config(config: &super::config::StakeIbcConfig) -> Result<(), LoggingError> {
    init_logging(LogLevel::from(config.log_level.as_str()), config.json_logs)
}

/// Logging errors
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to initialize logging: {0}")]
    InitFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_serialization() {
        let event = LogEvent::new(LogLevel::Error, EventCategory::Callback, "delegate callback")
            .with_correlation_id("icacontroller-GAIA.DELEGATION/channel-0/7")
            .with_error("NEGATIVE_AMOUNT", "balance to stake was negative");

        let json = event.to_json();
        assert!(json.contains("\"category\":\"callback\""));
        assert!(json.contains("channel-0/7"));
        assert!(json.contains("NEGATIVE_AMOUNT"));
        assert!(!json.contains("\"data\""));
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from("debug"), LogLevel::Debug);
        assert_eq!(LogLevel::from("INFO"), LogLevel::Info);
        assert_eq!(LogLevel::from("warning"), LogLevel::Warn);
        assert_eq!(LogLevel::from("unknown"), LogLevel::Info);
    }

    #[test]
    fn test_callback_event_carries_packet_identity() {
        let mut packet = Packet::new("icacontroller-GAIA.DELEGATION", "channel-0", 7);
        packet.data = b"delegate".to_vec();

        let event = callback_event("delegate", &packet, Some(&CallbackError::RemoteExecutionFailed));
        let json = event.to_json();

        assert_eq!(event.correlation_id.as_deref(), Some("icacontroller-GAIA.DELEGATION/channel-0/7"));
        assert!(json.contains(&packet.data_hash()));
        assert!(json.contains("REMOTE_EXECUTION_FAILED"));
        assert!(json.contains("\"retryable\":true"));

        let ok = callback_event("delegate", &packet, None).to_json();
        assert!(ok.contains("\"success\":true"));
        assert!(!ok.contains("\"error\""));
    }
}
