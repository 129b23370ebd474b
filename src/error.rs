//! # Error Types
//!
//! Custom error types for EEG Bridge using `thiserror`.

use thiserror::Error;

/// Main error type for EEG Bridge
///
/// In-stream decode failures are not represented here: the decoder
/// reports those through its `last_error` accessor and keeps running.
#[derive(Debug, Error)]
pub enum EegBridgeError {
    /// ThinkGear protocol errors
    #[error("ThinkGear protocol error: {0}")]
    Protocol(String),

    /// Serial port errors
    #[error("Serial port error: {0}")]
    Serial(String),

    /// No headset device found
    #[error("No headset found at any of: {0}")]
    SerialPortNotFound(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for EEG Bridge
pub type Result<T> = std::result::Result<T, EegBridgeError>;
