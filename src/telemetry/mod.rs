//! # Telemetry Module
//!
//! Handles measurement logging to JSONL files with rotation.
//!
//! This module handles:
//! - Capturing decoded measurement sets with timestamps
//! - Formatting as JSONL (JSON Lines)
//! - Writing to rotating log files (max N records per file)
//! - Retaining only the last M files

pub mod logger;
pub mod types;

pub use logger::TelemetryLogger;
pub use types::TelemetryRecord;
