//! # EEG Bridge Library
//!
//! Stream attention and meditation data from a NeuroSky ThinkGear EEG
//! headset over a serial port.
//!
//! This library provides the core functionality for decoding the
//! ThinkGear framed serial protocol (signal quality, attention,
//! meditation, and eight-band EEG power spectrum) and the plumbing for
//! feeding it from a UART and logging what it decodes.

pub mod config;
pub mod error;
pub mod thinkgear;
pub mod serial;
pub mod telemetry;
