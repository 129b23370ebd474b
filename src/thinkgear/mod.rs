//! # ThinkGear Protocol Module
//!
//! Implementation of the NeuroSky ThinkGear serial protocol.
//!
//! This module handles:
//! - Incremental packet framing and resynchronization (0xAA 0xAA sync)
//! - One's-complement-of-sum checksum validation
//! - Payload field dispatch (signal quality, attention, meditation,
//!   eight-band EEG power spectrum)
//! - Frame encoding for tests and synthetic sources

pub mod protocol;
pub mod encoder;
pub mod decoder;
pub mod checksum;
