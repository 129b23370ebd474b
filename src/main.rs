//! # EEG Bridge
//!
//! Stream attention and meditation data from a NeuroSky ThinkGear EEG
//! headset over a serial port.
//!
//! The bridge pulls bytes from the headset UART, runs them through the
//! streaming ThinkGear decoder, and for every validated packet logs the
//! mode-selected value and appends a telemetry record.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod thinkgear;
mod serial;
mod telemetry;

use config::Config;
use serial::byte_source::ByteSource;
use serial::HeadsetSerial;
use telemetry::{TelemetryLogger, TelemetryRecord};
use thinkgear::decoder::PacketDecoder;
use thinkgear::protocol::Measurements;

/// Default configuration file path
const CONFIG_PATH: &str = "config/default.toml";

/// Which index the bridge reports per packet
///
/// Mirrors the headset's two reporting modes; selectable in the
/// `[headset]` config section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Attention,
    Meditation,
}

impl Mode {
    /// Parse the configured mode string (case-insensitive)
    fn from_config(mode: &str) -> Self {
        if mode.eq_ignore_ascii_case("meditation") {
            Mode::Meditation
        } else {
            Mode::Attention
        }
    }

    fn label(self) -> &'static str {
        match self {
            Mode::Attention => "attention",
            Mode::Meditation => "meditation",
        }
    }

    /// Pick the mode's value out of a measurement set
    fn select(self, measurements: &Measurements) -> u8 {
        match self {
            Mode::Attention => measurements.attention,
            Mode::Meditation => measurements.meditation,
        }
    }
}

/// Main entry point for the EEG Bridge application
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration (defaults if no config file exists)
///    - Set up logging (stdout, plus a non-blocking file appender when
///      telemetry is enabled)
///    - Open the headset serial port
///
/// 2. **Main Loop**
///    - Pull one byte at a time from the headset and feed the decoder
///    - On each completed packet: log the mode-selected value and
///      append a telemetry record
///    - On stream loss: wait out the reconnect interval and reopen
///    - Handle Ctrl+C for graceful shutdown
///
/// 3. **Graceful Shutdown**
///    - Log total decoded packet count and exit cleanly
///
/// # Errors
///
/// Returns error if the configuration is invalid or the serial port
/// cannot be opened at startup.
#[tokio::main]
async fn main() -> Result<()> {
    let config = if Path::new(CONFIG_PATH).exists() {
        Config::load(CONFIG_PATH)?
    } else {
        Config::default()
    };

    // Initialize logging; keep the appender guard alive for the whole run
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer());

    let _appender_guard = if config.telemetry.enabled {
        std::fs::create_dir_all(&config.telemetry.log_dir)?;
        let appender = tracing_appender::rolling::daily(&config.telemetry.log_dir, "eeg-bridge.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
            .init();
        Some(guard)
    } else {
        registry.init();
        None
    };

    info!("EEG Bridge v{} starting...", env!("CARGO_PKG_VERSION"));

    let mode = Mode::from_config(&config.headset.mode);
    info!("Reporting mode: {}", mode.label());

    let mut serial =
        HeadsetSerial::open_with_paths(&[&config.serial.port], config.serial.baud_rate)?;
    info!("Headset serial port opened at: {}", serial.device_path());

    let mut decoder = PacketDecoder::new();
    let mut telemetry = if config.telemetry.enabled {
        Some(TelemetryLogger::new(&config.telemetry)?)
    } else {
        None
    };

    info!("Listening for ThinkGear packets; press Ctrl+C to exit");

    let mut packet_count: u64 = 0;
    let mut last_reported_error = None;

    // Main control loop
    loop {
        tokio::select! {
            byte = serial.next_byte() => {
                match byte {
                    Ok(Some(byte)) => {
                        if decoder.feed(byte) {
                            packet_count += 1;

                            let measurements = decoder.measurements();
                            info!(
                                "{} = {} (signal quality {})",
                                mode.label(),
                                mode.select(&measurements),
                                measurements.signal_quality,
                            );
                            debug!("packet {}: {}", packet_count, decoder.csv());

                            if let Some(logger) = telemetry.as_mut() {
                                let record = TelemetryRecord::from_measurements(&measurements);
                                if let Err(e) = logger.write_record(&record) {
                                    warn!("Failed to write telemetry record: {}", e);
                                }
                            }
                        } else if decoder.last_error().copied() != last_reported_error {
                            last_reported_error = decoder.last_error().copied();
                            if let Some(err) = last_reported_error {
                                warn!("Dropped packet: {}", err);
                            }
                        }
                    }
                    Ok(None) => {
                        warn!(
                            "Headset stream ended; reconnecting in {} ms",
                            config.serial.reconnect_interval_ms,
                        );
                        tokio::time::sleep(
                            Duration::from_millis(config.serial.reconnect_interval_ms)
                        ).await;

                        match HeadsetSerial::open_with_paths(
                            &[&config.serial.port],
                            config.serial.baud_rate,
                        ) {
                            Ok(reopened) => serial = reopened,
                            Err(e) => warn!("Reconnect failed: {}", e),
                        }
                    }
                    Err(e) => {
                        warn!("Serial read failed: {}", e);
                        tokio::time::sleep(
                            Duration::from_millis(config.serial.reconnect_interval_ms)
                        ).await;
                    }
                }
            }

            // Handle Ctrl+C for graceful shutdown
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                info!("Total packets decoded: {}", packet_count);
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_config() {
        assert_eq!(Mode::from_config("attention"), Mode::Attention);
        assert_eq!(Mode::from_config("meditation"), Mode::Meditation);
        assert_eq!(Mode::from_config("MEDITATION"), Mode::Meditation);
    }

    #[test]
    fn test_mode_select() {
        let measurements = Measurements {
            attention: 70,
            meditation: 35,
            ..Measurements::default()
        };

        assert_eq!(Mode::Attention.select(&measurements), 70);
        assert_eq!(Mode::Meditation.select(&measurements), 35);
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(Mode::Attention.label(), "attention");
        assert_eq!(Mode::Meditation.label(), "meditation");
    }
}
