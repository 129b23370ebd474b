//! # Serial Communication Module
//!
//! Handles serial communication with the ThinkGear headset module.
//!
//! This module handles:
//! - Opening the headset UART at 9600 baud (8N1)
//! - Auto-detecting the device across common paths
//! - Buffered single-byte reads for the streaming decoder

pub mod byte_source;

use async_trait::async_trait;
use bytes::BytesMut;
use std::io;
use tokio::io::AsyncReadExt;
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info, warn};

use crate::error::{EegBridgeError, Result};
use byte_source::ByteSource;

/// Standard ThinkGear baud rate (9600 baud)
pub const THINKGEAR_BAUD_RATE: u32 = 9600;

/// Default headset device paths to try (in order of preference)
const DEFAULT_DEVICE_PATHS: &[&str] = &[
    "/dev/ttyUSB0", // USB-to-serial adapters (most common for ThinkGear boards)
    "/dev/ttyACM0", // USB CDC devices
];

/// Read buffer size; a full packet is at most 36 bytes on the wire
const READ_BUFFER_SIZE: usize = 256;

/// Headset serial port handler
///
/// Manages the connection to the ThinkGear module via UART and hands
/// out bytes one at a time through [`ByteSource`].
pub struct HeadsetSerial {
    /// Serial port handle
    port: tokio_serial::SerialStream,
    /// Device path (e.g., /dev/ttyUSB0)
    device_path: String,
    /// Bytes read from the port but not yet consumed
    buffer: BytesMut,
}

impl std::fmt::Debug for HeadsetSerial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadsetSerial")
            .field("device_path", &self.device_path)
            .field("buffered", &self.buffer.len())
            .finish_non_exhaustive()
    }
}

impl HeadsetSerial {
    /// Open connection to the headset module
    ///
    /// Auto-detects the device by trying common paths at the standard
    /// ThinkGear baud rate.
    ///
    /// # Errors
    ///
    /// Returns error if no headset device is found or connection fails
    pub fn open() -> Result<Self> {
        Self::open_with_paths(DEFAULT_DEVICE_PATHS, THINKGEAR_BAUD_RATE)
    }

    /// Open connection to the headset module with custom device paths
    ///
    /// # Arguments
    ///
    /// * `paths` - Device paths to try (e.g., &["/dev/ttyUSB0"])
    /// * `baud_rate` - Baud rate to use (1200, 9600, or 57600 per module)
    ///
    /// # Returns
    ///
    /// * `Result<HeadsetSerial>` - Connected serial port or error
    pub fn open_with_paths(paths: &[&str], baud_rate: u32) -> Result<Self> {
        for path in paths {
            debug!("Trying to open serial port: {}", path);

            match Self::open_port(path, baud_rate) {
                Ok(port) => {
                    info!("Successfully opened headset device at {}", path);
                    return Ok(Self {
                        port,
                        device_path: path.to_string(),
                        buffer: BytesMut::with_capacity(READ_BUFFER_SIZE),
                    });
                }
                Err(e) => {
                    warn!("Failed to open {}: {}", path, e);
                    continue;
                }
            }
        }

        Err(EegBridgeError::SerialPortNotFound(paths.join(", ")))
    }

    /// Open a specific serial port with ThinkGear settings (8N1)
    fn open_port(path: &str, baud_rate: u32) -> Result<tokio_serial::SerialStream> {
        let port = tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| EegBridgeError::Serial(format!("Failed to open {}: {}", path, e)))?;

        Ok(port)
    }

    /// Get the device path of the opened serial port
    pub fn device_path(&self) -> &str {
        &self.device_path
    }
}

#[async_trait]
impl ByteSource for HeadsetSerial {
    /// Pull the next byte from the headset
    ///
    /// Drains the internal buffer first, refilling it from the port
    /// when empty. Returns `Ok(None)` if the port reports end of
    /// stream (device unplugged).
    async fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if self.buffer.is_empty() {
            let n = self.port.read_buf(&mut self.buffer).await?;
            if n == 0 {
                return Ok(None);
            }
            debug!("Read {} bytes from {}", n, self.device_path);
        }

        Ok(Some(self.buffer.split_to(1)[0]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(THINKGEAR_BAUD_RATE, 9600);
        assert_eq!(DEFAULT_DEVICE_PATHS.len(), 2);
        assert_eq!(DEFAULT_DEVICE_PATHS[0], "/dev/ttyUSB0");
        assert_eq!(DEFAULT_DEVICE_PATHS[1], "/dev/ttyACM0");
    }

    #[test]
    fn test_open_with_invalid_paths_returns_error() {
        let invalid_paths = &["/dev/nonexistent0", "/dev/nonexistent1"];
        let result = HeadsetSerial::open_with_paths(invalid_paths, THINKGEAR_BAUD_RATE);

        assert!(result.is_err());
        match result.unwrap_err() {
            EegBridgeError::SerialPortNotFound(msg) => {
                assert!(msg.contains("/dev/nonexistent0"));
                assert!(msg.contains("/dev/nonexistent1"));
            }
            other => panic!("Expected SerialPortNotFound error, got: {:?}", other),
        }
    }

    #[test]
    fn test_open_with_empty_paths_returns_error() {
        let empty_paths: &[&str] = &[];
        let result = HeadsetSerial::open_with_paths(empty_paths, THINKGEAR_BAUD_RATE);

        assert!(result.is_err());
        match result.unwrap_err() {
            EegBridgeError::SerialPortNotFound(_) => {}
            other => panic!("Expected SerialPortNotFound, got: {:?}", other),
        }
    }

    #[test]
    fn test_open_port_with_invalid_path_returns_error() {
        let result = HeadsetSerial::open_port("/dev/nonexistent_serial_device_12345", 9600);

        assert!(result.is_err());
        match result.unwrap_err() {
            EegBridgeError::Serial(msg) => {
                assert!(msg.contains("/dev/nonexistent_serial_device_12345"));
                assert!(msg.contains("Failed to open"));
            }
            other => panic!("Expected Serial error, got: {:?}", other),
        }
    }

    // Integration test - only runs if headset hardware is connected
    #[tokio::test]
    #[ignore] // Run with: cargo test -- --ignored
    async fn test_read_with_real_hardware() {
        if let Ok(mut serial) = HeadsetSerial::open() {
            println!("Opened headset at: {}", serial.device_path());

            let byte = serial.next_byte().await;
            assert!(byte.is_ok(), "Failed to read byte: {:?}", byte);
        } else {
            println!("No headset hardware detected (this is OK for CI/CD)");
        }
    }
}
