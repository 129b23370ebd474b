//! # ThinkGear Packet Encoder
//!
//! Builds well-formed ThinkGear frames around a payload. The headset
//! itself only transmits, so in the bridge this feeds test harnesses
//! and synthetic byte sources.

use crate::error::{EegBridgeError, Result};

use super::checksum::checksum;
use super::protocol::*;

/// Encode a payload into a complete ThinkGear frame
///
/// # Arguments
///
/// * `payload` - Field-code-tagged payload bytes (max 32)
///
/// # Returns
///
/// * `Result<Vec<u8>>` - Complete frame: sync(2) + length(1) + payload + checksum(1)
///
/// # Errors
///
/// Returns error if the payload exceeds [`MAX_PACKET_LENGTH`]
///
/// # Examples
///
/// ```no_run
/// use eeg_bridge::thinkgear::encoder::encode_packet;
///
/// // Attention = 50
/// let frame = encode_packet(&[0x04, 0x32])?;
/// assert_eq!(frame.len(), 6);
/// # Ok::<(), eeg_bridge::error::EegBridgeError>(())
/// ```
pub fn encode_packet(payload: &[u8]) -> Result<Vec<u8>> {
    if payload.len() > MAX_PACKET_LENGTH {
        return Err(EegBridgeError::Protocol(format!(
            "Payload size {} exceeds maximum {}",
            payload.len(),
            MAX_PACKET_LENGTH
        )));
    }

    let mut frame = Vec::with_capacity(4 + payload.len());
    frame.push(SYNC_BYTE);
    frame.push(SYNC_BYTE);
    frame.push(payload.len() as u8);
    frame.extend_from_slice(payload);
    frame.push(checksum(payload));

    Ok(frame)
}

/// Encode a measurement set into a complete ThinkGear frame
///
/// Emits signal quality, attention, and meditation fields, plus the
/// EEG power field when `has_power` is set. Decoding the result
/// reproduces the input measurements.
pub fn encode_measurements(measurements: &Measurements) -> Vec<u8> {
    let mut payload = vec![
        CODE_SIGNAL_QUALITY,
        measurements.signal_quality,
        CODE_ATTENTION,
        measurements.attention,
        CODE_MEDITATION,
        measurements.meditation,
    ];

    if measurements.has_power {
        payload.push(CODE_EEG_POWER);
        payload.push((EEG_POWER_BANDS * 3) as u8);

        for &value in &measurements.eeg_power {
            payload.push((value >> 16) as u8);
            payload.push((value >> 8) as u8);
            payload.push(value as u8);
        }
    }

    // Payload is at most 6 + 26 = 32 bytes, within MAX_PACKET_LENGTH
    encode_packet(&payload).expect("measurement payload within packet limit")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thinkgear::decoder::PacketDecoder;

    #[test]
    fn test_encode_packet_structure() {
        let frame = encode_packet(&[0x04, 0x32]).unwrap();

        assert_eq!(frame.len(), 6);
        assert_eq!(&frame[..2], &[SYNC_BYTE, SYNC_BYTE]);
        assert_eq!(frame[2], 2); // length
        assert_eq!(&frame[3..5], &[0x04, 0x32]);
        assert_eq!(frame[5], checksum(&[0x04, 0x32]));
    }

    #[test]
    fn test_encode_empty_payload() {
        let frame = encode_packet(&[]).unwrap();
        assert_eq!(frame, vec![0xAA, 0xAA, 0x00, 0xFF]);
    }

    #[test]
    fn test_encode_packet_too_long() {
        let payload = [0u8; MAX_PACKET_LENGTH + 1];
        assert!(encode_packet(&payload).is_err());
    }

    #[test]
    fn test_encode_measurements_decodes_back() {
        let original = Measurements {
            signal_quality: 0,
            attention: 72,
            meditation: 31,
            eeg_power: [100, 200, 300, 4000, 50_000, 600_000, 7_000_000, 0xFF_FF_FF],
            has_power: true,
        };

        let frame = encode_measurements(&original);
        let mut decoder = PacketDecoder::new();

        let mut decoded = false;
        for &byte in &frame {
            decoded |= decoder.feed(byte);
        }

        assert!(decoded);
        assert_eq!(decoder.measurements(), original);
    }

    #[test]
    fn test_encode_measurements_without_power() {
        let m = Measurements {
            signal_quality: 26,
            attention: 1,
            meditation: 2,
            eeg_power: [0; EEG_POWER_BANDS],
            has_power: false,
        };

        let frame = encode_measurements(&m);
        // sync(2) + length(1) + 3 scalar fields (2 bytes each) + checksum(1)
        assert_eq!(frame.len(), 10);
        assert_eq!(frame[2], 6);
    }
}
