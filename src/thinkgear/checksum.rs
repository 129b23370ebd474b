//! # ThinkGear Checksum
//!
//! One's-complement-of-sum checksum over the packet payload.
//!
//! **Algorithm**: sum all payload bytes with 8-bit wraparound, then
//! take `255 - sum`.

/// Calculate the ThinkGear checksum for a payload
///
/// # Arguments
///
/// * `payload` - Payload bytes (between the length byte and the checksum byte)
///
/// # Returns
///
/// * `u8` - Expected checksum byte
///
/// # Examples
///
/// ```no_run
/// use eeg_bridge::thinkgear::checksum::checksum;
///
/// let payload = [0x02, 0xC8, 0x04, 0x32, 0x05, 0x1E];
/// let sum = checksum(&payload);
/// ```
pub fn checksum(payload: &[u8]) -> u8 {
    let mut acc: u8 = 0;

    for &byte in payload {
        acc = acc.wrapping_add(byte);
    }

    255 - acc
}
