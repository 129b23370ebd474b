//! # ThinkGear Packet Decoder
//!
//! Incremental, resynchronizing decoder for the ThinkGear serial
//! protocol. Bytes are fed in one at a time as they arrive from the
//! UART; the decoder assembles, validates, and parses packets without
//! ever needing more than one packet's payload in memory.
//!
//! Packet structure on the wire:
//!
//! ```text
//! 0xAA 0xAA <length> <payload: length bytes> <checksum>
//! ```
//!
//! The payload is a sequence of code-tagged fields (signal quality,
//! attention, meditation, EEG power bands). The checksum is
//! `255 - (sum of payload bytes mod 256)`.

use std::fmt::Write;

use thiserror::Error;

use super::protocol::*;

/// Decode errors, all recoverable
///
/// Any of these abandons the current packet and returns the decoder to
/// synchronizing; decoding resumes at the next `0xAA 0xAA` pair. Only
/// the most recent error is retained.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Declared payload length exceeds [`MAX_PACKET_LENGTH`]
    #[error("Packet too long: {0}")]
    PacketTooLong(u8),

    /// Computed checksum does not match the received checksum byte
    #[error("Checksum mismatch: computed 0x{computed:02X}, received 0x{received:02X}")]
    Checksum { computed: u8, received: u8 },

    /// Unrecognized field code in the payload
    #[error("Could not parse: unrecognized field code 0x{0:02X}")]
    UnrecognizedField(u8),

    /// A field's data runs past the declared payload length
    #[error("Could not parse: field 0x{0:02X} truncated")]
    TruncatedField(u8),
}

/// Streaming ThinkGear packet decoder
///
/// Owns all protocol state: the framing state machine, the fixed-size
/// payload buffer, the running checksum, and the last fully-decoded
/// measurement set. Feed it one byte at a time with [`feed`]; it
/// returns `true` exactly once per successfully validated and parsed
/// packet, on the call that processed that packet's checksum byte.
///
/// Single-threaded by design: one producer feeds bytes, readers consult
/// the accessors only after observing a `true` return.
///
/// [`feed`]: PacketDecoder::feed
///
/// # Examples
///
/// ```no_run
/// use eeg_bridge::thinkgear::decoder::PacketDecoder;
///
/// let mut decoder = PacketDecoder::new();
/// for byte in [0xAAu8, 0xAA, 0x02, 0x04, 0x32, 0xC9] {
///     if decoder.feed(byte) {
///         println!("{}", decoder.csv());
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PacketDecoder {
    /// True between a completed sync pair and the checksum byte
    in_packet: bool,

    /// Set when a packet parses, consumed by the `feed` that set it
    fresh_packet: bool,

    /// Position within the current packet, 0 = length byte
    packet_index: usize,

    /// Declared payload length of the current packet
    packet_length: usize,

    /// Checksum byte received with the last completed packet
    checksum: u8,

    /// Running 8-bit sum of payload bytes (complemented at the end)
    checksum_accumulator: u8,

    /// Previous byte, for sync pair detection
    last_byte: u8,

    /// Payload of the in-progress or last-completed packet
    packet_data: [u8; MAX_PACKET_LENGTH],

    /// Last decoded measurement set
    measurements: Measurements,

    /// Most recent decode error, overwritten per failure
    latest_error: Option<DecodeError>,
}

impl Default for PacketDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketDecoder {
    /// Create a decoder in the synchronizing state
    ///
    /// Initial readings: signal quality 200 (no contact), attention and
    /// meditation 0, all power bands 0, no power flag, no error.
    pub fn new() -> Self {
        Self {
            in_packet: false,
            fresh_packet: false,
            packet_index: 0,
            packet_length: 0,
            checksum: 0,
            checksum_accumulator: 0,
            last_byte: 0,
            packet_data: [0; MAX_PACKET_LENGTH],
            measurements: Measurements::default(),
            latest_error: None,
        }
    }

    /// Feed one byte from the stream
    ///
    /// # Arguments
    ///
    /// * `byte` - Next byte from the headset
    ///
    /// # Returns
    ///
    /// * `bool` - `true` exactly once per packet, on the call whose byte
    ///   completed a packet that passed both checksum and payload parse.
    ///   `false` otherwise, including on framing, checksum, and parse
    ///   failures (check [`last_error`] for those).
    ///
    /// Never blocks and never allocates; malformed input is dropped and
    /// decoding resumes at the next sync pair.
    ///
    /// [`last_error`]: PacketDecoder::last_error
    pub fn feed(&mut self, byte: u8) -> bool {
        if self.in_packet {
            if self.packet_index == 0 {
                // Length byte
                self.packet_length = byte as usize;

                if self.packet_length > MAX_PACKET_LENGTH {
                    self.latest_error = Some(DecodeError::PacketTooLong(byte));
                    self.in_packet = false;
                }
            } else if self.packet_index <= self.packet_length {
                // Payload byte
                self.packet_data[self.packet_index - 1] = byte;
                self.checksum_accumulator = self.checksum_accumulator.wrapping_add(byte);
            } else {
                // Checksum byte
                self.checksum = byte;
                self.checksum_accumulator = 255 - self.checksum_accumulator;

                if self.checksum == self.checksum_accumulator {
                    match self.parse_payload() {
                        Ok(()) => self.fresh_packet = true,
                        Err(e) => self.latest_error = Some(e),
                    }
                } else {
                    self.latest_error = Some(DecodeError::Checksum {
                        computed: self.checksum_accumulator,
                        received: self.checksum,
                    });
                }

                self.in_packet = false;
            }

            self.packet_index += 1;
        }

        // Sync detection runs on every byte. A byte that completes the
        // pair is consumed by it and is not packet content; a checksum
        // byte that just closed a packet can also pair with a preceding
        // 0xAA to open the next one.
        if byte == SYNC_BYTE && self.last_byte == SYNC_BYTE && !self.in_packet {
            self.in_packet = true;
            self.packet_index = 0;
            self.checksum_accumulator = 0;
        }

        self.last_byte = byte;

        if self.fresh_packet {
            self.fresh_packet = false;
            true
        } else {
            false
        }
    }

    /// Parse the completed payload, dispatching on field codes
    ///
    /// The power flag and all band values are cleared before scanning,
    /// so a packet without an EEG power field reports zeros rather than
    /// stale values. Scalar fields write directly into the measurement
    /// set as they are read; on failure, fields written before the
    /// offending code stay applied. That partial-write behavior matches
    /// the shipped headset decoder and is pinned by tests.
    fn parse_payload(&mut self) -> Result<(), DecodeError> {
        self.measurements.has_power = false;
        self.measurements.eeg_power = [0; EEG_POWER_BANDS];

        let mut i = 0;
        while i < self.packet_length {
            let code = self.packet_data[i];

            match code {
                CODE_SIGNAL_QUALITY => {
                    i += 1;
                    self.measurements.signal_quality = self.payload_byte(code, i)?;
                }
                CODE_ATTENTION => {
                    i += 1;
                    self.measurements.attention = self.payload_byte(code, i)?;
                }
                CODE_MEDITATION => {
                    i += 1;
                    self.measurements.meditation = self.payload_byte(code, i)?;
                }
                CODE_EEG_POWER => {
                    // Sub-length byte, fixed in practice, skipped
                    i += 1;

                    for band in 0..EEG_POWER_BANDS {
                        let a = self.payload_byte(code, i + 1)?;
                        let b = self.payload_byte(code, i + 2)?;
                        let c = self.payload_byte(code, i + 3)?;
                        i += 3;

                        self.measurements.eeg_power[band] =
                            ((a as u32) << 16) | ((b as u32) << 8) | (c as u32);
                    }

                    self.measurements.has_power = true;
                }
                CODE_EXTENDED => {
                    // Fixed 1-byte length + 2-byte value, not decoded
                    i += 3;
                }
                _ => return Err(DecodeError::UnrecognizedField(code)),
            }

            i += 1;
        }

        Ok(())
    }

    /// Read a payload byte at `index`, failing if the field runs past
    /// the declared length
    fn payload_byte(&self, code: u8, index: usize) -> Result<u8, DecodeError> {
        if index < self.packet_length {
            Ok(self.packet_data[index])
        } else {
            Err(DecodeError::TruncatedField(code))
        }
    }

    /// Signal quality from the last packet (200 = no/poor contact)
    pub fn signal_quality(&self) -> u8 {
        self.measurements.signal_quality
    }

    /// Attention index from the last packet (0-100 nominal)
    pub fn attention(&self) -> u8 {
        self.measurements.attention
    }

    /// Meditation index from the last packet (0-100 nominal)
    pub fn meditation(&self) -> u8 {
        self.measurements.meditation
    }

    /// EEG band powers in wire order, zeroed unless [`has_power`]
    ///
    /// [`has_power`]: PacketDecoder::has_power
    pub fn power_bands(&self) -> &[u32; EEG_POWER_BANDS] {
        &self.measurements.eeg_power
    }

    /// Power for a single band
    pub fn power(&self, band: PowerBand) -> u32 {
        self.measurements.eeg_power[band as usize]
    }

    /// Whether the last packet carried EEG power bands
    pub fn has_power(&self) -> bool {
        self.measurements.has_power
    }

    /// Copy of the last decoded measurement set
    pub fn measurements(&self) -> Measurements {
        self.measurements
    }

    /// Most recent decode error, if any
    pub fn last_error(&self) -> Option<&DecodeError> {
        self.latest_error.as_ref()
    }

    /// Render the last measurements as a CSV line
    ///
    /// Format: `signal_quality,attention,meditation`, extended with the
    /// eight band values when the last packet carried them.
    pub fn csv(&self) -> String {
        let mut line = format!(
            "{},{},{}",
            self.measurements.signal_quality,
            self.measurements.attention,
            self.measurements.meditation,
        );

        if self.measurements.has_power {
            for value in &self.measurements.eeg_power {
                line.push(',');
                line.push_str(&value.to_string());
            }
        }

        line
    }

    /// Render a verbose multi-line dump of the last packet's values,
    /// including the computed and received checksum
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "--- Start Packet ---");
        let _ = writeln!(out, "Signal Quality: {}", self.measurements.signal_quality);
        let _ = writeln!(out, "Attention: {}", self.measurements.attention);
        let _ = writeln!(out, "Meditation: {}", self.measurements.meditation);

        if self.measurements.has_power {
            let _ = writeln!(out, "EEG POWER:");
            for band in PowerBand::ALL {
                let _ = writeln!(out, "{}: {}", band.label(), self.power(band));
            }
        }

        let _ = writeln!(out, "Checksum Calculated: {}", self.checksum_accumulator);
        let _ = writeln!(out, "Checksum Expected: {}", self.checksum);
        let _ = writeln!(out, "--- End Packet ---");

        out
    }
}
