//! # ThinkGear Protocol Constants and Types
//!
//! Core protocol definitions for the NeuroSky ThinkGear serial protocol.

/// ThinkGear sync byte; two in a row mark the start of a packet
pub const SYNC_BYTE: u8 = 0xAA;

/// Maximum supported payload length in bytes
///
/// Packet structure: sync(2) + length(1) + payload(N) + checksum(1).
/// The length byte declares N; anything above this limit is rejected.
pub const MAX_PACKET_LENGTH: usize = 32;

/// Number of EEG power bands in an extended report
pub const EEG_POWER_BANDS: usize = 8;

/// Poor-signal quality field code (1 data byte)
pub const CODE_SIGNAL_QUALITY: u8 = 0x02;

/// Attention field code (1 data byte)
pub const CODE_ATTENTION: u8 = 0x04;

/// Meditation field code (1 data byte)
pub const CODE_MEDITATION: u8 = 0x05;

/// Vendor extended field code (3 data bytes, skipped)
pub const CODE_EXTENDED: u8 = 0x80;

/// EEG power bands field code (1 sub-length byte + 8 × 3-byte values)
pub const CODE_EEG_POWER: u8 = 0x83;

/// Signal quality reported before any packet arrives ("no contact")
pub const SIGNAL_QUALITY_NO_CONTACT: u8 = 200;

/// One EEG frequency band, in the order the headset reports them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum PowerBand {
    Delta = 0,
    Theta = 1,
    LowAlpha = 2,
    HighAlpha = 3,
    LowBeta = 4,
    HighBeta = 5,
    LowGamma = 6,
    MidGamma = 7,
}

impl PowerBand {
    /// All bands in wire order
    pub const ALL: [PowerBand; EEG_POWER_BANDS] = [
        PowerBand::Delta,
        PowerBand::Theta,
        PowerBand::LowAlpha,
        PowerBand::HighAlpha,
        PowerBand::LowBeta,
        PowerBand::HighBeta,
        PowerBand::LowGamma,
        PowerBand::MidGamma,
    ];

    /// Human-readable band name
    pub fn label(self) -> &'static str {
        match self {
            PowerBand::Delta => "Delta",
            PowerBand::Theta => "Theta",
            PowerBand::LowAlpha => "Low Alpha",
            PowerBand::HighAlpha => "High Alpha",
            PowerBand::LowBeta => "Low Beta",
            PowerBand::HighBeta => "High Beta",
            PowerBand::LowGamma => "Low Gamma",
            PowerBand::MidGamma => "Mid Gamma",
        }
    }
}

/// Snapshot of the last fully-decoded measurement set
///
/// Overwritten wholesale by each successful decode; the decoder keeps
/// no packet history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurements {
    /// Signal quality (0-255, 200 = no/poor contact)
    pub signal_quality: u8,

    /// Attention index (0-100 nominal)
    pub attention: u8,

    /// Meditation index (0-100 nominal)
    pub meditation: u8,

    /// EEG band powers, 24-bit values in [`PowerBand`] order
    pub eeg_power: [u32; EEG_POWER_BANDS],

    /// Whether the last packet carried EEG power bands
    pub has_power: bool,
}

impl Default for Measurements {
    fn default() -> Self {
        Self {
            signal_quality: SIGNAL_QUALITY_NO_CONTACT,
            attention: 0,
            meditation: 0,
            eeg_power: [0; EEG_POWER_BANDS],
            has_power: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_constants() {
        assert_eq!(SYNC_BYTE, 0xAA);
        assert_eq!(MAX_PACKET_LENGTH, 32);
        assert_eq!(EEG_POWER_BANDS, 8);
        assert_eq!(CODE_SIGNAL_QUALITY, 0x02);
        assert_eq!(CODE_ATTENTION, 0x04);
        assert_eq!(CODE_MEDITATION, 0x05);
        assert_eq!(CODE_EXTENDED, 0x80);
        assert_eq!(CODE_EEG_POWER, 0x83);
    }

    #[test]
    fn test_band_wire_order() {
        assert_eq!(PowerBand::ALL[0], PowerBand::Delta);
        assert_eq!(PowerBand::ALL[7], PowerBand::MidGamma);
        for (i, band) in PowerBand::ALL.iter().enumerate() {
            assert_eq!(*band as usize, i, "band {} out of wire order", band.label());
        }
    }

    #[test]
    fn test_measurements_initial_state() {
        let m = Measurements::default();
        assert_eq!(m.signal_quality, SIGNAL_QUALITY_NO_CONTACT);
        assert_eq!(m.attention, 0);
        assert_eq!(m.meditation, 0);
        assert_eq!(m.eeg_power, [0; EEG_POWER_BANDS]);
        assert!(!m.has_power);
    }
}
