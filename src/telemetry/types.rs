//! Telemetry record types

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::thinkgear::protocol::{Measurements, EEG_POWER_BANDS};

/// One decoded packet, as written to the telemetry log
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryRecord {
    /// Decode time (UTC)
    pub timestamp: DateTime<Utc>,

    /// Signal quality (0-255, 200 = no/poor contact)
    pub signal_quality: u8,

    /// Attention index
    pub attention: u8,

    /// Meditation index
    pub meditation: u8,

    /// EEG band powers in wire order, omitted when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eeg_power: Option<[u32; EEG_POWER_BANDS]>,
}

impl TelemetryRecord {
    /// Build a record from a measurement snapshot, stamped now
    pub fn from_measurements(measurements: &Measurements) -> Self {
        Self {
            timestamp: Utc::now(),
            signal_quality: measurements.signal_quality,
            attention: measurements.attention,
            meditation: measurements.meditation,
            eeg_power: measurements.has_power.then_some(measurements.eeg_power),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_omits_power_when_absent() {
        let record = TelemetryRecord::from_measurements(&Measurements::default());
        let json = serde_json::to_string(&record).unwrap();

        assert!(json.contains("\"signal_quality\":200"));
        assert!(!json.contains("eeg_power"));
    }

    #[test]
    fn test_record_includes_power_when_present() {
        let measurements = Measurements {
            signal_quality: 0,
            attention: 80,
            meditation: 20,
            eeg_power: [1, 2, 3, 4, 5, 6, 7, 8],
            has_power: true,
        };

        let record = TelemetryRecord::from_measurements(&measurements);
        let json = serde_json::to_string(&record).unwrap();

        assert!(json.contains("\"attention\":80"));
        assert!(json.contains("\"eeg_power\":[1,2,3,4,5,6,7,8]"));
    }
}
