// Telemetry data domain models

/// Maximum age in seconds at which a snapshot still counts as fresh.
pub const FRESH_AGE_LIMIT_SECS: f64 = 900.0;

/// One full reading of the inverter, stamped with its age at fetch time.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySnapshot {
    /// Seconds between the reading's creation and the fetch. Signed: a device
    /// clock running behind the feed produces a negative age.
    pub age_seconds: f64,
    pub ac_power: f32,
    pub ac_voltage: f32,
    pub ac_frequency: f32,
    pub temperature: f32,
    pub efficiency: f32,
    pub cumulative_yield: f32,
}

impl TelemetrySnapshot {
    pub fn new(
        age_seconds: f64,
        ac_power: f32,
        ac_voltage: f32,
        ac_frequency: f32,
        temperature: f32,
        efficiency: f32,
        cumulative_yield: f32,
    ) -> Self {
        Self {
            age_seconds,
            ac_power,
            ac_voltage,
            ac_frequency,
            temperature,
            efficiency,
            cumulative_yield,
        }
    }

    /// A reading without any cumulative yield comes from an inverter that has
    /// never produced and carries no usable figures.
    pub fn is_valid(&self) -> bool {
        self.cumulative_yield > 0.0
    }

    /// Valid and young enough to show instantaneous values.
    pub fn is_fresh(&self) -> bool {
        self.is_valid() && self.age_seconds < FRESH_AGE_LIMIT_SECS
    }
}

/// One sample of a history curve, on a time axis relative to the fetch
/// instant. Offsets are at most zero; zero is the newest sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub relative_time_seconds: f64,
    pub value: f64,
}

impl CurvePoint {
    pub fn new(relative_time_seconds: f64, value: f64) -> Self {
        Self {
            relative_time_seconds,
            value,
        }
    }
}

/// Channels the feed keeps a history for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryChannel {
    AcPower,
    AcVoltage,
    AcFrequency,
    Temperature,
    Efficiency,
    CumulativeYield,
}

impl TelemetryChannel {
    /// Field name the feed uses for this channel.
    pub fn feed_name(self) -> &'static str {
        match self {
            TelemetryChannel::AcPower => "ac_power",
            TelemetryChannel::AcVoltage => "ac_voltage",
            TelemetryChannel::AcFrequency => "ac_frequency",
            TelemetryChannel::Temperature => "temperature",
            TelemetryChannel::Efficiency => "efficiency",
            TelemetryChannel::CumulativeYield => "cumulative_yield",
        }
    }

    pub fn from_feed_name(name: &str) -> Option<Self> {
        match name {
            "ac_power" => Some(TelemetryChannel::AcPower),
            "ac_voltage" => Some(TelemetryChannel::AcVoltage),
            "ac_frequency" => Some(TelemetryChannel::AcFrequency),
            "temperature" => Some(TelemetryChannel::Temperature),
            "efficiency" => Some(TelemetryChannel::Efficiency),
            "cumulative_yield" => Some(TelemetryChannel::CumulativeYield),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with(age_seconds: f64, cumulative_yield: f32) -> TelemetrySnapshot {
        TelemetrySnapshot::new(age_seconds, 1500.0, 230.0, 50.0, 41.5, 96.2, cumulative_yield)
    }

    #[test]
    fn test_freshness_boundary() {
        assert!(snapshot_with(899.0, 12.5).is_fresh());
        assert!(!snapshot_with(901.0, 12.5).is_fresh());
    }

    #[test]
    fn test_zero_yield_is_invalid() {
        let snapshot = snapshot_with(10.0, 0.0);
        assert!(!snapshot.is_valid());
        assert!(!snapshot.is_fresh());
    }

    #[test]
    fn test_negative_age_counts_as_fresh() {
        assert!(snapshot_with(-30.0, 12.5).is_fresh());
    }

    #[test]
    fn test_channel_names_round_trip() {
        let channels = [
            TelemetryChannel::AcPower,
            TelemetryChannel::AcVoltage,
            TelemetryChannel::AcFrequency,
            TelemetryChannel::Temperature,
            TelemetryChannel::Efficiency,
            TelemetryChannel::CumulativeYield,
        ];
        for channel in channels {
            assert_eq!(TelemetryChannel::from_feed_name(channel.feed_name()), Some(channel));
        }
        assert_eq!(TelemetryChannel::from_feed_name("dc_power"), None);
    }
}
