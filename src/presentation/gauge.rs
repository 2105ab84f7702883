// Gauge drive policy - Level derivation and write suppression
use std::time::{Duration, Instant};

/// Period of the triangle test waveform, zero to full scale and back.
pub const SWEEP_PERIOD: Duration = Duration::from_secs(4);

/// Actuator port: one intensity level in 0..=max_level.
pub trait GaugeActuator: Send {
    fn max_level(&self) -> u16;

    fn set_level(&mut self, level: u16) -> anyhow::Result<()>;
}

/// Writes levels to the actuator only when the value changes or the
/// hold-refresh interval lapses, sparing the needle pointless chatter.
pub struct GaugeDriver {
    actuator: Box<dyn GaugeActuator>,
    hold_refresh: Duration,
    last_write: Option<(u16, Instant)>,
}

impl GaugeDriver {
    pub fn new(actuator: Box<dyn GaugeActuator>, hold_refresh: Duration) -> Self {
        Self {
            actuator,
            hold_refresh,
            last_write: None,
        }
    }

    pub fn max_level(&self) -> u16 {
        self.actuator.max_level()
    }

    /// Clamps `level` into the actuator range and writes it, skipping the
    /// actuator when the value is unchanged and recent enough.
    pub fn apply(&mut self, level: u16, now: Instant) -> anyhow::Result<()> {
        let level = level.min(self.actuator.max_level());
        if let Some((last_level, written_at)) = self.last_write {
            if last_level == level && now.duration_since(written_at) < self.hold_refresh {
                return Ok(());
            }
        }
        self.actuator.set_level(level)?;
        self.last_write = Some((level, now));
        Ok(())
    }
}

/// Gauge level for a power reading, clamped into 0..=max_level.
pub fn gauge_level_for_power(power_watts: f32, full_scale_watts: f32, max_level: u16) -> u16 {
    if full_scale_watts <= 0.0 {
        return 0;
    }
    let ratio = f64::from(power_watts) / f64::from(full_scale_watts);
    (ratio * f64::from(max_level)).round().clamp(0.0, f64::from(max_level)) as u16
}

/// Triangle test waveform over the session uptime: 0 at the period
/// boundaries, max_level at the half period.
pub fn sweep_level(uptime: Duration, max_level: u16) -> u16 {
    let period = SWEEP_PERIOD.as_secs_f64();
    let phase = uptime.as_secs_f64() % period / period;
    let ramp = if phase < 0.5 { phase * 2.0 } else { 2.0 - phase * 2.0 };
    (ramp * f64::from(max_level)).round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records every actuator write through a shared handle.
    struct RecordingActuator {
        writes: Arc<Mutex<Vec<u16>>>,
    }

    impl GaugeActuator for RecordingActuator {
        fn max_level(&self) -> u16 {
            255
        }

        fn set_level(&mut self, level: u16) -> anyhow::Result<()> {
            self.writes.lock().unwrap().push(level);
            Ok(())
        }
    }

    fn recording_driver(hold_refresh: Duration) -> (GaugeDriver, Arc<Mutex<Vec<u16>>>) {
        let writes = Arc::new(Mutex::new(Vec::new()));
        let driver = GaugeDriver::new(
            Box::new(RecordingActuator { writes: writes.clone() }),
            hold_refresh,
        );
        (driver, writes)
    }

    #[test]
    fn test_unchanged_level_skips_actuator_until_hold_lapses() {
        let (mut driver, writes) = recording_driver(Duration::from_secs(2));
        let t0 = Instant::now();
        driver.apply(100, t0).unwrap();
        driver.apply(100, t0 + Duration::from_millis(500)).unwrap();
        driver.apply(100, t0 + Duration::from_secs(3)).unwrap();
        driver.apply(140, t0 + Duration::from_secs(3)).unwrap();
        assert_eq!(*writes.lock().unwrap(), vec![100, 100, 140]);
    }

    #[test]
    fn test_apply_clamps_to_actuator_range() {
        let (mut driver, writes) = recording_driver(Duration::from_secs(2));
        driver.apply(9999, Instant::now()).unwrap();
        assert_eq!(*writes.lock().unwrap(), vec![255]);
    }

    #[test]
    fn test_power_derivation_clamps_both_ends() {
        assert_eq!(gauge_level_for_power(3000.0, 6000.0, 255), 128);
        assert_eq!(gauge_level_for_power(-50.0, 6000.0, 255), 0);
        assert_eq!(gauge_level_for_power(9000.0, 6000.0, 255), 255);
        assert_eq!(gauge_level_for_power(1000.0, 0.0, 255), 0);
    }

    #[test]
    fn test_sweep_waveform_shape() {
        assert_eq!(sweep_level(Duration::ZERO, 200), 0);
        assert_eq!(sweep_level(Duration::from_secs(1), 200), 100);
        assert_eq!(sweep_level(Duration::from_secs(2), 200), 200);
        assert_eq!(sweep_level(Duration::from_secs(3), 200), 100);
        assert_eq!(sweep_level(Duration::from_secs(4), 200), 0);
    }
}
