// Zoom levels and the query scales behind them

/// Query scale of one zoom level: downsampling window and lookback range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomScale {
    pub resolution_minutes: u32,
    pub range_minutes: u32,
}

/// Scales indexed by zoom level, finest first. Resolution never exceeds
/// range, so every query downsamples rather than interpolates.
const ZOOM_SCALES: [ZoomScale; 7] = [
    ZoomScale { resolution_minutes: 1, range_minutes: 60 },
    ZoomScale { resolution_minutes: 2, range_minutes: 120 },
    ZoomScale { resolution_minutes: 5, range_minutes: 240 },
    ZoomScale { resolution_minutes: 10, range_minutes: 480 },
    ZoomScale { resolution_minutes: 15, range_minutes: 720 },
    ZoomScale { resolution_minutes: 30, range_minutes: 1440 },
    ZoomScale { resolution_minutes: 60, range_minutes: 2880 },
];

/// Bounds-checked index into the zoom scale table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomLevel(u8);

impl ZoomLevel {
    pub const MAX: u8 = (ZOOM_SCALES.len() - 1) as u8;

    pub fn new(level: u8) -> Option<Self> {
        (level <= Self::MAX).then_some(Self(level))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    pub fn resolution_minutes(self) -> u32 {
        ZOOM_SCALES[self.0 as usize].resolution_minutes
    }

    pub fn range_minutes(self) -> u32 {
        ZOOM_SCALES[self.0 as usize].range_minutes
    }

    /// Width of the lookback window in seconds.
    pub fn range_seconds(self) -> f64 {
        f64::from(self.range_minutes()) * 60.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_never_exceeds_range() {
        for level in 0..=ZoomLevel::MAX {
            let zoom = ZoomLevel::new(level).unwrap();
            assert!(
                zoom.resolution_minutes() <= zoom.range_minutes(),
                "level {} oversamples",
                level
            );
        }
    }

    #[test]
    fn test_out_of_range_levels_rejected() {
        assert!(ZoomLevel::new(0).is_some());
        assert!(ZoomLevel::new(ZoomLevel::MAX).is_some());
        assert!(ZoomLevel::new(ZoomLevel::MAX + 1).is_none());
        assert!(ZoomLevel::new(u8::MAX).is_none());
    }

    #[test]
    fn test_range_seconds_matches_minutes() {
        let zoom = ZoomLevel::new(2).unwrap();
        assert_eq!(zoom.range_minutes(), 240);
        assert_eq!(zoom.range_seconds(), 240.0 * 60.0);
    }
}
