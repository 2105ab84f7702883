// Telemetry acquisition - Retry bursts and relative-time conversion
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::application::telemetry_feed::{FeedError, TelemetryFeed};
use crate::domain::telemetry::{CurvePoint, TelemetryChannel, TelemetrySnapshot};
use crate::domain::zoom::ZoomLevel;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("attempt budget exhausted after {attempts} requests: {last}")]
    RequestFailure { attempts: u32, last: FeedError },
}

/// Fetches snapshots and history curves from the feed. Each fetch is a burst
/// of back-to-back attempts; there is no backoff because the slow loop's own
/// cadence already spaces the bursts out.
#[derive(Clone)]
pub struct TelemetryService {
    feed: Arc<dyn TelemetryFeed>,
    attempts: u32,
}

impl TelemetryService {
    pub fn new(feed: Arc<dyn TelemetryFeed>, attempts: u32) -> Self {
        Self {
            feed,
            attempts: attempts.max(1),
        }
    }

    /// Latest reading with its age relative to `now`. The age is signed on
    /// purpose: feed-side clock skew shows up as a negative age instead of
    /// being clamped away.
    pub async fn fetch_latest(&self, now: DateTime<Utc>) -> Result<TelemetrySnapshot, TelemetryError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.feed.latest_record().await {
                Ok(record) => {
                    let age_seconds = seconds_between(record.created_at, now);
                    return Ok(TelemetrySnapshot::new(
                        age_seconds,
                        record.ac_power,
                        record.ac_voltage,
                        record.ac_frequency,
                        record.temperature,
                        record.efficiency,
                        record.cumulative_yield,
                    ));
                }
                Err(err) if attempt >= self.attempts => {
                    return Err(TelemetryError::RequestFailure {
                        attempts: attempt,
                        last: err,
                    });
                }
                Err(err) => {
                    tracing::warn!("Latest reading attempt {}/{} failed: {}", attempt, self.attempts, err);
                }
            }
        }
    }

    /// History of one channel as curve points, oldest first, timestamps
    /// rebased onto seconds relative to `now`. A burst that keeps failing
    /// yields an empty curve, indistinguishable from a feed with no samples.
    pub async fn fetch_curve(&self, now: DateTime<Utc>, zoom: ZoomLevel, channel: TelemetryChannel) -> Vec<CurvePoint> {
        let median_minutes = zoom.resolution_minutes();
        let range_minutes = zoom.range_minutes();
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.feed.channel_history(channel, median_minutes, range_minutes).await {
                Ok(samples) => {
                    return samples
                        .iter()
                        .map(|sample| CurvePoint::new(seconds_between(now, sample.created_at), sample.value))
                        .collect();
                }
                Err(err) if attempt >= self.attempts => {
                    tracing::warn!(
                        "Giving up on {} history after {} attempts: {}",
                        channel.feed_name(),
                        attempt,
                        err
                    );
                    return Vec::new();
                }
                Err(err) => {
                    tracing::warn!(
                        "History attempt {}/{} for {} failed: {}",
                        attempt,
                        self.attempts,
                        channel.feed_name(),
                        err
                    );
                }
            }
        }
    }
}

/// Signed seconds from `from` to `to`; negative when `to` precedes `from`.
fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}
