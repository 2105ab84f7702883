// Telemetry feed port - One call is one request attempt
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::telemetry::TelemetryChannel;

/// One parsed record from the latest-reading endpoint.
#[derive(Debug, Clone)]
pub struct FeedRecord {
    pub created_at: DateTime<Utc>,
    pub ac_power: f32,
    pub ac_voltage: f32,
    pub ac_frequency: f32,
    pub temperature: f32,
    pub efficiency: f32,
    pub cumulative_yield: f32,
}

/// One parsed sample from the per-channel history endpoint.
#[derive(Debug, Clone, Copy)]
pub struct FeedSample {
    pub created_at: DateTime<Utc>,
    pub value: f64,
}

/// Failure of a single request attempt.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("transport: {0}")]
    Transport(String),
    #[error("endpoint returned status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Parse(String),
}

/// Transport-and-parse collaborator behind the telemetry service. Retry
/// discipline is the caller's concern, never the feed's.
#[async_trait]
pub trait TelemetryFeed: Send + Sync {
    /// Most recent reading of every channel.
    async fn latest_record(&self) -> Result<FeedRecord, FeedError>;

    /// History of one channel over the trailing `range_minutes`, downsampled
    /// to `median_minutes` windows, oldest sample first.
    async fn channel_history(
        &self,
        channel: TelemetryChannel,
        median_minutes: u32,
        range_minutes: u32,
    ) -> Result<Vec<FeedSample>, FeedError>;
}
