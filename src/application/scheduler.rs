// Dual-cadence control loops and the session restart policy
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use thiserror::Error;
use tokio::time::{interval, sleep};

use crate::application::snapshot_cache::{CacheRead, READ_LOCK_WAIT, SharedSnapshotCache};
use crate::application::telemetry_service::TelemetryService;
use crate::domain::telemetry::{TelemetryChannel, TelemetrySnapshot};
use crate::presentation::dashboard::{DashboardView, FrameData};
use crate::presentation::gauge::{GaugeDriver, gauge_level_for_power, sweep_level};
use crate::presentation::surface::RenderSurface;

#[derive(Debug, Error)]
#[error("connectivity failure: {0}")]
pub struct ConnectivityError(pub String);

#[derive(Debug, Error)]
#[error("time sync failure: {0}")]
pub struct TimeSyncError(pub String);

/// Link-layer collaborator. On the device this wraps Wi-Fi association; on a
/// development host it degenerates to a reachability probe.
#[async_trait]
pub trait Connectivity: Send + Sync {
    async fn is_connected(&self) -> bool;

    /// Blocks through one association burst until the link is up or the
    /// burst gives up.
    async fn ensure_connected(&self) -> Result<(), ConnectivityError>;
}

/// Wall-clock synchronization collaborator (SNTP on the device).
#[async_trait]
pub trait TimeSync: Send + Sync {
    async fn synchronize(&self) -> Result<(), TimeSyncError>;
}

/// Digital control lines sampled by the fast loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputLine {
    /// Hold the gauge at full scale while active.
    GaugeFullScale,
    /// Run the gauge through the sweep waveform while active.
    GaugeSweep,
    /// Zoom buttons are wired on the device; no control path consults them.
    #[allow(dead_code)]
    ZoomIn,
    #[allow(dead_code)]
    ZoomOut,
}

/// Input bank port. Sampled once per line per fast cycle.
pub trait OverrideInputs: Send {
    fn is_active(&mut self, line: InputLine) -> bool;
}

/// Slow-loop control states. One pass runs connectivity, at most one time
/// sync attempt, the wait, and the redraw, in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlowState {
    EnsureConnectivity,
    EnsureTimeSync,
    Wait,
    Redraw,
}

/// Connectivity upkeep and dashboard redraws on a minutes cadence.
pub struct SlowLoop {
    pub service: TelemetryService,
    pub cache: Arc<SharedSnapshotCache>,
    pub view: DashboardView,
    pub surface: Box<dyn RenderSurface>,
    pub connectivity: Arc<dyn Connectivity>,
    pub time_sync: Arc<dyn TimeSync>,
    pub redraw_interval: Duration,
    pub tick: Duration,
}

impl SlowLoop {
    pub async fn run(mut self) {
        let mut state = SlowState::EnsureConnectivity;
        let mut time_synced = false;
        let mut last_redraw: Option<Instant> = None;
        loop {
            state = match state {
                SlowState::EnsureConnectivity => match self.connectivity.ensure_connected().await {
                    Ok(()) => SlowState::EnsureTimeSync,
                    Err(err) => {
                        tracing::warn!("Connectivity attempt failed: {}", err);
                        sleep(self.tick).await;
                        SlowState::EnsureConnectivity
                    }
                },
                SlowState::EnsureTimeSync => {
                    // One successful synchronization per session is enough.
                    // Failures leave the clock unsynced and the pass going;
                    // the next pass attempts again.
                    if !time_synced {
                        match self.time_sync.synchronize().await {
                            Ok(()) => time_synced = true,
                            Err(err) => tracing::warn!("Time sync failed: {}", err),
                        }
                    }
                    SlowState::Wait
                }
                SlowState::Wait => {
                    if !self.connectivity.is_connected().await {
                        tracing::warn!("Connectivity lost; re-associating");
                        SlowState::EnsureConnectivity
                    } else if redraw_due(last_redraw, self.redraw_interval, Instant::now()) {
                        SlowState::Redraw
                    } else {
                        sleep(self.tick).await;
                        SlowState::Wait
                    }
                }
                SlowState::Redraw => {
                    self.redraw().await;
                    last_redraw = Some(Instant::now());
                    SlowState::EnsureTimeSync
                }
            };
        }
    }

    /// One acquisition-and-render pass. Every outcome renders a frame; what
    /// changes is how much data the frame carries.
    async fn redraw(&mut self) {
        let now = Utc::now();
        match self.service.fetch_latest(now).await {
            Ok(snapshot) => {
                tracing::debug!("Snapshot acquired (age {:.1} s)", snapshot.age_seconds);
                self.cache.store(snapshot).await;
            }
            // The cache keeps its previous value: stale data beats no data.
            Err(err) => tracing::warn!("Snapshot acquisition failed: {}", err),
        }

        let zoom = self.view.zoom();
        let fetches = self.view.panels().iter().map(|panel| {
            let service = &self.service;
            async move {
                match TelemetryChannel::from_feed_name(&panel.channel) {
                    Some(channel) => service.fetch_curve(now, zoom, channel).await,
                    None => {
                        tracing::warn!("Panel {} names unknown channel {:?}", panel.id, panel.channel);
                        Vec::new()
                    }
                }
            }
        });
        let curves = join_all(fetches).await;

        let frame = FrameData {
            snapshot: self.cache.read().await,
            curves,
        };
        self.view.render(&frame, self.surface.as_mut());
        tracing::debug!("Dashboard redrawn at zoom {}", zoom.level());
    }
}

/// Input sampling and gauge updates on a subsecond cadence.
pub struct FastLoop {
    pub cache: Arc<SharedSnapshotCache>,
    pub inputs: Box<dyn OverrideInputs>,
    pub gauge: GaugeDriver,
    pub full_scale_watts: f32,
    pub tick: Duration,
}

impl FastLoop {
    pub async fn run(mut self) {
        let started = Instant::now();
        let mut ticker = interval(self.tick.max(Duration::from_millis(1)));
        let mut last_seen: Option<TelemetrySnapshot> = None;
        loop {
            ticker.tick().await;
            let max_level = self.gauge.max_level();
            let level = match override_level(self.inputs.as_mut(), started.elapsed(), max_level) {
                Some(level) => level,
                None => {
                    match self.cache.read_within(READ_LOCK_WAIT).await {
                        CacheRead::Latest(snapshot) => last_seen = Some(snapshot),
                        CacheRead::Empty => last_seen = None,
                        // Contended cycle: keep the last snapshot seen.
                        CacheRead::TimedOut => {}
                    }
                    match last_seen.as_ref().filter(|snapshot| snapshot.is_fresh()) {
                        Some(snapshot) => {
                            gauge_level_for_power(snapshot.ac_power, self.full_scale_watts, max_level)
                        }
                        None => 0,
                    }
                }
            };
            if let Err(err) = self.gauge.apply(level, Instant::now()) {
                tracing::warn!("Gauge write failed: {}", err);
            }
        }
    }
}

/// The first pass always redraws; later passes wait out the interval.
fn redraw_due(last_redraw: Option<Instant>, interval: Duration, now: Instant) -> bool {
    last_redraw.map_or(true, |at| now.duration_since(at) >= interval)
}

/// Test overrides win over telemetry: full scale first, then the sweep.
fn override_level(inputs: &mut dyn OverrideInputs, uptime: Duration, max_level: u16) -> Option<u16> {
    if inputs.is_active(InputLine::GaugeFullScale) {
        Some(max_level)
    } else if inputs.is_active(InputLine::GaugeSweep) {
        Some(sweep_level(uptime, max_level))
    } else {
        None
    }
}

/// Owns one session's loops. A session ends when the uptime ceiling elapses;
/// the caller rebuilds all session state before running the next one. The
/// ceiling is a deliberate whole-state reset, not a shutdown path.
pub struct DualCadenceScheduler {
    slow: SlowLoop,
    fast: FastLoop,
    uptime_ceiling: Duration,
}

impl DualCadenceScheduler {
    pub fn new(slow: SlowLoop, fast: FastLoop, uptime_ceiling: Duration) -> Self {
        Self {
            slow,
            fast,
            uptime_ceiling,
        }
    }

    /// Runs both loops side by side until the ceiling, then tears them down.
    /// The loops share nothing but the snapshot cache.
    pub async fn run_session(self) {
        let slow = tokio::spawn(self.slow.run());
        let fast = tokio::spawn(self.fast.run());
        sleep(self.uptime_ceiling).await;
        slow.abort();
        fast.abort();
        tracing::info!("Uptime ceiling reached; tearing the session down");
    }
}
