// Main entry point - Dependency injection and the session restart loop
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use std::time::Duration;

use crate::application::scheduler::{DualCadenceScheduler, FastLoop, SlowLoop};
use crate::application::snapshot_cache::SharedSnapshotCache;
use crate::application::telemetry_service::TelemetryService;
use crate::domain::zoom::ZoomLevel;
use crate::infrastructure::config::{load_device_config, load_panels_config};
use crate::infrastructure::console::{ConsoleSurface, InertInputs, LogGauge};
use crate::infrastructure::host::{HostConnectivity, SystemClockSync};
use crate::infrastructure::http_feed::HttpTelemetryFeed;
use crate::presentation::dashboard::DashboardView;
use crate::presentation::gauge::GaugeDriver;

/// Character cells of the development surface; a panel driver replaces this.
const CONSOLE_SURFACE_SIZE: (i32, i32) = (100, 30);
const GAUGE_LEVELS: u16 = 255;
const SLOW_LOOP_TICK: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let device_config = load_device_config()?;
    let panels_config = load_panels_config()?;

    let zoom = ZoomLevel::new(device_config.display.zoom).ok_or_else(|| {
        anyhow::anyhow!(
            "display.zoom {} outside 0..={}",
            device_config.display.zoom,
            ZoomLevel::MAX
        )
    })?;

    // Create the feed adapter and host collaborators (infrastructure layer)
    let feed = Arc::new(HttpTelemetryFeed::new(
        device_config.feed.base_url.clone(),
        device_config.feed.api_key.clone(),
    ));
    let connectivity = Arc::new(HostConnectivity::new(device_config.feed.base_url.clone()));
    let time_sync = Arc::new(SystemClockSync);

    println!("Starting pv-dashboard against {}", device_config.feed.base_url);

    // Every pass rebuilds the session's whole mutable state; the uptime
    // ceiling is a deliberate reset, not a shutdown.
    loop {
        let cache = Arc::new(SharedSnapshotCache::new());
        let (width, height) = CONSOLE_SURFACE_SIZE;

        let slow = SlowLoop {
            service: TelemetryService::new(feed.clone(), device_config.acquisition.attempts),
            cache: cache.clone(),
            view: DashboardView::new(panels_config.panels.clone(), zoom),
            surface: Box::new(ConsoleSurface::new(width, height)),
            connectivity: connectivity.clone(),
            time_sync: time_sync.clone(),
            redraw_interval: device_config.display.redraw_interval(),
            tick: SLOW_LOOP_TICK,
        };
        let fast = FastLoop {
            cache,
            inputs: Box::new(InertInputs),
            gauge: GaugeDriver::new(
                Box::new(LogGauge::new(GAUGE_LEVELS)),
                device_config.gauge.hold_refresh(),
            ),
            full_scale_watts: device_config.gauge.full_scale_watts,
            tick: device_config.gauge.sample_interval(),
        };

        DualCadenceScheduler::new(slow, fast, device_config.session.uptime_ceiling())
            .run_session()
            .await;
        tracing::info!("Session restarting");
    }
}
