use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct DeviceConfig {
    pub feed: FeedSettings,
    pub acquisition: AcquisitionSettings,
    pub display: DisplaySettings,
    pub gauge: GaugeSettings,
    pub session: SessionSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedSettings {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AcquisitionSettings {
    /// Back-to-back request attempts per fetch burst.
    #[serde(default = "default_attempts")]
    pub attempts: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplaySettings {
    #[serde(default = "default_redraw_interval_secs")]
    pub redraw_interval_secs: u64,
    /// Zoom level of the history panels, 0 (finest) through 6.
    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GaugeSettings {
    /// Power reading that deflects the needle to full scale.
    #[serde(default = "default_full_scale_watts")]
    pub full_scale_watts: f32,
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,
    /// How long an unchanged level may go unwritten.
    #[serde(default = "default_hold_refresh_secs")]
    pub hold_refresh_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    #[serde(default = "default_uptime_ceiling_secs")]
    pub uptime_ceiling_secs: u64,
}

/// One history panel below the header, top to bottom in file order.
#[derive(Debug, Deserialize, Clone)]
pub struct PanelsConfig {
    #[serde(default)]
    pub panels: Vec<PanelConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PanelConfig {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub channel: String,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
}

fn default_attempts() -> u32 {
    5
}

fn default_redraw_interval_secs() -> u64 {
    180
}

fn default_zoom() -> u8 {
    2
}

fn default_full_scale_watts() -> f32 {
    6000.0
}

fn default_sample_interval_ms() -> u64 {
    100
}

fn default_hold_refresh_secs() -> u64 {
    2
}

fn default_uptime_ceiling_secs() -> u64 {
    3600
}

impl DisplaySettings {
    pub fn redraw_interval(&self) -> Duration {
        Duration::from_secs(self.redraw_interval_secs)
    }
}

impl GaugeSettings {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn hold_refresh(&self) -> Duration {
        Duration::from_secs(self.hold_refresh_secs)
    }
}

impl SessionSettings {
    pub fn uptime_ceiling(&self) -> Duration {
        Duration::from_secs(self.uptime_ceiling_secs)
    }
}

pub fn load_device_config() -> anyhow::Result<DeviceConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/device"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_panels_config() -> anyhow::Result<PanelsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/panels"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
