// Dashboard composition - Header tiles and curve panels on a paged surface
use crate::domain::plot::{Axis, AxisTick, DomainRect, PixelPos, PixelRect, PlotEngine, PlotPoint, PlotSink};
use crate::domain::telemetry::{CurvePoint, TelemetrySnapshot};
use crate::domain::zoom::ZoomLevel;
use crate::infrastructure::config::PanelConfig;
use crate::presentation::surface::{Font, RenderSurface};

/// Columns reserved left of each plot for y-axis labels.
const Y_LABEL_COLUMNS: i32 = 8;

/// Everything one redraw renders. Assembled by the slow loop, dropped with
/// the frame.
pub struct FrameData {
    pub snapshot: Option<TelemetrySnapshot>,
    /// One curve per configured panel, in panel order.
    pub curves: Vec<Vec<CurvePoint>>,
}

/// Static dashboard composition: the configured panels and the zoom level
/// their history queries use.
pub struct DashboardView {
    panels: Vec<PanelConfig>,
    zoom: ZoomLevel,
}

impl DashboardView {
    pub fn new(panels: Vec<PanelConfig>, zoom: ZoomLevel) -> Self {
        Self { panels, zoom }
    }

    pub fn panels(&self) -> &[PanelConfig] {
        &self.panels
    }

    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    /// Drives one full frame through the surface's page protocol, re-issuing
    /// the drawing for every buffered page.
    pub fn render(&self, frame: &FrameData, surface: &mut dyn RenderSurface) {
        surface.begin_frame();
        loop {
            self.paint(frame, surface);
            if !surface.next_page() {
                break;
            }
        }
        surface.end_frame();
    }

    fn paint(&self, frame: &FrameData, surface: &mut dyn RenderSurface) {
        let (width, height) = surface.dimensions();
        let header_height = (height / 5).max(5);
        self.paint_header(frame.snapshot.as_ref(), width, header_height, surface);

        if self.panels.is_empty() {
            return;
        }
        let panel_height = (height - header_height) / self.panels.len() as i32;
        for (index, panel) in self.panels.iter().enumerate() {
            let area = PixelRect {
                x: 0,
                y: header_height + index as i32 * panel_height,
                width,
                height: panel_height,
            };
            let curve = frame.curves.get(index).map(Vec::as_slice).unwrap_or(&[]);
            self.paint_panel(panel, curve, area, surface);
        }
    }

    fn paint_header(
        &self,
        snapshot: Option<&TelemetrySnapshot>,
        width: i32,
        height: i32,
        surface: &mut dyn RenderSurface,
    ) {
        match snapshot.filter(|snapshot| snapshot.is_valid()) {
            // Nothing valid cached this session.
            None => {
                surface.set_font(Font::Large);
                surface.set_cursor(2, height / 2 - 1);
                surface.print("no data");
            }
            Some(snapshot) => {
                let cell_width = width / 3;
                surface.set_font(Font::Small);
                for (index, (label, value)) in header_tiles(snapshot).iter().enumerate() {
                    let column = index as i32 % 3;
                    let row = index as i32 / 3;
                    surface.set_cursor(column * cell_width + 1, 1 + row * 2);
                    surface.print(&format!("{} {}", label, value));
                }
            }
        }
        surface.draw_line(0, height - 1, width - 1, height - 1);
    }

    fn paint_panel(
        &self,
        panel: &PanelConfig,
        curve: &[CurvePoint],
        area: PixelRect,
        surface: &mut dyn RenderSurface,
    ) {
        surface.set_font(Font::Small);
        surface.set_cursor(area.x + 1, area.y);
        surface.print(&format!("{} [{}]", panel.title, panel.unit));

        // Title row above, tick mark and label rows below.
        let plot_rect = PixelRect {
            x: area.x + Y_LABEL_COLUMNS,
            y: area.y + 1,
            width: area.width - Y_LABEL_COLUMNS - 1,
            height: area.height - 4,
        };
        if plot_rect.width <= 1 || plot_rect.height <= 1 {
            tracing::debug!("Panel {} area too small to plot", panel.id);
            return;
        }

        let domain = panel_domain(panel, curve, self.zoom);
        let mut engine = PlotEngine::new(plot_rect, domain);
        engine.set_x_ticks(lookback_ticks(self.zoom));
        engine.set_y_ticks(value_ticks(&domain));

        let mut sink = SurfaceSink { surface };
        engine.draw_x_axis(&mut sink);
        engine.draw_y_axis(&mut sink);
        engine.draw_x_ticks(&mut sink);
        engine.draw_y_ticks(&mut sink);

        let points: Vec<PlotPoint> = curve
            .iter()
            .map(|point| PlotPoint::new(point.relative_time_seconds, point.value))
            .collect();
        engine.draw_points(&points, &mut sink);
        engine.draw_lines_between_points(&points, &mut sink);
    }
}

/// Header values under the staleness rules: instantaneous fields of a stale
/// snapshot turn into dashes, cumulative yield stays visible whenever it is
/// nonzero.
fn header_tiles(snapshot: &TelemetrySnapshot) -> Vec<(&'static str, String)> {
    let fresh = snapshot.is_fresh();
    let instantaneous = |text: String| if fresh { text } else { "--".to_string() };
    vec![
        ("Power", instantaneous(format!("{:.0} W", snapshot.ac_power))),
        ("Voltage", instantaneous(format!("{:.1} V", snapshot.ac_voltage))),
        ("Freq", instantaneous(format!("{:.2} Hz", snapshot.ac_frequency))),
        ("Temp", instantaneous(format!("{:.1} C", snapshot.temperature))),
        ("Eff", instantaneous(format!("{:.1} %", snapshot.efficiency))),
        (
            "Yield",
            if snapshot.cumulative_yield > 0.0 {
                format!("{:.1} kWh", snapshot.cumulative_yield)
            } else {
                "--".to_string()
            },
        ),
    ]
}

/// Plot domain for one panel: x spans the zoom lookback ending now, y comes
/// from the panel's configured range or from the curve itself.
fn panel_domain(panel: &PanelConfig, curve: &[CurvePoint], zoom: ZoomLevel) -> DomainRect {
    let (min_y, max_y) = match (panel.y_min, panel.y_max) {
        (Some(min), Some(max)) if min < max => (min, max),
        _ => value_bounds(curve),
    };
    DomainRect {
        min_x: -zoom.range_seconds(),
        max_x: 0.0,
        min_y,
        max_y,
    }
}

/// Y bounds from the data with a small band, padded so flat and empty curves
/// still give a drawable domain.
fn value_bounds(curve: &[CurvePoint]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for point in curve {
        min = min.min(point.value);
        max = max.max(point.value);
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let mut pad = (max - min) * 0.05;
    if pad <= 0.0 {
        pad = (max.abs() * 0.05).max(1.0);
    }
    (min - pad, max + pad)
}

/// X ticks at the quarter points of the lookback window. Every range in the
/// zoom table is divisible by four, so the quarters land on round minutes.
fn lookback_ticks(zoom: ZoomLevel) -> Vec<AxisTick> {
    let range = zoom.range_seconds();
    (0..=4)
        .map(|quarter| {
            let value = -range + range * f64::from(quarter) / 4.0;
            AxisTick::new(value, lookback_label(value))
        })
        .collect()
}

/// Compact label for a non-positive lookback offset: "now", "-30m", "-4h".
fn lookback_label(seconds: f64) -> String {
    let minutes = (-seconds / 60.0).round() as i64;
    if minutes == 0 {
        "now".to_string()
    } else if minutes % 60 == 0 {
        format!("-{}h", minutes / 60)
    } else {
        format!("-{}m", minutes)
    }
}

/// Y ticks at the bottom, middle, and top of the value domain.
fn value_ticks(domain: &DomainRect) -> Vec<AxisTick> {
    let mid = (domain.min_y + domain.max_y) / 2.0;
    vec![
        AxisTick::new(domain.min_y, value_label(domain.min_y)),
        AxisTick::new(mid, value_label(mid)),
        AxisTick::new(domain.max_y, value_label(domain.max_y)),
    ]
}

/// Compact value label: "95.0", "950", "1.2k".
fn value_label(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 10_000.0 {
        format!("{:.0}k", value / 1000.0)
    } else if magnitude >= 1000.0 {
        format!("{:.1}k", value / 1000.0)
    } else if magnitude >= 100.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Feeds the plot engine's primitives onto the render surface.
struct SurfaceSink<'a> {
    surface: &'a mut dyn RenderSurface,
}

impl PlotSink for SurfaceSink<'_> {
    fn axis_line(&mut self, _axis: Axis, from: PixelPos, to: PixelPos) {
        self.surface.draw_line(from.x, from.y, to.x, to.y);
    }

    fn tick(&mut self, axis: Axis, at: PixelPos, relative: f64, label: &str) {
        match axis {
            Axis::X => {
                self.surface.draw_line(at.x, at.y, at.x, at.y + 1);
                // Slide the label under its mark, left-aligned at the window
                // start and right-aligned at "now".
                let shift = (relative * label.len().saturating_sub(1) as f64).round() as i32;
                self.surface.set_cursor(at.x - shift, at.y + 2);
                self.surface.print(label);
            }
            Axis::Y => {
                self.surface.draw_line(at.x - 1, at.y, at.x, at.y);
                self.surface.set_cursor(at.x - 1 - label.len() as i32, at.y);
                self.surface.print(label);
            }
        }
    }

    fn point(&mut self, at: PixelPos, _source: PlotPoint) {
        self.surface.fill_rect(at.x, at.y, 1, 1);
    }

    fn segment(&mut self, from: PixelPos, to: PixelPos, _source_from: PlotPoint, _source_to: PlotPoint) {
        self.surface.draw_line(from.x, from.y, to.x, to.y);
    }
}
