// Linear 2-D plot engine: maps value-space coordinates into a pixel
// rectangle and walks axes, ticks, points, and segments through a sink.

/// Pixel position with the origin at the top-left of the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelPos {
    pub x: i32,
    pub y: i32,
}

impl PixelPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Screen rectangle a plot renders into.
#[derive(Debug, Clone, Copy)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Value-space bounds of a plot, independent of its pixel rectangle.
#[derive(Debug, Clone, Copy)]
pub struct DomainRect {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

/// A labeled marker on one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub value: f64,
    pub label: String,
}

impl AxisTick {
    pub fn new(value: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// A point in the plot's value space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

impl PlotPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Receiver for the engine's drawing primitives. The engine draws nothing
/// itself; rendering back ends implement this trait.
pub trait PlotSink {
    /// Full axis line, endpoints in pixel space.
    fn axis_line(&mut self, axis: Axis, from: PixelPos, to: PixelPos);

    /// One tick mark. `relative` is the tick's position along its axis in
    /// [0, 1], for shifting labels between left, center, and right alignment.
    fn tick(&mut self, axis: Axis, at: PixelPos, relative: f64, label: &str);

    /// One data point together with its source value.
    fn point(&mut self, at: PixelPos, source: PlotPoint);

    /// Connecting segment between two consecutive data points.
    fn segment(&mut self, from: PixelPos, to: PixelPos, source_from: PlotPoint, source_to: PlotPoint);
}

/// Linear mapping on both axes. The y axis grows upward while pixel rows
/// grow downward, so the vertical mapping is inverted.
pub struct PlotEngine {
    pixel: PixelRect,
    domain: DomainRect,
    x_ticks: Vec<AxisTick>,
    y_ticks: Vec<AxisTick>,
}

impl PlotEngine {
    /// Degenerate rectangles are programming errors, not runtime conditions.
    pub fn new(pixel: PixelRect, domain: DomainRect) -> Self {
        assert!(pixel.width > 0);
        assert!(pixel.height > 0);
        assert!(domain.min_x < domain.max_x);
        assert!(domain.min_y < domain.max_y);
        Self {
            pixel,
            domain,
            x_ticks: Vec::new(),
            y_ticks: Vec::new(),
        }
    }

    /// Replaces the x-axis ticks. Every tick must lie within the x domain.
    pub fn set_x_ticks(&mut self, ticks: Vec<AxisTick>) {
        for tick in &ticks {
            assert!(self.domain.min_x <= tick.value && tick.value <= self.domain.max_x);
        }
        self.x_ticks = ticks;
    }

    /// Replaces the y-axis ticks. Every tick must lie within the y domain.
    pub fn set_y_ticks(&mut self, ticks: Vec<AxisTick>) {
        for tick in &ticks {
            assert!(self.domain.min_y <= tick.value && tick.value <= self.domain.max_y);
        }
        self.y_ticks = ticks;
    }

    /// Pixel column for an x value; the domain edges land exactly on the
    /// rectangle's first and last columns.
    pub fn pixel_for_x(&self, x: f64) -> i32 {
        let span = self.domain.max_x - self.domain.min_x;
        let offset = f64::from(self.pixel.width - 1) * (x - self.domain.min_x) / span;
        (f64::from(self.pixel.x) + offset + 0.5) as i32
    }

    /// Pixel row for a y value, inverted so the domain minimum sits on the
    /// bottom row of the rectangle.
    pub fn pixel_for_y(&self, y: f64) -> i32 {
        let span = self.domain.max_y - self.domain.min_y;
        let offset = f64::from(self.pixel.height - 1) * (self.domain.max_y - y) / span;
        (f64::from(self.pixel.y) + offset + 0.5) as i32
    }

    /// X axis along the bottom edge of the rectangle.
    pub fn draw_x_axis(&self, sink: &mut dyn PlotSink) {
        let bottom = self.pixel.y + self.pixel.height - 1;
        let from = PixelPos::new(self.pixel.x, bottom);
        let to = PixelPos::new(self.pixel.x + self.pixel.width - 1, bottom);
        sink.axis_line(Axis::X, from, to);
    }

    /// Y axis along the left edge, drawn bottom to top.
    pub fn draw_y_axis(&self, sink: &mut dyn PlotSink) {
        let from = PixelPos::new(self.pixel.x, self.pixel.y + self.pixel.height - 1);
        let to = PixelPos::new(self.pixel.x, self.pixel.y);
        sink.axis_line(Axis::Y, from, to);
    }

    pub fn draw_x_ticks(&self, sink: &mut dyn PlotSink) {
        let bottom = self.pixel.y + self.pixel.height - 1;
        for tick in &self.x_ticks {
            let at = PixelPos::new(self.pixel_for_x(tick.value), bottom);
            let relative = (tick.value - self.domain.min_x) / (self.domain.max_x - self.domain.min_x);
            sink.tick(Axis::X, at, relative, &tick.label);
        }
    }

    pub fn draw_y_ticks(&self, sink: &mut dyn PlotSink) {
        for tick in &self.y_ticks {
            let at = PixelPos::new(self.pixel.x, self.pixel_for_y(tick.value));
            let relative = (tick.value - self.domain.min_y) / (self.domain.max_y - self.domain.min_y);
            sink.tick(Axis::Y, at, relative, &tick.label);
        }
    }

    /// One `point` call per element, in sequence order.
    pub fn draw_points(&self, points: &[PlotPoint], sink: &mut dyn PlotSink) {
        for point in points {
            let at = PixelPos::new(self.pixel_for_x(point.x), self.pixel_for_y(point.y));
            sink.point(at, *point);
        }
    }

    /// One `segment` call per consecutive pair, in sequence order. N points
    /// produce exactly N-1 segments; zero or one points produce none.
    pub fn draw_lines_between_points(&self, points: &[PlotPoint], sink: &mut dyn PlotSink) {
        let mut previous: Option<(PixelPos, PlotPoint)> = None;
        for point in points {
            let at = PixelPos::new(self.pixel_for_x(point.x), self.pixel_for_y(point.y));
            if let Some((from, source_from)) = previous {
                sink.segment(from, at, source_from, *point);
            }
            previous = Some((at, *point));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        AxisLine(Axis, PixelPos, PixelPos),
        Tick(Axis, PixelPos, f64, String),
        Point(PixelPos, PlotPoint),
        Segment(PixelPos, PixelPos, PlotPoint, PlotPoint),
    }

    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<Call>,
    }

    impl PlotSink for RecordingSink {
        fn axis_line(&mut self, axis: Axis, from: PixelPos, to: PixelPos) {
            self.calls.push(Call::AxisLine(axis, from, to));
        }

        fn tick(&mut self, axis: Axis, at: PixelPos, relative: f64, label: &str) {
            self.calls.push(Call::Tick(axis, at, relative, label.to_string()));
        }

        fn point(&mut self, at: PixelPos, source: PlotPoint) {
            self.calls.push(Call::Point(at, source));
        }

        fn segment(&mut self, from: PixelPos, to: PixelPos, source_from: PlotPoint, source_to: PlotPoint) {
            self.calls.push(Call::Segment(from, to, source_from, source_to));
        }
    }

    fn unit_engine() -> PlotEngine {
        PlotEngine::new(
            PixelRect { x: 0, y: 0, width: 101, height: 101 },
            DomainRect { min_x: 0.0, max_x: 100.0, min_y: 0.0, max_y: 100.0 },
        )
    }

    #[test]
    fn test_domain_corners_map_to_rect_edges() {
        let engine = unit_engine();
        assert_eq!(engine.pixel_for_x(0.0), 0);
        assert_eq!(engine.pixel_for_x(100.0), 100);
        // Inverted: the domain minimum sits on the bottom pixel row.
        assert_eq!(engine.pixel_for_y(0.0), 100);
        assert_eq!(engine.pixel_for_y(100.0), 0);
    }

    #[test]
    fn test_mapping_is_monotonic() {
        let engine = unit_engine();
        assert_eq!(engine.pixel_for_x(50.0), 50);
        assert_eq!(engine.pixel_for_y(50.0), 50);
        let mut last = engine.pixel_for_x(0.0);
        for value in 1..=100 {
            let column = engine.pixel_for_x(f64::from(value));
            assert!(column > last);
            last = column;
        }
    }

    #[test]
    fn test_offset_rect_mapping() {
        let engine = PlotEngine::new(
            PixelRect { x: 10, y: 20, width: 51, height: 41 },
            DomainRect { min_x: -100.0, max_x: 0.0, min_y: 0.0, max_y: 400.0 },
        );
        assert_eq!(engine.pixel_for_x(-100.0), 10);
        assert_eq!(engine.pixel_for_x(0.0), 60);
        assert_eq!(engine.pixel_for_y(0.0), 60);
        assert_eq!(engine.pixel_for_y(400.0), 20);
        assert_eq!(engine.pixel_for_y(200.0), 40);
    }

    #[test]
    #[should_panic]
    fn test_empty_domain_rejected() {
        PlotEngine::new(
            PixelRect { x: 0, y: 0, width: 10, height: 10 },
            DomainRect { min_x: 5.0, max_x: 5.0, min_y: 0.0, max_y: 1.0 },
        );
    }

    #[test]
    #[should_panic]
    fn test_zero_width_rect_rejected() {
        PlotEngine::new(
            PixelRect { x: 0, y: 0, width: 0, height: 10 },
            DomainRect { min_x: 0.0, max_x: 1.0, min_y: 0.0, max_y: 1.0 },
        );
    }

    #[test]
    #[should_panic]
    fn test_out_of_domain_tick_rejected() {
        let mut engine = unit_engine();
        engine.set_x_ticks(vec![AxisTick::new(100.5, "over")]);
    }

    #[test]
    fn test_axes_run_along_rect_edges() {
        let engine = PlotEngine::new(
            PixelRect { x: 10, y: 20, width: 51, height: 41 },
            DomainRect { min_x: -100.0, max_x: 0.0, min_y: 0.0, max_y: 400.0 },
        );
        let mut sink = RecordingSink::default();
        engine.draw_x_axis(&mut sink);
        engine.draw_y_axis(&mut sink);
        assert_eq!(
            sink.calls,
            vec![
                Call::AxisLine(Axis::X, PixelPos::new(10, 60), PixelPos::new(60, 60)),
                Call::AxisLine(Axis::Y, PixelPos::new(10, 60), PixelPos::new(10, 20)),
            ]
        );
    }

    #[test]
    fn test_tick_relative_positions_round_trip() {
        let mut engine = unit_engine();
        engine.set_x_ticks(vec![
            AxisTick::new(0.0, "0"),
            AxisTick::new(25.0, "25"),
            AxisTick::new(100.0, "100"),
        ]);
        let mut sink = RecordingSink::default();
        engine.draw_x_ticks(&mut sink);
        assert_eq!(sink.calls.len(), 3);
        for (call, value) in sink.calls.iter().zip([0.0, 25.0, 100.0]) {
            match call {
                Call::Tick(Axis::X, at, relative, _) => {
                    assert_eq!(at.x, engine.pixel_for_x(value));
                    assert!((relative - value / 100.0).abs() < 1e-12);
                }
                other => panic!("unexpected call {:?}", other),
            }
        }
    }

    #[test]
    fn test_y_ticks_sit_on_the_axis_column() {
        let mut engine = unit_engine();
        engine.set_y_ticks(vec![AxisTick::new(0.0, "0"), AxisTick::new(100.0, "100")]);
        let mut sink = RecordingSink::default();
        engine.draw_y_ticks(&mut sink);
        assert_eq!(
            sink.calls,
            vec![
                Call::Tick(Axis::Y, PixelPos::new(0, 100), 0.0, "0".to_string()),
                Call::Tick(Axis::Y, PixelPos::new(0, 0), 1.0, "100".to_string()),
            ]
        );
    }

    #[test]
    fn test_points_emitted_in_sequence_order() {
        let engine = unit_engine();
        let points = vec![
            PlotPoint::new(0.0, 0.0),
            PlotPoint::new(50.0, 100.0),
            PlotPoint::new(100.0, 50.0),
        ];
        let mut sink = RecordingSink::default();
        engine.draw_points(&points, &mut sink);
        assert_eq!(
            sink.calls,
            vec![
                Call::Point(PixelPos::new(0, 100), points[0]),
                Call::Point(PixelPos::new(50, 0), points[1]),
                Call::Point(PixelPos::new(100, 50), points[2]),
            ]
        );
    }

    #[test]
    fn test_segment_count_is_points_minus_one() {
        let engine = unit_engine();
        let mut sink = RecordingSink::default();
        engine.draw_lines_between_points(&[], &mut sink);
        engine.draw_lines_between_points(&[PlotPoint::new(10.0, 10.0)], &mut sink);
        assert!(sink.calls.is_empty());

        let points = vec![
            PlotPoint::new(0.0, 0.0),
            PlotPoint::new(50.0, 100.0),
            PlotPoint::new(100.0, 50.0),
        ];
        engine.draw_lines_between_points(&points, &mut sink);
        assert_eq!(
            sink.calls,
            vec![
                Call::Segment(PixelPos::new(0, 100), PixelPos::new(50, 0), points[0], points[1]),
                Call::Segment(PixelPos::new(50, 0), PixelPos::new(100, 50), points[1], points[2]),
            ]
        );
    }
}
