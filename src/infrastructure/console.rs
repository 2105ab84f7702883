// Terminal stand-ins for the device's output and input hardware
use crate::application::scheduler::{InputLine, OverrideInputs};
use crate::presentation::gauge::GaugeActuator;
use crate::presentation::surface::{Font, RenderSurface};

/// Character-cell framebuffer printed to stdout at every flush. One cell
/// stands in for one display pixel, so the dashboard stays inspectable on a
/// development host without panel hardware.
pub struct ConsoleSurface {
    width: i32,
    height: i32,
    cells: Vec<char>,
    cursor: (i32, i32),
}

impl ConsoleSurface {
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0);
        Self {
            width,
            height,
            cells: vec![' '; (width * height) as usize],
            cursor: (0, 0),
        }
    }

    fn put(&mut self, x: i32, y: i32, glyph: char) {
        if x >= 0 && x < self.width && y >= 0 && y < self.height {
            self.cells[(y * self.width + x) as usize] = glyph;
        }
    }
}

impl RenderSurface for ConsoleSurface {
    fn dimensions(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn begin_frame(&mut self) {
        self.cells.fill(' ');
    }

    /// Whole frame in one buffer, so the single page flushes here.
    fn next_page(&mut self) -> bool {
        let mut out = String::with_capacity(((self.width + 1) * self.height) as usize);
        for row in 0..self.height {
            let start = (row * self.width) as usize;
            out.extend(&self.cells[start..start + self.width as usize]);
            out.push('\n');
        }
        print!("{}", out);
        false
    }

    fn end_frame(&mut self) {}

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let steps = dx.abs().max(dy.abs());
        if steps == 0 {
            self.put(x0, y0, line_glyph(dx, dy));
            return;
        }
        for step in 0..=steps {
            self.put(x0 + dx * step / steps, y0 + dy * step / steps, line_glyph(dx, dy));
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        for row in y..y + height {
            for column in x..x + width {
                self.put(column, row, '#');
            }
        }
    }

    fn set_font(&mut self, _font: Font) {
        // Character cells come in one size.
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor = (x, y);
    }

    fn print(&mut self, text: &str) {
        let (mut x, y) = self.cursor;
        for glyph in text.chars() {
            self.put(x, y, glyph);
            x += 1;
        }
        self.cursor = (x, y);
    }
}

fn line_glyph(dx: i32, dy: i32) -> char {
    if dy == 0 {
        '-'
    } else if dx == 0 {
        '|'
    } else if (dx > 0) == (dy > 0) {
        '\\'
    } else {
        '/'
    }
}

/// Gauge actuator that logs level changes instead of moving a needle.
pub struct LogGauge {
    max_level: u16,
}

impl LogGauge {
    pub fn new(max_level: u16) -> Self {
        Self { max_level }
    }
}

impl GaugeActuator for LogGauge {
    fn max_level(&self) -> u16 {
        self.max_level
    }

    fn set_level(&mut self, level: u16) -> anyhow::Result<()> {
        tracing::info!("Gauge level {}/{}", level, self.max_level);
        Ok(())
    }
}

/// Input bank with every line inactive; a bare bench host has no buttons.
pub struct InertInputs;

impl OverrideInputs for InertInputs {
    fn is_active(&mut self, _line: InputLine) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(surface: &ConsoleSurface, y: i32) -> String {
        (0..surface.width)
            .map(|x| surface.cells[(y * surface.width + x) as usize])
            .collect()
    }

    #[test]
    fn test_print_advances_cursor() {
        let mut surface = ConsoleSurface::new(12, 3);
        surface.set_cursor(2, 1);
        surface.print("ab");
        surface.print("c");
        assert_eq!(row(&surface, 1).trim_end(), "  abc");
    }

    #[test]
    fn test_lines_use_direction_glyphs() {
        let mut surface = ConsoleSurface::new(8, 8);
        surface.draw_line(0, 3, 7, 3);
        assert_eq!(row(&surface, 3), "--------");
        surface.draw_line(2, 0, 2, 2);
        assert_eq!(row(&surface, 1).chars().nth(2), Some('|'));
    }

    #[test]
    fn test_out_of_bounds_drawing_is_clipped() {
        let mut surface = ConsoleSurface::new(4, 4);
        surface.draw_line(-5, 0, 8, 0);
        surface.set_cursor(2, 3);
        surface.print("overflowing");
        surface.fill_rect(3, 3, 5, 5);
        assert_eq!(row(&surface, 0), "----");
        assert_eq!(row(&surface, 3), "  o#");
    }
}
