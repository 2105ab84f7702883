// Render surface port - The display driver lives behind this trait

/// Text sizes the dashboard distinguishes; glyphs are the surface's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Small,
    Large,
}

/// Primitive-drawing sink with the paged-frame protocol of small panel
/// displays: callers re-issue the whole frame while `next_page` reports
/// that buffered regions remain to flush.
pub trait RenderSurface: Send {
    /// Width and height in pixels.
    fn dimensions(&self) -> (i32, i32);

    fn begin_frame(&mut self);

    /// Flushes the current buffered region; true while pages remain.
    fn next_page(&mut self) -> bool;

    fn end_frame(&mut self);

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32);

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32);

    fn set_font(&mut self, font: Font);

    fn set_cursor(&mut self, x: i32, y: i32);

    /// Writes text at the cursor and advances it.
    fn print(&mut self, text: &str);
}
