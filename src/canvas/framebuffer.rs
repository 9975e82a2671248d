//! In-memory RGB565 frame with dirty-region tracking

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PointsIter, Rectangle};

/// Full-screen RGB565 buffer
///
/// Draws are clipped to the buffer. Every write grows a dirty bounding box which
/// [`Framebuffer::flush_to`] pushes to a panel in a single `fill_contiguous` and resets.
pub struct Framebuffer {
    size: Size,
    pixels: Vec<Rgb565>,
    dirty: Option<Rectangle>,
}

impl Framebuffer {
    /// Create a buffer of `size` filled with `background`
    pub fn new(size: Size, background: Rgb565) -> Self {
        let len = size.width as usize * size.height as usize;
        Self {
            size,
            pixels: vec![background; len],
            dirty: None,
        }
    }

    /// Color at `point`, `None` outside the buffer
    pub fn pixel(&self, point: Point) -> Option<Rgb565> {
        self.index(point).map(|i| self.pixels[i])
    }

    /// Raw pixels, row-major
    pub fn pixels(&self) -> &[Rgb565] {
        &self.pixels
    }

    /// Region changed since the last flush
    pub fn dirty_area(&self) -> Option<Rectangle> {
        self.dirty
    }

    /// Push the dirty region to `panel` and mark the buffer clean
    ///
    /// On failure the region stays dirty, so the next flush retries it.
    pub fn flush_to<D>(&mut self, panel: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(area) = self.dirty.take() else {
            return Ok(());
        };

        let width = self.size.width as usize;
        let pixels = &self.pixels;
        let colors = area
            .points()
            .map(|p| pixels[p.y as usize * width + p.x as usize]);

        let result = panel.fill_contiguous(&area, colors);
        if result.is_err() {
            log::warn!("Frame flush failed, keeping {:?} dirty", area);
            self.dirty = Some(area);
        }
        result
    }

    fn index(&self, point: Point) -> Option<usize> {
        let (x, y) = (point.x, point.y);
        if x < 0 || y < 0 || x >= self.size.width as i32 || y >= self.size.height as i32 {
            return None;
        }
        Some(y as usize * self.size.width as usize + x as usize)
    }

    fn mark_dirty(&mut self, area: Rectangle) {
        self.dirty = Some(match self.dirty {
            Some(dirty) => envelope(&dirty, &area),
            None => area,
        });
    }
}

/// Smallest rectangle covering both non-empty rectangles
fn envelope(a: &Rectangle, b: &Rectangle) -> Rectangle {
    match (a.bottom_right(), b.bottom_right()) {
        (Some(a_end), Some(b_end)) => Rectangle::with_corners(
            a.top_left.component_min(b.top_left),
            a_end.component_max(b_end),
        ),
        (Some(_), None) => *a,
        _ => *b,
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(i) = self.index(point) {
                self.pixels[i] = color;
                self.mark_dirty(Rectangle::new(point, Size::new(1, 1)));
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        if area.is_zero_sized() {
            return Ok(());
        }

        let width = self.size.width as usize;
        for y in area.rows() {
            let start = y as usize * width + area.top_left.x as usize;
            let end = start + area.size.width as usize;
            self.pixels[start..end].fill(color);
        }
        self.mark_dirty(area);
        Ok(())
    }
}
