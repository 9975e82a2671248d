//! Drawing surface consumed by the rain engine
//!
//! The engine only needs three primitives: fill a rectangle, draw one glyph and
//! present the frame. [`Canvas`] is that capability; [`PanelCanvas`] implements it
//! on top of any [`embedded_graphics`] panel driver (the firmware uses `mipidsi`).
//!
//! ### Usage
//!
//! 1. create the panel driver and hand it to [`PanelCanvas::new`] together with a mono font
//! 1. draw through the [`Canvas`] methods, everything lands in an in-memory [`Framebuffer`]
//! 1. call [`Canvas::present`] to push the changed region to the panel

use core::convert::Infallible;

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::{Rgb565, Rgb888};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};

mod framebuffer;
mod scaled;

pub use framebuffer::Framebuffer;
use scaled::Scaled;

/// Display capability used by the animation
pub trait Canvas {
    /// Failure reported by the display collaborator
    type Error;

    /// Panel size in pixels
    fn size(&self) -> Size;

    /// Size of one glyph cell at scale 1
    fn cell_size(&self) -> Size;

    /// Fill `area` with `color`, clipped to the panel
    fn fill_rect(&mut self, area: Rectangle, color: Rgb888) -> Result<(), Self::Error>;

    /// Draw `glyph` with its cell's top-left corner at `top_left`, scaled by `scale`
    fn draw_glyph(
        &mut self,
        top_left: Point,
        glyph: char,
        color: Rgb888,
        scale: u32,
    ) -> Result<(), Self::Error>;

    /// Flush pending draws to the physical panel
    fn present(&mut self) -> Result<(), Self::Error>;
}

/// [`Canvas`] over an RGB565 panel driver
///
/// Draws go into a [`Framebuffer`] the size of the panel; `present` sends only the
/// region touched since the previous `present`.
pub struct PanelCanvas<D> {
    panel: D,
    frame: Framebuffer,
    font: &'static MonoFont<'static>,
}

impl<D> PanelCanvas<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    /// Wrap `panel`, glyphs are rendered with `font`
    pub fn new(panel: D, font: &'static MonoFont<'static>) -> Self {
        let size = panel.bounding_box().size;
        log::info!(
            "Canvas {}x{} with {}x{} font cells",
            size.width,
            size.height,
            font.character_size.width,
            font.character_size.height
        );
        Self {
            panel,
            frame: Framebuffer::new(size, Rgb565::BLACK),
            font,
        }
    }

    /// The wrapped panel driver
    pub fn panel(&self) -> &D {
        &self.panel
    }

    /// The not yet presented frame
    pub fn frame(&self) -> &Framebuffer {
        &self.frame
    }
}

impl<D> Canvas for PanelCanvas<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    type Error = D::Error;

    fn size(&self) -> Size {
        self.frame.size()
    }

    fn cell_size(&self) -> Size {
        self.font.character_size
    }

    fn fill_rect(&mut self, area: Rectangle, color: Rgb888) -> Result<(), Self::Error> {
        infallible(self.frame.fill_solid(&area, color.into()));
        Ok(())
    }

    fn draw_glyph(
        &mut self,
        top_left: Point,
        glyph: char,
        color: Rgb888,
        scale: u32,
    ) -> Result<(), Self::Error> {
        let mut buf = [0u8; 4];
        let text = glyph.encode_utf8(&mut buf);
        let style = MonoTextStyle::new(self.font, Rgb565::from(color));

        let mut target = Scaled::new(&mut self.frame, top_left, scale);
        infallible(Text::with_baseline(text, Point::zero(), style, Baseline::Top).draw(&mut target));
        Ok(())
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        self.frame.flush_to(&mut self.panel)
    }
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mono_font::ascii::FONT_6X10;
    use embedded_graphics::primitives::PointsIter;

    fn canvas() -> PanelCanvas<Framebuffer> {
        PanelCanvas::new(Framebuffer::new(Size::new(48, 40), Rgb565::BLACK), &FONT_6X10)
    }

    fn lit(frame: &Framebuffer, area: Rectangle) -> usize {
        area.points()
            .filter(|p| frame.pixel(*p) != Some(Rgb565::BLACK))
            .count()
    }

    #[test]
    fn geometry_comes_from_panel_and_font() {
        let canvas = canvas();
        assert_eq!(canvas.size(), Size::new(48, 40));
        assert_eq!(canvas.cell_size(), Size::new(6, 10));
    }

    #[test]
    fn glyphs_stay_inside_their_scaled_cell() {
        let mut canvas = canvas();
        canvas
            .draw_glyph(Point::new(12, 10), 'W', Rgb888::GREEN, 2)
            .unwrap();

        let cell = Rectangle::new(Point::new(12, 10), Size::new(12, 20));
        let everything = Rectangle::new(Point::zero(), Size::new(48, 40));
        let inside = lit(canvas.frame(), cell);
        assert!(inside > 0);
        assert_eq!(inside, lit(canvas.frame(), everything));
        // every font pixel turns into a 2x2 block
        assert_eq!(inside % 4, 0);
    }

    #[test]
    fn scale_two_quadruples_the_lit_area() {
        let mut small = canvas();
        let mut big = canvas();
        small.draw_glyph(Point::zero(), 'A', Rgb888::GREEN, 1).unwrap();
        big.draw_glyph(Point::zero(), 'A', Rgb888::GREEN, 2).unwrap();

        let everything = Rectangle::new(Point::zero(), Size::new(48, 40));
        assert_eq!(
            lit(big.frame(), everything),
            4 * lit(small.frame(), everything)
        );
    }

    #[test]
    fn nothing_reaches_the_panel_before_present() {
        let mut canvas = canvas();
        let strip = Rectangle::new(Point::new(6, 0), Size::new(6, 40));
        canvas.fill_rect(strip, Rgb888::WHITE).unwrap();

        assert_eq!(canvas.panel().pixel(Point::new(6, 0)), Some(Rgb565::BLACK));
        canvas.present().unwrap();
        assert_eq!(canvas.panel().pixel(Point::new(6, 0)), Some(Rgb565::WHITE));
        assert_eq!(canvas.panel().pixel(Point::new(5, 0)), Some(Rgb565::BLACK));
        assert_eq!(canvas.frame().dirty_area(), None);
    }
}
