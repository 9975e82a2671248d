//! Integer upscaling draw target for the mono fonts

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Draws every incoming pixel as a `scale × scale` block, offset by `origin`
pub(crate) struct Scaled<'a, T> {
    target: &'a mut T,
    origin: Point,
    scale: u32,
}

impl<'a, T> Scaled<'a, T> {
    pub(crate) fn new(target: &'a mut T, origin: Point, scale: u32) -> Self {
        Self {
            target,
            origin,
            scale: scale.max(1),
        }
    }
}

impl<T: DrawTarget> Dimensions for Scaled<'_, T> {
    fn bounding_box(&self) -> Rectangle {
        let outer = self.target.bounding_box();
        Rectangle::new(
            (outer.top_left - self.origin) / self.scale as i32,
            outer.size / self.scale,
        )
    }
}

impl<T: DrawTarget> DrawTarget for Scaled<'_, T> {
    type Color = T::Color;
    type Error = T::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let block = Size::new_equal(self.scale);
        for Pixel(point, color) in pixels {
            let top_left = self.origin + point * self.scale as i32;
            self.target.fill_solid(&Rectangle::new(top_left, block), color)?;
        }
        Ok(())
    }
}
