//! Brightness handling for the glyph colors
//!
//! The fading tail keeps the hue and saturation of the text color and only swaps
//! its brightness (the HSV value channel). In RGB that is a uniform scale of all
//! channels so that the largest one lands on the requested brightness.

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

/// Returns `color` with its brightness replaced by `brightness`
///
/// Values outside `0.0..=1.0` are clamped. Black has no hue, so it turns into
/// the gray of the requested brightness.
pub fn with_brightness(color: Rgb888, brightness: f32) -> Rgb888 {
    let target = (brightness.clamp(0.0, 1.0) * 255.0 + 0.5) as u32;
    let peak = u32::from(peak(color));

    if peak == 0 {
        let gray = target as u8;
        return Rgb888::new(gray, gray, gray);
    }

    let scale = |channel: u8| ((u32::from(channel) * target + peak / 2) / peak) as u8;
    Rgb888::new(scale(color.r()), scale(color.g()), scale(color.b()))
}

fn peak(color: Rgb888) -> u8 {
    color.r().max(color.g()).max(color.b())
}
