//! Digital rain animation engine
//!
//! Falling glyph streams for small SPI TFT panels, drawn through the
//! [`canvas::Canvas`] capability so the engine never talks to the display bus itself.
//!
//! ### Usage
//!
//! 1. wrap the panel driver in a [`canvas::PanelCanvas`] (or implement [`canvas::Canvas`])
//! 1. build a [`rain::DigitalRain`] from the canvas, a [`rain::RainConfig`] and a [`rain::Palette`]
//! 1. call [`rain::DigitalRain::clear`] once, then [`rain::DigitalRain::tick`] from the host loop
//!
//! ```rust,no_run
//! use digitalrain::canvas::{Framebuffer, PanelCanvas};
//! use digitalrain::clock::SystemClock;
//! use digitalrain::rain::{DigitalRain, Palette, RainConfig};
//! use embedded_graphics::mono_font::ascii::FONT_10X20;
//! use embedded_graphics::pixelcolor::Rgb565;
//! use embedded_graphics::prelude::*;
//! use rand::{rngs::SmallRng, SeedableRng};
//!
//! # fn main() -> anyhow::Result<()> {
//! let panel = Framebuffer::new(Size::new(240, 240), Rgb565::BLACK);
//! let canvas = PanelCanvas::new(panel, &FONT_10X20);
//! let mut rain = DigitalRain::new(
//!     canvas,
//!     RainConfig::default(),
//!     Palette::default(),
//!     SystemClock::new(),
//!     SmallRng::seed_from_u64(7),
//! )?;
//! rain.clear()?;
//! loop {
//!     rain.poll()?;
//! }
//! # }
//! ```

pub mod canvas;
pub mod clock;
pub mod color;
pub mod rain;
