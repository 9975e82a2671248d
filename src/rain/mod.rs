//! Digital rain animation engine
//!
//! [`DigitalRain`] owns one [`Column`] per glyph-wide slot of the screen and
//! redraws them through a [`Canvas`] whenever a frame is due.
//!
//! ## Frame cycle
//!
//! [`DigitalRain::tick`] never blocks. The host calls it as often as it likes and
//! the engine decides whether a frame is due:
//!
//! 1. an active key older than [`KEY_RESET_TIMEOUT_MS`] is dropped
//! 1. if less than the frame interval has passed, nothing else happens
//! 1. otherwise every column is advanced in index order (unless paused)
//!
//! ## Column redraw
//!
//! Each column clears its whole strip, redraws its tail with a brightness ramp
//! (see [`luminance`]), draws the head glyph, falls by its speed and presents.
//! A column that leaves the bottom of the screen is respawned above the top.
//!
//! ## Key reveal
//!
//! [`DigitalRain::set_key`] makes the head of column `i` show `key[i]` and turns
//! the fade off until the key is cleared or expires.
//!
//! Key age is measured on the `now_ms` timeline handed to `tick`. A key set
//! before the first tick starts aging at that tick.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use rand::Rng;

use crate::canvas::Canvas;
use crate::clock::Clock;
use crate::color;

mod column;
mod config;
mod glyph;

pub use column::{start_position, Column};
pub use config::*;
pub use glyph::GlyphSet;

/// The animation state machine
///
/// ## Type Parameters
///
/// - `C` - where frames are drawn
/// - `K` - monotonic clock, read by [`DigitalRain::poll`]
/// - `R` - random generator for lengths, speeds and glyphs
pub struct DigitalRain<C, K, R> {
    canvas: C,
    clock: K,
    rng: R,
    config: RainConfig,
    palette: Palette,
    glyphs: GlyphSet,
    scale: u32,
    screen: Size,
    cell: Size,
    columns: Vec<Column>,
    playing: bool,
    key: String,
    started_at: u64,
    last_tick_at: Option<u64>,
    last_frame_at: Option<u64>,
    last_key_reset_at: Option<u64>,
}

impl<C, K, R> DigitalRain<C, K, R>
where
    C: Canvas,
    K: Clock,
    R: Rng,
{
    /// Validate the configuration against the canvas and spawn all columns
    ///
    /// Nothing is drawn yet, call [`DigitalRain::clear`] to blank the screen.
    pub fn new(
        canvas: C,
        config: RainConfig,
        palette: Palette,
        clock: K,
        mut rng: R,
    ) -> Result<Self, ConfigError> {
        let screen = canvas.size();
        let (cell, count) = config.layout(screen, canvas.cell_size())?;

        let columns = (0..count)
            .map(|_| Column::spawn(&mut rng, &config, cell.height as i32))
            .collect();

        let started_at = clock.now_ms();
        log::info!(
            "Digital rain: {} lines of {}x{} glyphs, length {}..={}, speed {}..={}",
            count,
            cell.width,
            cell.height,
            config.line_len_min,
            config.line_len_max,
            config.line_speed_min,
            config.line_speed_max
        );

        Ok(Self {
            canvas,
            clock,
            rng,
            config,
            palette,
            glyphs: GlyphSet::from_letters_only(config.letters_only),
            scale: config.scale(),
            screen,
            cell,
            columns,
            playing: true,
            key: String::new(),
            started_at,
            last_tick_at: None,
            last_frame_at: None,
            last_key_reset_at: None,
        })
    }

    /// Fill the screen with the background color and present it
    pub fn clear(&mut self) -> Result<(), C::Error> {
        log::info!("Clearing screen");
        let screen = Rectangle::new(Point::zero(), self.screen);
        self.canvas.fill_rect(screen, self.palette.background)?;
        self.canvas.present()
    }

    /// [`DigitalRain::tick`] with the engine's own clock
    pub fn poll(&mut self) -> Result<(), C::Error> {
        let now = self.clock.now_ms();
        self.tick(now)
    }

    /// Advance the animation if a frame is due at `now_ms`
    ///
    /// A failing canvas does not stop the other columns from moving; the first
    /// error is returned once the frame is done.
    pub fn tick(&mut self, now_ms: u64) -> Result<(), C::Error> {
        self.last_tick_at = Some(now_ms);
        match self.last_key_reset_at {
            Some(at) if now_ms.saturating_sub(at) > KEY_RESET_TIMEOUT_MS => {
                self.reset_key(Some(now_ms))
            }
            Some(_) => {}
            None => self.last_key_reset_at = Some(now_ms),
        }

        if let Some(last) = self.last_frame_at {
            if now_ms.saturating_sub(last) < u64::from(self.config.frame_interval_ms) {
                return Ok(());
            }
        }

        let mut result = Ok(());
        if self.playing {
            for index in 0..self.columns.len() {
                let advanced = self.advance_column(index);
                if result.is_ok() {
                    result = advanced;
                }
            }
        }

        self.last_frame_at = Some(now_ms);
        result
    }

    /// Stop advancing, the last frame stays on screen
    pub fn pause(&mut self) {
        log::info!("Digital rain paused");
        self.playing = false;
    }

    /// Continue from where the animation was paused
    pub fn resume(&mut self) {
        log::info!("Digital rain resumed");
        self.playing = true;
    }

    /// `false` between [`DigitalRain::pause`] and [`DigitalRain::resume`]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Generate and activate a key of `length` letters, capped at the column count
    ///
    /// `length <= 0` asks for one letter per column. The key always uses letters,
    /// whatever the configured glyph set is.
    pub fn set_key(&mut self, length: i32) -> String {
        self.clear_key();

        let count = self.columns.len();
        let length = match usize::try_from(length) {
            Ok(requested) if requested > 0 => requested.min(count),
            _ => count,
        };

        self.key = (0..length)
            .map(|_| GlyphSet::Letters.sample(&mut self.rng))
            .collect();
        log::info!("New key: {}", self.key);
        self.key.clone()
    }

    /// Drop the active key, if any, and restart the key timer at the last tick
    pub fn clear_key(&mut self) {
        self.reset_key(self.last_tick_at);
    }

    /// Active key, empty when none
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Column states, in screen order from the left
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of glyph-wide columns that fit on the screen
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Glyph cell size including the scale
    pub fn cell_size(&self) -> Size {
        self.cell
    }

    /// Settings the engine was built with
    pub fn config(&self) -> &RainConfig {
        &self.config
    }

    /// Colors the engine draws with
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Clock reading taken at construction
    pub fn started_at(&self) -> u64 {
        self.started_at
    }

    /// Canvas the frames are drawn on
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// Mutable access to the canvas, for hosts that draw overlays
    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    /// Give the canvas back to the host
    pub fn into_canvas(self) -> C {
        self.canvas
    }

    /// Redraw column `index`, let it fall and respawn it once it left the screen
    ///
    /// The column moves even when drawing fails.
    ///
    /// # Panics
    ///
    /// If `index` is not below [`DigitalRain::column_count`].
    pub fn advance_column(&mut self, index: usize) -> Result<(), C::Error> {
        let drawn = self.draw_column(index);

        self.columns[index].fall();
        let presented = drawn.and_then(|()| self.canvas.present());

        if self.columns[index].position >= self.screen.height as i32 {
            self.columns[index] = Column::spawn(&mut self.rng, &self.config, self.cell.height as i32);
            log::trace!("Line {} respawned: {:?}", index, self.columns[index]);
        }

        presented
    }

    fn draw_column(&mut self, index: usize) -> Result<(), C::Error> {
        let column = self.columns[index];
        let cell_width = self.cell.width as i32;
        let cell_height = self.cell.height as i32;
        let start_x = index as i32 * cell_width;
        let background = self.palette.background;

        let strip = Rectangle::new(
            Point::new(start_x, 0),
            Size::new(self.cell.width, self.screen.height),
        );
        self.canvas.fill_rect(strip, background)?;

        let key_mode = !self.key.is_empty();
        for slot in 0..column.length {
            let color = if key_mode {
                self.palette.text
            } else {
                body_color(self.palette.text, slot, column.length)
            };

            let top_left = Point::new(start_x, column.position + slot * cell_height);
            self.canvas
                .fill_rect(Rectangle::new(top_left, self.cell), background)?;
            let glyph = self.glyphs.sample(&mut self.rng);
            self.canvas.draw_glyph(top_left, glyph, color, self.scale)?;
        }

        // drawn over the last tail glyph
        let head_at = Point::new(start_x, column.position + (column.length - 1) * cell_height);
        let head = match self.key.as_bytes().get(index) {
            Some(&letter) => char::from(letter),
            None => self.glyphs.sample(&mut self.rng),
        };
        self.canvas
            .draw_glyph(head_at, head, self.palette.head, self.scale)
    }

    /// `None` restarts the key timer on the next tick
    fn reset_key(&mut self, now_ms: Option<u64>) {
        self.key.clear();
        self.last_key_reset_at = now_ms;
        log::debug!("Key reset at {:?} ms", now_ms);
    }
}

/// Text color dimmed for tail slot `slot` of a `length` glyph streak
pub fn body_color(text: Rgb888, slot: i32, length: i32) -> Rgb888 {
    color::with_brightness(text, luminance(slot, length))
}
