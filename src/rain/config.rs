//! Animation configuration, palette and the fixed tuning constants

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::Size;
use thiserror::Error;

/// An active key is dropped after this long without a reset
pub const KEY_RESET_TIMEOUT_MS: u64 = 60 * 1000;

/// Streak start offset per glyph, so longer streaks start further above the screen
pub const OFFSCREEN_FACTOR: i32 = 20;

/// Luminance ramp: `(index * LUMINANCE_SPAN / length + LUMINANCE_FLOOR) / LUMINANCE_MAX`
pub const LUMINANCE_SPAN: i32 = 254;
pub const LUMINANCE_FLOOR: i32 = 10;
pub const LUMINANCE_MAX: f32 = 255.0;

pub const DEFAULT_LINE_LEN_MIN: i32 = 3;
pub const DEFAULT_LINE_LEN_MAX: i32 = 20;
pub const DEFAULT_LINE_SPEED_MIN: i32 = 3;
pub const DEFAULT_LINE_SPEED_MAX: i32 = 15;
pub const DEFAULT_FRAME_INTERVAL_MS: u32 = 100;

/// Rejected configuration or geometry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("line length bounds must be positive with min <= max, got {min}..={max}")]
    LineLength { min: i32, max: i32 },
    #[error("line speed bounds must be positive with min <= max, got {min}..={max}")]
    LineSpeed { min: i32, max: i32 },
    #[error("frame interval must be at least 1 ms")]
    FrameInterval,
    #[error("glyph cell must not be empty, got {width}x{height}")]
    EmptyCell { width: u32, height: u32 },
    #[error("screen {width}x{height} cannot hold a single {cell_width} px wide column")]
    NoColumns {
        width: u32,
        height: u32,
        cell_width: u32,
    },
    #[error("lines up to {line_len_max} glyphs at {line_speed_max} px per frame do not fit pixel coordinates of a {width}x{height} screen with {cell_height} px cells")]
    OutOfRange {
        line_len_max: i32,
        line_speed_max: i32,
        width: u32,
        height: u32,
        cell_height: u32,
    },
}

/// Immutable animation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RainConfig {
    /// Shortest streak, in glyphs
    pub line_len_min: i32,
    /// Longest streak, in glyphs
    pub line_len_max: i32,
    /// Slowest fall, in pixels per frame
    pub line_speed_min: i32,
    /// Fastest fall, in pixels per frame
    pub line_speed_max: i32,
    /// Minimum time between two frames
    pub frame_interval_ms: u32,
    /// Draw glyphs at twice the font size
    pub bigger_glyphs: bool,
    /// Only `A-Z` and `a-z` instead of all printable ASCII
    pub letters_only: bool,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            line_len_min: DEFAULT_LINE_LEN_MIN,
            line_len_max: DEFAULT_LINE_LEN_MAX,
            line_speed_min: DEFAULT_LINE_SPEED_MIN,
            line_speed_max: DEFAULT_LINE_SPEED_MAX,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            bigger_glyphs: false,
            letters_only: false,
        }
    }
}

impl RainConfig {
    /// Integer glyph scale
    pub fn scale(&self) -> u32 {
        if self.bigger_glyphs {
            2
        } else {
            1
        }
    }

    /// Check the bounds on their own, independent of any screen
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.line_len_min <= 0 || self.line_len_min > self.line_len_max {
            return Err(ConfigError::LineLength {
                min: self.line_len_min,
                max: self.line_len_max,
            });
        }
        if self.line_speed_min <= 0 || self.line_speed_min > self.line_speed_max {
            return Err(ConfigError::LineSpeed {
                min: self.line_speed_min,
                max: self.line_speed_max,
            });
        }
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::FrameInterval);
        }
        Ok(())
    }

    /// Validate against a screen and the unscaled font cell, returning the scaled
    /// cell size and the number of columns
    pub(crate) fn layout(&self, screen: Size, font_cell: Size) -> Result<(Size, usize), ConfigError> {
        self.validate()?;

        let cell = font_cell * self.scale();
        if cell.width == 0 || cell.height == 0 {
            return Err(ConfigError::EmptyCell {
                width: cell.width,
                height: cell.height,
            });
        }

        let columns = (screen.width / cell.width) as usize;
        if columns == 0 || screen.height == 0 {
            return Err(ConfigError::NoColumns {
                width: screen.width,
                height: screen.height,
                cell_width: cell.width,
            });
        }

        if self.pixel_reach(screen, cell).is_none() {
            return Err(ConfigError::OutOfRange {
                line_len_max: self.line_len_max,
                line_speed_max: self.line_speed_max,
                width: screen.width,
                height: screen.height,
                cell_height: cell.height,
            });
        }

        Ok((cell, columns))
    }

    /// Largest pixel coordinate a streak can reach, `None` if it overflows `i32`
    ///
    /// Covers the spawn offset above the screen, the tail below the head position
    /// and the last fall past the bottom edge.
    fn pixel_reach(&self, screen: Size, cell: Size) -> Option<i32> {
        let width = i32::try_from(screen.width).ok()?;
        let height = i32::try_from(screen.height).ok()?;
        let cell_height = i32::try_from(cell.height).ok()?;

        let above = self
            .line_len_max
            .checked_mul(OFFSCREEN_FACTOR)?
            .checked_add(cell_height)?;
        let below = self
            .line_len_max
            .checked_mul(cell_height)?
            .checked_add(height)?;
        let fall = height.checked_add(self.line_speed_max)?;

        Some(above.max(below).max(fall).max(width))
    }
}

/// Colors of the animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Leading glyph of every streak
    pub head: Rgb888,
    /// Body of the streak, its brightness is replaced along the tail
    pub text: Rgb888,
    pub background: Rgb888,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            head: Rgb888::WHITE,
            text: Rgb888::GREEN,
            background: Rgb888::BLACK,
        }
    }
}

/// Brightness of glyph `index` in a streak of `length` glyphs, in `(0.0, 1.0]`
///
/// Index 0 is the far end of the tail and the dimmest.
pub fn luminance(index: i32, length: i32) -> f32 {
    let length = i64::from(length.max(1));
    let step = i64::from(index) * i64::from(LUMINANCE_SPAN) / length;
    (step + i64::from(LUMINANCE_FLOOR)) as f32 / LUMINANCE_MAX
}
