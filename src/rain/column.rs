//! State of one falling streak

use rand::Rng;

use super::config::{RainConfig, OFFSCREEN_FACTOR};

/// One vertical glyph streak
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub(crate) length: i32,
    pub(crate) position: i32,
    pub(crate) speed: i32,
}

impl Column {
    /// Fresh streak with random length and speed, parked above the screen
    pub(crate) fn spawn<R: Rng + ?Sized>(rng: &mut R, config: &RainConfig, cell_height: i32) -> Self {
        let length = rng.gen_range(config.line_len_min..=config.line_len_max);
        let speed = rng.gen_range(config.line_speed_min..=config.line_speed_max);
        Self {
            length,
            position: start_position(length, cell_height),
            speed,
        }
    }

    /// Glyphs in the streak
    pub fn length(&self) -> i32 {
        self.length
    }

    /// Y of the streak's first cell
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Pixels per frame
    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub(crate) fn fall(&mut self) {
        self.position += self.speed;
    }
}

/// Y at which a streak of `length` glyphs starts, always `<= -cell_height`
pub fn start_position(length: i32, cell_height: i32) -> i32 {
    -(length * OFFSCREEN_FACTOR) - cell_height
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn spawned_columns_respect_bounds_and_start_off_screen() {
        let config = RainConfig::default();
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..500 {
            let column = Column::spawn(&mut rng, &config, 16);
            assert!((config.line_len_min..=config.line_len_max).contains(&column.length()));
            assert!((config.line_speed_min..=config.line_speed_max).contains(&column.speed()));
            assert_eq!(column.position(), -(column.length() * 20) - 16);
            assert!(column.position() < 0);
        }
    }

    #[test]
    fn fall_moves_by_speed() {
        let mut column = Column {
            length: 4,
            position: -96,
            speed: 7,
        };
        column.fall();
        column.fall();
        assert_eq!(column.position(), -82);
    }

    #[test]
    fn start_position_scales_with_length() {
        assert_eq!(start_position(1, 16), -36);
        assert_eq!(start_position(3, 16), -76);
        assert!(start_position(20, 16) < start_position(3, 16));
    }
}
