//! Laser effect
//!
//! A red bar a tenth of the strip long jumps one bar length every 50 ms and
//! starts over once it runs off the end.

use super::{DrawInfo, Effect};
use crate::color::{BLACK, RED, Rgb};

/// Time the bar needs to advance by its own length
const STEP_US: u64 = 50_000;

#[derive(Debug, Clone, Default)]
pub struct LaserEffect {
    /// Time accumulated since the bar last wrapped
    elapsed_us: u64,
}

impl LaserEffect {
    pub const fn new() -> Self {
        Self { elapsed_us: 0 }
    }
}

impl Effect for LaserEffect {
    #[allow(clippy::cast_possible_truncation)]
    fn draw_frame<M: Copy + Into<u64>>(&mut self, leds: &mut [Rgb], info: &DrawInfo<'_, M>) {
        leds.fill(BLACK);
        if leds.is_empty() {
            return;
        }

        let length = (leds.len() / 10).max(1);
        // Ticks faster than one LED step still add up
        self.elapsed_us += u64::from(info.elapsed_us);
        let mut position = (self.elapsed_us * length as u64 / STEP_US) as usize;
        if position >= leds.len() {
            position = 0;
            self.elapsed_us = 0;
        }

        let end = (position + length).min(leds.len());
        leds[position..end].fill(RED);
    }

    fn reset(&mut self) {
        self.elapsed_us = 0;
    }
}
