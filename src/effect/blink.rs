use super::{DrawInfo, Effect};
use crate::color::{BLACK, LIME, Rgb};

/// Whole strip alternating lime and black on every tick
#[derive(Debug, Clone, Default)]
pub struct BlinkEffect {
    is_on: bool,
}

impl BlinkEffect {
    pub const fn new() -> Self {
        Self { is_on: false }
    }
}

impl Effect for BlinkEffect {
    fn draw_frame<M: Copy + Into<u64>>(&mut self, leds: &mut [Rgb], _info: &DrawInfo<'_, M>) {
        leds.fill(if self.is_on { LIME } else { BLACK });
        self.is_on = !self.is_on;
    }

    fn reset(&mut self) {
        self.is_on = false;
    }
}
