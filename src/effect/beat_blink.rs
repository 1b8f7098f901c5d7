//! Beat blink effect
//!
//! Flashes the strip white with a brightness that follows the energy of the
//! lowest bins relative to the loudest bin of the same spectrum.

use super::{DrawInfo, Effect};
use crate::color::{BLACK, Rgb, WHITE, scale_color};

/// Bins above DC that make up the bass band
const LOW_BAND_BINS: usize = 4;

#[derive(Debug, Clone, Default)]
pub struct BeatBlinkEffect;

impl BeatBlinkEffect {
    pub const fn new() -> Self {
        Self
    }

    /// Flash brightness for `magnitudes`, 0 when silent
    pub fn brightness<M: Copy + Into<u64>>(magnitudes: &[M]) -> u8 {
        // DC carries no beat
        let Some(bins) = magnitudes.get(1..) else {
            return 0;
        };
        let peak: u64 = bins.iter().map(|&m| m.into()).max().unwrap_or(0);
        if peak == 0 {
            return 0;
        }
        let low: u64 = bins
            .iter()
            .take(LOW_BAND_BINS)
            .map(|&m| m.into())
            .max()
            .unwrap_or(0);

        u8::try_from(low * 255 / peak).unwrap_or(u8::MAX)
    }
}

impl Effect for BeatBlinkEffect {
    fn draw_frame<M: Copy + Into<u64>>(&mut self, leds: &mut [Rgb], info: &DrawInfo<'_, M>) {
        let color = match Self::brightness(info.magnitudes) {
            0 => BLACK,
            level => scale_color(WHITE, level),
        };
        leds.fill(color);
    }
}
