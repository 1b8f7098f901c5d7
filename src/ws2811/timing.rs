//! Single-wire bit timing
//!
//! Every bit takes [`CYCLES_PER_BIT`] state-machine cycles. A logical 1 is a
//! long high followed by a short low, a logical 0 a short high followed by a
//! long low:
//!
//! ```text
//!        T1   T2    T3
//! 1:   ‾‾‾‾‾‾‾‾‾‾‾‾‾|___
//! 0:   ‾‾‾|_____________
//! ```
//!
//! Bytes go out most-significant bit first.

use embassy_time::Duration;

use crate::color::{Rgb, rgb_to_transfer_word};

const T1: u32 = 2;
const T2: u32 = 5;
const T3: u32 = 3;

/// State-machine cycles per bit
pub const CYCLES_PER_BIT: u32 = T1 + T2 + T3;

const BITS_PER_WORD: u64 = 32;
const BITS_PER_PIXEL: u64 = 24;
const NANOS_PER_SECOND: u64 = 1_000_000_000;
const MICROS_PER_SECOND: u64 = 1_000_000;

/// High and low time of one encoded bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pulse {
    pub high_ns: u32,
    pub low_ns: u32,
}

/// State-machine clock divider in 16.8 fixed point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockDivider {
    pub integer: u16,
    pub fraction: u8,
}

/// Bit timing for one bit rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitTiming {
    bit_rate: u32,
}

impl BitTiming {
    /// Timing for `bit_rate` bits per second (must be non-zero)
    pub const fn new(bit_rate: u32) -> Self {
        Self { bit_rate }
    }

    /// Bits per second
    pub const fn bit_rate(&self) -> u32 {
        self.bit_rate
    }

    /// Length of one bit
    #[allow(clippy::cast_possible_truncation)]
    pub const fn period_ns(&self) -> u32 {
        (NANOS_PER_SECOND / self.bit_rate as u64) as u32
    }

    /// Waveform of a single bit
    #[allow(clippy::cast_possible_truncation)]
    pub const fn pulse(&self, bit: bool) -> Pulse {
        let (high, low) = if bit { (T1 + T2, T3) } else { (T1, T2 + T3) };
        let period = NANOS_PER_SECOND / self.bit_rate as u64;
        Pulse {
            high_ns: (period * high as u64 / CYCLES_PER_BIT as u64) as u32,
            low_ns: (period * low as u64 / CYCLES_PER_BIT as u64) as u32,
        }
    }

    /// Waveform of one byte, most-significant bit first
    pub fn encode_byte(&self, byte: u8) -> impl Iterator<Item = Pulse> + use<> {
        let timing = *self;
        (0..8).rev().map(move |bit| timing.pulse((byte >> bit) & 1 == 1))
    }

    /// Waveform of one pixel: the 24 used bits of its transfer word
    pub fn encode_pixel(&self, color: Rgb) -> impl Iterator<Item = Pulse> + use<> {
        let timing = *self;
        let word = rgb_to_transfer_word(color);
        (8..32).rev().map(move |bit| timing.pulse((word >> bit) & 1 == 1))
    }

    /// Divider that runs the state machine at `CYCLES_PER_BIT × bit_rate`
    #[allow(clippy::cast_possible_truncation)]
    pub const fn clock_divider(&self, sys_clock_hz: u32) -> ClockDivider {
        let target = self.bit_rate as u64 * CYCLES_PER_BIT as u64;
        let divider = (sys_clock_hz as u64 * 256) / target;
        let integer = divider >> 8;
        ClockDivider {
            integer: if integer > u16::MAX as u64 {
                u16::MAX
            } else {
                integer as u16
            },
            fraction: (divider & 0xFF) as u8,
        }
    }

    /// All-zero words that keep the line low for at least `reset`
    #[allow(clippy::cast_possible_truncation)]
    pub const fn latch_words(&self, reset: Duration) -> usize {
        let bits = (reset.as_micros() * self.bit_rate as u64).div_ceil(MICROS_PER_SECOND);
        let words = bits.div_ceil(BITS_PER_WORD);
        if words == 0 { 1 } else { words as usize }
    }

    /// Wire time of a full frame: pixel data plus the latch gap
    pub const fn frame_time(&self, num_leds: usize, reset: Duration) -> Duration {
        let bits = num_leds as u64 * BITS_PER_PIXEL
            + self.latch_words(reset) as u64 * BITS_PER_WORD;
        Duration::from_micros((bits * MICROS_PER_SECOND).div_ceil(self.bit_rate as u64))
    }
}

/// Bytes in the order they leave the wire
///
/// Words are streamed in memory byte order (the transfer engine swaps bytes
/// so the first byte in memory is shifted out first).
pub fn wire_bytes(words: &[u32]) -> impl Iterator<Item = u8> + '_ {
    words.iter().flat_map(|word| word.to_ne_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulses_at_800_kbps() {
        let timing = BitTiming::new(800_000);
        assert_eq!(timing.period_ns(), 1250);
        assert_eq!(
            timing.pulse(true),
            Pulse {
                high_ns: 875,
                low_ns: 375
            }
        );
        assert_eq!(
            timing.pulse(false),
            Pulse {
                high_ns: 250,
                low_ns: 1000
            }
        );
    }

    #[test]
    fn latch_words_cover_the_gap() {
        let reset = Duration::from_micros(300);
        assert_eq!(BitTiming::new(800_000).latch_words(reset), 8);
        assert_eq!(BitTiming::new(400_000).latch_words(reset), 4);
        assert_eq!(BitTiming::new(800_000).latch_words(Duration::from_micros(0)), 1);
    }

    #[test]
    fn clock_divider_in_16_8() {
        let divider = BitTiming::new(800_000).clock_divider(125_000_000);
        assert_eq!(
            divider,
            ClockDivider {
                integer: 15,
                fraction: 160
            }
        );
    }
}
