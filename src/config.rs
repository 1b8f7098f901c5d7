//! Compile-time configuration of the controller.
//!
//! Nothing here is loaded at runtime: the values size the static buffers and
//! the transform tables, so changing them means rebuilding the firmware.

use embassy_time::Duration;

use crate::fft::{FixedPointFft, Window};
use crate::frame::{PixelFrame, padded_capacity};

/// Largest strip the frame buffer can hold (5 m at 760 LEDs/m).
pub const MAX_LEDS: usize = 3800;

/// Frame backing storage, rounded up to whole transfer words.
pub const FRAME_CAPACITY: usize = padded_capacity(MAX_LEDS);

/// Number of samples per FFT block (power of two).
pub const FFT_SIZE: usize = 256;

/// Number of magnitude bins produced per block.
pub const FFT_BINS: usize = FFT_SIZE / 2 + 1;

/// Audio sample rate feeding the FFT.
pub const SAMPLE_RATE_HZ: u32 = 44_100;

/// Window applied before every transform.
pub const DEFAULT_WINDOW: Window = Window::Hann;

/// Output bit rate of the strip (800 kbit/s for WS2812, 400 kbit/s for WS2811).
pub const BIT_RATE: u32 = 800_000;

/// Minimum low time that latches a frame into the strip.
pub const RESET_GAP: Duration = Duration::from_micros(300);

/// GPIO carrying the strip data line.
pub const DATA_PIN: u8 = 2;

/// Frame buffer sized for the configured strip.
pub type Frame = PixelFrame<MAX_LEDS, FRAME_CAPACITY>;

/// FFT engine for the configured block size: 16-bit samples in, 16-bit magnitudes out.
pub type Fft = FixedPointFft<FFT_SIZE, FFT_BINS, i16, u16>;

/// Magnitudes produced by [`Fft`].
pub type Spectrum = [u16; FFT_BINS];

/// Configuration of the strip output channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Bits per second on the data line
    pub bit_rate: u32,
    /// Length of the latch gap after each frame
    pub reset: Duration,
    /// Data pin handed to the transfer engine
    pub pin: u8,
}

impl ChannelConfig {
    pub const DEFAULT: Self = Self {
        bit_rate: BIT_RATE,
        reset: RESET_GAP,
        pin: DATA_PIN,
    };

    /// Same configuration at a different bit rate.
    #[must_use]
    pub const fn with_bit_rate(mut self, bit_rate: u32) -> Self {
        self.bit_rate = bit_rate;
        self
    }

    /// Same configuration with a different latch gap.
    #[must_use]
    pub const fn with_reset(mut self, reset: Duration) -> Self {
        self.reset = reset;
        self
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
