//! Synthetic sine blocks for exercising the FFT without a microphone
//!
//! ```ignore
//! // 512 samples at 44.1 kHz
//! let samples = WaveGen::<44_100, 512>::sin(1_000.0);
//! ```
//!
//! This uses software floating point and is meant for bench tests, not the
//! per-tick path.

use core::f64::consts::PI;

/// Sine generator for a fixed sample rate `FS` and block length `N`
pub struct WaveGen<const FS: usize, const N: usize>;

impl<const FS: usize, const N: usize> WaveGen<FS, N> {
    /// Full-scale amplitude
    pub const AMPLITUDE_MAX: i16 = i16::MAX;

    /// Full-scale sine at `frequency` Hz
    pub fn sin(frequency: f64) -> [i16; N] {
        Self::sin_with_amplitude(frequency, Self::AMPLITUDE_MAX)
    }

    /// Sine at `frequency` Hz with peak `amplitude`
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn sin_with_amplitude(frequency: f64, amplitude: i16) -> [i16; N] {
        const {
            assert!(N % 2 == 0, "N must be even");
            assert!(FS > 0, "sample rate must be positive");
        }
        let amplitude = f64::from(amplitude);
        core::array::from_fn(|i| {
            let phase = 2.0 * PI * frequency * i as f64 / FS as f64;
            (amplitude * libm::sin(phase)) as i16
        })
    }

    /// Frequency that lands exactly on FFT bin `bin` of an `N`-point transform
    #[allow(clippy::cast_precision_loss)]
    pub fn bin_frequency(bin: usize) -> f64 {
        bin as f64 * FS as f64 / N as f64
    }
}
