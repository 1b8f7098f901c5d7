//! Fixed-point Fast Fourier Transform
//!
//! Turns a block of real audio samples into a magnitude spectrum on cores
//! without a floating-point unit and without heap allocation.
//!
//! ```ignore
//! // 256 samples in, 129 magnitudes out, Hann window
//! let fft: FixedPointFft<256, 129, i16, u16> = FixedPointFft::new(Window::Hann);
//!
//! let mut magnitudes = [0u16; 129];
//! while read_audio(&mut samples) {
//!     fft.magnitudes_into(&samples, &mut magnitudes);
//!     // bin `n` holds the power around `n * sample_rate / 256` Hz
//! }
//! ```
//!
//! Working memory per call is two `[i16; N]` arrays on the stack, on top of the
//! tables computed once in [`FixedPointFft::new`].
//!
//! Narrow (`u16`) output is normalized per call: the peak is shifted under 80%
//! of the range, so values are not comparable across calls. Wide (`u32`)
//! output clamps every bin on its own and keeps an absolute scale.

pub mod q15;
mod sample;
mod window;

use core::marker::PhantomData;

#[cfg(feature = "esp32-log")]
use esp_println::println;
use num_complex::Complex;

pub use sample::{Magnitude, Sample};
pub use window::Window;

use q15::{Q15_HALF, add_sat, cos_q15, mul_q15, sin_q15, sub_sat};
use window::{WindowTable, angle};

/// Fixed-point radix-2 FFT for real input
///
/// - `N`: samples per block, a power of two in `4..=32768`
/// - `BINS`: magnitudes per block, must be `N / 2 + 1`
/// - `I`: input sample, `i16` or 24-bit significant `i32`
/// - `O`: output magnitude, `u16` (normalized) or `u32`
///
/// Invalid combinations fail to compile.
#[derive(Debug, Clone)]
pub struct FixedPointFft<const N: usize, const BINS: usize, I: Sample = i16, O: Magnitude = u16>
{
    /// `e^(-j·2πk/N)` for `k <= N/2`; butterflies only read `k < N/2`
    twiddles: [Complex<i16>; BINS],
    window: Window,
    window_table: WindowTable<N>,
    bit_reverse: [u16; N],
    _types: PhantomData<fn(I) -> O>,
}

impl<const N: usize, const BINS: usize, I: Sample, O: Magnitude> FixedPointFft<N, BINS, I, O> {
    /// Samples per block
    pub const SIZE: usize = N;

    /// Magnitudes per block
    pub const BIN_COUNT: usize = BINS;

    /// Precompute twiddle factors, window coefficients and the bit-reversal table
    pub fn new(window: Window) -> Self {
        const {
            assert!(N.is_power_of_two(), "FFT size must be a power of two");
            assert!(N >= 4 && N <= 32768, "FFT size must be within 4..=32768");
            assert!(BINS == N / 2 + 1, "BINS must be N / 2 + 1");
        }

        let twiddles = core::array::from_fn(|k| {
            let theta = -angle(k, 1, N);
            Complex::new(cos_q15(theta), sin_q15(theta))
        });

        let bits = N.trailing_zeros();
        let bit_reverse = core::array::from_fn(|i| reverse_bits(i, bits));

        #[cfg(feature = "esp32-log")]
        println!("[FixedPointFft.new] {} samples, {:?} window", N, window);

        Self {
            twiddles,
            window,
            window_table: WindowTable::new(window),
            bit_reverse,
            _types: PhantomData,
        }
    }

    /// Window applied before every transform
    pub const fn window(&self) -> Window {
        self.window
    }

    /// Compute the magnitude spectrum of `input`
    ///
    /// Element `n` is the linear (not dB) power around `n * sample_rate / N` Hz;
    /// element 0 is DC and element `N / 2` is the Nyquist frequency.
    pub fn magnitudes(&self, input: &[I; N]) -> [O; BINS] {
        let mut magnitudes = [O::default(); BINS];
        self.magnitudes_into(input, &mut magnitudes);
        magnitudes
    }

    /// Compute the magnitude spectrum of `input` into `magnitudes`
    pub fn magnitudes_into(&self, input: &[I; N], magnitudes: &mut [O; BINS]) {
        let mut real = [0i16; N];
        let mut imag = [0i16; N];

        for (value, sample) in real.iter_mut().zip(input) {
            *value = sample.to_q15();
        }

        self.window_table.apply(&mut real);
        self.permute(&mut real);
        let scale_count = self.transform(&mut real, &mut imag);

        if O::NORMALIZE {
            let mut peak = 0;
            for (&re, &im) in real.iter().zip(&imag).take(BINS) {
                peak = peak.max(approx_magnitude(re, im) << scale_count);
            }
            let shift = normalization_shift(peak, O::MAX * 4 / 5);

            for ((out, &re), &im) in magnitudes.iter_mut().zip(&real).zip(&imag) {
                let magnitude = (approx_magnitude(re, im) << scale_count) >> shift;
                *out = O::from_clamped(magnitude.min(O::MAX));
            }
        } else {
            for ((out, &re), &im) in magnitudes.iter_mut().zip(&real).zip(&imag) {
                let magnitude = approx_magnitude(re, im) << scale_count;
                *out = O::from_clamped(magnitude.min(O::MAX));
            }
        }
    }

    /// Center frequency of `bin`, rounded down to whole hertz
    #[allow(clippy::cast_possible_truncation)]
    pub const fn bin_frequency_hz(bin: usize, sample_rate: u32) -> u32 {
        (bin as u64 * sample_rate as u64 / N as u64) as u32
    }

    /// Bin closest to `frequency_hz`, capped to the Nyquist bin
    #[allow(clippy::cast_possible_truncation)]
    pub const fn bin_for_frequency(frequency_hz: u32, sample_rate: u32) -> usize {
        if sample_rate == 0 {
            return 0;
        }
        let scaled = frequency_hz as u64 * N as u64;
        let bin = ((scaled + sample_rate as u64 / 2) / sample_rate as u64) as usize;
        if bin > N / 2 { N / 2 } else { bin }
    }

    /// Reorder samples for the in-place decimation-in-time transform
    fn permute(&self, real: &mut [i16; N]) {
        for i in 0..N {
            let j = usize::from(self.bit_reverse[i]);
            if i < j {
                real.swap(i, j);
            }
        }
    }

    /// Radix-2 butterflies with a block-floating-point guard
    ///
    /// Returns how many times all values were halved.
    fn transform(&self, real: &mut [i16; N], imag: &mut [i16; N]) -> u32 {
        let mut scale_count = 0;
        let mut m = 2;
        while m <= N {
            let m2 = m / 2;

            if needs_rescale(real, imag) {
                for value in real.iter_mut().chain(imag.iter_mut()) {
                    *value >>= 1;
                }
                scale_count += 1;
            }

            for k in (0..N).step_by(m) {
                for j in 0..m2 {
                    let w = self.twiddles[(j * N) / m];
                    let i1 = k + j;
                    let i2 = i1 + m2;

                    // (real[i2] + j·imag[i2]) · (w.re + j·w.im)
                    let tr = sub_sat(mul_q15(real[i2], w.re), mul_q15(imag[i2], w.im));
                    let ti = add_sat(mul_q15(real[i2], w.im), mul_q15(imag[i2], w.re));

                    real[i2] = sub_sat(real[i1], tr);
                    imag[i2] = sub_sat(imag[i1], ti);
                    real[i1] = add_sat(real[i1], tr);
                    imag[i1] = add_sat(imag[i1], ti);
                }
            }

            m <<= 1;
        }
        scale_count
    }
}

#[allow(clippy::cast_possible_truncation)]
fn reverse_bits(index: usize, bits: u32) -> u16 {
    let mut value = index;
    let mut result = 0;
    for _ in 0..bits {
        result = (result << 1) | (value & 1);
        value >>= 1;
    }
    result as u16
}

/// Any value beyond half the range could overflow in the next stage
fn needs_rescale(real: &[i16], imag: &[i16]) -> bool {
    real.iter()
        .chain(imag)
        .any(|&value| !(-Q15_HALF..=Q15_HALF).contains(&value))
}

/// `max(|re|, |im|) + min(|re|, |im|) / 2`, no square root
#[inline]
fn approx_magnitude(re: i16, im: i16) -> u64 {
    let re = u64::from(re.unsigned_abs());
    let im = u64::from(im.unsigned_abs());
    re.max(im) + (re.min(im) >> 1)
}

/// Smallest right shift that brings `peak` to `threshold` or below
fn normalization_shift(peak: u64, threshold: u64) -> u32 {
    let mut value = peak;
    let mut shift = 0;
    while value > threshold {
        value >>= 1;
        shift += 1;
    }
    shift
}
