//! Window functions applied before the transform
//!
//! | Window           | Sidelobe suppression | Main lobe | Coefficients     |
//! |------------------|----------------------|-----------|------------------|
//! | `Bartlett`       | ~26 dB               | narrow    | computed per run |
//! | `Hann`           | ~31 dB               | medium    | N entries        |
//! | `BlackmanHarris` | ~92 dB               | wider     | N entries        |
//!
//! The window is picked at run time, so every engine reserves the N-entry
//! table (`2·N` bytes) even for `Bartlett`, which leaves it unused.

use super::q15::{FULL_TURN, Q15_HALF, Q15_ONE, cos_q15, mul_q15};

// Blackman-Harris coefficients scaled by 32767
const BH_A0: i16 = 11761; // 0.35875
const BH_A1: i16 = 16001; // 0.48829
const BH_A2: i16 = 4630; // 0.14128
const BH_A3: i16 = 383; // 0.01168

/// Window applied to the samples before the transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Window {
    /// Triangular ramp 0 → 1 → 0, computed on the fly
    #[default]
    Bartlett,
    /// Raised cosine `0.5 - 0.5·cos(2πn/N)`
    Hann,
    /// 4-term cosine sum
    BlackmanHarris,
}

/// Precomputed coefficients for one window and block size
///
/// Always `[i16; N]` in size; `Bartlett` only skips filling it.
#[derive(Debug, Clone)]
pub(crate) enum WindowTable<const N: usize> {
    Bartlett,
    Coefficients([i16; N]),
}

impl<const N: usize> WindowTable<N> {
    pub(crate) fn new(window: Window) -> Self {
        match window {
            Window::Bartlett => Self::Bartlett,
            Window::Hann => Self::Coefficients(core::array::from_fn(hann::<N>)),
            Window::BlackmanHarris => {
                Self::Coefficients(core::array::from_fn(blackman_harris::<N>))
            }
        }
    }

    /// Multiply every sample by its window coefficient
    pub(crate) fn apply(&self, samples: &mut [i16; N]) {
        match self {
            Self::Bartlett => {
                for (n, sample) in samples.iter_mut().enumerate() {
                    *sample = mul_q15(*sample, bartlett(n, N));
                }
            }
            Self::Coefficients(coefficients) => {
                for (sample, coefficient) in samples.iter_mut().zip(coefficients) {
                    *sample = mul_q15(*sample, *coefficient);
                }
            }
        }
    }
}

/// Binary angle of `multiple * 2πn/N`
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) const fn angle(n: usize, multiple: usize, size: usize) -> i32 {
    ((multiple as u64 * n as u64 * FULL_TURN as u64) / size as u64) as i32
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn bartlett(n: usize, size: usize) -> i16 {
    let rise = if n < size / 2 { n } else { size - n };
    ((rise as i64 * 2 * Q15_ONE as i64) / size as i64) as i16
}

fn hann<const N: usize>(n: usize) -> i16 {
    Q15_HALF.saturating_sub(cos_q15(angle(n, 1, N)) >> 1)
}

#[allow(clippy::cast_possible_truncation)]
fn blackman_harris<const N: usize>(n: usize) -> i16 {
    let cos1 = cos_q15(angle(n, 1, N));
    let cos2 = cos_q15(angle(n, 2, N));
    let cos3 = cos_q15(angle(n, 3, N));

    let value = i32::from(BH_A0) - i32::from(mul_q15(BH_A1, cos1))
        + i32::from(mul_q15(BH_A2, cos2))
        - i32::from(mul_q15(BH_A3, cos3));
    value.clamp(0, i32::from(Q15_ONE)) as i16
}
