//! Input sample and output magnitude widths

use super::q15::Q15_ONE;

/// Audio sample accepted by the FFT
pub trait Sample: Copy {
    /// Convert to Q15
    fn to_q15(self) -> i16;
}

impl Sample for i16 {
    #[inline]
    fn to_q15(self) -> i16 {
        self
    }
}

/// 24-bit significant samples stored in 32 bits
///
/// The low 8 bits are dropped. Values outside 24 bits saturate.
impl Sample for i32 {
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn to_q15(self) -> i16 {
        (self >> 8).clamp(i32::from(i16::MIN), i32::from(Q15_ONE)) as i16
    }
}

/// Magnitude written to a spectrum bin
pub trait Magnitude: Copy + Default {
    /// Largest representable magnitude
    const MAX: u64;

    /// Whether the spectrum is rescaled so its peak fits the output range
    ///
    /// Narrow outputs lose too much range to clamp bins independently, so
    /// every call shifts all bins down until the peak sits under 80% of `MAX`.
    const NORMALIZE: bool;

    /// Convert a magnitude already clamped to `MAX`
    fn from_clamped(value: u64) -> Self;
}

impl Magnitude for u16 {
    const MAX: u64 = u16::MAX as u64;
    const NORMALIZE: bool = true;

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn from_clamped(value: u64) -> Self {
        value as u16
    }
}

impl Magnitude for u32 {
    const MAX: u64 = u32::MAX as u64;
    const NORMALIZE: bool = false;

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn from_clamped(value: u64) -> Self {
        value as u32
    }
}
