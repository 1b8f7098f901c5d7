//! Q15 fixed-point arithmetic
//!
//! One sign bit and 15 fractional bits: `32767 ≈ 1.0`, `-32768 = -1.0`.
//! Every operation saturates instead of wrapping.
//!
//! Angles are binary angles: [`FULL_TURN`] (65536) is 2π, so `k * FULL_TURN / N`
//! is exact for the power-of-two sizes the FFT uses.

/// Largest positive Q15 value (≈ 1.0)
pub const Q15_ONE: i16 = i16::MAX;

/// Half of the Q15 range, the block-floating-point rescale threshold
pub const Q15_HALF: i16 = 16384;

/// One full turn (2π) in binary angle units
pub const FULL_TURN: i32 = 1 << 16;
/// π in binary angle units
pub const HALF_TURN: i32 = FULL_TURN / 2;
/// π/2 in binary angle units
pub const QUARTER_TURN: i32 = FULL_TURN / 4;

/// π in Q15 (radians scaled by 2^15)
const PI_Q15: i64 = 102_944;

#[inline]
#[allow(clippy::cast_possible_truncation)]
const fn saturate(value: i32) -> i16 {
    if value > Q15_ONE as i32 {
        Q15_ONE
    } else if value < i16::MIN as i32 {
        i16::MIN
    } else {
        value as i16
    }
}

/// Fractional product `(a * b) >> 15`, clamped to the Q15 range
#[inline]
pub const fn mul_q15(a: i16, b: i16) -> i16 {
    saturate((a as i32 * b as i32) >> 15)
}

/// Saturating addition
#[inline]
pub const fn add_sat(a: i16, b: i16) -> i16 {
    saturate(a as i32 + b as i32)
}

/// Saturating subtraction
#[inline]
pub const fn sub_sat(a: i16, b: i16) -> i16 {
    saturate(a as i32 - b as i32)
}

/// Fixed-point sine of a binary angle
///
/// The angle is folded into [-π, π], then into [0, π/2] by symmetry, and the
/// 5th-order Taylor polynomial `x - x³/6 + x⁵/120` is evaluated on the folded
/// angle in radians. The result is clamped to ±[`Q15_ONE`].
#[allow(clippy::cast_possible_truncation)]
pub const fn sin_q15(angle: i32) -> i16 {
    let mut angle = angle.rem_euclid(FULL_TURN);
    if angle > HALF_TURN {
        angle -= FULL_TURN;
    }

    let negate = angle < 0;
    if negate {
        angle = -angle;
    }
    if angle > QUARTER_TURN {
        angle = HALF_TURN - angle;
    }

    let x = angle as i64 * PI_Q15 / HALF_TURN as i64;
    let x2 = (x * x) >> 15;
    let x3 = (x2 * x) >> 15;
    let x5 = (x3 * x2) >> 15;

    let mut result = x - x3 / 6 + x5 / 120;
    if result > Q15_ONE as i64 {
        result = Q15_ONE as i64;
    }
    if result < -(Q15_ONE as i64) {
        result = -(Q15_ONE as i64);
    }

    let result = result as i16;
    if negate { -result } else { result }
}

/// Fixed-point cosine, `sin(x + π/2)`
#[inline]
pub const fn cos_q15(angle: i32) -> i16 {
    sin_q15(angle + QUARTER_TURN)
}
