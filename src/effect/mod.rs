//! Effect system with compile-time known effect variants
//!
//! All effects are stored in an enum to avoid heap allocations.
//! Each effect implements the [`Effect`] trait and draws straight into the
//! active pixels of a frame.

mod beat_blink;
mod blink;
mod laser;

pub use beat_blink::BeatBlinkEffect;
pub use blink::BlinkEffect;
pub use laser::LaserEffect;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::Rgb;

const EFFECT_NAME_LASER: &str = "laser";
const EFFECT_NAME_BLINK: &str = "blink";
const EFFECT_NAME_BEAT_BLINK: &str = "beat_blink";

const EFFECT_ID_LASER: u8 = 0;
const EFFECT_ID_BLINK: u8 = 1;
const EFFECT_ID_BEAT_BLINK: u8 = 2;

/// Per-tick input handed to every effect
#[derive(Debug, Clone, Copy)]
pub struct DrawInfo<'a, M = u16> {
    /// Microseconds since the previous tick
    pub elapsed_us: u32,
    /// Spectrum from the FFT, bin 0 is DC
    pub magnitudes: &'a [M],
}

impl<'a, M> DrawInfo<'a, M> {
    pub const fn new(elapsed_us: u32, magnitudes: &'a [M]) -> Self {
        Self {
            elapsed_us,
            magnitudes,
        }
    }
}

impl DrawInfo<'static, u16> {
    /// Tick without audio: a single zero bin
    pub const fn silent(elapsed_us: u32) -> Self {
        Self {
            elapsed_us,
            magnitudes: &[0],
        }
    }
}

pub trait Effect {
    /// Draw one frame into `leds`
    fn draw_frame<M: Copy + Into<u64>>(&mut self, leds: &mut [Rgb], info: &DrawInfo<'_, M>);

    /// Reset effect state
    fn reset(&mut self) {}
}

/// Effect slot - enum containing all possible effects
#[derive(Debug, Clone)]
pub enum EffectSlot {
    /// Red bar sweeping along the strip
    Laser(LaserEffect),
    /// Whole strip toggling between lime and black
    Blink(BlinkEffect),
    /// White flash following the bass
    BeatBlink(BeatBlinkEffect),
}

/// Known effect ids that can be requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum EffectId {
    Laser = EFFECT_ID_LASER,
    Blink = EFFECT_ID_BLINK,
    BeatBlink = EFFECT_ID_BEAT_BLINK,
}

impl Default for EffectSlot {
    fn default() -> Self {
        Self::Laser(LaserEffect::new())
    }
}

impl EffectId {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            EFFECT_ID_LASER => Self::Laser,
            EFFECT_ID_BLINK => Self::Blink,
            EFFECT_ID_BEAT_BLINK => Self::BeatBlink,
            _ => return None,
        })
    }

    pub fn to_slot(self) -> EffectSlot {
        match self {
            Self::Laser => EffectSlot::Laser(LaserEffect::new()),
            Self::Blink => EffectSlot::Blink(BlinkEffect::new()),
            Self::BeatBlink => EffectSlot::BeatBlink(BeatBlinkEffect::new()),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Laser => EFFECT_NAME_LASER,
            Self::Blink => EFFECT_NAME_BLINK,
            Self::BeatBlink => EFFECT_NAME_BEAT_BLINK,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            EFFECT_NAME_LASER => Some(Self::Laser),
            EFFECT_NAME_BLINK => Some(Self::Blink),
            EFFECT_NAME_BEAT_BLINK => Some(Self::BeatBlink),
            _ => None,
        }
    }
}

impl EffectSlot {
    /// Replace the current effect by index, falling back to the laser
    pub fn set_effect(&mut self, index: usize) {
        let id = u8::try_from(index)
            .ok()
            .and_then(EffectId::from_raw)
            .unwrap_or(EffectId::Laser);

        #[cfg(feature = "esp32-log")]
        println!("[EffectSlot.set_effect] {} -> {}", index, id.as_str());

        *self = id.to_slot();
    }

    /// Draw the current effect
    pub fn draw_frame<M: Copy + Into<u64>>(&mut self, leds: &mut [Rgb], info: &DrawInfo<'_, M>) {
        match self {
            Self::Laser(effect) => effect.draw_frame(leds, info),
            Self::Blink(effect) => effect.draw_frame(leds, info),
            Self::BeatBlink(effect) => effect.draw_frame(leds, info),
        }
    }

    /// Reset the effect state
    pub fn reset(&mut self) {
        match self {
            Self::Laser(effect) => Effect::reset(effect),
            Self::Blink(effect) => Effect::reset(effect),
            Self::BeatBlink(effect) => Effect::reset(effect),
        }
    }

    /// Get the effect ID for external observation
    pub fn id(&self) -> EffectId {
        match self {
            Self::Laser(_) => EffectId::Laser,
            Self::Blink(_) => EffectId::Blink,
            Self::BeatBlink(_) => EffectId::BeatBlink,
        }
    }
}
