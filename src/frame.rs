//! Pixel frame buffer
//!
//! A frame owns fixed-capacity storage for the largest supported strip and
//! exposes only the active part of it. The storage is never reallocated:
//! one frame is created at startup and redrawn every tick.

use core::ops::{Deref, DerefMut};

use crate::color::{BLUE, LIME, RED, Rgb};

const PIXELS_PER_GROUP: usize = 4;

/// Round a LED count up to whole transfer words.
///
/// Four 3-byte pixels occupy exactly three 32-bit words.
pub const fn padded_capacity(num_leds: usize) -> usize {
    num_leds.div_ceil(PIXELS_PER_GROUP) * PIXELS_PER_GROUP
}

/// Anything the output channel can stream as 32-bit words
pub trait FrameBuffer {
    /// Number of LEDs actually driven
    fn num_leds(&self) -> usize;

    /// Pixel data viewed as transfer words, in memory byte order
    ///
    /// May run past `num_leds` to a word boundary. Whatever trails the active
    /// pixels reaches the strip too.
    fn transfer_words(&self) -> &[u32];
}

#[derive(Debug, Clone)]
#[repr(C, align(4))]
struct WordAligned<const CAPACITY: usize>([Rgb; CAPACITY]);

/// Frame of LED pixel values
///
/// `MAX_LEDS` is the hardware maximum; `CAPACITY` must be
/// [`padded_capacity(MAX_LEDS)`](padded_capacity). The frame dereferences to
/// the active pixels only, so indexing and iteration never reach the padding.
#[derive(Debug, Clone)]
pub struct PixelFrame<const MAX_LEDS: usize, const CAPACITY: usize> {
    storage: WordAligned<CAPACITY>,
    num_leds: usize,
}

impl<const MAX_LEDS: usize, const CAPACITY: usize> PixelFrame<MAX_LEDS, CAPACITY> {
    /// Create a black frame for `requested` LEDs
    ///
    /// The count is capped to `MAX_LEDS`. Read the actual count back with
    /// [`num_leds`](Self::num_leds) rather than assuming the request was honored.
    pub const fn new(requested: usize) -> Self {
        const {
            assert!(
                CAPACITY == padded_capacity(MAX_LEDS),
                "CAPACITY must be MAX_LEDS rounded up to a multiple of four"
            );
        }
        let num_leds = if requested > MAX_LEDS {
            MAX_LEDS
        } else {
            requested
        };
        Self {
            storage: WordAligned([Rgb { r: 0, g: 0, b: 0 }; CAPACITY]),
            num_leds,
        }
    }

    /// Number of LEDs in this frame (after capping)
    pub const fn num_leds(&self) -> usize {
        self.num_leds
    }

    /// Size of the backing storage in pixels
    pub const fn capacity(&self) -> usize {
        CAPACITY
    }

    /// Active pixels
    pub fn pixels(&self) -> &[Rgb] {
        &self.storage.0[..self.num_leds]
    }

    /// Active pixels, mutable
    pub fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.storage.0[..self.num_leds]
    }

    /// Set every active pixel to `color`
    pub fn fill(&mut self, color: Rgb) {
        self.pixels_mut().fill(color);
    }

    /// Turn every active pixel off
    pub fn clear(&mut self) {
        self.fill(Rgb::default());
    }

    /// Repeating red, lime, blue pattern used to check a freshly wired strip
    pub fn fill_test_pattern(&mut self) {
        const PATTERN: [Rgb; 3] = [RED, LIME, BLUE];
        for (pixel, color) in self.pixels_mut().iter_mut().zip(PATTERN.iter().cycle()) {
            *pixel = *color;
        }
    }

    /// Active pixels rounded up to the next four-pixel group, as words
    ///
    /// Padding pixels are never exposed for writing, so the tail of the last
    /// group is always black. The engine streams the whole group, so up to
    /// three LEDs past `num_leds` on a longer strip are driven black. Leave
    /// `num_leds` a multiple of four to keep them untouched.
    pub fn transfer_words(&self) -> &[u32] {
        let pixels = padded_capacity(self.num_leds);
        bytemuck::cast_slice(&self.storage.0[..pixels])
    }
}

impl<const MAX_LEDS: usize, const CAPACITY: usize> Default for PixelFrame<MAX_LEDS, CAPACITY> {
    fn default() -> Self {
        Self::new(MAX_LEDS)
    }
}

impl<const MAX_LEDS: usize, const CAPACITY: usize> Deref for PixelFrame<MAX_LEDS, CAPACITY> {
    type Target = [Rgb];

    fn deref(&self) -> &Self::Target {
        self.pixels()
    }
}

impl<const MAX_LEDS: usize, const CAPACITY: usize> DerefMut for PixelFrame<MAX_LEDS, CAPACITY> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.pixels_mut()
    }
}

impl<const MAX_LEDS: usize, const CAPACITY: usize> FrameBuffer for PixelFrame<MAX_LEDS, CAPACITY> {
    fn num_leds(&self) -> usize {
        self.num_leds
    }

    fn transfer_words(&self) -> &[u32] {
        PixelFrame::transfer_words(self)
    }
}
