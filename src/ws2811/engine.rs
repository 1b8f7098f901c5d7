//! Transfer hardware seam
//!
//! A [`TransferEngine`] owns one serial state machine and one DMA channel. On
//! RP2040-class parts the state machine runs the 10-cycle bit program from
//! [`BitTiming`] and the DMA channel feeds it 32-bit words with a byte swap, so
//! the first byte in memory leaves the wire first.

use core::fmt;

use super::timing::BitTiming;

/// Hardware resource the engine could not claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineError {
    /// Every state machine is in use
    NoStateMachine,
    /// Every DMA channel is in use
    NoDmaChannel,
    /// The bit program does not fit in instruction memory
    ProgramSpace,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoStateMachine => f.write_str("no free state machine"),
            Self::NoDmaChannel => f.write_str("no free DMA channel"),
            Self::ProgramSpace => f.write_str("not enough program space"),
        }
    }
}

impl core::error::Error for EngineError {}

/// Streams transfer words onto the data pin
///
/// Every [`start`](TransferEngine::start) and
/// [`start_latch`](TransferEngine::start_latch) must be followed by exactly
/// one call to [`Link::on_transfer_complete`](super::Link::on_transfer_complete)
/// once the transfer has drained, usually from the DMA interrupt handler.
/// Both are called with interrupts masked.
pub trait TransferEngine {
    /// Claim the state machine and DMA channel and load the bit program
    fn install(&mut self, pin: u8, timing: &BitTiming) -> Result<(), EngineError>;

    /// Begin streaming `words`
    ///
    /// # Safety
    ///
    /// `words` must stay valid and unmodified until the completion for this
    /// transfer has been reported.
    unsafe fn start(&mut self, words: &[u32]);

    /// Keep the line low for `zero_words` words at the bit rate
    fn start_latch(&mut self, zero_words: usize);

    /// Stop the state machine and release the DMA channel
    fn disable(&mut self);
}
