//! Frame transmission for single-wire WS2811/WS2812 strips
//!
//! A frame is streamed by a [`TransferEngine`] while the caller composes the
//! next one. Every transfer moves through three phases:
//!
//! ```text
//! Idle ──send──▶ Transmitting ──complete──▶ ResetPending ──complete──▶ Idle
//! ```
//!
//! The completion notification (DMA interrupt) drives the two right-hand
//! transitions through [`Link::on_transfer_complete`]; the main path only ever
//! leaves `Idle`. At most one frame is in flight and each one is followed by
//! the full latch gap before the next begins.
//!
//! ```ignore
//! static LINK: Link<PioEngine> = Link::new();
//! static FRONT: StaticCell<Frame> = StaticCell::new();
//! static BACK: StaticCell<Frame> = StaticCell::new();
//!
//! #[interrupt]
//! fn DMA_IRQ_0() {
//!     clear_dma_irq();
//!     LINK.on_transfer_complete();
//! }
//!
//! let mut channel = TransmissionChannel::new(&LINK, engine, &ChannelConfig::DEFAULT)
//!     .expect("strip output");
//!
//! let mut spare = Some(BACK.init(Frame::new(300)));
//! let mut next = FRONT.init(Frame::new(300));
//! loop {
//!     effect.draw_frame(next, &info);
//!     let returned = channel.send(next);
//!     next = returned.or_else(|| spare.take()).unwrap();
//! }
//! ```
//!
//! Frames handed to the channel are `&'static mut`. The engine keeps reading a
//! frame after `send` returns, so the frame has to outlive every way the
//! channel can go away, including `core::mem::forget`.

mod engine;
pub mod timing;

use core::cell::{Cell, RefCell};
use core::fmt;
use core::future::poll_fn;
use core::sync::atomic::{AtomicU8, Ordering};
use core::task::Poll;

use critical_section::Mutex;
use embassy_sync::waitqueue::AtomicWaker;
#[cfg(feature = "esp32-log")]
use esp_println::println;

pub use engine::{EngineError, TransferEngine};
pub use timing::{BitTiming, ClockDivider, Pulse};

use crate::config::{ChannelConfig, Frame};
use crate::frame::FrameBuffer;

const PHASE_IDLE: u8 = 0;
const PHASE_TRANSMITTING: u8 = 1;
const PHASE_RESET_PENDING: u8 = 2;

/// Output channel state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Phase {
    /// Nothing in flight
    Idle = PHASE_IDLE,
    /// Pixel data is streaming
    Transmitting = PHASE_TRANSMITTING,
    /// Data has drained, the line is held low to latch the frame
    ResetPending = PHASE_RESET_PENDING,
}

impl Phase {
    const fn from_raw(value: u8) -> Self {
        match value {
            PHASE_TRANSMITTING => Self::Transmitting,
            PHASE_RESET_PENDING => Self::ResetPending,
            _ => Self::Idle,
        }
    }
}

/// Error returned when the channel is busy; hands the frame back
#[derive(Debug, PartialEq, Eq)]
pub struct TrySendError<T>(pub T);

/// Channel construction failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelError {
    /// Another transmission channel exists
    AlreadyClaimed,
    /// Bit rate of zero
    InvalidBitRate,
    /// Hardware could not be claimed
    Engine(EngineError),
}

impl From<EngineError> for ChannelError {
    fn from(error: EngineError) -> Self {
        Self::Engine(error)
    }
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyClaimed => f.write_str("transmission channel already claimed"),
            Self::InvalidBitRate => f.write_str("bit rate must be non-zero"),
            Self::Engine(error) => write!(f, "transfer engine: {error}"),
        }
    }
}

impl core::error::Error for ChannelError {}

static CLAIMED: Mutex<Cell<bool>> = Mutex::new(Cell::new(false));

fn claim() -> Result<(), ChannelError> {
    critical_section::with(|cs| {
        if CLAIMED.borrow(cs).replace(true) {
            Err(ChannelError::AlreadyClaimed)
        } else {
            Ok(())
        }
    })
}

fn release_claim() {
    critical_section::with(|cs| CLAIMED.borrow(cs).set(false));
}

struct Hardware<E> {
    engine: E,
    latch_words: usize,
}

/// State shared between the main path and the completion notification
///
/// Lives in a `static` so the interrupt handler can reach it. The phase is
/// an atomic using only `load`/`store`, so it works on cores without
/// compare-and-swap; the engine sits behind a critical section.
pub struct Link<E> {
    phase: AtomicU8,
    hardware: Mutex<RefCell<Option<Hardware<E>>>>,
    idle_waker: AtomicWaker,
}

impl<E> Link<E> {
    pub const fn new() -> Self {
        Self {
            phase: AtomicU8::new(PHASE_IDLE),
            hardware: Mutex::new(RefCell::new(None)),
            idle_waker: AtomicWaker::new(),
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        Phase::from_raw(self.phase.load(Ordering::Acquire))
    }

    pub fn is_idle(&self) -> bool {
        self.phase() == Phase::Idle
    }

    /// Resolves once the phase is `Idle`
    pub async fn wait_idle(&self) {
        poll_fn(|cx| {
            self.idle_waker.register(cx.waker());
            if self.is_idle() {
                Poll::Ready(())
            } else {
                Poll::Pending
            }
        })
        .await;
    }

    fn set_phase(&self, phase: Phase) {
        self.phase.store(phase as u8, Ordering::Release);
    }

    fn block_until_idle(&self) {
        while !self.is_idle() {
            core::hint::spin_loop();
        }
    }
}

impl<E: TransferEngine> Link<E> {
    /// Advance the phase after the engine finished a transfer
    ///
    /// Call once per completed transfer from the completion notification.
    /// Data completion starts the latch gap; latch completion returns to
    /// `Idle`. Spurious calls while idle are ignored.
    pub fn on_transfer_complete(&self) {
        critical_section::with(|cs| {
            let mut hardware = self.hardware.borrow(cs).borrow_mut();
            let Some(hardware) = hardware.as_mut() else {
                return;
            };
            match self.phase() {
                Phase::Transmitting => {
                    self.set_phase(Phase::ResetPending);
                    hardware.engine.start_latch(hardware.latch_words);
                }
                Phase::ResetPending => {
                    self.set_phase(Phase::Idle);
                    self.idle_waker.wake();
                }
                Phase::Idle => {}
            }
        });
    }

    fn attach(&self, engine: E, latch_words: usize) {
        critical_section::with(|cs| {
            self.set_phase(Phase::Idle);
            let _ = self.hardware.borrow(cs).replace(Some(Hardware {
                engine,
                latch_words,
            }));
        });
    }

    fn detach(&self) -> Option<E> {
        critical_section::with(|cs| self.hardware.borrow(cs).take().map(|hw| hw.engine))
    }

    /// Leave `Idle` with `words` on the wire; must only be called while idle
    fn begin(&self, words: &[u32]) {
        critical_section::with(|cs| {
            let mut hardware = self.hardware.borrow(cs).borrow_mut();
            let Some(hardware) = hardware.as_mut() else {
                return;
            };
            if words.is_empty() {
                self.set_phase(Phase::ResetPending);
                hardware.engine.start_latch(hardware.latch_words);
            } else {
                self.set_phase(Phase::Transmitting);
                // SAFETY: the words belong to a `&'static mut` frame held by
                // the channel, and the main path never writes it again before
                // the phase is back to `Idle`.
                unsafe { hardware.engine.start(words) };
            }
        });
    }
}

impl<E> Default for Link<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// The single output channel of the process
///
/// Holds the frame in flight. [`send`](Self::send) hands back the frame
/// before it once that one has fully left the wire, so two frames are enough
/// for double buffering.
///
/// Only `'static` frames can be sent; a frame on the stack is rejected at
/// compile time:
///
/// ```compile_fail
/// use lightdancer::ws2811::{TransferEngine, TransmissionChannel};
/// use lightdancer::Frame;
///
/// fn send_local<E: TransferEngine + 'static>(channel: &mut TransmissionChannel<E>) {
///     let mut frame = Frame::new(4);
///     channel.send(&mut frame);
/// }
/// ```
pub struct TransmissionChannel<E: TransferEngine + 'static, F: FrameBuffer + 'static = Frame> {
    link: &'static Link<E>,
    in_flight: Option<&'static mut F>,
    timing: BitTiming,
    latch_words: usize,
}

impl<E: TransferEngine + 'static, F: FrameBuffer + 'static> TransmissionChannel<E, F> {
    /// Claim the output and install `engine` on `link`
    ///
    /// Only one channel may exist at a time; a second one fails with
    /// [`ChannelError::AlreadyClaimed`] until the first is dropped.
    pub fn new(
        link: &'static Link<E>,
        mut engine: E,
        config: &ChannelConfig,
    ) -> Result<Self, ChannelError> {
        if config.bit_rate == 0 {
            return Err(ChannelError::InvalidBitRate);
        }
        claim()?;

        let timing = BitTiming::new(config.bit_rate);
        if let Err(error) = engine.install(config.pin, &timing) {
            release_claim();
            #[cfg(feature = "esp32-log")]
            println!("[TransmissionChannel.new] engine install failed: {}", error);
            return Err(error.into());
        }

        let latch_words = timing.latch_words(config.reset);
        link.attach(engine, latch_words);

        #[cfg(feature = "esp32-log")]
        println!(
            "[TransmissionChannel.new] pin {} at {} bit/s, {} latch words",
            config.pin, config.bit_rate, latch_words
        );

        Ok(Self {
            link,
            in_flight: None,
            timing,
            latch_words,
        })
    }

    /// Wait until the previous frame and its latch gap are done, then start `frame`
    ///
    /// Returns without waiting for `frame` itself. The returned frame is the
    /// one sent before, free to draw into again.
    pub fn send(&mut self, frame: &'static mut F) -> Option<&'static mut F> {
        self.link.block_until_idle();
        self.start(frame)
    }

    /// [`send`](Self::send) that awaits instead of spinning
    pub async fn send_async(&mut self, frame: &'static mut F) -> Option<&'static mut F> {
        self.link.wait_idle().await;
        self.start(frame)
    }

    /// Start `frame` only if the channel is idle
    pub fn try_send(
        &mut self,
        frame: &'static mut F,
    ) -> Result<Option<&'static mut F>, TrySendError<&'static mut F>> {
        if !self.link.is_idle() {
            return Err(TrySendError(frame));
        }
        Ok(self.start(frame))
    }

    /// Wait until idle and take back the last frame sent
    pub fn flush(&mut self) -> Option<&'static mut F> {
        self.link.block_until_idle();
        self.in_flight.take()
    }

    pub fn phase(&self) -> Phase {
        self.link.phase()
    }

    pub fn is_idle(&self) -> bool {
        self.link.is_idle()
    }

    pub const fn timing(&self) -> &BitTiming {
        &self.timing
    }

    /// All-zero words sent for each latch gap
    pub const fn latch_words(&self) -> usize {
        self.latch_words
    }

    /// Shut the channel down and return the disabled engine
    pub fn free(self) -> Option<E> {
        self.link.block_until_idle();
        let engine = self.link.detach().map(|mut engine| {
            engine.disable();
            engine
        });
        drop(self);
        engine
    }

    fn start(&mut self, frame: &'static mut F) -> Option<&'static mut F> {
        let previous = self.in_flight.take();
        self.link.begin(frame.transfer_words());
        self.in_flight = Some(frame);
        previous
    }
}

impl<E: TransferEngine + 'static, F: FrameBuffer + 'static> Drop for TransmissionChannel<E, F> {
    fn drop(&mut self) {
        self.link.block_until_idle();
        if let Some(mut engine) = self.link.detach() {
            engine.disable();
        }
        release_claim();

        #[cfg(feature = "esp32-log")]
        println!("[TransmissionChannel.drop] released");
    }
}
