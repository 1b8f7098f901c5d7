#![no_std]

pub mod color;
pub mod config;
pub mod effect;
pub mod fft;
pub mod frame;
pub mod frame_scheduler;
pub mod wavegen;
pub mod ws2811;

pub use config::{ChannelConfig, Fft, Frame, Spectrum};
pub use effect::{DrawInfo, Effect, EffectId, EffectSlot};
pub use fft::{FixedPointFft, Window};
pub use frame::{FrameBuffer, PixelFrame};
pub use frame_scheduler::{FrameScheduler, FrameTick};
pub use wavegen::WaveGen;
pub use ws2811::{
    BitTiming, ChannelError, EngineError, Link, Phase, TransferEngine, TransmissionChannel,
    TrySendError,
};

pub use color::Rgb;
pub use embassy_time::{Duration, Instant};
