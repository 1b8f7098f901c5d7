//! Frame pacing
//!
//! Portable frame pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping between frames; the scheduler only
//! says how long and how much time the effects should advance by.

use embassy_time::{Duration, Instant};

use crate::config::ChannelConfig;
use crate::ws2811::BitTiming;

/// Default target frame rate (60 FPS).
pub const DEFAULT_FPS: u32 = 60;

/// Default frame duration based on target FPS.
pub const DEFAULT_FRAME_DURATION: Duration =
    Duration::from_micros(1_000_000 / DEFAULT_FPS as u64);

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameTick {
    /// Microseconds since the previous tick, zero on the first one
    pub elapsed_us: u32,
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Frame scheduler with drift correction
///
/// The frame duration never drops below the wire time of one frame, since
/// `send` would block for the difference anyway.
///
/// ```ignore
/// let mut scheduler = FrameScheduler::for_strip(&ChannelConfig::DEFAULT, frame.num_leds());
///
/// loop {
///     let tick = scheduler.tick(Instant::now());
///     effect.draw_frame(frame, &DrawInfo::new(tick.elapsed_us, &spectrum));
///     frame = channel.send(frame).unwrap_or_else(|| spare.take().unwrap());
///     Timer::after(tick.sleep_duration).await;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    last_tick: Option<Instant>,
    next_frame: Instant,
    frame_duration: Duration,
}

impl FrameScheduler {
    /// Pace at `target`, or at `wire_time` if the wire is slower
    pub fn new(target: Duration, wire_time: Duration) -> Self {
        Self {
            last_tick: None,
            next_frame: Instant::from_ticks(0),
            frame_duration: target.max(wire_time),
        }
    }

    /// Pace at [`DEFAULT_FRAME_DURATION`] for a strip of `num_leds` on `config`
    pub fn for_strip(config: &ChannelConfig, num_leds: usize) -> Self {
        let wire_time = BitTiming::new(config.bit_rate).frame_time(num_leds, config.reset);
        Self::new(DEFAULT_FRAME_DURATION, wire_time)
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Register a frame started at `now` and return timing for the next one.
    pub fn tick(&mut self, now: Instant) -> FrameTick {
        let elapsed = self
            .last_tick
            .map_or(Duration::from_ticks(0), |last| now.saturating_duration_since(last));
        self.last_tick = Some(now);

        // Skip the backlog after a stall instead of bursting to catch up
        if now > self.next_frame + self.frame_duration * 2 {
            self.next_frame = now;
        }
        self.next_frame += self.frame_duration;

        FrameTick {
            elapsed_us: u32::try_from(elapsed.as_micros()).unwrap_or(u32::MAX),
            next_deadline: self.next_frame,
            sleep_duration: self.next_frame.saturating_duration_since(now),
        }
    }

    /// Forget the previous tick, e.g. after switching effects
    pub fn reset(&mut self) {
        self.last_tick = None;
        self.next_frame = Instant::from_ticks(0);
    }
}
