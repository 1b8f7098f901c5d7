//! Simulated transfer hardware shared by the transmission tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use lightdancer::Frame;
use lightdancer::ws2811::{BitTiming, EngineError, Link, TransferEngine};

/// Time a simulated transfer stays on the wire
pub const WIRE_DELAY: Duration = Duration::from_millis(30);

/// Something the simulated hardware did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Install { pin: u8, bit_rate: u32 },
    /// Words as they were when the transfer started
    Start(Vec<u32>),
    /// Words as they were when the transfer drained
    DataComplete(Vec<u32>),
    LatchStart(usize),
    LatchComplete,
    Disable,
}

pub type EventLog = Arc<Mutex<Vec<Event>>>;

/// Channel ownership is process-wide, so transmission tests run one at a time
pub fn serial() -> MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn leak_link() -> &'static Link<SimEngine> {
    Box::leak(Box::new(Link::new()))
}

/// Frames given to a channel live for the rest of the process
pub fn leak_frame(frame: Frame) -> &'static mut Frame {
    Box::leak(Box::new(frame))
}

pub fn events(log: &EventLog) -> Vec<Event> {
    log.lock().unwrap().clone()
}

/// Engine that completes every transfer from another thread after [`WIRE_DELAY`]
pub struct SimEngine {
    link: &'static Link<SimEngine>,
    log: EventLog,
    install_error: Option<EngineError>,
}

impl SimEngine {
    pub fn new(link: &'static Link<SimEngine>) -> (Self, EventLog) {
        let log = EventLog::default();
        let engine = Self {
            link,
            log: log.clone(),
            install_error: None,
        };
        (engine, log)
    }

    pub fn failing(link: &'static Link<SimEngine>, error: EngineError) -> (Self, EventLog) {
        let (mut engine, log) = Self::new(link);
        engine.install_error = Some(error);
        (engine, log)
    }

    fn record(&self, event: Event) {
        self.log.lock().unwrap().push(event);
    }
}

impl TransferEngine for SimEngine {
    fn install(&mut self, pin: u8, timing: &BitTiming) -> Result<(), EngineError> {
        if let Some(error) = self.install_error {
            return Err(error);
        }
        self.record(Event::Install {
            pin,
            bit_rate: timing.bit_rate(),
        });
        Ok(())
    }

    unsafe fn start(&mut self, words: &[u32]) {
        self.record(Event::Start(words.to_vec()));

        // Read the buffer again at the end, the way DMA would
        let address = words.as_ptr() as usize;
        let len = words.len();
        let link = self.link;
        let log = self.log.clone();
        thread::spawn(move || {
            thread::sleep(WIRE_DELAY);
            // SAFETY: the caller keeps `words` alive until completion is reported
            let drained = unsafe { std::slice::from_raw_parts(address as *const u32, len) };
            log.lock().unwrap().push(Event::DataComplete(drained.to_vec()));
            link.on_transfer_complete();
        });
    }

    fn start_latch(&mut self, zero_words: usize) {
        self.record(Event::LatchStart(zero_words));

        let link = self.link;
        let log = self.log.clone();
        thread::spawn(move || {
            thread::sleep(WIRE_DELAY);
            log.lock().unwrap().push(Event::LatchComplete);
            link.on_transfer_complete();
        });
    }

    fn disable(&mut self) {
        self.record(Event::Disable);
    }
}
