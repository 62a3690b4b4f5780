use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::time::{MissedTickBehavior, interval};

use super::{Simulation, Tick};

/// Roughly one display refresh at 60 Hz
pub const FRAME: Duration = Duration::from_micros(16_667);

/// Shared stop flag, read at the top of every tick
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverOutcome {
    /// The simulation returned [`Tick::Stop`]
    Completed { frames: u64 },
    /// The cancel token was set
    Cancelled { frames: u64 },
    /// The frame budget ran out first
    Exhausted { frames: u64 },
}

impl DriverOutcome {
    pub fn frames(&self) -> u64 {
        match *self {
            DriverOutcome::Completed { frames }
            | DriverOutcome::Cancelled { frames }
            | DriverOutcome::Exhausted { frames } => frames,
        }
    }
}

/// Reschedules a simulation once per frame until it stops or is cancelled
///
/// Cancellation is cooperative: a cancel lands at the next tick, never in the
/// middle of one.
#[derive(Debug, Clone)]
pub struct FrameDriver {
    frame: Duration,
    cancel: CancelToken,
}

impl Default for FrameDriver {
    fn default() -> Self {
        FrameDriver::new(FRAME)
    }
}

impl FrameDriver {
    pub fn new(frame: Duration) -> Self {
        FrameDriver {
            frame,
            cancel: CancelToken::new(),
        }
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Step `sim` with `dt = 1.0` without waiting between frames
    pub fn run_frames<S: Simulation + ?Sized>(&self, sim: &mut S, max_frames: u64) -> DriverOutcome {
        let mut frames = 0;
        while frames < max_frames {
            if self.cancel.is_cancelled() {
                return DriverOutcome::Cancelled { frames };
            }
            frames += 1;
            if sim.tick(1.0) == Tick::Stop {
                return DriverOutcome::Completed { frames };
            }
        }
        DriverOutcome::Exhausted { frames }
    }

    /// Step `sim` on a timer, with `dt` measured from the real elapsed time
    pub async fn run<S: Simulation + Send + ?Sized>(&self, sim: &mut S) -> DriverOutcome {
        let mut ticker = interval(self.frame);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut frames = 0;
        let mut last = Instant::now();
        loop {
            ticker.tick().await;
            if self.cancel.is_cancelled() {
                return DriverOutcome::Cancelled { frames };
            }

            let now = Instant::now();
            let dt = if frames == 0 {
                1.0
            } else {
                now.duration_since(last).as_secs_f64() / self.frame.as_secs_f64()
            };
            last = now;
            frames += 1;

            if sim.tick(dt) == Tick::Stop {
                return DriverOutcome::Completed { frames };
            }
        }
    }
}
