use std::time::Duration;

use super::driver::FRAME;
use super::{Simulation, Tick};

pub const TYPING_SPEED: Duration = Duration::from_millis(100);
pub const DELETING_SPEED: Duration = Duration::from_millis(50);
pub const PAUSE: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Typing,
    Paused,
    Deleting,
}

/// Subtitle that types out each phrase, holds it, erases it, then moves on
///
/// Every step waits for the delay of the phase it starts in, so reaching the
/// end of a phrase costs one more typing delay before the pause begins.
#[derive(Debug, Clone)]
pub struct Typewriter {
    prefix: String,
    phrases: Vec<String>,
    typing: Duration,
    deleting: Duration,
    pause: Duration,
    index: usize,
    shown: usize,
    phase: Phase,
    pending: Duration,
}

impl Typewriter {
    pub fn new(prefix: impl Into<String>, phrases: Vec<String>) -> Self {
        Typewriter::with_speeds(prefix, phrases, TYPING_SPEED, DELETING_SPEED, PAUSE)
    }

    pub fn with_speeds(
        prefix: impl Into<String>,
        phrases: Vec<String>,
        typing: Duration,
        deleting: Duration,
        pause: Duration,
    ) -> Self {
        Typewriter {
            prefix: prefix.into(),
            phrases,
            typing,
            deleting,
            pause,
            index: 0,
            shown: 0,
            phase: Phase::Typing,
            pending: Duration::ZERO,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Index of the phrase being typed or erased
    pub fn index(&self) -> usize {
        self.index
    }

    /// The visible part of the current phrase
    pub fn current(&self) -> String {
        self.phrases
            .get(self.index)
            .map(|phrase| phrase.chars().take(self.shown).collect())
            .unwrap_or_default()
    }

    /// Fixed prefix followed by the visible part
    pub fn text(&self) -> String {
        format!("{}{}", self.prefix, self.current())
    }

    fn delay(&self) -> Duration {
        let delay = match self.phase {
            Phase::Typing => self.typing,
            Phase::Paused => self.pause,
            Phase::Deleting => self.deleting,
        };
        delay.max(Duration::from_millis(1))
    }

    fn step(&mut self) {
        let len = self.phrases[self.index].chars().count();
        match self.phase {
            Phase::Paused => self.phase = Phase::Deleting,
            Phase::Deleting if self.shown > 0 => self.shown -= 1,
            Phase::Deleting => {
                self.phase = Phase::Typing;
                self.index = (self.index + 1) % self.phrases.len();
            }
            Phase::Typing if self.shown < len => self.shown += 1,
            Phase::Typing => self.phase = Phase::Paused,
        }
    }

    /// Let `elapsed` of wall time pass, taking every step that falls due
    pub fn advance(&mut self, elapsed: Duration) {
        if self.phrases.is_empty() {
            return;
        }
        self.pending += elapsed;
        loop {
            let delay = self.delay();
            if self.pending < delay {
                break;
            }
            self.pending -= delay;
            self.step();
        }
    }
}

/// Cycles for as long as it is driven; with no phrases there is nothing to do.
impl Simulation for Typewriter {
    fn tick(&mut self, dt: f64) -> Tick {
        if self.phrases.is_empty() {
            return Tick::Stop;
        }
        self.advance(FRAME.mul_f64(dt.max(0.0)));
        Tick::Continue
    }
}
