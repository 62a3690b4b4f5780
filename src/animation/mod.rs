//! Per-frame visual effects
//!
//! Every effect is a [`Simulation`]: a value that advances by one step per
//! display refresh and says whether it wants another one. Nothing here draws;
//! a renderer reads the simulation state after each tick. The effects share no
//! state with each other.

pub mod confetti;
pub mod cursor;
pub mod driver;
pub mod glow;
pub mod magnetic;
pub mod trail;
pub mod typewriter;

pub use confetti::{Confetti, ConfettiPiece, Shape};
pub use cursor::CustomCursor;
pub use driver::{CancelToken, DriverOutcome, FrameDriver};
pub use glow::{CursorGlow, GradientStop, Theme};
pub use magnetic::{MagneticButton, Rect};
pub use trail::{MouseTrail, TrailRing};
pub use typewriter::{Phase, Typewriter};

/// What a simulation wants after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Continue,
    Stop,
}

/// One independently scheduled effect
pub trait Simulation {
    /// Advance by `dt` frames (1.0 is one display refresh)
    fn tick(&mut self, dt: f64) -> Tick;
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Visible area in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Viewport { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn css(&self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {:.3})", self.0, self.1, self.2, alpha)
    }
}

/// Exponential approach used by the smoothed effects
pub fn lerp(start: f64, end: f64, alpha: f64) -> f64 {
    start + (end - start) * alpha
}

/// Per-frame smoothing factor scaled to a step of `dt` frames
pub(crate) fn frame_factor(per_frame: f64, dt: f64) -> f64 {
    if dt == 1.0 {
        per_frame
    } else {
        1.0 - (1.0 - per_frame).powf(dt.max(0.0))
    }
}
