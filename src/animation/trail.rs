use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Point, Simulation, Tick, frame_factor, lerp};

pub const TRAIL_COLORS: [&str; 7] = [
    "rgb(26, 188, 156)",
    "rgb(46, 204, 113)",
    "rgb(52, 152, 219)",
    "rgb(155, 89, 182)",
    "rgb(241, 196, 15)",
    "rgb(230, 126, 34)",
    "rgb(231, 76, 60)",
];

pub const RINGS_PER_MOVE: usize = 3;
pub const RING_TTL: f64 = 120.0;

const JITTER: i32 = 20;
const DRIFT: i32 = 300;
const DRIFT_EASING: f64 = 0.01;

fn ease_out_quart(x: f64) -> f64 {
    1.0 - (1.0 - x).powi(4)
}

/// One expanding-then-shrinking ring left behind by the pointer
#[derive(Debug, Clone, PartialEq)]
pub struct TrailRing {
    pub start: Point,
    pub end: Point,
    pub position: Point,
    pub start_size: f64,
    pub size: f64,
    pub color: &'static str,
    pub time: f64,
    pub ttl: f64,
}

impl TrailRing {
    fn spawn<R: Rng>(rng: &mut R, at: Point) -> TrailRing {
        let start = Point::new(
            at.x + rng.gen_range(-JITTER..=JITTER) as f64,
            at.y + rng.gen_range(-JITTER..=JITTER) as f64,
        );
        let end = Point::new(
            start.x + rng.gen_range(-DRIFT..=DRIFT) as f64,
            start.y + rng.gen_range(-DRIFT..=DRIFT) as f64,
        );
        let size = rng.gen_range(30..=40) as f64;

        TrailRing {
            start,
            end,
            position: start,
            start_size: size,
            size,
            color: TRAIL_COLORS[rng.gen_range(0..TRAIL_COLORS.len())],
            time: 0.0,
            ttl: RING_TTL,
        }
    }

    /// Fraction of the ring's life used, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        (self.time / self.ttl).clamp(0.0, 1.0)
    }

    /// Fades in and back out over the ring's life
    pub fn alpha(&self) -> f64 {
        (self.progress() * PI).sin()
    }

    /// Stroke width, proportional to size within `[1.5, 4]`
    pub fn line_width(&self) -> f64 {
        (self.size * 0.12).clamp(1.5, 4.0)
    }

    fn step(&mut self, dt: f64) {
        if self.time <= self.ttl {
            self.size = self.start_size * (1.0 - ease_out_quart(self.progress()));
            let k = frame_factor(DRIFT_EASING, dt);
            self.position.x = lerp(self.position.x, self.end.x, k);
            self.position.y = lerp(self.position.y, self.end.y, k);
        }
        self.time += dt;
    }
}

/// Coloured rings shed by the pointer as it moves
pub struct MouseTrail<R: Rng = StdRng> {
    rng: R,
    pointer: Option<Point>,
    rings: Vec<TrailRing>,
}

impl MouseTrail<StdRng> {
    pub fn new() -> Self {
        MouseTrail::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        MouseTrail::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for MouseTrail<StdRng> {
    fn default() -> Self {
        MouseTrail::new()
    }
}

impl<R: Rng> MouseTrail<R> {
    pub fn with_rng(rng: R) -> Self {
        MouseTrail {
            rng,
            pointer: None,
            rings: Vec::new(),
        }
    }

    pub fn rings(&self) -> &[TrailRing] {
        &self.rings
    }

    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    pub fn pointer_move(&mut self, at: Point) {
        self.pointer = Some(at);
        for _ in 0..RINGS_PER_MOVE {
            let ring = TrailRing::spawn(&mut self.rng, at);
            self.rings.push(ring);
        }
    }

    /// Rings already in flight keep animating
    pub fn pointer_leave(&mut self) {
        self.pointer = None;
    }
}

impl<R: Rng> Simulation for MouseTrail<R> {
    fn tick(&mut self, dt: f64) -> Tick {
        for ring in &mut self.rings {
            ring.step(dt);
        }
        self.rings.retain(|ring| ring.time <= ring.ttl);

        if self.rings.is_empty() {
            Tick::Stop
        } else {
            Tick::Continue
        }
    }
}
