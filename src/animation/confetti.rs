use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Point, Simulation, Tick, Viewport};

/// Bright neon and pastel colours
pub const PALETTE: [&str; 16] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD", "#98D8C8", "#F7DC6F",
    "#BB8FCE", "#85C1E9", "#F8C471", "#82E0AA", "#F1948A", "#D7BDE2", "#AED6F1", "#F9E79F",
];

pub const GRAVITY: f64 = 0.25;
pub const MIN_PIECES: usize = 300;
pub const MAX_PIECES: usize = 360;

/// How far past the bottom edge a piece may fall before it is dropped
const BOTTOM_OVERFLOW: f64 = 200.0;
/// How far past either side a piece may travel before it is dropped
const SIDE_OVERFLOW: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Square,
    Triangle,
}

/// Where a piece starts; also decides its initial velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnRegion {
    Top,
    LeftEdge,
    RightEdge,
    LowerHalf,
    Center,
}

impl SpawnRegion {
    /// 15% top, 15% edges split evenly, 20% lower half, 50% centre burst
    fn pick<R: Rng>(rng: &mut R) -> SpawnRegion {
        let roll = rng.gen_range(0.0..1.0);
        if roll < 0.15 {
            SpawnRegion::Top
        } else if roll < 0.225 {
            SpawnRegion::LeftEdge
        } else if roll < 0.3 {
            SpawnRegion::RightEdge
        } else if roll < 0.5 {
            SpawnRegion::LowerHalf
        } else {
            SpawnRegion::Center
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiPiece {
    pub position: Point,
    pub velocity: Point,
    pub color: &'static str,
    pub size: f64,
    /// Degrees
    pub rotation: f64,
    pub rotation_speed: f64,
    pub gravity: f64,
    pub life: f64,
    pub max_life: f64,
    pub shape: Shape,
    pub region: SpawnRegion,
}

impl ConfettiPiece {
    fn spawn<R: Rng>(rng: &mut R, viewport: Viewport) -> ConfettiPiece {
        let Viewport { width, height } = viewport;
        let center = viewport.center();
        let region = SpawnRegion::pick(rng);

        // Centred random in (-0.5, 0.5)
        let spread = |rng: &mut R| rng.gen_range(0.0..1.0) - 0.5;

        let (position, velocity) = match region {
            SpawnRegion::Top => (
                Point::new(rng.gen_range(0.0..1.0) * width, rng.gen_range(0.0..100.0)),
                Point::new(spread(rng) * 15.0, rng.gen_range(1.0..3.0)),
            ),
            // Edge pieces get the widest horizontal spread so they cross the screen
            SpawnRegion::LeftEdge | SpawnRegion::RightEdge => {
                let x = if region == SpawnRegion::LeftEdge {
                    -50.0
                } else {
                    width + 50.0
                };
                (
                    Point::new(x, rng.gen_range(0.0..1.0) * height),
                    Point::new(spread(rng) * 25.0, spread(rng) * 8.0),
                )
            }
            SpawnRegion::LowerHalf => (
                Point::new(
                    rng.gen_range(0.0..1.0) * width,
                    height * 0.5 + rng.gen_range(0.0..1.0) * height * 0.5,
                ),
                Point::new(spread(rng) * 18.0, -rng.gen_range(2.0..10.0)),
            ),
            SpawnRegion::Center => (
                Point::new(
                    center.x + spread(rng) * width,
                    center.y + spread(rng) * 100.0,
                ),
                Point::new(spread(rng) * 20.0, -rng.gen_range(3.0..13.0)),
            ),
        };

        let shape = match rng.gen_range(0..3) {
            0 => Shape::Circle,
            1 => Shape::Square,
            _ => Shape::Triangle,
        };

        ConfettiPiece {
            position,
            velocity,
            color: PALETTE[rng.gen_range(0..PALETTE.len())],
            size: rng.gen_range(4.0..12.0),
            rotation: rng.gen_range(0.0..360.0),
            rotation_speed: spread(rng) * 15.0,
            gravity: GRAVITY,
            life: 0.0,
            max_life: rng.gen_range(300.0..500.0),
            shape,
            region,
        }
    }

    fn step(&mut self, dt: f64) {
        self.position.x += self.velocity.x * dt;
        self.position.y += self.velocity.y * dt;
        self.velocity.y += self.gravity * dt;
        self.rotation += self.rotation_speed * dt;
        self.life += dt;
    }

    fn alive(&self, viewport: Viewport) -> bool {
        self.life < self.max_life
            && self.position.y < viewport.height + BOTTOM_OVERFLOW
            && self.position.x > -SIDE_OVERFLOW
            && self.position.x < viewport.width + SIDE_OVERFLOW
    }

    /// Linear fade over the piece's life
    pub fn opacity(&self) -> f64 {
        (1.0 - self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Full-screen confetti burst
///
/// One run at a time: a trigger while pieces are still in the air is ignored.
/// When the last piece is gone the completion callback fires and the next
/// trigger is accepted.
pub struct Confetti<R: Rng = StdRng> {
    viewport: Viewport,
    rng: R,
    pieces: Vec<ConfettiPiece>,
    active: bool,
    on_complete: Option<Box<dyn FnMut() + Send>>,
}

impl Confetti<StdRng> {
    pub fn new(viewport: Viewport) -> Self {
        Confetti::with_rng(viewport, StdRng::from_entropy())
    }

    pub fn seeded(viewport: Viewport, seed: u64) -> Self {
        Confetti::with_rng(viewport, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Confetti<R> {
    pub fn with_rng(viewport: Viewport, rng: R) -> Self {
        Confetti {
            viewport,
            rng,
            pieces: Vec::new(),
            active: false,
            on_complete: None,
        }
    }

    /// Called once each time a run finishes
    pub fn on_complete(&mut self, callback: impl FnMut() + Send + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn pieces(&self) -> &[ConfettiPiece] {
        &self.pieces
    }

    /// Start a burst; returns false if one is already running
    pub fn trigger(&mut self) -> bool {
        if self.active {
            log::debug!("Confetti already running, trigger ignored");
            return false;
        }

        let count = self.rng.gen_range(MIN_PIECES..MAX_PIECES);
        let viewport = self.viewport;
        let rng = &mut self.rng;
        self.pieces = (0..count)
            .map(|_| ConfettiPiece::spawn(&mut *rng, viewport))
            .collect();
        self.active = true;

        log::debug!("Created {} confetti pieces", count);
        true
    }
}

impl<R: Rng> Simulation for Confetti<R> {
    fn tick(&mut self, dt: f64) -> Tick {
        if !self.active {
            return Tick::Stop;
        }

        let viewport = self.viewport;
        for piece in &mut self.pieces {
            piece.step(dt);
        }
        self.pieces.retain(|piece| piece.alive(viewport));

        if self.pieces.is_empty() {
            self.active = false;
            if let Some(callback) = self.on_complete.as_mut() {
                callback();
            }
            log::debug!("Confetti animation complete");
            return Tick::Stop;
        }
        Tick::Continue
    }
}
