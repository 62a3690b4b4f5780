use super::{Point, Simulation, Tick};

/// Distance from the button centre within which it is attracted
pub const ATTRACTION_RADIUS: f64 = 640.0;

/// Amplification applied to the attraction
pub const STRENGTH: f64 = 1.2;

/// Untransformed bounding box of an element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Rect {
            left,
            top,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Button that leans toward a hovering pointer
///
/// The pull grows linearly as the pointer nears the centre. Leaving the
/// button, or moving outside the radius, snaps it straight back to rest.
#[derive(Debug, Clone)]
pub struct MagneticButton {
    bounds: Rect,
    hovered: bool,
    offset: Point,
}

impl MagneticButton {
    pub fn new(bounds: Rect) -> Self {
        MagneticButton {
            bounds,
            hovered: false,
            offset: Point::ZERO,
        }
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Whether the button is currently displaced
    pub fn is_attracted(&self) -> bool {
        self.offset != Point::ZERO
    }

    pub fn pointer_enter(&mut self) {
        self.hovered = true;
    }

    pub fn pointer_leave(&mut self) {
        self.hovered = false;
        self.offset = Point::ZERO;
    }

    /// Recompute the displacement for a pointer at `at`
    pub fn pointer_move(&mut self, at: Point) -> Point {
        let center = self.bounds.center();
        let dx = at.x - center.x;
        let dy = at.y - center.y;
        let distance = (dx * dx + dy * dy).sqrt();

        self.offset = if self.hovered && distance < ATTRACTION_RADIUS {
            let pull = (ATTRACTION_RADIUS - distance) / ATTRACTION_RADIUS;
            Point::new(dx * pull * STRENGTH, dy * pull * STRENGTH)
        } else {
            Point::ZERO
        };
        self.offset
    }

    /// CSS transform for the current displacement
    pub fn transform(&self) -> String {
        format!("translate({:.2}px, {:.2}px)", self.offset.x, self.offset.y)
    }
}

impl Simulation for MagneticButton {
    fn tick(&mut self, _dt: f64) -> Tick {
        if self.is_attracted() {
            Tick::Continue
        } else {
            Tick::Stop
        }
    }
}
