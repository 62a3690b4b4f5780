use super::{Point, Simulation, Tick, frame_factor, lerp};

pub const OUTLINE_EASING: f64 = 0.18;

/// Two-part pointer replacement: a dot pinned to the pointer and an outline
/// that chases it.
#[derive(Debug, Clone, Default)]
pub struct CustomCursor {
    target: Point,
    outline: Point,
    hovering: bool,
    hidden: bool,
}

impl CustomCursor {
    pub fn new() -> Self {
        CustomCursor::default()
    }

    pub fn dot(&self) -> Point {
        self.target
    }

    pub fn outline(&self) -> Point {
        self.outline
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn opacity(&self) -> f64 {
        if self.hidden { 0.0 } else { 1.0 }
    }

    pub fn pointer_move(&mut self, at: Point) {
        self.target = at;
        self.hidden = false;
    }

    pub fn pointer_enter(&mut self) {
        self.hidden = false;
    }

    pub fn pointer_leave(&mut self) {
        self.hidden = true;
    }

    /// Set while the pointer is over a link, button or form control
    pub fn set_hovering(&mut self, hovering: bool) {
        self.hovering = hovering;
    }

    pub fn outline_transform(&self) -> String {
        format!(
            "translate3d({:.2}px, {:.2}px, 0)",
            self.outline.x, self.outline.y
        )
    }

    pub fn dot_transform(&self) -> String {
        format!("translate3d({:.2}px, {:.2}px, 0)", self.target.x, self.target.y)
    }
}

/// Runs for as long as the page is mounted; only cancellation stops it.
impl Simulation for CustomCursor {
    fn tick(&mut self, dt: f64) -> Tick {
        let k = frame_factor(OUTLINE_EASING, dt);
        self.outline.x = lerp(self.outline.x, self.target.x, k);
        self.outline.y = lerp(self.outline.y, self.target.y, k);
        Tick::Continue
    }
}
