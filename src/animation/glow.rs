use super::{Point, Rgb, Simulation, Tick, Viewport, frame_factor, lerp};

/// Per-frame smoothing of the glow toward the pointer
pub const EASING: f64 = 0.1;

/// Below this radius a fading glow counts as gone
const SETTLE_RADIUS: f64 = 0.5;

/// Offset and alpha of each gradient stop, tuned by eye
const FALLOFF: [(f64, f64); 17] = [
    (0.00, 0.30),
    (0.04, 0.28),
    (0.08, 0.25),
    (0.12, 0.22),
    (0.17, 0.19),
    (0.22, 0.16),
    (0.28, 0.13),
    (0.34, 0.105),
    (0.40, 0.08),
    (0.47, 0.06),
    (0.54, 0.045),
    (0.61, 0.032),
    (0.68, 0.021),
    (0.76, 0.012),
    (0.84, 0.006),
    (0.92, 0.002),
    (1.00, 0.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Inner and outer base colours of the glow
    pub fn glow_colors(&self) -> (Rgb, Rgb) {
        match self {
            Theme::Light => (Rgb(0, 114, 177), Rgb(44, 148, 208)),
            Theme::Dark => (Rgb(44, 148, 208), Rgb(0, 114, 177)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: String,
}

/// Soft light that trails the pointer
///
/// Position and radius both ease toward their targets, so leaving the page
/// fades the glow out instead of cutting it.
#[derive(Debug, Clone)]
pub struct CursorGlow {
    viewport: Viewport,
    theme: Theme,
    target: Point,
    position: Point,
    radius: f64,
    target_radius: f64,
}

impl CursorGlow {
    pub fn new(viewport: Viewport, theme: Theme) -> Self {
        let center = viewport.center();
        CursorGlow {
            viewport,
            theme,
            target: center,
            position: center,
            radius: 0.0,
            target_radius: 0.0,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn target_radius(&self) -> f64 {
        self.target_radius
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if self.target_radius > 0.0 {
            self.target_radius = viewport.min_side();
        }
    }

    pub fn pointer_enter(&mut self, at: Point) {
        self.pointer_move(at);
    }

    pub fn pointer_move(&mut self, at: Point) {
        self.target = at;
        self.target_radius = self.viewport.min_side();
    }

    pub fn pointer_leave(&mut self) {
        self.target_radius = 0.0;
    }

    /// Radial gradient for the current theme, centre first
    pub fn gradient(&self) -> Vec<GradientStop> {
        let (inner, outer) = self.theme.glow_colors();
        FALLOFF
            .iter()
            .map(|&(offset, alpha)| {
                let mix = |a: u8, b: u8| lerp(a as f64, b as f64, offset).round() as u8;
                let color = Rgb(
                    mix(inner.0, outer.0),
                    mix(inner.1, outer.1),
                    mix(inner.2, outer.2),
                );
                GradientStop {
                    offset,
                    color: color.css(alpha),
                }
            })
            .collect()
    }
}

impl Simulation for CursorGlow {
    fn tick(&mut self, dt: f64) -> Tick {
        let k = frame_factor(EASING, dt);
        self.position.x = lerp(self.position.x, self.target.x, k);
        self.position.y = lerp(self.position.y, self.target.y, k);
        self.radius = lerp(self.radius, self.target_radius, k);

        if self.target_radius == 0.0 && self.radius < SETTLE_RADIUS {
            self.radius = 0.0;
            return Tick::Stop;
        }
        Tick::Continue
    }
}
