//! Easing curves
//!
//! The full named curve family (sine/quad/cubic/quart/quint/expo/circ/
//! back, each in in/out/in-out flavors) expressed as cubic beziers with
//! fixed endpoints (0,0) and (1,1), solved by a WebKit-style unit-bezier
//! solver: Newton-Raphson first, bisection as the fallback.

/// A cubic bezier with implicit endpoints (0,0) and (1,1), solved for
/// y given x.
#[derive(Clone, Copy, Debug)]
pub struct UnitBezier {
    ax: f64,
    bx: f64,
    cx: f64,
    ay: f64,
    by: f64,
    cy: f64,
}

/// Tolerance on the x-residual when solving the curve parameter.
const SOLVE_EPSILON: f64 = 1e-3;
/// Below this derivative magnitude Newton-Raphson is abandoned.
const DERIVATIVE_EPSILON: f64 = 1e-6;

impl UnitBezier {
    /// Build from the two free control points `(p1x, p1y)`, `(p2x, p2y)`.
    pub fn new(p1x: f64, p1y: f64, p2x: f64, p2y: f64) -> Self {
        // Polynomial coefficients, endpoints implicit.
        let cx = 3.0 * p1x;
        let bx = 3.0 * (p2x - p1x) - cx;
        let ax = 1.0 - cx - bx;

        let cy = 3.0 * p1y;
        let by = 3.0 * (p2y - p1y) - cy;
        let ay = 1.0 - cy - by;

        Self {
            ax,
            bx,
            cx,
            ay,
            by,
            cy,
        }
    }

    fn sample_curve_x(&self, t: f64) -> f64 {
        ((self.ax * t + self.bx) * t + self.cx) * t
    }

    fn sample_curve_y(&self, t: f64) -> f64 {
        ((self.ay * t + self.by) * t + self.cy) * t
    }

    fn sample_curve_derivative_x(&self, t: f64) -> f64 {
        (3.0 * self.ax * t + 2.0 * self.bx) * t + self.cx
    }

    /// Find the curve parameter `t` where `x(t) == x`.
    fn solve_curve_x(&self, x: f64) -> f64 {
        // Fast path: up to 8 Newton-Raphson iterations.
        let mut t2 = x;
        for _ in 0..8 {
            let x2 = self.sample_curve_x(t2) - x;
            if x2.abs() < SOLVE_EPSILON {
                return t2;
            }
            let d2 = self.sample_curve_derivative_x(t2);
            if d2.abs() < DERIVATIVE_EPSILON {
                break;
            }
            t2 -= x2 / d2;
        }

        // Fall back to bisection; guaranteed to converge on [0, 1].
        let mut t0 = 0.0_f64;
        let mut t1 = 1.0_f64;
        t2 = x;

        if t2 < t0 {
            return t0;
        }
        if t2 > t1 {
            return t1;
        }

        while t0 < t1 {
            let x2 = self.sample_curve_x(t2);
            if (x2 - x).abs() < SOLVE_EPSILON {
                return t2;
            }
            if x > x2 {
                t0 = t2;
            } else {
                t1 = t2;
            }
            t2 = (t1 - t0) * 0.5 + t0;
        }

        t2
    }

    /// Solve `y` for the given `x` in [0, 1].
    pub fn solve(&self, x: f64) -> f64 {
        self.sample_curve_y(self.solve_curve_x(x))
    }
}

/// Named easing curves plus a custom cubic-bezier escape hatch.
///
/// `apply` maps normalized time to normalized progress.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    SineIn,
    SineOut,
    SineInOut,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    QuartIn,
    QuartOut,
    QuartInOut,
    QuintIn,
    QuintOut,
    QuintInOut,
    ExpoIn,
    ExpoOut,
    ExpoInOut,
    CircIn,
    CircOut,
    CircInOut,
    BackIn,
    BackOut,
    BackInOut,
    CubicBezier(f64, f64, f64, f64),
}

impl Easing {
    /// Control points for each named curve.
    pub fn control_points(&self) -> Option<(f64, f64, f64, f64)> {
        match *self {
            Easing::Linear => None,
            Easing::SineIn => Some((0.47, 0.0, 0.745, 0.715)),
            Easing::SineOut => Some((0.39, 0.575, 0.565, 1.0)),
            Easing::SineInOut => Some((0.445, 0.05, 0.55, 0.95)),
            Easing::QuadIn => Some((0.55, 0.085, 0.68, 0.53)),
            Easing::QuadOut => Some((0.25, 0.46, 0.45, 0.94)),
            Easing::QuadInOut => Some((0.455, 0.03, 0.515, 0.955)),
            Easing::CubicIn => Some((0.55, 0.055, 0.675, 0.19)),
            Easing::CubicOut => Some((0.215, 0.61, 0.355, 1.0)),
            Easing::CubicInOut => Some((0.645, 0.045, 0.355, 1.0)),
            Easing::QuartIn => Some((0.895, 0.03, 0.685, 0.22)),
            Easing::QuartOut => Some((0.165, 0.84, 0.44, 1.0)),
            Easing::QuartInOut => Some((0.77, 0.0, 0.175, 1.0)),
            Easing::QuintIn => Some((0.755, 0.05, 0.855, 0.06)),
            Easing::QuintOut => Some((0.23, 1.0, 0.32, 1.0)),
            Easing::QuintInOut => Some((0.86, 0.0, 0.07, 1.0)),
            Easing::ExpoIn => Some((0.95, 0.05, 0.795, 0.035)),
            Easing::ExpoOut => Some((0.19, 1.0, 0.22, 1.0)),
            Easing::ExpoInOut => Some((1.0, 0.0, 0.0, 1.0)),
            Easing::CircIn => Some((0.6, 0.04, 0.98, 0.335)),
            Easing::CircOut => Some((0.075, 0.82, 0.165, 1.0)),
            Easing::CircInOut => Some((0.785, 0.135, 0.15, 0.86)),
            Easing::BackIn => Some((0.6, -0.28, 0.735, 0.045)),
            Easing::BackOut => Some((0.175, 0.885, 0.32, 1.275)),
            Easing::BackInOut => Some((0.68, -0.55, 0.265, 1.55)),
            Easing::CubicBezier(x1, y1, x2, y2) => Some((x1, y1, x2, y2)),
        }
    }

    /// Apply the easing function to a normalized time value.
    pub fn apply(&self, t: f64) -> f64 {
        match self.control_points() {
            None => t,
            Some((x1, y1, x2, y2)) => UnitBezier::new(x1, y1, x2, y2).solve(t),
        }
    }

    /// Every named curve, for iteration in tooling and tests.
    pub const NAMED: [Easing; 25] = [
        Easing::Linear,
        Easing::SineIn,
        Easing::SineOut,
        Easing::SineInOut,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::QuartIn,
        Easing::QuartOut,
        Easing::QuartInOut,
        Easing::QuintIn,
        Easing::QuintOut,
        Easing::QuintInOut,
        Easing::ExpoIn,
        Easing::ExpoOut,
        Easing::ExpoInOut,
        Easing::CircIn,
        Easing::CircOut,
        Easing::CircInOut,
        Easing::BackIn,
        Easing::BackOut,
        Easing::BackInOut,
    ];
}
