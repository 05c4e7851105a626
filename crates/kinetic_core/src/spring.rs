//! Spring physics
//!
//! A unit-mass damped harmonic oscillator driving a normalized progress
//! value from 0 toward rest at 1. Integration is 4th-order Runge-Kutta
//! with sub-stepping, so the solver stays stable no matter how large a
//! frame delta the host hands us.

/// Integrator sub-step ceiling in seconds (16 ms).
const MAX_DT: f64 = 0.016;

/// Displacement/velocity magnitude under which the spring is at rest.
const REST_EPSILON: f64 = 1e-5;

/// A damped harmonic oscillator producing a progress value converging
/// to 1.
///
/// `current` starts at 0 (displacement -1 from rest) and settles at
/// exactly 1 once both displacement and velocity drop under tolerance.
/// When a property binding carries a spring, `current` replaces the
/// easing function as the interpolation fraction.
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    /// Spring constant.
    tension: f64,
    /// Damping coefficient.
    friction: f64,
    current: f64,
    velocity: f64,
    elapsed: f64,
    ended: bool,
}

impl Spring {
    pub fn new(tension: f64, friction: f64) -> Self {
        Self {
            tension,
            friction,
            current: 0.0,
            velocity: 0.0,
            elapsed: 0.0,
            ended: false,
        }
    }

    /// Soft, slightly bouncy motion.
    pub fn gentle() -> Self {
        Self::new(120.0, 14.0)
    }

    /// Quick settle with a small overshoot.
    pub fn snappy() -> Self {
        Self::new(210.0, 20.0)
    }

    /// Fast and nearly critically damped.
    pub fn stiff() -> Self {
        Self::new(300.0, 26.0)
    }

    pub fn tension(&self) -> f64 {
        self.tension
    }

    pub fn friction(&self) -> f64 {
        self.friction
    }

    /// Progress value in 0..~1 (may overshoot before settling).
    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// True once the spring has settled at rest.
    pub fn ended(&self) -> bool {
        self.ended
    }

    /// Back to the initial state: displacement -1, at rest counters zeroed.
    pub fn reset(&mut self) {
        self.current = 0.0;
        self.velocity = 0.0;
        self.elapsed = 0.0;
        self.ended = false;
    }

    fn acceleration(&self, x: f64, v: f64) -> f64 {
        -self.tension * x - self.friction * v
    }

    /// One integration step of at most [`MAX_DT`] seconds.
    fn step(&mut self, dt: f64) {
        self.elapsed += dt;
        if self.ended {
            return;
        }

        // Work in displacement space: rest is 0, start is -1.
        let x = self.current - 1.0;
        let v = self.velocity;

        let a1 = self.acceleration(x, v);
        let v1 = v;

        let v2 = v + a1 * dt * 0.5;
        let a2 = self.acceleration(x + v1 * dt * 0.5, v2);

        let v3 = v + a2 * dt * 0.5;
        let a3 = self.acceleration(x + v2 * dt * 0.5, v3);

        let v4 = v + a3 * dt;
        let a4 = self.acceleration(x + v3 * dt, v4);

        let dx = (v1 + 2.0 * (v2 + v3) + v4) / 6.0;
        let dv = (a1 + 2.0 * (a2 + a3) + a4) / 6.0;

        let x = x + dx * dt;
        let v = v + dv * dt;

        self.current = x + 1.0;
        self.velocity = v;

        if x.abs() < REST_EPSILON && v.abs() < REST_EPSILON {
            self.current = 1.0;
            self.velocity = 0.0;
            self.ended = true;
            tracing::trace!(elapsed = self.elapsed, "spring at rest");
        }
    }

    /// Advance the simulation by `dt` seconds, sub-stepping as needed.
    pub fn advance(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }
        let mut remaining = dt;
        while remaining > 0.0 {
            let step = remaining.min(MAX_DT);
            self.step(step);
            remaining -= step;
        }
    }
}

impl Default for Spring {
    fn default() -> Self {
        Self::gentle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converges_to_one() {
        let mut spring = Spring::new(230.0, 22.0);
        for _ in 0..600 {
            spring.advance(1.0 / 60.0);
            if spring.ended() {
                break;
            }
        }
        assert!(spring.ended());
        assert_eq!(spring.current(), 1.0);
        assert_eq!(spring.velocity(), 0.0);
    }

    #[test]
    fn large_deltas_are_substepped() {
        // A single 10-second advance must not blow up the integrator.
        let mut spring = Spring::new(300.0, 20.0);
        spring.advance(10.0);
        assert!(spring.ended());
        assert_eq!(spring.current(), 1.0);
    }

    #[test]
    fn underdamped_overshoots() {
        let mut spring = Spring::new(300.0, 8.0);
        let mut max = 0.0_f64;
        for _ in 0..600 {
            spring.advance(1.0 / 60.0);
            max = max.max(spring.current());
        }
        assert!(max > 1.0, "peak was {max}");
    }

    #[test]
    fn reset_is_idempotent() {
        let mut spring = Spring::stiff();
        spring.advance(5.0);
        assert!(spring.ended());

        spring.reset();
        assert_eq!(spring.current(), 0.0);
        assert_eq!(spring.velocity(), 0.0);
        assert_eq!(spring.elapsed(), 0.0);
        assert!(!spring.ended());

        // Resetting a pristine spring changes nothing.
        spring.reset();
        assert_eq!(spring.current(), 0.0);
    }

    #[test]
    fn ended_spring_keeps_accounting_time() {
        let mut spring = Spring::stiff();
        spring.advance(5.0);
        let elapsed = spring.elapsed();
        spring.advance(1.0);
        assert_eq!(spring.current(), 1.0);
        assert!(spring.elapsed() > elapsed);
    }
}
