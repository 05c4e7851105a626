//! Playback state machine
//!
//! The bookkeeping shared by tweens and timelines: play/pause/seek/
//! reverse, repeat/yoyo cycling, time scaling, and the event lists.
//! Both embed a [`Playback`] by composition instead of inheriting from
//! a base class; the owning animation turns each [`Step`] into property
//! applications.
//!
//! All positions derive from one absolute elapsed time along the full
//! repeat sequence, so seeking to an arbitrary point reproduces exactly
//! the cycle/yoyo state playback would have reached.

use smallvec::SmallVec;

/// Lifecycle state of an animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayState {
    /// Created, never played.
    #[default]
    Pending,
    /// Actively advancing.
    Running,
    /// Paused; elapsed is frozen.
    Idle,
    /// Stopped/killed before finishing.
    Cancelled,
    /// Ran to the end of its repeat sequence.
    Completed,
}

/// Playback direction set by `reverse()`/`forward()`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Forward,
    Reversed,
}

/// Repeat policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Repeat {
    /// Number of extra cycles after the first (0 = play once).
    #[default]
    Count0,
    Count(u32),
    Forever,
}

impl Repeat {
    fn extra_cycles(&self) -> Option<u32> {
        match self {
            Repeat::Count0 => Some(0),
            Repeat::Count(n) => Some(*n),
            Repeat::Forever => None,
        }
    }
}

/// An animation event callback.
pub type Callback = Box<dyn FnMut()>;

/// Multi-subscriber, ordered, fire-and-forget event lists.
#[derive(Default)]
pub struct Events {
    pub on_start: SmallVec<[Callback; 1]>,
    pub on_update: SmallVec<[Callback; 1]>,
    pub on_complete: SmallVec<[Callback; 1]>,
    pub on_repeat: SmallVec<[Callback; 1]>,
}

impl Events {
    pub fn fire_start(&mut self) {
        for cb in &mut self.on_start {
            cb();
        }
    }

    pub fn fire_update(&mut self) {
        for cb in &mut self.on_update {
            cb();
        }
    }

    pub fn fire_complete(&mut self) {
        for cb in &mut self.on_complete {
            cb();
        }
    }

    pub fn fire_repeat(&mut self) {
        for cb in &mut self.on_repeat {
            cb();
        }
    }
}

impl std::fmt::Debug for Events {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Events")
            .field("on_start", &self.on_start.len())
            .field("on_update", &self.on_update.len())
            .field("on_complete", &self.on_complete.len())
            .field("on_repeat", &self.on_repeat.len())
            .finish()
    }
}

/// Smallest representable time-scale.
const TIME_SCALE_FLOOR: f64 = 0.1;
/// Step size of `faster()`/`slower()`.
const TIME_SCALE_STEP: f64 = 0.2;

/// Result of one playback step, consumed by the owning animation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Step {
    /// Absolute local time (delay-inclusive within the first cycle) to
    /// drive bindings/children to.
    pub binding_time: f64,
    /// True when the current cycle plays backwards (odd yoyo cycle).
    pub reversed_cycle: bool,
    /// Cycle boundaries crossed forward during this step.
    pub repeats_crossed: u32,
    /// First step of this run.
    pub just_started: bool,
    /// The run finished during this step; fired at most once per run.
    pub just_completed: bool,
}

/// Shared playback bookkeeping. See the module docs.
#[derive(Debug)]
pub struct Playback {
    state: PlayState,
    paused: bool,
    direction: Direction,
    /// Absolute time along the full repeat sequence.
    elapsed: f64,
    delay: f64,
    duration: f64,
    repeat: Repeat,
    repeat_delay: f64,
    yoyo: bool,
    /// Repeat cycles completed so far.
    cycle: u32,
    time_scale: f64,
    started_fired: bool,
    completed_fired: bool,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}

impl Playback {
    pub fn new() -> Self {
        Self {
            state: PlayState::Pending,
            paused: false,
            direction: Direction::Forward,
            elapsed: 0.0,
            delay: 0.0,
            duration: 0.0,
            repeat: Repeat::Count0,
            repeat_delay: 0.0,
            yoyo: false,
            cycle: 0,
            time_scale: 1.0,
            started_fired: false,
            completed_fired: false,
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration.max(0.0);
    }

    pub fn set_delay(&mut self, delay: f64) {
        self.delay = delay.max(0.0);
    }

    pub fn set_repeat(&mut self, count: u32) {
        self.repeat = if count == 0 {
            Repeat::Count0
        } else {
            Repeat::Count(count)
        };
    }

    pub fn set_forever(&mut self) {
        self.repeat = Repeat::Forever;
    }

    pub fn set_repeat_delay(&mut self, delay: f64) {
        self.repeat_delay = delay.max(0.0);
    }

    pub fn set_yoyo(&mut self, yoyo: bool) {
        self.yoyo = yoyo;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn repeat_delay(&self) -> f64 {
        self.repeat_delay
    }

    pub fn yoyo(&self) -> bool {
        self.yoyo
    }

    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, PlayState::Running | PlayState::Idle)
    }

    /// Full length of the repeat sequence, including the initial delay
    /// and the gaps between cycles. Infinite for `forever`.
    pub fn total_duration(&self) -> f64 {
        match self.repeat.extra_cycles() {
            Some(extra) => {
                let cycles = f64::from(extra) + 1.0;
                self.delay + self.duration * cycles + self.repeat_delay * f64::from(extra)
            }
            None => f64::INFINITY,
        }
    }

    /// Fraction of the current cycle, delay included.
    pub fn progress(&self) -> f64 {
        let span = self.delay + self.duration;
        if span <= 0.0 {
            return if self.elapsed > 0.0 { 1.0 } else { 0.0 };
        }
        if self.cycle == 0 {
            (self.elapsed / span).clamp(0.0, 1.0)
        } else {
            let pos = self.position_at(self.elapsed);
            ((self.delay + pos.local) / span).clamp(0.0, 1.0)
        }
    }

    /// Fraction of the full repeat sequence; 0 while repeating forever.
    pub fn total_progress(&self) -> f64 {
        let total = self.total_duration();
        if !total.is_finite() {
            return 0.0;
        }
        if total <= 0.0 {
            return if self.elapsed > 0.0 { 1.0 } else { 0.0 };
        }
        (self.elapsed / total).clamp(0.0, 1.0)
    }

    // =========================================================================
    // Time scale
    // =========================================================================

    pub fn set_speed(&mut self, scale: f64) {
        self.time_scale = scale.max(TIME_SCALE_FLOOR);
    }

    pub fn faster(&mut self) {
        self.set_speed(self.time_scale + TIME_SCALE_STEP);
    }

    pub fn slower(&mut self) {
        self.set_speed(self.time_scale - TIME_SCALE_STEP);
    }

    // =========================================================================
    // State transitions
    // =========================================================================

    /// Activate. Idempotent: playing an active animation is a no-op.
    pub fn play(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        if self.state == PlayState::Completed || self.state == PlayState::Cancelled {
            self.rewind();
        }
        self.state = PlayState::Running;
        true
    }

    pub fn pause(&mut self) {
        if self.state == PlayState::Running {
            self.paused = true;
            self.state = PlayState::Idle;
        }
    }

    pub fn resume(&mut self) {
        if self.state == PlayState::Idle {
            self.paused = false;
            self.state = PlayState::Running;
        }
    }

    /// Cancel and reset the accounting.
    pub fn stop(&mut self) {
        self.state = PlayState::Cancelled;
        self.paused = false;
        self.rewind();
    }

    pub fn forward(&mut self) {
        self.direction = Direction::Forward;
    }

    pub fn reverse(&mut self) {
        self.direction = Direction::Reversed;
    }

    fn rewind(&mut self) {
        self.elapsed = 0.0;
        self.cycle = 0;
        self.started_fired = false;
        self.completed_fired = false;
    }

    /// Back to the top of the run without deactivating.
    pub fn restart(&mut self, include_delay: bool) {
        self.rewind();
        self.direction = Direction::Forward;
        self.elapsed = if include_delay { 0.0 } else { self.delay };
        self.state = PlayState::Running;
        self.paused = false;
    }

    // =========================================================================
    // Stepping
    // =========================================================================

    /// Advance by an external frame delta, honoring time scale and
    /// direction. Returns `None` when paused or inactive.
    pub fn advance(&mut self, dt: f64) -> Option<Step> {
        if self.paused || !matches!(self.state, PlayState::Running) {
            return None;
        }
        let signed = match self.direction {
            Direction::Forward => dt * self.time_scale,
            Direction::Reversed => -dt * self.time_scale,
        };
        Some(self.seek_abs(self.elapsed + signed))
    }

    /// Drive to an absolute time along the repeat sequence.
    pub fn seek_abs(&mut self, time: f64) -> Step {
        let total = self.total_duration();
        let clamped = if total.is_finite() {
            time.clamp(0.0, total)
        } else {
            time.max(0.0)
        };

        let old_cycle = self.cycle;
        self.elapsed = clamped;
        let pos = self.position_at(clamped);
        self.cycle = pos.cycle;

        let repeats_crossed = pos.cycle.saturating_sub(old_cycle);

        let just_started = !self.started_fired;
        self.started_fired = true;

        let at_end = total.is_finite() && clamped >= total;
        let at_zero = clamped <= 0.0 && self.direction == Direction::Reversed;
        let just_completed = (at_end || at_zero) && !self.completed_fired;
        if just_completed {
            self.completed_fired = true;
            self.state = PlayState::Completed;
            // A yoyo run ends pointing forward again.
            self.direction = Direction::Forward;
        }

        Step {
            binding_time: self.binding_time(&pos),
            reversed_cycle: pos.reversed,
            repeats_crossed,
            just_started,
            just_completed,
        }
    }

    /// Seek by within-cycle progress (0..=1 over delay + duration).
    pub fn seek_progress(&mut self, progress: f64) -> Step {
        self.seek_abs(progress * (self.delay + self.duration))
    }

    /// Seek by total progress over the full repeat sequence. While
    /// repeating forever this addresses a single cycle.
    pub fn seek_total_progress(&mut self, progress: f64) -> Step {
        let total = self.total_duration();
        let span = if total.is_finite() {
            total
        } else {
            self.delay + self.duration
        };
        self.seek_abs(progress * span)
    }

    /// Map an absolute sequence time onto (cycle, within-cycle time).
    fn position_at(&self, time: f64) -> CyclePos {
        let after_delay = time - self.delay;
        if after_delay <= 0.0 {
            return CyclePos {
                cycle: 0,
                local: 0.0,
                reversed: false,
            };
        }

        let cycle_len = self.duration + self.repeat_delay;
        let (mut cycle, mut local) = if cycle_len > 0.0 {
            let c = (after_delay / cycle_len).floor() as u32;
            (c, after_delay - f64::from(c) * cycle_len)
        } else {
            (0, 0.0)
        };

        if let Some(extra) = self.repeat.extra_cycles() {
            if cycle > extra {
                cycle = extra;
                local = self.duration;
            }
        }

        // Inside the repeat-delay gap the value holds at the cycle end.
        if local > self.duration {
            local = self.duration;
        }

        CyclePos {
            cycle,
            local,
            reversed: self.yoyo && cycle % 2 == 1,
        }
    }

    /// The local time bindings should be driven to for a position:
    /// delay-inclusive during the first cycle, yoyo-mirrored on odd
    /// cycles.
    fn binding_time(&self, pos: &CyclePos) -> f64 {
        let local = if pos.reversed {
            self.duration - pos.local
        } else {
            pos.local
        };
        if pos.cycle == 0 {
            self.elapsed.min(self.delay + local.max(0.0)).max(0.0)
        } else {
            self.delay + local
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct CyclePos {
    cycle: u32,
    local: f64,
    reversed: bool,
}
