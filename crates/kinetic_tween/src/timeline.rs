//! Timelines
//!
//! A timeline sequences child animations (tweens or nested timelines)
//! at time offsets, with named labels and scheduled callbacks. The
//! timeline's playhead drives every child each step: children outside
//! their range are driven to their boundary state rather than skipped,
//! so a scrub always leaves the whole tree deterministic.

use rustc_hash::FxHashMap;
use std::rc::Rc;
use std::sync::OnceLock;

use regex::Regex;

use crate::animation::Animation;
use crate::error::TweenError;
use crate::playback::{Callback, Events, PlayState, Playback, Step};
use crate::property::Prop;
use crate::target::TweenTarget;
use crate::tween::{TickCtx, TickStatus, Tween};

/// Placement policy for `add`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    /// Place at the insertion cursor; the child's own delay runs after
    /// the offset.
    #[default]
    Normal,
    /// Place so the child *starts* exactly at the offset, ignoring its
    /// own delay.
    Start,
    /// Like `Normal`, and advance the cursor by each child's total
    /// duration so additions run back to back.
    Sequence,
}

struct Range {
    child: Animation,
    start: f64,
}

struct Scheduled {
    time: f64,
    callback: Callback,
    fired: bool,
}

/// A composite animation sequencing children at time offsets.
///
/// Duration is derived from the children (and scheduled callbacks),
/// never set directly.
pub struct Timeline {
    playback: Playback,
    events: Events,
    ranges: Vec<Range>,
    labels: FxHashMap<String, f64>,
    scheduled: Vec<Scheduled>,
    cursor: f64,
    align: Align,
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("playback", &self.playback)
            .field("children", &self.ranges.len())
            .field("labels", &self.labels)
            .finish()
    }
}

/// Grammar of label-relative positions: `label`, `label+=off`,
/// `label-=off`.
fn position_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_\-]*)\s*(?:([+-])=\s*([0-9]*\.?[0-9]+))?\s*$")
            .expect("position grammar")
    })
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            playback: Playback::new(),
            events: Events::default(),
            ranges: Vec::new(),
            labels: FxHashMap::default(),
            scheduled: Vec::new(),
            cursor: 0.0,
            align: Align::default(),
        }
    }

    pub fn with_align(align: Align) -> Self {
        let mut timeline = Self::new();
        timeline.align = align;
        timeline
    }

    /// Bulk-animate several targets with one tween each, offsetting the
    /// start of each successive tween by `interval` seconds. `props[i]`
    /// holds the destination properties for `targets[i]`; `build` shapes
    /// each tween (duration, easing, repeats) before it is placed.
    ///
    /// Panics when `targets` and `props` disagree in length. A silent
    /// truncation would animate some targets and not others, which is
    /// always a caller bug.
    pub fn staggered<T: TweenTarget + 'static>(
        targets: &[Rc<T>],
        props: &[Vec<Prop>],
        interval: f64,
        build: impl Fn(Tween) -> Tween,
    ) -> Self {
        assert_eq!(
            targets.len(),
            props.len(),
            "staggered animation: {} targets but {} property sets",
            targets.len(),
            props.len()
        );

        let mut timeline = Self::new();
        for (index, (target, set)) in targets.iter().zip(props).enumerate() {
            let tween = build(Tween::new(target).to(set.iter().cloned()));
            timeline.add_at(tween, interval * index as f64);
        }
        timeline
    }

    // =========================================================================
    // Builder surface
    // =========================================================================

    pub fn delay(mut self, seconds: f64) -> Self {
        self.playback.set_delay(seconds);
        self
    }

    pub fn repeat(mut self, count: u32) -> Self {
        self.playback.set_repeat(count);
        self
    }

    pub fn forever(mut self) -> Self {
        self.playback.set_forever();
        self
    }

    pub fn repeat_delay(mut self, seconds: f64) -> Self {
        self.playback.set_repeat_delay(seconds);
        self
    }

    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.playback.set_yoyo(yoyo);
        self
    }

    pub fn on_start(mut self, cb: impl FnMut() + 'static) -> Self {
        self.events.on_start.push(Box::new(cb));
        self
    }

    pub fn on_update(mut self, cb: impl FnMut() + 'static) -> Self {
        self.events.on_update.push(Box::new(cb));
        self
    }

    pub fn on_complete(mut self, cb: impl FnMut() + 'static) -> Self {
        self.events.on_complete.push(Box::new(cb));
        self
    }

    pub fn on_repeat(mut self, cb: impl FnMut() + 'static) -> Self {
        self.events.on_repeat.push(Box::new(cb));
        self
    }

    // =========================================================================
    // Composition
    // =========================================================================

    /// Add a child at the insertion cursor. Takes ownership: a child
    /// belongs to at most one timeline.
    pub fn add(&mut self, child: impl Into<Animation>) {
        let position = self.cursor;
        self.add_at(child, position);
    }

    /// Add a child at an explicit offset from the timeline start.
    pub fn add_at(&mut self, child: impl Into<Animation>, position: f64) {
        let child = child.into();
        let start = match self.align {
            Align::Start => position - child.playback().delay(),
            Align::Normal | Align::Sequence => position,
        };
        let total = child.playback().total_duration();
        self.ranges.push(Range { child, start });

        if self.align == Align::Sequence {
            self.cursor = position + total;
        }
        self.recompute_duration();
    }

    /// Add a child at a label-relative position (`"intro"`,
    /// `"intro+=0.5"`, `"intro-=0.25"`).
    pub fn add_relative(
        &mut self,
        child: impl Into<Animation>,
        position: &str,
    ) -> Result<(), TweenError> {
        let at = self.resolve_position(position)?;
        self.add_at(child, at);
        Ok(())
    }

    /// Record a named time offset usable as a relative-position anchor.
    pub fn add_label(&mut self, name: &str, time: f64) {
        self.labels.insert(name.to_owned(), time);
    }

    /// Record a label at the current insertion cursor.
    pub fn add_label_here(&mut self, name: &str) {
        self.labels.insert(name.to_owned(), self.cursor);
    }

    pub fn label_time(&self, name: &str) -> Option<f64> {
        self.labels.get(name).copied()
    }

    /// Schedule a callback to fire when the playhead passes `time`.
    /// Fires at most once per forward pass; re-armed on repeat.
    pub fn add_callback(&mut self, time: f64, cb: impl FnMut() + 'static) {
        self.scheduled.push(Scheduled {
            time,
            callback: Box::new(cb),
            fired: false,
        });
        self.recompute_duration();
    }

    /// Shift every child, label, and scheduled callback by `amount`.
    pub fn shift(&mut self, amount: f64) {
        for range in &mut self.ranges {
            range.start += amount;
        }
        for time in self.labels.values_mut() {
            *time += amount;
        }
        for scheduled in &mut self.scheduled {
            scheduled.time += amount;
        }
        self.cursor += amount;
        self.recompute_duration();
    }

    /// Resolve a position string against the label map.
    pub fn resolve_position(&self, position: &str) -> Result<f64, TweenError> {
        let caps = position_regex()
            .captures(position)
            .ok_or_else(|| TweenError::BadPosition(position.to_owned()))?;

        let name = &caps[1];
        let base = self
            .label_time(name)
            .ok_or_else(|| TweenError::UnknownLabel(name.to_owned()))?;

        let offset = match (caps.get(2), caps.get(3)) {
            (Some(sign), Some(num)) => {
                let value: f64 = num.as_str().parse().expect("matched by grammar");
                if sign.as_str() == "-" {
                    -value
                } else {
                    value
                }
            }
            _ => 0.0,
        };
        Ok(base + offset)
    }

    fn recompute_duration(&mut self) {
        let mut duration: f64 = 0.0;
        for range in &self.ranges {
            duration = duration.max(range.start + range.child.playback().total_duration());
        }
        for scheduled in &self.scheduled {
            duration = duration.max(scheduled.time);
        }
        self.playback.set_duration(duration);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut Playback {
        &mut self.playback
    }

    pub fn state(&self) -> PlayState {
        self.playback.state()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn children(&self) -> impl Iterator<Item = &Animation> {
        self.ranges.iter().map(|r| &r.child)
    }

    // =========================================================================
    // Driving
    // =========================================================================

    pub fn advance(&mut self, dt: f64, ctx: &mut TickCtx<'_>) -> TickStatus {
        match self.playback.advance(dt) {
            Some(step) => self.apply_step(step, ctx),
            None => match self.playback.state() {
                PlayState::Completed | PlayState::Cancelled => TickStatus::Finished,
                _ => TickStatus::Active,
            },
        }
    }

    pub fn drive_to(&mut self, time: f64, ctx: &mut TickCtx<'_>) -> TickStatus {
        let step = self.playback.seek_abs(time);
        self.apply_step(step, ctx)
    }

    pub fn set_progress(&mut self, progress: f64, ctx: &mut TickCtx<'_>) -> TickStatus {
        let step = self.playback.seek_progress(progress);
        self.apply_step(step, ctx)
    }

    pub fn set_total_progress(&mut self, progress: f64, ctx: &mut TickCtx<'_>) -> TickStatus {
        let step = self.playback.seek_total_progress(progress);
        self.apply_step(step, ctx)
    }

    /// Seek the playhead to a label.
    pub fn seek_to_label(
        &mut self,
        name: &str,
        ctx: &mut TickCtx<'_>,
    ) -> Result<TickStatus, TweenError> {
        let time = self
            .label_time(name)
            .ok_or_else(|| TweenError::UnknownLabel(name.to_owned()))?;
        Ok(self.drive_to(self.playback.delay() + time, ctx))
    }

    fn apply_step(&mut self, step: Step, ctx: &mut TickCtx<'_>) -> TickStatus {
        if step.just_started {
            self.events.fire_start();
        }

        // Content playhead: 0 at the end of the timeline's own delay.
        let duration = self.playback.duration();
        let playhead = (step.binding_time - self.playback.delay()).clamp(0.0, duration);

        // Every child is driven every step; out-of-range children land
        // on their boundary value (0 or their full duration).
        for range in &mut self.ranges {
            let child_total = range.child.playback().total_duration();
            let raw = playhead - range.start;
            let local = if child_total.is_finite() {
                raw.clamp(0.0, child_total)
            } else {
                raw.max(0.0)
            };
            range.child.drive_to(local, ctx);
        }

        // Scheduled callbacks re-arm when the timeline repeats.
        if step.repeats_crossed > 0 {
            for scheduled in &mut self.scheduled {
                scheduled.fired = false;
            }
        }
        for scheduled in &mut self.scheduled {
            if !scheduled.fired && playhead >= scheduled.time {
                scheduled.fired = true;
                (scheduled.callback)();
            }
        }

        self.events.fire_update();
        for _ in 0..step.repeats_crossed {
            self.events.fire_repeat();
        }

        if step.just_completed {
            self.events.fire_complete();
            tracing::debug!(children = self.ranges.len(), "timeline completed");
            TickStatus::Finished
        } else {
            TickStatus::Active
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::NumericFields;

    fn half_second_tween() -> Tween {
        let fields = NumericFields::new();
        fields.set("x", 0.0);
        Tween::new(&fields)
            .to([Prop::field("x", 1.0)])
            .duration(0.5)
    }

    #[test]
    fn sequence_alignment_advances_the_cursor() {
        let mut timeline = Timeline::with_align(Align::Sequence);
        timeline.add(half_second_tween());
        timeline.add(half_second_tween().delay(0.25));
        timeline.add(half_second_tween());

        let starts: Vec<f64> = timeline.ranges.iter().map(|r| r.start).collect();
        assert_eq!(starts, vec![0.0, 0.5, 1.25]);
        assert!((timeline.playback.duration() - 1.75).abs() < 1e-9);
    }

    #[test]
    fn start_alignment_subtracts_the_child_delay() {
        let mut timeline = Timeline::with_align(Align::Start);
        timeline.add_at(half_second_tween().delay(0.25), 1.0);

        assert!((timeline.ranges[0].start - 0.75).abs() < 1e-9);
    }

    #[test]
    fn staggered_places_one_tween_per_target() {
        let targets: Vec<_> = (0..3)
            .map(|_| {
                let fields = NumericFields::new();
                fields.set("x", 0.0);
                fields
            })
            .collect();
        let props: Vec<Vec<Prop>> = (0..3)
            .map(|i| vec![Prop::field("x", 10.0 * (i + 1) as f64)])
            .collect();

        let timeline = Timeline::staggered(&targets, &props, 0.15, |t| t.duration(0.5));

        assert_eq!(timeline.len(), 3);
        let starts: Vec<f64> = timeline.ranges.iter().map(|r| r.start).collect();
        assert_eq!(starts, vec![0.0, 0.15, 0.30]);
        assert!((timeline.playback.duration() - 0.80).abs() < 1e-9);
    }

    #[test]
    #[should_panic(expected = "staggered animation")]
    fn staggered_rejects_mismatched_lengths() {
        let targets = vec![NumericFields::new(), NumericFields::new()];
        let props = vec![vec![Prop::field("x", 1.0)]];
        let _ = Timeline::staggered(&targets, &props, 0.1, |t| t);
    }

    #[test]
    fn position_grammar_parses_offsets() {
        let mut timeline = Timeline::new();
        timeline.add_label("intro", 1.3);

        assert_eq!(timeline.resolve_position("intro").unwrap(), 1.3);
        assert!((timeline.resolve_position("intro+=1.5").unwrap() - 2.8).abs() < 1e-9);
        assert!((timeline.resolve_position("intro-=0.3").unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_label_is_an_error() {
        let timeline = Timeline::new();
        assert!(matches!(
            timeline.resolve_position("missing+=1.0"),
            Err(TweenError::UnknownLabel(_))
        ));
    }

    #[test]
    fn malformed_position_is_an_error() {
        let timeline = Timeline::new();
        assert!(matches!(
            timeline.resolve_position("+=1.0"),
            Err(TweenError::BadPosition(_))
        ));
        assert!(matches!(
            timeline.resolve_position("intro+~0.5"),
            Err(TweenError::BadPosition(_))
        ));
    }
}
