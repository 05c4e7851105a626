//! Tweens
//!
//! A tween is the leaf animation: one weakly-held target plus one
//! property binding per semantic key. Declarations accumulate through
//! the builder; bindings materialize on the first drive, which is also
//! when from/to endpoints resolve against the target's live state.

use indexmap::IndexMap;
use kinetic_core::{Easing, Spring, Value};
use rustc_hash::FxHashMap;
use std::rc::Rc;

use crate::binding::{Mode, PropertyBinding};
use crate::playback::{Events, PlayState, Playback, Step};
use crate::property::{Prop, PropSet};
use crate::target::{Key, TargetId, TargetRef, TweenTarget};

/// The additive-chaining cache: last prepared `to` per target+key.
pub type ChainCache = FxHashMap<(TargetId, Key), Value>;

/// Per-tick context threaded through `advance`/`drive_to`.
pub struct TickCtx<'a> {
    pub chain: &'a mut ChainCache,
}

impl<'a> TickCtx<'a> {
    pub fn new(chain: &'a mut ChainCache) -> Self {
        Self { chain }
    }
}

/// Outcome of driving an animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickStatus {
    /// Still animating (or paused).
    Active,
    /// Ran to completion this step.
    Finished,
    /// The target has been dropped; treat as finished.
    Dead,
}

/// A leaf animation driving property bindings on a single target.
pub struct Tween {
    target: TargetRef,
    target_id: TargetId,
    playback: Playback,
    events: Events,
    to_set: PropSet,
    from_set: PropSet,
    bindings: IndexMap<Key, PropertyBinding>,
    easing: Easing,
    spring: Option<(f64, f64)>,
    additive: bool,
    built: bool,
    /// Playback finished but springs are still settling.
    complete_pending: bool,
}

impl std::fmt::Debug for Tween {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tween")
            .field("target", &self.target_id)
            .field("playback", &self.playback)
            .field("bindings", &self.bindings.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Tween {
    /// Create a tween for `target`. The tween holds only a weak
    /// reference; dropping the target finishes the tween quietly.
    pub fn new<T: TweenTarget + 'static>(target: &Rc<T>) -> Self {
        let as_dyn: Rc<dyn TweenTarget> = target.clone();
        Self::from_ref(Rc::downgrade(&as_dyn))
    }

    pub fn from_ref(target: TargetRef) -> Self {
        let target_id = TargetId::of(&target);
        Self {
            target,
            target_id,
            playback: Playback::new(),
            events: Events::default(),
            to_set: PropSet::new(),
            from_set: PropSet::new(),
            bindings: IndexMap::new(),
            easing: Easing::Linear,
            spring: None,
            additive: false,
            built: false,
            complete_pending: false,
        }
    }

    // =========================================================================
    // Builder surface
    // =========================================================================

    /// Animate toward the declared values from wherever the target is
    /// when the tween starts.
    pub fn to(mut self, props: impl IntoIterator<Item = Prop>) -> Self {
        for prop in props {
            self.to_set.declare(prop);
        }
        self
    }

    /// Animate from the declared values toward the target's live state.
    pub fn from(mut self, props: impl IntoIterator<Item = Prop>) -> Self {
        for prop in props {
            self.from_set.declare(prop);
        }
        self
    }

    /// Declare both endpoints.
    pub fn from_to(
        mut self,
        from: impl IntoIterator<Item = Prop>,
        to: impl IntoIterator<Item = Prop>,
    ) -> Self {
        for prop in from {
            self.from_set.declare(prop);
        }
        for prop in to {
            self.to_set.declare(prop);
        }
        self
    }

    pub fn duration(mut self, seconds: f64) -> Self {
        self.playback.set_duration(seconds);
        self
    }

    pub fn delay(mut self, seconds: f64) -> Self {
        self.playback.set_delay(seconds);
        self
    }

    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Drive every binding with a spring instead of the easing curve.
    /// Spring completion replaces duration-based completion.
    pub fn spring(mut self, tension: f64, friction: f64) -> Self {
        self.spring = Some((tension, friction));
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

    /// Chain this tween's start value off the previous tween targeting
    /// the same property, rather than the target's instantaneous state.
    pub fn additive(mut self, additive: bool) -> Self {
        self.additive = additive;
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
    // Accessors
    // =========================================================================

    pub fn target_id(&self) -> TargetId {
        self.target_id
    }

    pub fn target_alive(&self) -> bool {
        self.target.strong_count() > 0
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut Playback {
        &mut self.playback
    }

    pub fn state(&self) -> PlayState {
        self.playback.state()
    }

    pub fn binding(&self, key: &Key) -> Option<&PropertyBinding> {
        self.bindings.get(key)
    }

    pub fn binding_keys(&self) -> impl Iterator<Item = &Key> {
        self.bindings.keys()
    }

    // =========================================================================
    // Driving
    // =========================================================================

    /// Materialize bindings from the accumulated declarations. Idempotent.
    fn build_bindings(&mut self) {
        if self.built {
            return;
        }
        self.built = true;

        let to_set = std::mem::take(&mut self.to_set);
        let from_set = std::mem::take(&mut self.from_set);

        // To-side declarations first, then from-only keys, preserving
        // declaration order within each side.
        for (key, decl) in to_set.resolved() {
            let mode = if from_set.get(key).is_some() {
                Mode::FromTo
            } else {
                Mode::To
            };
            let decl_from = from_set.get(key).cloned();
            let binding =
                PropertyBinding::new(key.clone(), mode, decl_from, Some(decl.clone()));
            self.bindings.insert(key.clone(), binding);
        }
        for (key, decl) in from_set.resolved() {
            if self.bindings.contains_key(key) {
                continue;
            }
            let binding =
                PropertyBinding::new(key.clone(), Mode::From, Some(decl.clone()), None);
            self.bindings.insert(key.clone(), binding);
        }

        for binding in self.bindings.values_mut() {
            binding.easing = self.easing;
            binding.additive = self.additive;
            if let Some((tension, friction)) = self.spring {
                binding.spring = Some(Spring::new(tension, friction));
            }
        }
    }

    /// Resolve endpoints against the live target and the chain cache.
    fn prepare(&mut self, target: &dyn TweenTarget, ctx: &mut TickCtx<'_>) {
        let delay = self.playback.delay();
        let duration = self.playback.duration();

        for (key, binding) in self.bindings.iter_mut() {
            if binding.is_prepared() {
                continue;
            }
            binding.delay = delay;
            binding.duration = duration;

            let cache_key = (self.target_id, key.clone());
            let chained = ctx.chain.get(&cache_key).copied();
            binding.prepare(target, chained);

            if let Some(value) = binding.chain_value() {
                ctx.chain.insert(cache_key, value);
            }
        }
        tracing::trace!(target_id = ?self.target_id, bindings = self.bindings.len(), "tween prepared");
    }

    /// Drop this tween's entries from the additive-chain cache, so the
    /// next additive tween resolves against the target's live value. An
    /// entry is removed only while it still holds this tween's `to`; a
    /// later tween's value stays.
    pub(crate) fn evict_chain(&self, chain: &mut ChainCache) {
        for (key, binding) in self.bindings.iter() {
            let Some(value) = binding.chain_value() else {
                continue;
            };
            let cache_key = (self.target_id, key.clone());
            if chain.get(&cache_key) == Some(&value) {
                chain.remove(&cache_key);
            }
        }
    }

    /// Advance by an external frame delta.
    pub fn advance(&mut self, dt: f64, ctx: &mut TickCtx<'_>) -> TickStatus {
        match self.playback.advance(dt) {
            Some(step) => self.apply_step(step, ctx),
            None => {
                if self.complete_pending {
                    return self.advance_springs(dt);
                }
                match self.playback.state() {
                    PlayState::Completed | PlayState::Cancelled => TickStatus::Finished,
                    _ => TickStatus::Active,
                }
            }
        }
    }

    /// Keep spring bindings moving after the nominal duration ran out;
    /// a spring-driven property finishes only when the spring settles.
    fn advance_springs(&mut self, dt: f64) -> TickStatus {
        let Some(target) = self.target.upgrade() else {
            return TickStatus::Dead;
        };

        let dt = dt * self.playback.time_scale();
        for binding in self.bindings.values_mut() {
            if binding.is_spring() && !binding.is_finished() {
                binding.proceed(dt, target.as_ref());
            }
        }
        self.events.fire_update();

        let settled = self
            .bindings
            .values()
            .filter(|b| b.is_spring())
            .all(|b| b.is_finished());
        if settled {
            self.complete_pending = false;
            self.events.fire_complete();
            tracing::debug!(target_id = ?self.target_id, "tween completed (springs settled)");
            TickStatus::Finished
        } else {
            TickStatus::Active
        }
    }

    /// Drive to an absolute time along the repeat sequence. Used by the
    /// public `seek` and by timelines driving their children.
    pub fn drive_to(&mut self, time: f64, ctx: &mut TickCtx<'_>) -> TickStatus {
        let step = self.playback.seek_abs(time);
        self.apply_step(step, ctx)
    }

    /// Seek by within-cycle progress.
    pub fn set_progress(&mut self, progress: f64, ctx: &mut TickCtx<'_>) -> TickStatus {
        let step = self.playback.seek_progress(progress);
        self.apply_step(step, ctx)
    }

    /// Seek by progress over the full repeat sequence.
    pub fn set_total_progress(&mut self, progress: f64, ctx: &mut TickCtx<'_>) -> TickStatus {
        let step = self.playback.seek_total_progress(progress);
        self.apply_step(step, ctx)
    }

    fn apply_step(&mut self, step: Step, ctx: &mut TickCtx<'_>) -> TickStatus {
        let Some(target) = self.target.upgrade() else {
            tracing::debug!(target_id = ?self.target_id, "tween target dropped");
            return TickStatus::Dead;
        };

        self.build_bindings();

        if step.just_started {
            self.prepare(target.as_ref(), ctx);
            self.events.fire_start();
        }

        for binding in self.bindings.values_mut() {
            if step.repeats_crossed > 0 {
                if let Some(spring) = &mut binding.spring {
                    spring.reset();
                }
            }
            binding.proceed_to(step.binding_time, target.as_ref());
        }

        self.events.fire_update();

        for _ in 0..step.repeats_crossed {
            self.events.fire_repeat();
        }

        // Springs override duration-based completion: the tween is done
        // only when every spring has settled.
        let springs_settled = self
            .bindings
            .values()
            .filter(|b| b.is_spring())
            .all(|b| b.is_finished());

        if step.just_completed {
            if springs_settled {
                self.events.fire_complete();
                tracing::debug!(target_id = ?self.target_id, "tween completed");
                TickStatus::Finished
            } else {
                // Keep the clock alive until the springs settle.
                self.complete_pending = true;
                TickStatus::Active
            }
        } else {
            TickStatus::Active
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinetic_core::Rect;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug)]
    struct Node {
        frame: RefCell<Rect>,
        alpha: RefCell<f64>,
    }

    impl Node {
        fn new() -> Rc<Self> {
            Rc::new(Self {
                frame: RefCell::new(Rect::new(0.0, 0.0, 100.0, 100.0)),
                alpha: RefCell::new(1.0),
            })
        }

        fn x(&self) -> f64 {
            self.frame.borrow().origin.x
        }
    }

    impl TweenTarget for Node {
        fn value_for(&self, key: &Key) -> Option<Value> {
            let frame = *self.frame.borrow();
            match key {
                Key::X => Some(Value::Scalar(frame.origin.x)),
                Key::Y => Some(Value::Scalar(frame.origin.y)),
                Key::Position => Some(Value::Point(frame.origin)),
                Key::Frame => Some(Value::Rect(frame)),
                Key::Alpha => Some(Value::Scalar(*self.alpha.borrow())),
                _ => None,
            }
        }

        fn apply(&self, key: &Key, value: Value) {
            let mut frame = self.frame.borrow_mut();
            match (key, value) {
                (Key::X, Value::Scalar(v)) => frame.origin.x = v,
                (Key::Y, Value::Scalar(v)) => frame.origin.y = v,
                (Key::Position, Value::Point(p)) => frame.origin = p,
                (Key::Frame, Value::Rect(r)) => *frame = r,
                (Key::Alpha, Value::Scalar(v)) => *self.alpha.borrow_mut() = v,
                _ => {}
            }
        }
    }

    fn drive(tween: &mut Tween, dt: f64) -> TickStatus {
        let mut chain = ChainCache::default();
        tween.playback_mut().play();
        tween.advance(dt, &mut TickCtx::new(&mut chain))
    }

    #[test]
    fn linear_to_tween_interpolates() {
        let node = Node::new();
        let mut tween = Tween::new(&node).to([Prop::x(100.0)]).duration(2.0);
        tween.playback_mut().play();

        let mut chain = ChainCache::default();
        let mut ctx = TickCtx::new(&mut chain);
        tween.advance(1.0, &mut ctx);
        assert!((node.x() - 50.0).abs() < 1e-9);

        let status = tween.advance(1.0, &mut ctx);
        assert_eq!(status, TickStatus::Finished);
        assert!((node.x() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn set_progress_drives_value_and_elapsed() {
        let node = Node::new();
        let mut tween = Tween::new(&node).to([Prop::x(100.0)]).duration(2.0);
        tween.playback_mut().play();

        let mut chain = ChainCache::default();
        tween.set_progress(0.5, &mut TickCtx::new(&mut chain));
        assert_eq!(tween.playback().elapsed(), 1.0);
        assert!((node.x() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn completion_callback_fires_once() {
        let node = Node::new();
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        let mut tween = Tween::new(&node)
            .to([Prop::x(100.0)])
            .duration(1.0)
            .on_complete(move || *c.borrow_mut() += 1);
        tween.playback_mut().play();

        let mut chain = ChainCache::default();
        let mut ctx = TickCtx::new(&mut chain);
        tween.set_progress(1.0, &mut ctx);
        tween.set_progress(1.0, &mut ctx);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn from_mode_starts_at_declared_value() {
        let node = Node::new();
        let mut tween = Tween::new(&node).from([Prop::alpha(0.0)]).duration(1.0);
        tween.playback_mut().play();

        let mut chain = ChainCache::default();
        let mut ctx = TickCtx::new(&mut chain);
        // First advance of 0 applies the from value.
        tween.advance(0.0, &mut ctx);
        assert_eq!(*node.alpha.borrow(), 0.0);

        tween.advance(1.0, &mut ctx);
        assert_eq!(*node.alpha.borrow(), 1.0);
    }

    #[test]
    fn dropped_target_reports_dead() {
        let node = Node::new();
        let mut tween = Tween::new(&node).to([Prop::x(10.0)]).duration(1.0);
        drop(node);
        assert_eq!(drive(&mut tween, 0.1), TickStatus::Dead);
    }

    #[test]
    fn repeat_fires_on_repeat_per_cycle() {
        let node = Node::new();
        let repeats = Rc::new(RefCell::new(0));
        let r = repeats.clone();
        let mut tween = Tween::new(&node)
            .to([Prop::x(10.0)])
            .duration(1.0)
            .repeat(2)
            .on_repeat(move || *r.borrow_mut() += 1);
        tween.playback_mut().play();

        let mut chain = ChainCache::default();
        let mut ctx = TickCtx::new(&mut chain);
        for _ in 0..30 {
            tween.advance(0.1, &mut ctx);
        }
        assert_eq!(*repeats.borrow(), 2);
    }

    #[test]
    fn yoyo_returns_to_start() {
        let node = Node::new();
        let mut tween = Tween::new(&node)
            .to([Prop::x(100.0)])
            .duration(1.0)
            .repeat(1)
            .yoyo(true);
        tween.playback_mut().play();

        let mut chain = ChainCache::default();
        let mut ctx = TickCtx::new(&mut chain);
        let mut status = TickStatus::Active;
        for _ in 0..41 {
            status = tween.advance(0.05, &mut ctx);
            if status == TickStatus::Finished {
                break;
            }
        }
        assert_eq!(status, TickStatus::Finished);
        // Odd final cycle: the yoyo ends back at the start value.
        assert!(node.x().abs() < 1e-9, "x was {}", node.x());
    }

    #[test]
    fn reverse_runs_back_and_completes_once() {
        let node = Node::new();
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        let mut tween = Tween::new(&node)
            .to([Prop::x(100.0)])
            .duration(1.0)
            .on_complete(move || *c.borrow_mut() += 1);
        tween.playback_mut().play();

        let mut chain = ChainCache::default();
        let mut ctx = TickCtx::new(&mut chain);
        tween.advance(0.6, &mut ctx);
        tween.playback_mut().reverse();
        let status = tween.advance(0.7, &mut ctx);

        assert_eq!(status, TickStatus::Finished);
        assert_eq!(*count.borrow(), 1);
        assert_eq!(node.x(), 0.0);
    }

    #[test]
    fn merged_position_applies_both_axes() {
        let node = Node::new();
        let mut tween = Tween::new(&node)
            .to([Prop::x(10.0), Prop::y(20.0)])
            .duration(1.0);
        tween.playback_mut().play();

        let mut chain = ChainCache::default();
        tween.set_progress(1.0, &mut TickCtx::new(&mut chain));
        let frame = *node.frame.borrow();
        assert_eq!(frame.origin.x, 10.0);
        assert_eq!(frame.origin.y, 20.0);
        assert_eq!(tween.binding_keys().count(), 1);
    }

    #[test]
    #[should_panic(expected = "does not expose property")]
    fn missing_property_panics_loudly() {
        let node = Node::new();
        let mut tween = Tween::new(&node)
            .to([Prop::field("unknown", 1.0)])
            .duration(1.0);
        drive(&mut tween, 0.1);
    }
}
