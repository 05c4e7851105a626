//! The engine
//!
//! Owns every running animation, maps frame ticks to animation steps,
//! and keeps a per-target registry so callers can query or kill the
//! animations touching a given object. One engine per UI thread; the
//! host calls [`Engine::tick`] (or [`Engine::tick_at`]) once per frame.

use std::time::Instant;

use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::animation::Animation;
use crate::target::{BatchScope, TargetId};
use crate::tween::{ChainCache, TickCtx, TickStatus};

slotmap::new_key_type! {
    /// Stable handle for an animation owned by the engine.
    pub struct AnimationId;
}

/// The per-frame animation driver.
pub struct Engine {
    animations: SlotMap<AnimationId, Animation>,
    // Ids in the order they were registered. Slotmap iteration order
    // follows slot indices, which diverge from registration order once
    // freed slots are reused; the additive tie-break needs the latter.
    order: Vec<AnimationId>,
    by_target: FxHashMap<TargetId, Vec<AnimationId>>,
    chain: ChainCache,
    batch: Option<Box<dyn BatchScope>>,
    last_tick: Option<Instant>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("animations", &self.animations.len())
            .field("targets", &self.by_target.len())
            .finish()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            animations: SlotMap::with_key(),
            order: Vec::new(),
            by_target: FxHashMap::default(),
            chain: ChainCache::default(),
            batch: None,
            last_tick: None,
        }
    }

    /// Install a scope that brackets every tick's property writes, for
    /// hosts that coalesce invalidation (a display-list batch, say).
    pub fn set_batch_scope(&mut self, scope: Box<dyn BatchScope>) {
        self.batch = Some(scope);
    }

    /// Take ownership of an animation and start it. Control afterwards
    /// goes through [`Engine::animation_mut`] and the returned id.
    pub fn play(&mut self, animation: impl Into<Animation>) -> AnimationId {
        let mut animation = animation.into();
        animation.playback_mut().play();

        let mut targets = Vec::new();
        animation.collect_target_ids(&mut targets);

        let id = self.animations.insert(animation);
        self.order.push(id);
        for target in targets {
            let ids = self.by_target.entry(target).or_default();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        tracing::trace!(?id, "animation registered");
        id
    }

    /// Advance every animation by `dt` seconds. Finished animations and
    /// animations whose target was dropped are evicted.
    pub fn tick(&mut self, dt: f64) {
        if self.animations.is_empty() {
            return;
        }
        if let Some(batch) = &mut self.batch {
            batch.enter();
        }

        // Registration order, so same-tick additive tweens chain in the
        // order they were played.
        let ids = self.order.clone();
        let mut evict = Vec::new();
        for id in ids {
            let Some(animation) = self.animations.get_mut(id) else {
                continue;
            };
            let mut ctx = TickCtx::new(&mut self.chain);
            match animation.advance(dt, &mut ctx) {
                TickStatus::Active => {}
                TickStatus::Finished => evict.push((id, "finished")),
                TickStatus::Dead => evict.push((id, "target dropped")),
            }
        }
        for (id, why) in evict {
            tracing::debug!(?id, why, "animation evicted");
            self.remove(id);
        }

        if let Some(batch) = &mut self.batch {
            batch.exit();
        }
    }

    /// Tick against a wall clock: computes `dt` from the previous call.
    /// The first call establishes the baseline and advances by zero.
    pub fn tick_at(&mut self, now: Instant) {
        let dt = match self.last_tick {
            Some(prev) => now.saturating_duration_since(prev).as_secs_f64(),
            None => 0.0,
        };
        self.last_tick = Some(now);
        self.tick(dt);
    }

    pub fn animation(&self, id: AnimationId) -> Option<&Animation> {
        self.animations.get(id)
    }

    pub fn animation_mut(&mut self, id: AnimationId) -> Option<&mut Animation> {
        self.animations.get_mut(id)
    }

    /// Drive one animation to an absolute local time outside the normal
    /// tick, e.g. for scrubbing.
    pub fn seek(&mut self, id: AnimationId, time: f64) {
        if let Some(animation) = self.animations.get_mut(id) {
            let mut ctx = TickCtx::new(&mut self.chain);
            animation.drive_to(time, &mut ctx);
        }
    }

    /// Remove an animation without firing its completion callbacks.
    pub fn kill(&mut self, id: AnimationId) -> Option<Animation> {
        self.remove(id)
    }

    /// Ids of the animations currently touching `target`, in the order
    /// they were registered.
    pub fn animations_of(&self, target: TargetId) -> &[AnimationId] {
        self.by_target.get(&target).map_or(&[], Vec::as_slice)
    }

    /// Kill every animation touching `target`. Returns how many were
    /// removed.
    pub fn kill_animations_of(&mut self, target: TargetId) -> usize {
        let ids = self.by_target.remove(&target).unwrap_or_default();
        let count = ids.len();
        for id in ids {
            self.remove(id);
        }
        count
    }

    pub fn kill_all(&mut self) {
        self.animations.clear();
        self.order.clear();
        self.by_target.clear();
        self.chain.clear();
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    fn remove(&mut self, id: AnimationId) -> Option<Animation> {
        let animation = self.animations.remove(id)?;
        self.order.retain(|other| *other != id);
        // The next additive tween on these properties must resolve
        // against the live value, not a removed tween's endpoint.
        animation.evict_chain(&mut self.chain);
        let mut targets = Vec::new();
        animation.collect_target_ids(&mut targets);
        for target in targets {
            if let Some(ids) = self.by_target.get_mut(&target) {
                ids.retain(|other| *other != id);
                if ids.is_empty() {
                    self.by_target.remove(&target);
                }
            }
        }
        Some(animation)
    }
}
