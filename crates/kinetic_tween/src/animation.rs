//! The playable sum type: a tween or a timeline.

use crate::playback::{PlayState, Playback};
use crate::target::TargetId;
use crate::timeline::Timeline;
use crate::tween::{ChainCache, TickCtx, TickStatus, Tween};

/// Anything the engine can own and tick. Timelines nest: a timeline's
/// children are `Animation`s themselves.
#[derive(Debug)]
pub enum Animation {
    Tween(Tween),
    Timeline(Timeline),
}

impl From<Tween> for Animation {
    fn from(tween: Tween) -> Self {
        Animation::Tween(tween)
    }
}

impl From<Timeline> for Animation {
    fn from(timeline: Timeline) -> Self {
        Animation::Timeline(timeline)
    }
}

impl Animation {
    pub fn playback(&self) -> &Playback {
        match self {
            Animation::Tween(t) => t.playback(),
            Animation::Timeline(t) => t.playback(),
        }
    }

    pub fn playback_mut(&mut self) -> &mut Playback {
        match self {
            Animation::Tween(t) => t.playback_mut(),
            Animation::Timeline(t) => t.playback_mut(),
        }
    }

    pub fn state(&self) -> PlayState {
        self.playback().state()
    }

    /// The target this animation writes to, if it is a plain tween.
    /// Timelines span targets and report `None`.
    pub fn target_id(&self) -> Option<TargetId> {
        match self {
            Animation::Tween(t) => Some(t.target_id()),
            Animation::Timeline(_) => None,
        }
    }

    /// Whether this animation (or any nested child) writes to `id`.
    pub fn touches(&self, id: TargetId) -> bool {
        match self {
            Animation::Tween(t) => t.target_id() == id,
            Animation::Timeline(t) => t.children().any(|c| c.touches(id)),
        }
    }

    /// Every target written to by this animation tree, in declaration
    /// order, duplicates included.
    pub fn collect_target_ids(&self, out: &mut Vec<TargetId>) {
        match self {
            Animation::Tween(t) => out.push(t.target_id()),
            Animation::Timeline(t) => {
                for child in t.children() {
                    child.collect_target_ids(out);
                }
            }
        }
    }

    /// Drop every chain-cache entry still held by a tween in this tree.
    pub(crate) fn evict_chain(&self, chain: &mut ChainCache) {
        match self {
            Animation::Tween(t) => t.evict_chain(chain),
            Animation::Timeline(t) => {
                for child in t.children() {
                    child.evict_chain(chain);
                }
            }
        }
    }

    pub fn as_tween(&self) -> Option<&Tween> {
        match self {
            Animation::Tween(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_tween_mut(&mut self) -> Option<&mut Tween> {
        match self {
            Animation::Tween(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_timeline(&self) -> Option<&Timeline> {
        match self {
            Animation::Timeline(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_timeline_mut(&mut self) -> Option<&mut Timeline> {
        match self {
            Animation::Timeline(t) => Some(t),
            _ => None,
        }
    }

    pub fn advance(&mut self, dt: f64, ctx: &mut TickCtx<'_>) -> TickStatus {
        match self {
            Animation::Tween(t) => t.advance(dt, ctx),
            Animation::Timeline(t) => t.advance(dt, ctx),
        }
    }

    pub fn drive_to(&mut self, time: f64, ctx: &mut TickCtx<'_>) -> TickStatus {
        match self {
            Animation::Tween(t) => t.drive_to(time, ctx),
            Animation::Timeline(t) => t.drive_to(time, ctx),
        }
    }

    pub fn set_progress(&mut self, progress: f64, ctx: &mut TickCtx<'_>) -> TickStatus {
        match self {
            Animation::Tween(t) => t.set_progress(progress, ctx),
            Animation::Timeline(t) => t.set_progress(progress, ctx),
        }
    }

    pub fn set_total_progress(&mut self, progress: f64, ctx: &mut TickCtx<'_>) -> TickStatus {
        match self {
            Animation::Tween(t) => t.set_total_progress(progress, ctx),
            Animation::Timeline(t) => t.set_total_progress(progress, ctx),
        }
    }
}
