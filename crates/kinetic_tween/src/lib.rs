//! Property tweening for retained UI trees
//!
//! Animates visual properties of host objects over time: duration and
//! easing based tweens, physically simulated springs, and timelines
//! that sequence either. The crate is single threaded by design; an
//! [`Engine`] lives on the UI thread and is ticked once per frame.
//!
//! ```no_run
//! use kinetic_tween::{Engine, NumericFields, Prop, Tween};
//! use kinetic_core::Easing;
//!
//! let node = NumericFields::new();
//! node.set("opacity", 0.0);
//!
//! let mut engine = Engine::new();
//! engine.play(
//!     Tween::new(&node)
//!         .to([Prop::field("opacity", 1.0)])
//!         .duration(0.3)
//!         .ease(Easing::QuadOut),
//! );
//!
//! // per frame:
//! engine.tick(1.0 / 60.0);
//! ```
//!
//! Targets implement [`TweenTarget`]; the engine holds them weakly, so
//! dropping a target silently retires its animations.

pub mod animation;
pub mod binding;
pub mod engine;
pub mod error;
pub mod playback;
pub mod property;
pub mod target;
pub mod timeline;
pub mod tween;

pub use animation::Animation;
pub use binding::{Mode, PropertyBinding};
pub use engine::{AnimationId, Engine};
pub use error::TweenError;
pub use playback::{Direction, Events, PlayState, Playback, Repeat};
pub use property::{Channel, Prop, PropSet, PropValue};
pub use target::{BatchScope, Key, NumericFields, TargetId, TargetRef, TweenTarget};
pub use timeline::{Align, Timeline};
pub use tween::{ChainCache, TickCtx, TickStatus, Tween};

pub use kinetic_core::{Easing, Spring, Value, ValueKind};
