//! Property bindings
//!
//! A binding is the per-property interpolation state inside a tween:
//! the resolved from/to pair, the easing curve or spring that supplies
//! the fraction, and the elapsed/duration accounting. Endpoints resolve
//! lazily at preparation time so "animate to" reads whatever value the
//! target holds when the animation actually starts, not when it was
//! built.

use kinetic_core::{Easing, Matrix4x4, Spring, Value, Vector3};
use smallvec::SmallVec;

use crate::property::{Channel, PropValue};
use crate::target::{Key, TweenTarget};

/// How the binding's endpoints were declared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Animate from the target's live value toward the declared value.
    To,
    /// Animate from the declared value toward the target's live value.
    From,
    /// Both endpoints declared.
    FromTo,
}

/// Interpolation state for one semantic property of one target.
#[derive(Clone, Debug)]
pub struct PropertyBinding {
    pub key: Key,
    pub mode: Mode,
    decl_from: Option<PropValue>,
    decl_to: Option<PropValue>,
    from: Option<Value>,
    to: Option<Value>,
    pub easing: Easing,
    pub spring: Option<Spring>,
    pub elapsed: f64,
    pub delay: f64,
    pub duration: f64,
    pub additive: bool,
    prepared: bool,
    finished: bool,
}

impl PropertyBinding {
    pub fn new(
        key: Key,
        mode: Mode,
        decl_from: Option<PropValue>,
        decl_to: Option<PropValue>,
    ) -> Self {
        Self {
            key,
            mode,
            decl_from,
            decl_to,
            from: None,
            to: None,
            easing: Easing::Linear,
            spring: None,
            elapsed: 0.0,
            delay: 0.0,
            duration: 0.0,
            additive: false,
            prepared: false,
            finished: false,
        }
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Spring-driven bindings finish on spring rest, never on elapsed
    /// time.
    pub fn is_spring(&self) -> bool {
        self.spring.is_some()
    }

    pub fn from_value(&self) -> Option<Value> {
        self.from
    }

    pub fn to_value(&self) -> Option<Value> {
        self.to
    }

    /// Resolve the from/to endpoints against the target's live state.
    ///
    /// `chained` is the prior tween's `to` value for this target+key,
    /// if the additive cache holds one; it replaces the live value as
    /// the `from` endpoint of a `To`-mode binding.
    ///
    /// Panics when the target does not expose the property: continuing
    /// would interpolate over undefined state.
    pub fn prepare(&mut self, target: &dyn TweenTarget, chained: Option<Value>) {
        let current = || -> Value {
            match target.value_for(&self.key) {
                Some(v) => v,
                None => panic!("target does not expose property {:?}", self.key),
            }
        };

        let (from, to) = match (&self.decl_from, &self.decl_to) {
            (None, Some(decl)) => {
                let to = resolve_decl(decl, None, target, &self.key);
                let from = if self.additive {
                    match chained {
                        Some(prior) => {
                            assert_eq!(
                                prior.kind(),
                                to.kind(),
                                "additive chain value kind mismatch for {:?}",
                                self.key
                            );
                            prior
                        }
                        None => current(),
                    }
                } else if matches!(decl, PropValue::Transform(_)) {
                    // The from side mirrors the to side's channel list,
                    // each channel at its current value.
                    resolve_decl_defaults(decl, target, &self.key)
                } else {
                    current()
                };
                (from, to)
            }
            (Some(decl), None) => {
                let from = resolve_decl(decl, None, target, &self.key);
                let to = if matches!(decl, PropValue::Transform(_)) {
                    resolve_decl_defaults(decl, target, &self.key)
                } else {
                    current()
                };
                (from, to)
            }
            (Some(decl_from), Some(decl_to)) => {
                let to = resolve_decl(decl_to, None, target, &self.key);
                let from = resolve_decl(decl_from, Some(decl_to), target, &self.key);
                (from, to)
            }
            (None, None) => panic!("binding for {:?} has no declared endpoints", self.key),
        };

        assert_eq!(
            from.kind(),
            to.kind(),
            "from/to kind mismatch for {:?}",
            self.key
        );
        assert_eq!(from.component_count(), to.component_count());

        self.from = Some(from);
        self.to = Some(to);
        self.prepared = true;
    }

    /// The value the additive chain cache should remember for this
    /// binding, if any.
    pub fn chain_value(&self) -> Option<Value> {
        if self.mode == Mode::To && self.additive {
            self.to
        } else {
            None
        }
    }

    /// Advance by `dt` seconds (negative while playing in reverse) and
    /// apply the interpolated value to the target.
    pub fn proceed(&mut self, dt: f64, target: &dyn TweenTarget) {
        debug_assert!(self.prepared, "proceed before prepare");

        self.elapsed += dt;
        if self.elapsed < 0.0 {
            self.elapsed = 0.0;
        }

        let time = if self.duration > 0.0 {
            ((self.elapsed - self.delay) / self.duration).clamp(0.0, 1.0)
        } else {
            // Zero duration collapses to "apply the final value now".
            1.0
        };

        let fraction = match &mut self.spring {
            Some(spring) => {
                let divisor = if self.duration > 0.0 { self.duration } else { 1.0 };
                spring.advance(dt / divisor);
                spring.current()
            }
            None => self.easing.apply(time),
        };

        let (from, to) = (
            self.from.expect("prepared"),
            self.to.expect("prepared"),
        );
        target.apply(&self.key, from.interpolate(&to, fraction));

        self.finished = match &self.spring {
            Some(spring) => spring.ended(),
            None => {
                if dt < 0.0 {
                    self.elapsed <= 0.0
                } else {
                    time >= 1.0
                }
            }
        };
    }

    /// Drive the binding to an absolute local time, applying the value.
    pub fn proceed_to(&mut self, local: f64, target: &dyn TweenTarget) {
        let delta = local - self.elapsed;
        self.proceed(delta, target);
    }

    /// Rewind the accounting without touching the target.
    pub fn rewind(&mut self) {
        self.elapsed = 0.0;
        self.finished = false;
        if let Some(spring) = &mut self.spring {
            spring.reset();
        }
    }
}

/// Turn a declared payload into a concrete [`Value`].
///
/// `counterpart` is the opposite side's declaration (for `FromTo`
/// transforms), whose channel order is canonical.
fn resolve_decl(
    decl: &PropValue,
    counterpart: Option<&PropValue>,
    target: &dyn TweenTarget,
    key: &Key,
) -> Value {
    match decl {
        PropValue::Plain(value) => *value,
        PropValue::Transform(channels) => {
            let canonical = match counterpart {
                Some(PropValue::Transform(other)) => other,
                _ => channels,
            };
            Value::Matrix4x4(compose_channels(canonical, Some(channels), target, key))
        }
    }
}

/// The "other side" of a single-sided transform declaration: the same
/// channel list with every channel at the target's current value.
fn resolve_decl_defaults(decl: &PropValue, target: &dyn TweenTarget, key: &Key) -> Value {
    match decl {
        PropValue::Plain(_) => unreachable!("only transform payloads have derived sides"),
        PropValue::Transform(channels) => {
            Value::Matrix4x4(compose_channels(channels, None, target, key))
        }
    }
}

/// Compose the canonical channel list into one matrix. Each channel
/// takes its value from `declared` when a matching slot exists there,
/// otherwise from the target's current transform.
fn compose_channels(
    canonical: &SmallVec<[Channel; 4]>,
    declared: Option<&SmallVec<[Channel; 4]>>,
    target: &dyn TweenTarget,
    key: &Key,
) -> Matrix4x4 {
    let current = current_transform(target, key);

    let mut matrix = Matrix4x4::IDENTITY;
    for slot in canonical {
        let channel = declared
            .and_then(|list| list.iter().find(|c| channel_slot_eq(c, slot)))
            .copied()
            .unwrap_or_else(|| current_channel(slot, &current));
        matrix = matrix.multiplied(&channel_matrix(&channel));
    }
    matrix
}

fn channel_slot_eq(a: &Channel, b: &Channel) -> bool {
    match (a, b) {
        (Channel::Scale(_), Channel::Scale(_)) => true,
        (Channel::Translate(_), Channel::Translate(_)) => true,
        (Channel::Rotate { axis: a, .. }, Channel::Rotate { axis: b, .. }) => a == b,
        _ => false,
    }
}

fn current_transform(target: &dyn TweenTarget, key: &Key) -> Matrix4x4 {
    match target.value_for(key) {
        Some(Value::Matrix4x4(m)) => m,
        Some(other) => panic!(
            "target returned {:?} for transform property {:?}",
            other.kind(),
            key
        ),
        None => panic!("target does not expose property {:?}", key),
    }
}

/// A channel's value as currently held by the target, read out of its
/// transform decomposition. Axes the decomposition cannot see keep
/// their identity.
fn current_channel(slot: &Channel, current: &Matrix4x4) -> Channel {
    const AXIS_Z: Vector3 = Vector3 {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    match slot {
        Channel::Scale(_) => Channel::Scale(current.scale_component()),
        Channel::Translate(_) => Channel::Translate(current.translation_component()),
        Channel::Rotate { axis, .. } => {
            let angle = if *axis == AXIS_Z {
                current.z_rotation_component()
            } else {
                0.0
            };
            Channel::Rotate { angle, axis: *axis }
        }
    }
}

fn channel_matrix(channel: &Channel) -> Matrix4x4 {
    match *channel {
        Channel::Scale(s) => Matrix4x4::scale(s),
        Channel::Rotate { angle, axis } => Matrix4x4::rotation(angle, axis),
        Channel::Translate(t) => Matrix4x4::translation(t),
    }
}
