//! Target adapter
//!
//! The engine never owns or renders the objects it animates. It sees
//! them through [`TweenTarget`]: read the current value of a semantic
//! property, apply an interpolated value back. Targets are held as
//! `Weak` references; a dropped target quietly finishes its animations.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use kinetic_core::Value;
use rustc_hash::FxHashMap;

/// Semantic key of one animatable property.
///
/// These are the post-merge binding keys: declaring both x and y on a
/// tween yields one `Position` binding, and so on (see
/// [`crate::property`]). `Custom` addresses arbitrary named numeric
/// fields on objects the engine knows nothing about.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    X,
    Y,
    Position,
    Center,
    Width,
    Height,
    Size,
    Frame,
    Alpha,
    BackgroundColor,
    BorderColor,
    Transform,
    Custom(String),
}

/// The adapter a host object implements to be animatable.
///
/// Methods take `&self`; implementors use interior mutability, which is
/// what lets the engine hold plain `Weak` handles.
pub trait TweenTarget {
    /// Current value of `key`, or `None` if the target does not expose
    /// that property.
    fn value_for(&self, key: &Key) -> Option<Value>;

    /// Apply an interpolated value for `key`.
    fn apply(&self, key: &Key, value: Value);
}

/// Non-owning handle to a target.
pub type TargetRef = Weak<dyn TweenTarget>;

/// Registry identity of a target: the pointer address behind its `Weak`.
///
/// Stable for the lifetime of the allocation, which is exactly as long
/// as any animation on the target can be live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TargetId(usize);

impl TargetId {
    pub fn of(target: &TargetRef) -> TargetId {
        TargetId(target.as_ptr() as *const () as usize)
    }

    pub fn of_rc(target: &Rc<dyn TweenTarget>) -> TargetId {
        TargetId(Rc::as_ptr(target) as *const () as usize)
    }
}

/// Scoped suppression of the host toolkit's implicit animations.
///
/// [`crate::Engine::tick`] calls `enter` exactly once before the frame's
/// batch of property applications and `exit` once after, no matter how
/// many properties get written in between.
pub trait BatchScope {
    fn enter(&self);
    fn exit(&self);
}

/// A bag of named numeric fields implementing [`TweenTarget`] over
/// [`Key::Custom`].
///
/// This is the generic path for animating arbitrary objects: mirror the
/// numbers into a `NumericFields`, tween them, read them back in an
/// `on_update` callback.
#[derive(Debug, Default)]
pub struct NumericFields {
    fields: RefCell<FxHashMap<String, f64>>,
}

impl NumericFields {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn set(&self, name: &str, value: f64) {
        self.fields.borrow_mut().insert(name.to_owned(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.fields.borrow().get(name).copied()
    }
}

impl TweenTarget for NumericFields {
    fn value_for(&self, key: &Key) -> Option<Value> {
        match key {
            Key::Custom(name) => self.get(name).map(Value::Scalar),
            _ => None,
        }
    }

    fn apply(&self, key: &Key, value: Value) {
        if let (Key::Custom(name), Value::Scalar(v)) = (key, value) {
            self.set(name, v);
        }
    }
}
