//! Property declarations and merge rules
//!
//! Users declare what to animate as a list of [`Prop`]s. Declarations
//! merge at setup time: x + y collapse into one position binding, width
//! + height into one size binding, a merged position + merged size into
//! one frame binding, and every transform channel (scale, rotations,
//! translation) shares a single transform binding that composes the
//! channels into one matrix in declaration order.

use kinetic_core::{Color, Point, Rect, Size, Value, Vector3};
use smallvec::SmallVec;

use crate::target::Key;

/// One property declaration on a tween.
#[derive(Clone, Debug, PartialEq)]
pub enum Prop {
    X(f64),
    Y(f64),
    Position(Point),
    Center(Point),
    Width(f64),
    Height(f64),
    Size(Size),
    Frame(Rect),
    Alpha(f64),
    BackgroundColor(Color),
    BorderColor(Color),
    /// Uniform scale over x and y.
    Scale(f64),
    /// Rotation about the z axis, radians.
    Rotate(f64),
    /// Rotation about the x axis, radians.
    RotateX(f64),
    /// Rotation about the y axis, radians.
    RotateY(f64),
    Translate(Vector3),
    /// An arbitrary named numeric field ([`Key::Custom`]).
    Field(String, f64),
}

impl Prop {
    pub fn x(v: f64) -> Prop {
        Prop::X(v)
    }

    pub fn y(v: f64) -> Prop {
        Prop::Y(v)
    }

    pub fn position(x: f64, y: f64) -> Prop {
        Prop::Position(Point::new(x, y))
    }

    pub fn center(x: f64, y: f64) -> Prop {
        Prop::Center(Point::new(x, y))
    }

    pub fn width(v: f64) -> Prop {
        Prop::Width(v)
    }

    pub fn height(v: f64) -> Prop {
        Prop::Height(v)
    }

    pub fn size(width: f64, height: f64) -> Prop {
        Prop::Size(Size::new(width, height))
    }

    pub fn frame(x: f64, y: f64, width: f64, height: f64) -> Prop {
        Prop::Frame(Rect::new(x, y, width, height))
    }

    pub fn alpha(v: f64) -> Prop {
        Prop::Alpha(v)
    }

    pub fn background_color(color: Color) -> Prop {
        Prop::BackgroundColor(color)
    }

    pub fn border_color(color: Color) -> Prop {
        Prop::BorderColor(color)
    }

    pub fn scale(v: f64) -> Prop {
        Prop::Scale(v)
    }

    pub fn rotate(radians: f64) -> Prop {
        Prop::Rotate(radians)
    }

    pub fn rotate_x(radians: f64) -> Prop {
        Prop::RotateX(radians)
    }

    pub fn rotate_y(radians: f64) -> Prop {
        Prop::RotateY(radians)
    }

    pub fn translate(x: f64, y: f64) -> Prop {
        Prop::Translate(Vector3::new(x, y, 0.0))
    }

    pub fn field(name: &str, v: f64) -> Prop {
        Prop::Field(name.to_owned(), v)
    }
}

/// One channel of the shared transform binding.
///
/// Channels compose into a single matrix in declaration order; matrix
/// composition is non-commutative, so the order is part of the result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Channel {
    Scale(Vector3),
    Rotate { angle: f64, axis: Vector3 },
    Translate(Vector3),
}

impl Channel {
    /// Two channels are the same slot when a later declaration should
    /// overwrite the earlier value instead of appending.
    fn same_slot(&self, other: &Channel) -> bool {
        match (self, other) {
            (Channel::Scale(_), Channel::Scale(_)) => true,
            (Channel::Translate(_), Channel::Translate(_)) => true,
            (Channel::Rotate { axis: a, .. }, Channel::Rotate { axis: b, .. }) => a == b,
            _ => false,
        }
    }
}

const AXIS_X: Vector3 = Vector3 {
    x: 1.0,
    y: 0.0,
    z: 0.0,
};
const AXIS_Y: Vector3 = Vector3 {
    x: 0.0,
    y: 1.0,
    z: 0.0,
};
const AXIS_Z: Vector3 = Vector3 {
    x: 0.0,
    y: 0.0,
    z: 1.0,
};

/// The merged payload of one binding.
#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    Plain(Value),
    Transform(SmallVec<[Channel; 4]>),
}

#[derive(Clone, Debug)]
struct Entry {
    key: Key,
    value: PropValue,
}

/// Accumulates declarations and applies the merge rules.
///
/// Entries keep the order in which their first constituent was
/// declared; a merge takes over the earlier slot.
#[derive(Clone, Debug, Default)]
pub struct PropSet {
    entries: Vec<Entry>,
}

impl PropSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_props(props: impl IntoIterator<Item = Prop>) -> Self {
        let mut set = Self::new();
        for prop in props {
            set.declare(prop);
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn index_of(&self, key: &Key) -> Option<usize> {
        self.entries.iter().position(|e| &e.key == key)
    }

    fn upsert_plain(&mut self, key: Key, value: Value) {
        match self.index_of(&key) {
            Some(i) => self.entries[i].value = PropValue::Plain(value),
            None => self.entries.push(Entry {
                key,
                value: PropValue::Plain(value),
            }),
        }
    }

    fn plain(&self, key: &Key) -> Option<Value> {
        self.index_of(key).and_then(|i| match self.entries[i].value {
            PropValue::Plain(v) => Some(v),
            _ => None,
        })
    }

    fn remove(&mut self, key: &Key) -> Option<Value> {
        let i = self.index_of(key)?;
        match self.entries.remove(i).value {
            PropValue::Plain(v) => Some(v),
            _ => None,
        }
    }

    /// Replace the entry at `key` with a new key/value, keeping its slot.
    fn replace(&mut self, key: &Key, new_key: Key, value: Value) {
        if let Some(i) = self.index_of(key) {
            self.entries[i] = Entry {
                key: new_key,
                value: PropValue::Plain(value),
            };
        }
    }

    fn declare_channel(&mut self, channel: Channel) {
        if let Some(i) = self.index_of(&Key::Transform) {
            if let PropValue::Transform(channels) = &mut self.entries[i].value {
                if let Some(slot) = channels.iter_mut().find(|c| c.same_slot(&channel)) {
                    *slot = channel;
                } else {
                    channels.push(channel);
                }
            }
        } else {
            let mut channels = SmallVec::new();
            channels.push(channel);
            self.entries.push(Entry {
                key: Key::Transform,
                value: PropValue::Transform(channels),
            });
        }
    }

    /// Add one declaration, merging per the setup-time rules.
    pub fn declare(&mut self, prop: Prop) {
        match prop {
            Prop::X(v) => {
                if let Some(Value::Rect(mut rect)) = self.plain(&Key::Frame) {
                    rect.origin.x = v;
                    self.upsert_plain(Key::Frame, Value::Rect(rect));
                } else if let Some(Value::Point(mut p)) = self.plain(&Key::Position) {
                    p.x = v;
                    self.upsert_plain(Key::Position, Value::Point(p));
                } else if let Some(Value::Scalar(y)) = self.plain(&Key::Y) {
                    // x + y merge into one position binding at y's slot.
                    self.replace(&Key::Y, Key::Position, Value::Point(Point::new(v, y)));
                } else {
                    self.upsert_plain(Key::X, Value::Scalar(v));
                }
            }
            Prop::Y(v) => {
                if let Some(Value::Rect(mut rect)) = self.plain(&Key::Frame) {
                    rect.origin.y = v;
                    self.upsert_plain(Key::Frame, Value::Rect(rect));
                } else if let Some(Value::Point(mut p)) = self.plain(&Key::Position) {
                    p.y = v;
                    self.upsert_plain(Key::Position, Value::Point(p));
                } else if let Some(Value::Scalar(x)) = self.plain(&Key::X) {
                    self.replace(&Key::X, Key::Position, Value::Point(Point::new(x, v)));
                } else {
                    self.upsert_plain(Key::Y, Value::Scalar(v));
                }
            }
            Prop::Position(p) => {
                if let Some(Value::Rect(mut rect)) = self.plain(&Key::Frame) {
                    rect.origin = p;
                    self.upsert_plain(Key::Frame, Value::Rect(rect));
                } else {
                    self.remove(&Key::X);
                    self.remove(&Key::Y);
                    self.upsert_plain(Key::Position, Value::Point(p));
                }
            }
            Prop::Width(v) => {
                if let Some(Value::Rect(mut rect)) = self.plain(&Key::Frame) {
                    rect.size.width = v;
                    self.upsert_plain(Key::Frame, Value::Rect(rect));
                } else if let Some(Value::Size(mut s)) = self.plain(&Key::Size) {
                    s.width = v;
                    self.upsert_plain(Key::Size, Value::Size(s));
                } else if let Some(Value::Scalar(h)) = self.plain(&Key::Height) {
                    self.replace(&Key::Height, Key::Size, Value::Size(Size::new(v, h)));
                } else {
                    self.upsert_plain(Key::Width, Value::Scalar(v));
                }
            }
            Prop::Height(v) => {
                if let Some(Value::Rect(mut rect)) = self.plain(&Key::Frame) {
                    rect.size.height = v;
                    self.upsert_plain(Key::Frame, Value::Rect(rect));
                } else if let Some(Value::Size(mut s)) = self.plain(&Key::Size) {
                    s.height = v;
                    self.upsert_plain(Key::Size, Value::Size(s));
                } else if let Some(Value::Scalar(w)) = self.plain(&Key::Width) {
                    self.replace(&Key::Width, Key::Size, Value::Size(Size::new(w, v)));
                } else {
                    self.upsert_plain(Key::Height, Value::Scalar(v));
                }
            }
            Prop::Size(s) => {
                if let Some(Value::Rect(mut rect)) = self.plain(&Key::Frame) {
                    rect.size = s;
                    self.upsert_plain(Key::Frame, Value::Rect(rect));
                } else {
                    self.remove(&Key::Width);
                    self.remove(&Key::Height);
                    self.upsert_plain(Key::Size, Value::Size(s));
                }
            }
            Prop::Frame(rect) => {
                self.remove(&Key::X);
                self.remove(&Key::Y);
                self.remove(&Key::Position);
                self.remove(&Key::Width);
                self.remove(&Key::Height);
                self.remove(&Key::Size);
                self.upsert_plain(Key::Frame, Value::Rect(rect));
            }
            Prop::Center(p) => self.upsert_plain(Key::Center, Value::Point(p)),
            Prop::Alpha(v) => self.upsert_plain(Key::Alpha, Value::Scalar(v)),
            Prop::BackgroundColor(c) => {
                self.upsert_plain(Key::BackgroundColor, Value::ColorRgb(c))
            }
            Prop::BorderColor(c) => self.upsert_plain(Key::BorderColor, Value::ColorRgb(c)),
            Prop::Scale(v) => self.declare_channel(Channel::Scale(Vector3::new(v, v, 1.0))),
            Prop::Rotate(angle) => self.declare_channel(Channel::Rotate {
                angle,
                axis: AXIS_Z,
            }),
            Prop::RotateX(angle) => self.declare_channel(Channel::Rotate {
                angle,
                axis: AXIS_X,
            }),
            Prop::RotateY(angle) => self.declare_channel(Channel::Rotate {
                angle,
                axis: AXIS_Y,
            }),
            Prop::Translate(v) => self.declare_channel(Channel::Translate(v)),
            Prop::Field(name, v) => self.upsert_plain(Key::Custom(name), Value::Scalar(v)),
        }

        self.coalesce();
    }

    /// Merge a complete position and a complete size into one frame
    /// binding at the earlier slot.
    fn coalesce(&mut self) {
        let (Some(pi), Some(si)) = (self.index_of(&Key::Position), self.index_of(&Key::Size))
        else {
            return;
        };
        let (Some(Value::Point(origin)), Some(Value::Size(size))) =
            (self.plain(&Key::Position), self.plain(&Key::Size))
        else {
            return;
        };

        let earlier = pi.min(si);
        let later = pi.max(si);
        self.entries[earlier] = Entry {
            key: Key::Frame,
            value: PropValue::Plain(Value::Rect(Rect { origin, size })),
        };
        self.entries.remove(later);
    }

    /// The merged declarations, in first-declared order.
    pub fn resolved(&self) -> impl Iterator<Item = (&Key, &PropValue)> {
        self.entries.iter().map(|e| (&e.key, &e.value))
    }

    pub fn get(&self, key: &Key) -> Option<&PropValue> {
        self.index_of(key).map(|i| &self.entries[i].value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.iter().map(|e| &e.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x_and_y_merge_into_position() {
        let set = PropSet::from_props([Prop::x(10.0), Prop::y(20.0)]);
        let keys: Vec<_> = set.keys().cloned().collect();
        assert_eq!(keys, vec![Key::Position]);
        assert_eq!(
            set.get(&Key::Position),
            Some(&PropValue::Plain(Value::Point(Point::new(10.0, 20.0))))
        );
    }

    #[test]
    fn lone_x_stays_a_scalar_binding() {
        let set = PropSet::from_props([Prop::x(10.0)]);
        assert_eq!(
            set.get(&Key::X),
            Some(&PropValue::Plain(Value::Scalar(10.0)))
        );
    }

    #[test]
    fn width_and_height_merge_into_size() {
        let set = PropSet::from_props([Prop::width(100.0), Prop::height(50.0)]);
        assert_eq!(
            set.get(&Key::Size),
            Some(&PropValue::Plain(Value::Size(Size::new(100.0, 50.0))))
        );
    }

    #[test]
    fn position_and_size_merge_into_frame() {
        let set = PropSet::from_props([
            Prop::x(1.0),
            Prop::y(2.0),
            Prop::width(30.0),
            Prop::height(40.0),
        ]);
        let keys: Vec<_> = set.keys().cloned().collect();
        assert_eq!(keys, vec![Key::Frame]);
        assert_eq!(
            set.get(&Key::Frame),
            Some(&PropValue::Plain(Value::Rect(Rect::new(
                1.0, 2.0, 30.0, 40.0
            ))))
        );
    }

    #[test]
    fn later_declaration_updates_same_binding() {
        let set = PropSet::from_props([Prop::alpha(0.5), Prop::alpha(0.9)]);
        assert_eq!(
            set.get(&Key::Alpha),
            Some(&PropValue::Plain(Value::Scalar(0.9)))
        );
        assert_eq!(set.keys().count(), 1);
    }

    #[test]
    fn transform_channels_share_one_binding_in_declaration_order() {
        let set = PropSet::from_props([
            Prop::rotate(1.0),
            Prop::scale(2.0),
            Prop::translate(5.0, 0.0),
        ]);
        let Some(PropValue::Transform(channels)) = set.get(&Key::Transform) else {
            panic!("expected a transform binding");
        };
        assert_eq!(channels.len(), 3);
        assert!(matches!(channels[0], Channel::Rotate { .. }));
        assert!(matches!(channels[1], Channel::Scale(_)));
        assert!(matches!(channels[2], Channel::Translate(_)));
    }

    #[test]
    fn repeated_channel_overwrites_its_slot() {
        let set = PropSet::from_props([Prop::scale(2.0), Prop::rotate(1.0), Prop::scale(3.0)]);
        let Some(PropValue::Transform(channels)) = set.get(&Key::Transform) else {
            panic!("expected a transform binding");
        };
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0], Channel::Scale(Vector3::new(3.0, 3.0, 1.0)));
    }

    #[test]
    fn rotations_about_different_axes_are_distinct_channels() {
        let set = PropSet::from_props([Prop::rotate(1.0), Prop::rotate_x(0.5)]);
        let Some(PropValue::Transform(channels)) = set.get(&Key::Transform) else {
            panic!("expected a transform binding");
        };
        assert_eq!(channels.len(), 2);
    }

    #[test]
    fn declaration_order_is_preserved_across_merges() {
        let set = PropSet::from_props([Prop::alpha(1.0), Prop::x(5.0), Prop::y(6.0)]);
        let keys: Vec<_> = set.keys().cloned().collect();
        assert_eq!(keys, vec![Key::Alpha, Key::Position]);
    }
}
