//! Type-tagged interpolatable values
//!
//! Every quantity the engine tweens (scalars, points, sizes, rects,
//! colors in three projections, 3-vectors, 4x4 matrices, edge insets)
//! is carried as a [`Value`]: a fixed-width numeric vector tagged with
//! its kind. Two values interpolate only when their kinds match;
//! anything else is a programming error and asserts.

use crate::geometry::{Color, EdgeInsets, Matrix4x4, Point, Rect, Size, Vector3};

/// The kind tag of a [`Value`], which fixes its component count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Scalar,
    Point,
    Size,
    Rect,
    ColorRgb,
    ColorHsb,
    ColorMono,
    Vector3,
    Matrix4x4,
    EdgeInsets,
}

impl ValueKind {
    /// Number of numeric components carried by values of this kind.
    pub fn component_count(&self) -> usize {
        match self {
            ValueKind::Scalar => 1,
            ValueKind::Point | ValueKind::Size | ValueKind::ColorMono => 2,
            ValueKind::Vector3 => 3,
            ValueKind::Rect | ValueKind::ColorRgb | ValueKind::ColorHsb | ValueKind::EdgeInsets => {
                4
            }
            ValueKind::Matrix4x4 => 16,
        }
    }
}

/// A fixed-width numeric vector tagged with its kind.
///
/// Immutable value type; interpolation builds a fresh value each step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Scalar(f64),
    Point(Point),
    Size(Size),
    Rect(Rect),
    /// Color interpolated over its red/green/blue/alpha components.
    ColorRgb(Color),
    /// Color interpolated over a hue/saturation/brightness projection.
    ColorHsb {
        hue: f64,
        saturation: f64,
        brightness: f64,
        alpha: f64,
    },
    /// Grayscale color: white level plus alpha.
    ColorMono {
        white: f64,
        alpha: f64,
    },
    Vector3(Vector3),
    Matrix4x4(Matrix4x4),
    EdgeInsets(EdgeInsets),
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Scalar(_) => ValueKind::Scalar,
            Value::Point(_) => ValueKind::Point,
            Value::Size(_) => ValueKind::Size,
            Value::Rect(_) => ValueKind::Rect,
            Value::ColorRgb(_) => ValueKind::ColorRgb,
            Value::ColorHsb { .. } => ValueKind::ColorHsb,
            Value::ColorMono { .. } => ValueKind::ColorMono,
            Value::Vector3(_) => ValueKind::Vector3,
            Value::Matrix4x4(_) => ValueKind::Matrix4x4,
            Value::EdgeInsets(_) => ValueKind::EdgeInsets,
        }
    }

    pub fn component_count(&self) -> usize {
        self.kind().component_count()
    }

    /// Wrap a [`Color`] in the HSB projection.
    pub fn hsb_from_color(color: Color) -> Value {
        let (hue, saturation, brightness, alpha) = color.to_hsb();
        Value::ColorHsb {
            hue,
            saturation,
            brightness,
            alpha,
        }
    }

    /// Wrap a [`Color`] in the mono projection.
    pub fn mono_from_color(color: Color) -> Value {
        Value::ColorMono {
            white: color.white_level(),
            alpha: color.a,
        }
    }

    /// Collapse any of the three color projections back to a [`Color`].
    pub fn as_color(&self) -> Option<Color> {
        match *self {
            Value::ColorRgb(color) => Some(color),
            Value::ColorHsb {
                hue,
                saturation,
                brightness,
                alpha,
            } => Some(Color::from_hsb(hue, saturation, brightness, alpha)),
            Value::ColorMono { white, alpha } => Some(Color::mono(white, alpha)),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match *self {
            Value::Scalar(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<Point> {
        match *self {
            Value::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_size(&self) -> Option<Size> {
        match *self {
            Value::Size(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_rect(&self) -> Option<Rect> {
        match *self {
            Value::Rect(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_vector3(&self) -> Option<Vector3> {
        match *self {
            Value::Vector3(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<Matrix4x4> {
        match *self {
            Value::Matrix4x4(m) => Some(m),
            _ => None,
        }
    }

    /// Componentwise linear interpolation from `self` toward `to`.
    ///
    /// `t` is deliberately unclamped; callers clamp or extrapolate per
    /// their own policy. Panics when the kinds differ.
    pub fn interpolate(&self, to: &Value, t: f64) -> Value {
        assert_eq!(
            self.kind(),
            to.kind(),
            "interpolating values of different kinds"
        );

        match (*self, *to) {
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(lerp(a, b, t)),
            (Value::Point(a), Value::Point(b)) => {
                Value::Point(Point::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t)))
            }
            (Value::Size(a), Value::Size(b)) => Value::Size(Size::new(
                lerp(a.width, b.width, t),
                lerp(a.height, b.height, t),
            )),
            (Value::Rect(a), Value::Rect(b)) => Value::Rect(Rect::new(
                lerp(a.origin.x, b.origin.x, t),
                lerp(a.origin.y, b.origin.y, t),
                lerp(a.size.width, b.size.width, t),
                lerp(a.size.height, b.size.height, t),
            )),
            (Value::ColorRgb(a), Value::ColorRgb(b)) => Value::ColorRgb(Color::rgba(
                lerp(a.r, b.r, t),
                lerp(a.g, b.g, t),
                lerp(a.b, b.b, t),
                lerp(a.a, b.a, t),
            )),
            (
                Value::ColorHsb {
                    hue: h0,
                    saturation: s0,
                    brightness: b0,
                    alpha: a0,
                },
                Value::ColorHsb {
                    hue: h1,
                    saturation: s1,
                    brightness: b1,
                    alpha: a1,
                },
            ) => Value::ColorHsb {
                hue: lerp(h0, h1, t),
                saturation: lerp(s0, s1, t),
                brightness: lerp(b0, b1, t),
                alpha: lerp(a0, a1, t),
            },
            (
                Value::ColorMono {
                    white: w0,
                    alpha: a0,
                },
                Value::ColorMono {
                    white: w1,
                    alpha: a1,
                },
            ) => Value::ColorMono {
                white: lerp(w0, w1, t),
                alpha: lerp(a0, a1, t),
            },
            (Value::Vector3(a), Value::Vector3(b)) => Value::Vector3(Vector3::new(
                lerp(a.x, b.x, t),
                lerp(a.y, b.y, t),
                lerp(a.z, b.z, t),
            )),
            (Value::Matrix4x4(a), Value::Matrix4x4(b)) => {
                let mut m = [0.0; 16];
                for (i, slot) in m.iter_mut().enumerate() {
                    *slot = lerp(a.m[i], b.m[i], t);
                }
                Value::Matrix4x4(Matrix4x4::from_components(m))
            }
            (Value::EdgeInsets(a), Value::EdgeInsets(b)) => Value::EdgeInsets(EdgeInsets::new(
                lerp(a.top, b.top, t),
                lerp(a.left, b.left, t),
                lerp(a.bottom, b.bottom, t),
                lerp(a.right, b.right, t),
            )),
            _ => unreachable!("kind equality checked above"),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(v)
    }
}

impl From<Point> for Value {
    fn from(v: Point) -> Self {
        Value::Point(v)
    }
}

impl From<Size> for Value {
    fn from(v: Size) -> Self {
        Value::Size(v)
    }
}

impl From<Rect> for Value {
    fn from(v: Rect) -> Self {
        Value::Rect(v)
    }
}

impl From<Color> for Value {
    fn from(v: Color) -> Self {
        Value::ColorRgb(v)
    }
}

impl From<Vector3> for Value {
    fn from(v: Vector3) -> Self {
        Value::Vector3(v)
    }
}

impl From<Matrix4x4> for Value {
    fn from(v: Matrix4x4) -> Self {
        Value::Matrix4x4(v)
    }
}

impl From<EdgeInsets> for Value {
    fn from(v: EdgeInsets) -> Self {
        Value::EdgeInsets(v)
    }
}
