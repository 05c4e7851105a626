//! Geometry primitives shared by the animation engine
//!
//! These mirror the host toolkit's view geometry (frame, transform,
//! color) closely enough that adapters can convert without loss. All
//! components are `f64`; the engine never rounds on behalf of the host.

use std::ops::{Add, Mul, Neg, Sub};

/// A 2D point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Copy shifted by `(dx, dy)`.
    pub fn offset_by(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// A 2D extent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Add for Size {
    type Output = Size;
    fn add(self, rhs: Size) -> Size {
        Size::new(self.width + rhs.width, self.height + rhs.height)
    }
}

impl Sub for Size {
    type Output = Size;
    fn sub(self, rhs: Size) -> Size {
        Size::new(self.width - rhs.width, self.height - rhs.height)
    }
}

impl Mul<f64> for Size {
    type Output = Size;
    fn mul(self, rhs: f64) -> Size {
        Size::new(self.width * rhs, self.height * rhs)
    }
}

/// An origin + extent rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Center of the rectangle.
    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// Rebuild the rect so that its center lands on `center`, keeping size.
    pub fn with_center(&self, center: Point) -> Self {
        Self {
            origin: Point::new(
                center.x - self.size.width / 2.0,
                center.y - self.size.height / 2.0,
            ),
            size: self.size,
        }
    }

    pub fn min_x(&self) -> f64 {
        self.origin.x
    }

    pub fn min_y(&self) -> f64 {
        self.origin.y
    }

    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.width
    }

    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.height
    }

    /// Whether `point` falls inside the rect (edges inclusive).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x()
            && point.x <= self.max_x()
            && point.y >= self.min_y()
            && point.y <= self.max_y()
    }

    /// Copy shrunk on each edge by the matching inset. Negative insets
    /// grow the rect.
    pub fn inset_by(&self, insets: EdgeInsets) -> Rect {
        Rect::new(
            self.origin.x + insets.left,
            self.origin.y + insets.top,
            self.size.width - insets.left - insets.right,
            self.size.height - insets.top - insets.bottom,
        )
    }

    /// Smallest rect covering both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        let min_x = self.min_x().min(other.min_x());
        let min_y = self.min_y().min(other.min_y());
        let max_x = self.max_x().max(other.max_x());
        let max_y = self.max_y().max(other.max_y());
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }
}

/// A 3-component vector, used for rotation axes and translations.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit-length copy; the zero vector normalizes to the +z axis so a
    /// degenerate rotation axis still produces a valid rotation.
    pub fn normalized(&self) -> Vector3 {
        let len = self.length();
        if len < 1e-12 {
            return Vector3::new(0.0, 0.0, 1.0);
        }
        Vector3::new(self.x / len, self.y / len, self.z / len)
    }

    pub fn dot(&self, other: Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: Vector3) -> Vector3 {
        Vector3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }
}

impl Add for Vector3 {
    type Output = Vector3;
    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;
    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;
    fn mul(self, rhs: f64) -> Vector3 {
        Vector3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;
    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

impl From<(f64, f64, f64)> for Vector3 {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self { x, y, z }
    }
}

/// Per-edge insets (top, left, bottom, right).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EdgeInsets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl EdgeInsets {
    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// The same inset on all four edges.
    pub fn uniform(inset: f64) -> Self {
        Self::new(inset, inset, inset, inset)
    }
}

// ============================================================================
// Color
// ============================================================================

/// An RGBA color with components in 0.0..=1.0.
///
/// Interpolation happens either over the rgb components directly or over
/// a hue/saturation/brightness projection, depending on which the caller
/// asked for; both round-trip through this type.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const CLEAR: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Color from 8-bit channel values.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(f64::from(r) / 255.0, f64::from(g) / 255.0, f64::from(b) / 255.0)
    }

    /// Color from a packed `0xRRGGBB` value, alpha 1.
    pub fn from_hex(hex: u32) -> Self {
        Self::rgb8((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Copy with a replaced alpha channel.
    pub fn with_alpha(&self, alpha: f64) -> Self {
        Self { a: alpha, ..*self }
    }

    /// Grayscale ("mono") color: a single white level plus alpha.
    pub fn mono(white: f64, alpha: f64) -> Self {
        Self {
            r: white,
            g: white,
            b: white,
            a: alpha,
        }
    }

    /// White level of the color as a luma-weighted average.
    pub fn white_level(&self) -> f64 {
        0.299 * self.r + 0.587 * self.g + 0.114 * self.b
    }

    /// Convert to hue/saturation/brightness. Hue is in 0.0..1.0 (turns,
    /// not degrees); achromatic colors report hue 0.
    pub fn to_hsb(&self) -> (f64, f64, f64, f64) {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let delta = max - min;

        let brightness = max;
        let saturation = if max > 0.0 { delta / max } else { 0.0 };

        let hue = if delta <= 0.0 {
            0.0
        } else if max == self.r {
            let h = (self.g - self.b) / delta % 6.0;
            (if h < 0.0 { h + 6.0 } else { h }) / 6.0
        } else if max == self.g {
            ((self.b - self.r) / delta + 2.0) / 6.0
        } else {
            ((self.r - self.g) / delta + 4.0) / 6.0
        };

        (hue, saturation, brightness, self.a)
    }

    /// Build a color from hue/saturation/brightness, hue in turns.
    pub fn from_hsb(hue: f64, saturation: f64, brightness: f64, alpha: f64) -> Self {
        let h = (hue.rem_euclid(1.0)) * 6.0;
        let c = brightness * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = brightness - c;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Self {
            r: r + m,
            g: g + m,
            b: b + m,
            a: alpha,
        }
    }
}

// ============================================================================
// 4x4 transform matrix
// ============================================================================

/// A 4x4 transform matrix in row-major order (`m[row * 4 + col]`).
///
/// The handful of operations the animation engine needs: identity,
/// composition, affine constructors, and a decompose/recompose pair for
/// driving individual transform channels from an arbitrary starting
/// matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix4x4 {
    pub m: [f64; 16],
}

impl Default for Matrix4x4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4x4 {
    pub const IDENTITY: Matrix4x4 = Matrix4x4 {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    pub fn from_components(m: [f64; 16]) -> Self {
        Self { m }
    }

    /// Translation matrix.
    pub fn translation(t: Vector3) -> Self {
        let mut out = Self::IDENTITY;
        out.m[3] = t.x;
        out.m[7] = t.y;
        out.m[11] = t.z;
        out
    }

    /// Non-uniform scale matrix.
    pub fn scale(s: Vector3) -> Self {
        let mut out = Self::IDENTITY;
        out.m[0] = s.x;
        out.m[5] = s.y;
        out.m[10] = s.z;
        out
    }

    /// Rotation of `angle` radians about `axis` (Rodrigues form).
    pub fn rotation(angle: f64, axis: Vector3) -> Self {
        let axis = axis.normalized();
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let (x, y, z) = (axis.x, axis.y, axis.z);

        Self::from_components([
            t * x * x + c,
            t * x * y - s * z,
            t * x * z + s * y,
            0.0,
            t * x * y + s * z,
            t * y * y + c,
            t * y * z - s * x,
            0.0,
            t * x * z - s * y,
            t * y * z + s * x,
            t * z * z + c,
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ])
    }

    /// Matrix product `self * rhs` (applies `rhs` first).
    pub fn multiplied(&self, rhs: &Matrix4x4) -> Matrix4x4 {
        let mut out = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                let mut acc = 0.0;
                for k in 0..4 {
                    acc += self.m[row * 4 + k] * rhs.m[k * 4 + col];
                }
                out[row * 4 + col] = acc;
            }
        }
        Matrix4x4::from_components(out)
    }

    /// Translation channel of the matrix.
    pub fn translation_component(&self) -> Vector3 {
        Vector3::new(self.m[3], self.m[7], self.m[11])
    }

    /// Per-axis scale extracted as basis-vector lengths.
    pub fn scale_component(&self) -> Vector3 {
        let sx = Vector3::new(self.m[0], self.m[4], self.m[8]).length();
        let sy = Vector3::new(self.m[1], self.m[5], self.m[9]).length();
        let sz = Vector3::new(self.m[2], self.m[6], self.m[10]).length();
        Vector3::new(sx, sy, sz)
    }

    /// Z rotation in radians, read from the scale-normalized basis.
    pub fn z_rotation_component(&self) -> f64 {
        let sx = Vector3::new(self.m[0], self.m[4], self.m[8]).length();
        if sx < 1e-12 {
            return 0.0;
        }
        (self.m[4] / sx).atan2(self.m[0] / sx)
    }

    /// Recompose translation * rotation-z * scale into one matrix.
    pub fn recompose(translation: Vector3, z_rotation: f64, scale: Vector3) -> Matrix4x4 {
        Matrix4x4::translation(translation)
            .multiplied(&Matrix4x4::rotation(
                z_rotation,
                Vector3::new(0.0, 0.0, 1.0),
            ))
            .multiplied(&Matrix4x4::scale(scale))
    }

    pub fn is_identity(&self) -> bool {
        self.m
            .iter()
            .zip(Self::IDENTITY.m.iter())
            .all(|(a, b)| (a - b).abs() < 1e-12)
    }
}
