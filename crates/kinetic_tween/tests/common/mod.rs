#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kinetic_core::{Color, Matrix4x4, Point, Rect, Value};
use kinetic_tween::{Key, TweenTarget};

/// View-like target shared by the integration tests.
#[derive(Debug)]
pub struct Node {
    pub frame: RefCell<Rect>,
    pub alpha: Cell<f64>,
    pub background: RefCell<Color>,
    pub transform: RefCell<Matrix4x4>,
}

impl Node {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            frame: RefCell::new(Rect::new(0.0, 0.0, 100.0, 100.0)),
            alpha: Cell::new(1.0),
            background: RefCell::new(Color::WHITE),
            transform: RefCell::new(Matrix4x4::IDENTITY),
        })
    }

    pub fn x(&self) -> f64 {
        self.frame.borrow().origin.x
    }

    pub fn y(&self) -> f64 {
        self.frame.borrow().origin.y
    }

    pub fn width(&self) -> f64 {
        self.frame.borrow().size.width
    }

    pub fn origin(&self) -> Point {
        self.frame.borrow().origin
    }
}

impl TweenTarget for Node {
    fn value_for(&self, key: &Key) -> Option<Value> {
        let frame = *self.frame.borrow();
        match key {
            Key::X => Some(Value::Scalar(frame.origin.x)),
            Key::Y => Some(Value::Scalar(frame.origin.y)),
            Key::Position => Some(Value::Point(frame.origin)),
            Key::Width => Some(Value::Scalar(frame.size.width)),
            Key::Height => Some(Value::Scalar(frame.size.height)),
            Key::Size => Some(Value::Size(frame.size)),
            Key::Frame => Some(Value::Rect(frame)),
            Key::Center => Some(Value::Point(frame.center())),
            Key::Alpha => Some(Value::Scalar(self.alpha.get())),
            Key::BackgroundColor => Some(Value::ColorRgb(*self.background.borrow())),
            Key::Transform => Some(Value::Matrix4x4(*self.transform.borrow())),
            _ => None,
        }
    }

    fn apply(&self, key: &Key, value: Value) {
        let mut frame = self.frame.borrow_mut();
        match (key, value) {
            (Key::X, Value::Scalar(v)) => frame.origin.x = v,
            (Key::Y, Value::Scalar(v)) => frame.origin.y = v,
            (Key::Position, Value::Point(p)) => frame.origin = p,
            (Key::Width, Value::Scalar(v)) => frame.size.width = v,
            (Key::Height, Value::Scalar(v)) => frame.size.height = v,
            (Key::Size, Value::Size(s)) => frame.size = s,
            (Key::Frame, Value::Rect(r)) => *frame = r,
            (Key::Center, Value::Point(p)) => *frame = frame.with_center(p),
            (Key::Alpha, Value::Scalar(v)) => self.alpha.set(v),
            (Key::BackgroundColor, Value::ColorRgb(c)) => *self.background.borrow_mut() = c,
            (Key::Transform, Value::Matrix4x4(m)) => *self.transform.borrow_mut() = m,
            _ => {}
        }
    }
}

/// Shared counter for callback assertions.
pub fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
    let count = Rc::new(Cell::new(0u32));
    let clone = count.clone();
    (count, move || clone.set(clone.get() + 1))
}
