//! Drives a position + alpha tween at 60 fps and prints the frames.
//!
//! ```sh
//! cargo run -p kinetic_tween --example fade_and_move
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kinetic_core::{Easing, Point, Value};
use kinetic_tween::{Engine, Key, Prop, Tween, TweenTarget};

struct Box2D {
    position: RefCell<Point>,
    alpha: Cell<f64>,
}

impl TweenTarget for Box2D {
    fn value_for(&self, key: &Key) -> Option<Value> {
        match key {
            Key::Position => Some(Value::Point(*self.position.borrow())),
            Key::Alpha => Some(Value::Scalar(self.alpha.get())),
            _ => None,
        }
    }

    fn apply(&self, key: &Key, value: Value) {
        match (key, value) {
            (Key::Position, Value::Point(p)) => *self.position.borrow_mut() = p,
            (Key::Alpha, Value::Scalar(v)) => self.alpha.set(v),
            _ => {}
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let target = Rc::new(Box2D {
        position: RefCell::new(Point::new(0.0, 0.0)),
        alpha: Cell::new(0.0),
    });

    let mut engine = Engine::new();
    engine.play(
        Tween::new(&target)
            .to([Prop::position(320.0, 240.0), Prop::alpha(1.0)])
            .duration(0.5)
            .ease(Easing::QuadOut)
            .on_complete(|| println!("arrived")),
    );

    let dt = 1.0 / 60.0;
    let mut frame = 0;
    while !engine.is_empty() {
        engine.tick(dt);
        frame += 1;
        let p = *target.position.borrow();
        println!(
            "frame {frame:>2}: position ({:>6.1}, {:>6.1})  alpha {:.2}",
            p.x,
            p.y,
            target.alpha.get()
        );
    }
}
