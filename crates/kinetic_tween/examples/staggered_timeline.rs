//! Springs three bars up with staggered starts and a scheduled callback.
//!
//! ```sh
//! cargo run -p kinetic_tween --example staggered_timeline
//! ```

use kinetic_tween::{Engine, NumericFields, Prop, Timeline};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let bars: Vec<_> = (0..3)
        .map(|_| {
            let bar = NumericFields::new();
            bar.set("height", 0.0);
            bar
        })
        .collect();
    let props: Vec<Vec<Prop>> = (0..3).map(|_| vec![Prop::field("height", 100.0)]).collect();

    // Staggered starts, 0.15 s apart.
    let mut timeline = Timeline::staggered(&bars, &props, 0.15, |tween| {
        tween.duration(0.4).spring(210.0, 20.0)
    });
    timeline.add_label("tail", 0.30);
    timeline.add_callback(0.30, || println!("-- last bar launched --"));

    let mut engine = Engine::new();
    engine.play(timeline);

    let dt = 1.0 / 30.0;
    let mut elapsed = 0.0;
    while !engine.is_empty() && elapsed < 5.0 {
        engine.tick(dt);
        elapsed += dt;
        println!(
            "t={elapsed:.2}  a={:>6.1}  b={:>6.1}  c={:>6.1}",
            bars[0].get("height").unwrap(),
            bars[1].get("height").unwrap(),
            bars[2].get("height").unwrap()
        );
    }
}
