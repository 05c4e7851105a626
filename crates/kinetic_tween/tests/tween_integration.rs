//! End-to-end tween playback through the engine.

mod common;

use common::{counter, Node};
use kinetic_core::{Color, Easing, Matrix4x4, Vector3};
use kinetic_tween::{Engine, Prop, Tween};

#[test]
fn linear_tween_moves_target_and_retires() {
    let node = Node::new();
    let mut engine = Engine::new();

    engine.play(Tween::new(&node).to([Prop::x(100.0)]).duration(1.0));
    assert_eq!(engine.len(), 1);

    engine.tick(0.5);
    assert!((node.x() - 50.0).abs() < 1e-9);

    engine.tick(0.5);
    assert!((node.x() - 100.0).abs() < 1e-9);
    assert!(engine.is_empty());
}

#[test]
fn easing_shapes_the_motion() {
    let node = Node::new();
    let mut engine = Engine::new();

    engine.play(
        Tween::new(&node)
            .to([Prop::x(100.0)])
            .duration(1.0)
            .ease(Easing::QuadOut),
    );

    engine.tick(0.5);
    // Ease-out runs ahead of linear at the midpoint.
    assert!(node.x() > 55.0 && node.x() < 100.0);
}

#[test]
fn callbacks_fire_in_order_and_complete_fires_once() {
    let node = Node::new();
    let mut engine = Engine::new();

    let (starts, on_start) = counter();
    let (updates, on_update) = counter();
    let (completes, on_complete) = counter();

    engine.play(
        Tween::new(&node)
            .to([Prop::alpha(0.0)])
            .duration(1.0)
            .on_start(on_start)
            .on_update(on_update)
            .on_complete(on_complete),
    );

    engine.tick(0.25);
    assert_eq!(starts.get(), 1);
    assert_eq!(updates.get(), 1);
    assert_eq!(completes.get(), 0);

    engine.tick(0.25);
    assert_eq!(starts.get(), 1);
    assert_eq!(updates.get(), 2);

    engine.tick(1.0);
    assert_eq!(completes.get(), 1);
    assert!(engine.is_empty());
}

#[test]
fn delay_holds_the_start_value() {
    let node = Node::new();
    let mut engine = Engine::new();

    engine.play(
        Tween::new(&node)
            .to([Prop::x(100.0)])
            .delay(0.5)
            .duration(1.0),
    );

    engine.tick(0.4);
    assert!((node.x() - 0.0).abs() < 1e-9);

    engine.tick(0.6);
    assert!((node.x() - 50.0).abs() < 1e-9);
}

#[test]
fn repeat_and_yoyo_return_to_the_start() {
    let node = Node::new();
    let mut engine = Engine::new();

    let (repeats, on_repeat) = counter();
    let id = engine.play(
        Tween::new(&node)
            .to([Prop::x(100.0)])
            .duration(1.0)
            .repeat(1)
            .yoyo(true)
            .on_repeat(on_repeat),
    );

    engine.tick(1.5);
    // Second cycle runs reversed, so at 1.5 the value is on its way back.
    assert!((node.x() - 50.0).abs() < 1e-9);
    assert_eq!(repeats.get(), 1);
    assert!(engine.animation(id).is_some());

    engine.tick(0.5);
    assert!((node.x() - 0.0).abs() < 1e-9);
    assert!(engine.is_empty());
}

#[test]
fn time_scale_stretches_playback() {
    let node = Node::new();
    let mut engine = Engine::new();

    let id = engine.play(Tween::new(&node).to([Prop::x(100.0)]).duration(1.0));
    engine
        .animation_mut(id)
        .unwrap()
        .playback_mut()
        .set_speed(2.0);

    engine.tick(0.25);
    assert!((node.x() - 50.0).abs() < 1e-9);
}

#[test]
fn time_scale_never_drops_below_the_floor() {
    let node = Node::new();
    let mut engine = Engine::new();

    let id = engine.play(Tween::new(&node).to([Prop::x(100.0)]).duration(1.0));
    let playback = engine.animation_mut(id).unwrap().playback_mut();
    playback.set_speed(0.01);
    assert!((playback.time_scale() - 0.1).abs() < 1e-9);

    playback.set_speed(0.3);
    playback.slower();
    assert!((playback.time_scale() - 0.1).abs() < 1e-9);
}

#[test]
fn spring_tween_runs_past_its_nominal_duration() {
    let node = Node::new();
    let mut engine = Engine::new();

    let (completes, on_complete) = counter();
    engine.play(
        Tween::new(&node)
            .to([Prop::x(100.0)])
            .duration(0.5)
            .spring(210.0, 20.0)
            .on_complete(on_complete),
    );

    // Well past the nominal duration the spring may still be moving,
    // but it must settle eventually and only then complete.
    for _ in 0..600 {
        engine.tick(1.0 / 60.0);
        if engine.is_empty() {
            break;
        }
    }
    assert!(engine.is_empty());
    assert_eq!(completes.get(), 1);
    assert!((node.x() - 100.0).abs() < 1e-6);
}

#[test]
fn from_mode_snaps_then_returns_to_current() {
    let node = Node::new();
    node.frame.borrow_mut().origin.x = 40.0;
    let mut engine = Engine::new();

    engine.play(Tween::new(&node).from([Prop::x(0.0)]).duration(1.0));

    engine.tick(0.0);
    assert!((node.x() - 0.0).abs() < 1e-9);

    engine.tick(0.5);
    assert!((node.x() - 20.0).abs() < 1e-9);

    engine.tick(0.5);
    assert!((node.x() - 40.0).abs() < 1e-9);
}

#[test]
fn pause_freezes_progress_without_retiring() {
    let node = Node::new();
    let mut engine = Engine::new();

    let id = engine.play(Tween::new(&node).to([Prop::x(100.0)]).duration(1.0));
    engine.tick(0.25);
    engine.animation_mut(id).unwrap().playback_mut().pause();

    engine.tick(10.0);
    assert!((node.x() - 25.0).abs() < 1e-9);
    assert_eq!(engine.len(), 1);

    engine.animation_mut(id).unwrap().playback_mut().resume();
    engine.tick(0.25);
    assert!((node.x() - 50.0).abs() < 1e-9);
}

#[test]
fn seek_scrubs_without_real_time() {
    let node = Node::new();
    let mut engine = Engine::new();

    let id = engine.play(Tween::new(&node).to([Prop::x(100.0)]).duration(2.0));
    engine.seek(id, 1.5);
    assert!((node.x() - 75.0).abs() < 1e-9);

    engine.seek(id, 0.5);
    assert!((node.x() - 25.0).abs() < 1e-9);
}

#[test]
fn stop_freezes_the_value_and_retires() {
    let node = Node::new();
    let mut engine = Engine::new();

    let id = engine.play(Tween::new(&node).to([Prop::x(100.0)]).duration(1.0));
    engine.tick(0.3);
    engine.animation_mut(id).unwrap().playback_mut().stop();

    engine.tick(0.1);
    assert!(engine.is_empty());
    // No further applies after the stop.
    assert!((node.x() - 30.0).abs() < 1e-9);
}

#[test]
fn restart_replays_from_the_top() {
    let node = Node::new();
    let mut engine = Engine::new();

    let id = engine.play(Tween::new(&node).to([Prop::x(100.0)]).duration(1.0));
    engine.tick(0.6);
    assert!((node.x() - 60.0).abs() < 1e-9);

    engine.animation_mut(id).unwrap().playback_mut().restart(false);
    engine.tick(0.3);
    assert!((node.x() - 30.0).abs() < 1e-9);
}

#[test]
fn forever_tween_never_retires_on_its_own() {
    let node = Node::new();
    let mut engine = Engine::new();

    engine.play(
        Tween::new(&node)
            .to([Prop::x(100.0)])
            .duration(0.25)
            .forever()
            .yoyo(true),
    );
    for _ in 0..100 {
        engine.tick(0.1);
    }
    assert_eq!(engine.len(), 1);

    engine.kill_all();
    assert!(engine.is_empty());
}

#[test]
fn total_progress_addresses_the_whole_repeat_sequence() {
    let node = Node::new();
    let mut tween = Tween::new(&node).to([Prop::x(100.0)]).duration(1.0).repeat(1);
    tween.playback_mut().play();

    let mut chain = kinetic_tween::ChainCache::default();
    let mut ctx = kinetic_tween::TickCtx::new(&mut chain);

    // 0.75 of a 2-cycle run lands halfway into the second cycle.
    tween.set_total_progress(0.75, &mut ctx);
    assert_eq!(tween.playback().cycle(), 1);
    assert!((node.x() - 50.0).abs() < 1e-9);
}

#[test]
fn merged_position_props_move_together() {
    let node = Node::new();
    let mut engine = Engine::new();

    engine.play(
        Tween::new(&node)
            .to([Prop::x(100.0), Prop::y(50.0)])
            .duration(1.0),
    );

    engine.tick(0.5);
    let origin = node.origin();
    assert!((origin.x - 50.0).abs() < 1e-9);
    assert!((origin.y - 25.0).abs() < 1e-9);
}

#[test]
fn merged_size_props_resize_together() {
    let node = Node::new();
    let mut engine = Engine::new();

    // Node starts at 100x100.
    engine.play(
        Tween::new(&node)
            .to([Prop::width(200.0), Prop::height(50.0)])
            .duration(1.0),
    );

    engine.tick(0.5);
    let frame = *node.frame.borrow();
    assert!((frame.size.width - 150.0).abs() < 1e-9);
    assert!((frame.size.height - 75.0).abs() < 1e-9);
}

#[test]
fn position_and_size_merge_into_one_frame() {
    let node = Node::new();
    let mut engine = Engine::new();

    engine.play(
        Tween::new(&node)
            .to([
                Prop::x(100.0),
                Prop::y(100.0),
                Prop::width(200.0),
                Prop::height(200.0),
            ])
            .duration(1.0),
    );

    engine.tick(0.5);
    let frame = *node.frame.borrow();
    assert!((frame.origin.x - 50.0).abs() < 1e-9);
    assert!((frame.origin.y - 50.0).abs() < 1e-9);
    assert!((frame.size.width - 150.0).abs() < 1e-9);
    assert!((frame.size.height - 150.0).abs() < 1e-9);

    engine.tick(0.5);
    assert!(engine.is_empty());
    assert_eq!(node.width(), 200.0);
}

#[test]
fn background_color_tweens_componentwise() {
    let node = Node::new();
    let mut engine = Engine::new();

    // White toward opaque red.
    engine.play(
        Tween::new(&node)
            .to([Prop::background_color(Color::rgb(1.0, 0.0, 0.0))])
            .duration(1.0),
    );

    engine.tick(0.5);
    let color = *node.background.borrow();
    assert!((color.r - 1.0).abs() < 1e-9);
    assert!((color.g - 0.5).abs() < 1e-9);
    assert!((color.b - 0.5).abs() < 1e-9);
    assert!((color.a - 1.0).abs() < 1e-9);
}

#[test]
fn transform_channels_compose_in_declaration_order() {
    let scaled_then_moved = Node::new();
    let moved_then_scaled = Node::new();
    let mut engine = Engine::new();

    engine.play(
        Tween::new(&scaled_then_moved)
            .to([Prop::scale(2.0), Prop::translate(10.0, 0.0)])
            .duration(1.0),
    );
    engine.play(
        Tween::new(&moved_then_scaled)
            .to([Prop::translate(10.0, 0.0), Prop::scale(2.0)])
            .duration(1.0),
    );

    engine.tick(1.0);

    // Scale applied outside the translation doubles the offset.
    assert!((scaled_then_moved.transform.borrow().m[3] - 20.0).abs() < 1e-9);
    assert!((moved_then_scaled.transform.borrow().m[3] - 10.0).abs() < 1e-9);
}

#[test]
fn transform_from_side_defaults_to_the_current_value() {
    let node = Node::new();
    *node.transform.borrow_mut() = Matrix4x4::scale(Vector3::new(3.0, 3.0, 1.0));
    let mut engine = Engine::new();

    engine.play(Tween::new(&node).to([Prop::scale(1.0)]).duration(1.0));
    engine.tick(0.5);

    // Halfway between the live scale 3 and the declared scale 1.
    let m = *node.transform.borrow();
    assert!((m.scale_component().x - 2.0).abs() < 1e-9);
    assert!((m.scale_component().y - 2.0).abs() < 1e-9);
}

#[test]
fn reverse_runs_back_to_the_start_and_completes() {
    let node = Node::new();
    let mut engine = Engine::new();

    let (completes, on_complete) = counter();
    let id = engine.play(
        Tween::new(&node)
            .to([Prop::x(100.0)])
            .duration(1.0)
            .on_complete(on_complete),
    );

    engine.tick(0.5);
    assert!((node.x() - 50.0).abs() < 1e-9);

    engine
        .animation_mut(id)
        .unwrap()
        .playback_mut()
        .reverse();
    engine.tick(0.6);

    assert!((node.x() - 0.0).abs() < 1e-9);
    assert_eq!(completes.get(), 1);
    assert!(engine.is_empty());
}

#[test]
fn zero_duration_applies_the_final_value_on_the_next_tick() {
    let node = Node::new();
    let mut engine = Engine::new();

    engine.play(Tween::new(&node).to([Prop::x(100.0)]));
    assert_eq!(node.x(), 0.0);

    engine.tick(1.0 / 60.0);
    assert!((node.x() - 100.0).abs() < 1e-9);
    assert!(engine.is_empty());
}

#[test]
fn from_to_ignores_the_live_value() {
    let node = Node::new();
    node.frame.borrow_mut().origin.x = 42.0;
    let mut engine = Engine::new();

    engine.play(
        Tween::new(&node)
            .from_to([Prop::x(200.0)], [Prop::x(300.0)])
            .duration(1.0),
    );

    engine.tick(0.0);
    assert!((node.x() - 200.0).abs() < 1e-9);
    engine.tick(0.5);
    assert!((node.x() - 250.0).abs() < 1e-9);
}

#[test]
fn center_prop_moves_the_frame_center() {
    let node = Node::new();
    let mut engine = Engine::new();

    // 100x100 frame at the origin, center (50, 50), toward (150, 50).
    engine.play(
        Tween::new(&node)
            .to([Prop::center(150.0, 50.0)])
            .duration(1.0),
    );

    engine.tick(1.0);
    let frame = *node.frame.borrow();
    assert!((frame.center().x - 150.0).abs() < 1e-9);
    assert!((frame.origin.x - 100.0).abs() < 1e-9);
    assert!((frame.origin.y - 0.0).abs() < 1e-9);
}
