use std::cell::Cell;
use std::rc::Rc;

use cabbie_animation_core::{
    Animatable, AnimationError, AnimationState, Channel, ColorAnimation, DirectionAnimation, Goal,
    LightKind, LinearTween, ObjectId, RotationAnimation, ScaleAnimation, Scene, TargetRef,
    TranslationAnimation,
};

fn approx(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn scene_with_cube() -> (Scene, ObjectId) {
    let mut scene = Scene::default();
    let cube = scene.create_object("cube");
    scene.add_root(cube).unwrap();
    (scene, cube)
}

fn run_until_ended(anim: &mut dyn Animatable, scene: &mut Scene, dt: f64, max_ticks: usize) {
    for _ in 0..max_ticks {
        if anim.is_ended() {
            return;
        }
        anim.tick(dt, scene);
    }
    assert!(anim.is_ended(), "animation did not end within {max_ticks} ticks");
}

fn counter() -> (Rc<Cell<u32>>, Box<dyn FnMut()>) {
    let count = Rc::new(Cell::new(0));
    let inner = count.clone();
    (count, Box::new(move || inner.set(inner.get() + 1)))
}

#[test]
fn translation_end_to_end() {
    let (mut scene, cube) = scene_with_cube();
    let mut anim = TranslationAnimation::new(cube, [10.0, 0.0, 0.0], 1000.0).unwrap();
    anim.prepare(&mut scene).unwrap();

    anim.tick(400.0, &mut scene);
    anim.tick(400.0, &mut scene);
    assert_eq!(anim.state(), AnimationState::Running);
    approx(scene.object(cube).unwrap().translate[0], 8.0, 1e-9);

    anim.tick(400.0, &mut scene);
    assert_eq!(scene.object(cube).unwrap().translate, [10.0, 0.0, 0.0]);
    assert_eq!(anim.state(), AnimationState::Ended);
    assert_eq!(anim.overshoot_ms(), 200.0);
}

#[test]
fn termination_snaps_to_exact_end_values() {
    let (mut scene, cube) = scene_with_cube();
    scene.object_mut(cube).unwrap().translate = [0.3, 0.1, 0.0];
    let mut anim = TranslationAnimation::new(cube, [1.0, -2.0, 0.5], 100.0).unwrap();
    anim.prepare(&mut scene).unwrap();

    run_until_ended(&mut anim, &mut scene, 7.0, 100);

    let expected = [0.3 + 1.0, 0.1 + -2.0, 0.0 + 0.5];
    assert_eq!(scene.object(cube).unwrap().translate, expected);
    assert_eq!(anim.tween().end_values(), expected);
    assert_eq!(anim.elapsed_ms(), 105.0);
    assert_eq!(anim.overshoot_ms(), 5.0);
}

#[test]
fn overshoot_counts_time_past_duration() {
    let (mut scene, cube) = scene_with_cube();
    let mut anim = TranslationAnimation::new(cube, [1.0, 0.0, 0.0], 100.0).unwrap();
    anim.prepare(&mut scene).unwrap();
    anim.tick(60.0, &mut scene);
    anim.tick(60.0, &mut scene);
    assert!(anim.is_ended());
    assert_eq!(anim.overshoot_ms(), 20.0);
}

#[test]
fn huge_delta_on_short_animation_ends_in_one_tick() {
    let (mut scene, cube) = scene_with_cube();
    let mut anim = TranslationAnimation::new(cube, [0.0, 0.0, -40.0], 1.0).unwrap();
    anim.prepare(&mut scene).unwrap();
    anim.tick(2000.0, &mut scene);
    assert!(anim.is_ended());
    assert_eq!(anim.overshoot_ms(), 1999.0);
    assert_eq!(scene.object(cube).unwrap().translate, [0.0, 0.0, -40.0]);
}

#[test]
fn prepare_again_rederives_from_current_state() {
    let (mut scene, cube) = scene_with_cube();
    let mut anim = TranslationAnimation::new(cube, [1.0, 0.0, 0.0], 100.0).unwrap();
    anim.prepare(&mut scene).unwrap();
    run_until_ended(&mut anim, &mut scene, 60.0, 10);
    assert_eq!(scene.object(cube).unwrap().translate[0], 1.0);

    scene.object_mut(cube).unwrap().translate[0] = 5.0;
    anim.prepare(&mut scene).unwrap();
    assert_eq!(anim.state(), AnimationState::Running);
    assert_eq!(anim.elapsed_ms(), 0.0);
    assert_eq!(anim.overshoot_ms(), 0.0);
    assert_eq!(anim.tween().end_values(), [6.0, 0.0, 0.0]);

    run_until_ended(&mut anim, &mut scene, 60.0, 10);
    assert_eq!(scene.object(cube).unwrap().translate, [6.0, 0.0, 0.0]);
}

#[test]
fn zero_delta_never_ends() {
    let (mut scene, cube) = scene_with_cube();
    let mut anim = TranslationAnimation::new(cube, [1.0, 0.0, 0.0], 100.0).unwrap();
    anim.prepare(&mut scene).unwrap();
    for _ in 0..10 {
        anim.tick(0.0, &mut scene);
    }
    assert_eq!(anim.state(), AnimationState::Running);
    assert_eq!(scene.object(cube).unwrap().translate, [0.0, 0.0, 0.0]);
}

#[test]
fn still_axis_below_end_does_not_block_termination() {
    let (mut scene, cube) = scene_with_cube();
    let mut anim = TranslationAnimation::new(cube, [10.0, 0.0, 0.0], 1000.0).unwrap();
    anim.prepare(&mut scene).unwrap();
    assert_eq!(anim.tween().rate(), [0.01, 0.0, 0.0]);

    // pushed below its end value from outside; zero rate counts it as reached
    scene.object_mut(cube).unwrap().translate[1] = -1.0;
    for _ in 0..3 {
        anim.tick(400.0, &mut scene);
    }
    assert_eq!(anim.state(), AnimationState::Ended);
    assert_eq!(anim.overshoot_ms(), 200.0);
    assert_eq!(scene.object(cube).unwrap().translate, [10.0, 0.0, 0.0]);
}

#[test]
fn unprepared_tick_is_noop() {
    let (mut scene, cube) = scene_with_cube();
    let mut anim = TranslationAnimation::new(cube, [1.0, 0.0, 0.0], 100.0).unwrap();
    anim.tick(50.0, &mut scene);
    assert_eq!(anim.state(), AnimationState::NotPrepared);
    assert_eq!(scene.object(cube).unwrap().translate, [0.0, 0.0, 0.0]);
}

#[test]
fn on_end_fires_once_and_ended_tick_is_noop() {
    let (mut scene, cube) = scene_with_cube();
    let (fired, callback) = counter();
    let mut anim = TranslationAnimation::new(cube, [1.0, 0.0, 0.0], 100.0).unwrap();
    anim.set_on_end(callback);
    anim.prepare(&mut scene).unwrap();
    run_until_ended(&mut anim, &mut scene, 60.0, 10);

    scene.object_mut(cube).unwrap().translate[0] = 3.0;
    anim.tick(60.0, &mut scene);
    anim.tick(60.0, &mut scene);
    assert_eq!(fired.get(), 1);
    assert_eq!(anim.elapsed_ms(), 120.0);
    assert_eq!(scene.object(cube).unwrap().translate[0], 3.0);
}

#[test]
fn rotation_around_self_uses_axis_rotation() {
    let (mut scene, cube) = scene_with_cube();
    let mut own = RotationAnimation::new(cube, [0.0, 1.5, 0.0], 300.0, true).unwrap();
    own.prepare(&mut scene).unwrap();
    run_until_ended(&mut own, &mut scene, 16.0, 100);

    let obj = scene.object(cube).unwrap();
    assert_eq!(obj.axis_rotation, [0.0, 1.5, 0.0]);
    assert_eq!(obj.rotation, [0.0, 0.0, 0.0]);

    let mut main = RotationAnimation::new(cube, [-0.5, 0.0, 0.0], 100.0, false).unwrap();
    main.prepare(&mut scene).unwrap();
    run_until_ended(&mut main, &mut scene, 16.0, 100);
    assert_eq!(scene.object(cube).unwrap().rotation, [-0.5, 0.0, 0.0]);
}

#[test]
fn scale_total_flag_selects_channel() {
    let (mut scene, cube) = scene_with_cube();
    let mut total = ScaleAnimation::new(cube, [1.0, 1.0, 1.0], 200.0, true).unwrap();
    total.prepare(&mut scene).unwrap();
    run_until_ended(&mut total, &mut scene, 33.0, 100);

    let obj = scene.object(cube).unwrap();
    assert_eq!(obj.total_scale, [2.0, 2.0, 2.0]);
    assert_eq!(obj.scale, [1.0, 1.0, 1.0]);

    let mut shrink = ScaleAnimation::new(cube, [-0.5, 0.0, 0.0], 50.0, false).unwrap();
    shrink.prepare(&mut scene).unwrap();
    run_until_ended(&mut shrink, &mut scene, 33.0, 100);
    assert_eq!(scene.object(cube).unwrap().scale, [0.5, 1.0, 1.0]);
}

#[test]
fn direction_animation_moves_light() {
    let mut scene = Scene::default();
    let sun = scene.create_light(LightKind::Directional).unwrap();
    let mut anim = DirectionAnimation::new(sun, [5.0, 10.0, -10.0], 400.0).unwrap();
    anim.prepare(&mut scene).unwrap();
    run_until_ended(&mut anim, &mut scene, 16.0, 100);
    assert_eq!(scene.light(sun).unwrap().direction, [5.0, 10.0, -10.0]);
}

#[test]
fn color_targets_absolute_value_and_keeps_alpha() {
    let (mut scene, cube) = scene_with_cube();
    scene.object_mut(cube).unwrap().color = [1.0, 1.0, 1.0, 0.5];
    let mut anim = ColorAnimation::new(cube, [0.0, 0.5, 1.0], 250.0).unwrap();
    anim.prepare(&mut scene).unwrap();
    run_until_ended(&mut anim, &mut scene, 16.0, 100);
    assert_eq!(scene.object(cube).unwrap().color, [0.0, 0.5, 1.0, 0.5]);

    // Running it again from the end color is already complete on the first tick.
    anim.prepare(&mut scene).unwrap();
    anim.tick(16.0, &mut scene);
    assert!(anim.is_ended());
}

#[test]
fn color_on_lights() {
    let mut scene = Scene::default();
    let lamp = scene.create_light(LightKind::Spot).unwrap();
    let mut anim = ColorAnimation::new(lamp, [1.0, 0.8, 0.2], 100.0).unwrap();
    anim.prepare(&mut scene).unwrap();
    run_until_ended(&mut anim, &mut scene, 30.0, 10);
    assert_eq!(scene.light(lamp).unwrap().color, [1.0, 0.8, 0.2, 1.0]);
}

#[test]
fn missing_target_fails_prepare() {
    let mut scene = Scene::default();
    let mut anim = TranslationAnimation::new(ObjectId(42), [1.0, 0.0, 0.0], 100.0).unwrap();
    let err = anim.prepare(&mut scene).unwrap_err();
    assert!(matches!(err, AnimationError::TargetNotFound { .. }));
    assert_eq!(anim.state(), AnimationState::NotPrepared);
}

#[test]
fn channel_must_exist_on_target() {
    let (mut scene, cube) = scene_with_cube();
    let mut tween = LinearTween::new(
        TargetRef::Object(cube),
        Channel::Direction,
        Goal::Offset([1.0, 0.0, 0.0]),
        10.0,
    )
    .unwrap();
    let err = tween.prepare(&mut scene).unwrap_err();
    assert!(matches!(err, AnimationError::UnsupportedChannel { .. }));
    assert_eq!(err.category(), "target");
}

#[test]
fn despawned_target_detaches_without_on_end() {
    let (mut scene, cube) = scene_with_cube();
    let (fired, callback) = counter();
    let mut anim = TranslationAnimation::new(cube, [1.0, 0.0, 0.0], 100.0).unwrap();
    anim.set_on_end(callback);
    anim.prepare(&mut scene).unwrap();
    anim.tick(30.0, &mut scene);

    scene.despawn(cube).unwrap();
    anim.tick(30.0, &mut scene);
    assert!(anim.is_ended());
    assert_eq!(anim.overshoot_ms(), 0.0);
    assert_eq!(fired.get(), 0);
}
