use std::cell::Cell;
use std::rc::Rc;

use cabbie_animation_core::{
    choreography::{hop, lane_change, shuttle_loop},
    Animatable, AnimationError, AnimationState, GroupAnimation, ObjectId, RotationAnimation,
    ScaleAnimation, Scene, StackAnimation, TranslationAnimation,
};

fn scene_with_cube() -> (Scene, ObjectId) {
    let mut scene = Scene::default();
    let cube = scene.create_object("cube");
    scene.add_root(cube).unwrap();
    (scene, cube)
}

fn translate(object: ObjectId, amount: [f64; 3], duration_ms: f64) -> Box<dyn Animatable> {
    TranslationAnimation::new(object, amount, duration_ms)
        .unwrap()
        .boxed()
}

#[test]
fn stack_carries_overshoot_into_next_child() {
    let (mut scene, cube) = scene_with_cube();
    let mut stack = StackAnimation::new(
        vec![
            translate(cube, [1.0, 0.0, 0.0], 100.0),
            translate(cube, [0.0, 1.0, 0.0], 100.0),
        ],
        false,
    )
    .unwrap();
    stack.prepare(&mut scene).unwrap();

    stack.tick(70.0, &mut scene);
    stack.tick(70.0, &mut scene);
    assert_eq!(stack.current_index(), 1);
    assert_eq!(stack.leftover_ms(), 40.0);
    assert_eq!(stack.children()[0].overshoot_ms(), 40.0);
    assert_eq!(scene.object(cube).unwrap().translate, [1.0, 0.0, 0.0]);

    stack.tick(10.0, &mut scene);
    assert_eq!(stack.children()[1].elapsed_ms(), 50.0);
    assert_eq!(stack.leftover_ms(), 0.0);

    stack.tick(60.0, &mut scene);
    assert!(stack.is_ended());
    assert_eq!(stack.overshoot_ms(), 10.0);
    assert_eq!(scene.object(cube).unwrap().translate, [1.0, 1.0, 0.0]);
}

#[test]
fn stack_on_end_fires_after_last_child() {
    let (mut scene, cube) = scene_with_cube();
    let fired = Rc::new(Cell::new(0));
    let seen = fired.clone();
    let mut stack = StackAnimation::new(
        vec![
            translate(cube, [1.0, 0.0, 0.0], 50.0),
            translate(cube, [-1.0, 0.0, 0.0], 50.0),
        ],
        false,
    )
    .unwrap();
    stack.set_on_end(Box::new(move || seen.set(seen.get() + 1)));
    stack.prepare(&mut scene).unwrap();

    for _ in 0..10 {
        stack.tick(30.0, &mut scene);
    }
    assert!(stack.is_ended());
    assert_eq!(fired.get(), 1);
    assert_eq!(scene.object(cube).unwrap().translate, [0.0, 0.0, 0.0]);
}

fn spin(object: ObjectId, angles: [f64; 3], duration_ms: f64) -> Box<dyn Animatable> {
    RotationAnimation::new(object, angles, duration_ms, true)
        .unwrap()
        .boxed()
}

#[test]
fn group_waits_for_longest_child_and_reports_max_overshoot() {
    let (mut scene, cube) = scene_with_cube();
    let mut group = GroupAnimation::new(
        vec![
            spin(cube, [0.0, 0.0, 3.0], 200.0),
            ScaleAnimation::new(cube, [0.0, 2.0, 0.0], 50.0, false)
                .unwrap()
                .boxed(),
            translate(cube, [1.0, 0.0, 0.0], 230.0),
        ],
        false,
    )
    .unwrap();
    group.prepare(&mut scene).unwrap();
    assert_eq!(group.lifecycle().duration_ms(), 230.0);

    group.tick(120.0, &mut scene);
    assert_eq!(group.state(), AnimationState::Running);
    assert!(group.children()[1].is_ended());
    assert_eq!(group.running_children(), 2);

    group.tick(120.0, &mut scene);
    assert!(group.is_ended());
    // the scale child ended first but overshot most: 70 against 40 and 10
    assert_eq!(group.children()[0].overshoot_ms(), 40.0);
    assert_eq!(group.children()[1].overshoot_ms(), 70.0);
    assert_eq!(group.children()[2].overshoot_ms(), 10.0);
    assert_eq!(group.overshoot_ms(), 70.0);
    assert_eq!(group.children()[1].elapsed_ms(), 120.0);
    let obj = scene.object(cube).unwrap();
    assert_eq!(obj.translate, [1.0, 0.0, 0.0]);
    assert_eq!(obj.scale, [1.0, 3.0, 1.0]);
    assert_eq!(obj.axis_rotation, [0.0, 0.0, 3.0]);
}

#[test]
fn repeating_group_never_ends_and_restarts_from_live_state() {
    let (mut scene, cube) = scene_with_cube();
    let fired = Rc::new(Cell::new(0));
    let seen = fired.clone();
    let mut group = GroupAnimation::new(
        vec![
            translate(cube, [1.0, 0.0, 0.0], 100.0),
            spin(cube, [0.0, 1.0, 0.0], 50.0),
        ],
        true,
    )
    .unwrap();
    group.set_on_end(Box::new(move || seen.set(seen.get() + 1)));
    group.prepare(&mut scene).unwrap();

    group.tick(60.0, &mut scene);
    assert!(group.children()[1].is_ended());
    // moved after the spin finished; the next cycle spins from here
    scene.object_mut(cube).unwrap().axis_rotation = [0.0, 5.0, 0.0];

    group.tick(60.0, &mut scene);
    assert_eq!(group.cycles(), 1);
    assert_eq!(group.state(), AnimationState::Running);
    assert_eq!(group.running_children(), 2);

    group.tick(60.0, &mut scene);
    group.tick(60.0, &mut scene);
    assert_eq!(group.cycles(), 2);
    let obj = scene.object(cube).unwrap();
    assert_eq!(obj.translate, [2.0, 0.0, 0.0]);
    assert_eq!(obj.axis_rotation, [0.0, 6.0, 0.0]);

    for _ in 0..50 {
        group.tick(60.0, &mut scene);
    }
    assert!(!group.is_ended());
    assert!(group.cycles() > 2);
    assert_eq!(fired.get(), 0);
}

#[test]
fn combinators_reject_empty_children() {
    let err = StackAnimation::new(Vec::new(), true).unwrap_err();
    assert!(matches!(err, AnimationError::InvalidArgument { .. }));
    assert!(GroupAnimation::new(Vec::new(), false).is_err());
}

#[test]
fn repeating_stack_loops_with_leftover() {
    let (mut scene, cube) = scene_with_cube();
    let mut stack = StackAnimation::new(
        vec![
            translate(cube, [10.0, 0.0, 0.0], 1000.0),
            translate(cube, [-10.0, 0.0, 0.0], 1.0),
        ],
        true,
    )
    .unwrap();
    stack.prepare(&mut scene).unwrap();

    for _ in 0..4 {
        stack.tick(300.0, &mut scene);
    }
    // A ended at 1200ms with 200ms overshoot, B is active and owed that time.
    assert_eq!(stack.current_index(), 1);
    assert_eq!(stack.leftover_ms(), 200.0);
    assert_eq!(scene.object(cube).unwrap().translate[0], 10.0);

    stack.tick(300.0, &mut scene);
    // B got 500ms, ended with 499ms overshoot and the stack looped to A.
    assert_eq!(stack.cycles(), 1);
    assert_eq!(stack.current_index(), 0);
    assert_eq!(stack.leftover_ms(), 499.0);
    assert_eq!(scene.object(cube).unwrap().translate[0], 0.0);
    assert_eq!(stack.state(), AnimationState::Running);

    stack.tick(300.0, &mut scene);
    assert_eq!(stack.children()[0].elapsed_ms(), 799.0);
}

#[test]
fn repeat_rederives_from_mutated_state() {
    let (mut scene, cube) = scene_with_cube();
    let mut stack = StackAnimation::new(
        vec![
            translate(cube, [1.0, 0.0, 0.0], 100.0),
            spin(cube, [0.0, 1.0, 0.0], 100.0),
        ],
        true,
    )
    .unwrap();
    stack.prepare(&mut scene).unwrap();

    stack.tick(60.0, &mut scene);
    stack.tick(60.0, &mut scene);
    assert_eq!(stack.current_index(), 1);

    // Moved while the spin runs; the next cycle translates from here.
    scene.object_mut(cube).unwrap().translate[0] = 5.0;
    stack.tick(60.0, &mut scene);
    stack.tick(60.0, &mut scene);
    assert_eq!(stack.cycles(), 1);
    assert_eq!(stack.current_index(), 0);
    assert_eq!(stack.leftover_ms(), 40.0);
    assert_eq!(scene.object(cube).unwrap().translate[0], 5.0);

    stack.tick(60.0, &mut scene);
    assert_eq!(stack.current_index(), 1);
    assert_eq!(scene.object(cube).unwrap().translate, [6.0, 0.0, 0.0]);
    assert!(!stack.is_ended());
}

#[test]
fn repeating_stack_never_ends_and_returns_to_start_each_cycle() {
    let (mut scene, cube) = scene_with_cube();
    let mut lamp = shuttle_loop(cube, [0.0, 0.0, 40.0], 3000.0).unwrap();
    lamp.prepare(&mut scene).unwrap();

    let mut last_cycle = 0;
    for _ in 0..1000 {
        lamp.tick(16.0, &mut scene);
        assert!(!lamp.is_ended());
        if lamp.cycles() != last_cycle {
            last_cycle = lamp.cycles();
            assert_eq!(scene.object(cube).unwrap().translate, [0.0, 0.0, 0.0]);
        }
    }
    assert!(last_cycle >= 5);
}

#[test]
fn hop_lands_level() {
    let (mut scene, cube) = scene_with_cube();
    let mut jump = hop(cube, 1.5, [-0.2, 0.0, 0.0], 500.0).unwrap();
    jump.prepare(&mut scene).unwrap();

    for _ in 0..50 {
        if jump.is_ended() {
            break;
        }
        jump.tick(100.0, &mut scene);
    }
    assert!(jump.is_ended());
    let obj = scene.object(cube).unwrap();
    assert_eq!(obj.translate, [0.0, 0.0, 0.0]);
    assert_eq!(obj.axis_rotation, [0.0, 0.0, 0.0]);
}

#[test]
fn lane_change_moves_sideways() {
    let (mut scene, cube) = scene_with_cube();
    let mut change = lane_change(cube, -1.2, 600.0).unwrap();
    change.prepare(&mut scene).unwrap();
    for _ in 0..10 {
        change.tick(100.0, &mut scene);
    }
    assert!(change.is_ended());
    assert_eq!(scene.object(cube).unwrap().translate, [-1.2, 0.0, 0.0]);
}

#[test]
fn stack_detaches_when_next_target_is_gone() {
    let (mut scene, cube) = scene_with_cube();
    let other = scene.create_object("sphere");
    let mut stack = StackAnimation::new(
        vec![
            translate(cube, [1.0, 0.0, 0.0], 50.0),
            translate(other, [1.0, 0.0, 0.0], 50.0),
        ],
        false,
    )
    .unwrap();
    stack.prepare(&mut scene).unwrap();
    scene.despawn(other).unwrap();

    stack.tick(60.0, &mut scene);
    assert!(stack.is_ended());
    assert_eq!(stack.overshoot_ms(), 0.0);
}
