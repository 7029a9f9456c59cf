//! Scene Lifecycle Tests - Mount Contents, Teardown, and Settling
//!
//! Headless coverage of the scene contract: what a freshly-mounted world
//! contains, that the ground never moves, that unmount is idempotent and
//! freezes the runner, and that a dropped box actually falls and comes to
//! rest on the ground through the external engine.

use approx::assert_relative_eq;
use box_sim::runner::STEP_DT;
use box_sim::scene::Scene;
use glam::Vec2;

/// Step the mounted world a fixed number of times, bypassing the
/// frame-time accumulator so tests are deterministic.
fn step_n(scene: &mut Scene, n: usize) {
    let world = scene.world_mut().expect("scene must be mounted");
    for _ in 0..n {
        world.step(STEP_DT);
    }
}

// ============================================================================
// Mount contents
// ============================================================================

#[test]
fn mounted_scene_contains_three_bodies_and_one_constraint() {
    let mut scene = Scene::new();
    scene.mount();

    let world = scene.world().unwrap();
    assert_eq!(world.body_count(), 3);
    assert_eq!(world.dynamic_body_count(), 2);
    assert_eq!(world.fixed_body_count(), 1);
    assert_eq!(world.constraint_count(), 1);

    let spring = world.mouse_spring().unwrap();
    assert_eq!(spring.stiffness, 0.2);
    assert!(!spring.visible, "drag line must start hidden");
}

#[test]
fn mounting_twice_does_not_duplicate_resources() {
    let mut scene = Scene::new();
    scene.mount();
    scene.mount();

    let world = scene.world().unwrap();
    assert_eq!(world.body_count(), 3);
    assert_eq!(world.constraint_count(), 1);
}

#[test]
fn initial_bodies_sit_at_their_starting_positions() {
    let mut scene = Scene::new();
    scene.mount();

    let bodies = scene.bodies().unwrap();
    let world = scene.world().unwrap();

    assert_eq!(world.translation(bodies.box_a), Some(Vec2::new(400.0, 200.0)));
    assert_eq!(world.translation(bodies.box_b), Some(Vec2::new(450.0, 50.0)));
    assert_eq!(world.translation(bodies.ground), Some(Vec2::new(400.0, 610.0)));
}

// ============================================================================
// Static ground invariant
// ============================================================================

#[test]
fn ground_never_moves() {
    let mut scene = Scene::new();
    scene.mount();

    let ground = scene.bodies().unwrap().ground;
    let before = scene.world().unwrap().translation(ground).unwrap();

    step_n(&mut scene, 600);

    let world = scene.world().unwrap();
    let after = world.translation(ground).unwrap();
    assert_relative_eq!(after.x, before.x);
    assert_relative_eq!(after.y, before.y);
    assert_relative_eq!(world.rotation(ground).unwrap(), 0.0);
}

// ============================================================================
// Teardown
// ============================================================================

#[test]
fn unmount_twice_is_safe() {
    let mut scene = Scene::new();
    scene.mount();
    step_n(&mut scene, 10);

    scene.unmount();
    scene.unmount();

    assert!(!scene.is_mounted());
    assert!(scene.world().is_none());
    assert!(scene.bodies().is_none());
}

#[test]
fn unmounted_scene_ignores_all_operations() {
    let mut scene = Scene::new();
    scene.mount();
    scene.unmount();

    assert_eq!(scene.advance(1.0), 0);
    assert!(!scene.begin_drag(Vec2::new(400.0, 200.0)));
    assert!(scene.spawn_box(Vec2::new(100.0, 100.0)).is_none());
    scene.drag_to(Vec2::new(0.0, 0.0));
    scene.end_drag();
}

#[test]
fn runner_stops_ticking_after_unmount() {
    let mut scene = Scene::new();
    scene.mount();

    assert!(scene.runner().is_running());
    assert!(scene.advance(4.5 * STEP_DT) > 0);
    let ticks_at_unmount = scene.runner().total_steps();

    scene.unmount();
    assert!(!scene.runner().is_running());

    for _ in 0..10 {
        assert_eq!(scene.advance(1.0), 0);
    }
    assert_eq!(scene.runner().total_steps(), ticks_at_unmount);
}

#[test]
fn remount_after_unmount_rebuilds_the_scene() {
    let mut scene = Scene::new();
    scene.mount();
    step_n(&mut scene, 120);
    scene.unmount();
    scene.mount();

    let bodies = scene.bodies().unwrap();
    let world = scene.world().unwrap();
    assert_eq!(world.body_count(), 3);
    assert_eq!(world.translation(bodies.box_a), Some(Vec2::new(400.0, 200.0)));
}

// ============================================================================
// Gravity and collision resolution (external engine, observed end to end)
// ============================================================================

#[test]
fn box_a_falls_then_rests_on_the_ground() {
    let mut scene = Scene::new();
    scene.mount();

    let box_a = scene.bodies().unwrap().box_a;

    // Free fall: y (downward) strictly increases every step.
    let mut prev_y = scene.world().unwrap().translation(box_a).unwrap().y;
    for _ in 0..30 {
        step_n(&mut scene, 1);
        let y = scene.world().unwrap().translation(box_a).unwrap().y;
        assert!(y > prev_y, "box A should fall: {y} !> {prev_y}");
        prev_y = y;
    }

    // Let everything land and settle (10 s of simulation).
    step_n(&mut scene, 600);
    let world = scene.world().unwrap();
    let settled = world.translation(box_a).unwrap();

    // Resting on the ground: center well below the drop point, above the
    // ground surface (top edge at y = 580).
    assert!(
        settled.y > 480.0 && settled.y < 581.0,
        "box A should rest near the ground, got y = {}",
        settled.y
    );
    assert!(
        world.linear_velocity(box_a).unwrap().length() < 1.0,
        "box A should have stopped moving"
    );

    // And it stays put.
    step_n(&mut scene, 120);
    let after = scene.world().unwrap().translation(box_a).unwrap();
    assert!((after.y - settled.y).abs() < 1.0, "box A should stay at rest");
}

// ============================================================================
// Dragging
// ============================================================================

#[test]
fn dragging_pulls_a_box_toward_the_pointer() {
    let mut scene = Scene::new();
    scene.mount();

    let box_a = scene.bodies().unwrap().box_a;

    // Grab box A at its center and pull to the right.
    assert!(scene.begin_drag(Vec2::new(400.0, 200.0)));
    scene.drag_to(Vec2::new(600.0, 200.0));
    step_n(&mut scene, 60);

    let x = scene.world().unwrap().translation(box_a).unwrap().x;
    assert!(x > 450.0, "box A should move toward the drag target, got x = {x}");

    scene.end_drag();
    let world = scene.world().unwrap();
    assert!(!world.mouse_spring().unwrap().is_active());
    // The constraint itself stays in the world after release.
    assert_eq!(world.constraint_count(), 1);
}

#[test]
fn the_ground_cannot_be_grabbed() {
    let mut scene = Scene::new();
    scene.mount();

    assert!(!scene.begin_drag(Vec2::new(400.0, 610.0)));
    assert!(!scene.begin_drag(Vec2::new(100.0, 400.0)));
}

#[test]
fn spawned_boxes_join_the_simulation() {
    let mut scene = Scene::new();
    scene.mount();

    let spawned = scene.spawn_box(Vec2::new(200.0, 100.0)).unwrap();
    let world = scene.world().unwrap();
    assert_eq!(world.body_count(), 4);
    assert_eq!(world.dynamic_body_count(), 3);

    let before = world.translation(spawned).unwrap().y;
    step_n(&mut scene, 30);
    let after = scene.world().unwrap().translation(spawned).unwrap().y;
    assert!(after > before, "spawned box should fall");
}
