//! Scene lifecycle
//!
//! One mounted scene owns one world, one drag constraint, and one runner.
//! `mount` builds them, `unmount` releases them; unmount is guarded so it
//! is safe to call on an already-cleared scene, and `Drop` runs it too.

use glam::Vec2;
use rand::Rng;
use rapier2d::prelude::RigidBodyHandle;

use crate::drag::{MouseSpring, DRAG_STIFFNESS};
use crate::runner::Runner;
use crate::world::{BoxSpec, PhysicsWorld};

/// Scene rectangle in display units.
pub const SCENE_WIDTH: f32 = 800.0;
pub const SCENE_HEIGHT: f32 = 600.0;

pub const BOX_A_COLOR: [f32; 4] = [0.36, 0.55, 0.89, 1.0];
pub const BOX_B_COLOR: [f32; 4] = [0.89, 0.50, 0.33, 1.0];
pub const GROUND_COLOR: [f32; 4] = [0.35, 0.38, 0.42, 1.0];

/// Handles to the three bodies every freshly-mounted scene contains.
#[derive(Debug, Clone, Copy)]
pub struct SceneBodies {
    pub box_a: RigidBodyHandle,
    pub box_b: RigidBodyHandle,
    pub ground: RigidBodyHandle,
}

/// The scene component.
///
/// State machine: unmounted -> mount -> running -> unmount -> unmounted.
/// While unmounted, `advance` and the drag operations are no-ops.
pub struct Scene {
    world: Option<PhysicsWorld>,
    bodies: Option<SceneBodies>,
    runner: Runner,
}

impl Scene {
    /// A scene in the unmounted state.
    pub fn new() -> Self {
        Self {
            world: None,
            bodies: None,
            runner: Runner::new(),
        }
    }

    /// Build the world, add the initial bodies in one batch, attach the
    /// drag constraint, and start the runner.
    ///
    /// Mounting an already-mounted scene is a no-op: each mount owns
    /// exactly one world and one runner, and neither is started twice.
    pub fn mount(&mut self) {
        if self.world.is_some() {
            return;
        }

        let mut world = PhysicsWorld::new();
        let handles = world.add_boxes(&[
            BoxSpec::dynamic(Vec2::new(400.0, 200.0), Vec2::new(80.0, 120.0), BOX_A_COLOR),
            BoxSpec::dynamic(Vec2::new(450.0, 50.0), Vec2::new(80.0, 80.0), BOX_B_COLOR),
            BoxSpec::fixed(Vec2::new(400.0, 610.0), Vec2::new(810.0, 60.0), GROUND_COLOR),
        ]);
        world.attach_mouse_spring(MouseSpring::new(DRAG_STIFFNESS));

        log::info!(
            "scene mounted: {} bodies ({} dynamic), {} constraint",
            world.body_count(),
            world.dynamic_body_count(),
            world.constraint_count()
        );

        self.bodies = Some(SceneBodies {
            box_a: handles[0],
            box_b: handles[1],
            ground: handles[2],
        });
        self.world = Some(world);
        self.runner.start();
    }

    /// Stop the runner, clear the world, and release it.
    ///
    /// Safe to call any number of times; once the world is gone the call
    /// does nothing.
    pub fn unmount(&mut self) {
        self.runner.stop();
        if let Some(mut world) = self.world.take() {
            world.clear();
            log::info!("scene unmounted");
        }
        self.bodies = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.world.is_some()
    }

    pub fn world(&self) -> Option<&PhysicsWorld> {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> Option<&mut PhysicsWorld> {
        self.world.as_mut()
    }

    pub fn bodies(&self) -> Option<SceneBodies> {
        self.bodies
    }

    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    /// Feed one frame's wall-clock time to the runner.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        match self.world.as_mut() {
            Some(world) => self.runner.advance(world, frame_dt),
            None => 0,
        }
    }

    /// Try to grab a dynamic body under the pointer.
    pub fn begin_drag(&mut self, point: Vec2) -> bool {
        self.world
            .as_mut()
            .map(|world| world.begin_drag(point))
            .unwrap_or(false)
    }

    /// Keep the drag target on the pointer.
    pub fn drag_to(&mut self, point: Vec2) {
        if let Some(world) = self.world.as_mut() {
            world.drag_to(point);
        }
    }

    /// Release the grabbed body.
    pub fn end_drag(&mut self) {
        if let Some(world) = self.world.as_mut() {
            world.end_drag();
        }
    }

    /// Drop an extra dynamic box at `point` with a random size and color.
    pub fn spawn_box(&mut self, point: Vec2) -> Option<RigidBodyHandle> {
        let world = self.world.as_mut()?;
        let mut rng = rand::thread_rng();

        let side = 30.0 + rng.gen::<f32>() * 40.0;
        let color = [
            0.3 + rng.gen::<f32>() * 0.7,
            0.3 + rng.gen::<f32>() * 0.7,
            0.3 + rng.gen::<f32>() * 0.7,
            1.0,
        ];
        Some(world.add_box(BoxSpec::dynamic(point, Vec2::new(side, side), color)))
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        self.unmount();
    }
}
