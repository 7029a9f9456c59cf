//! Physics world built on the external rigid-body engine
//!
//! Wraps rapier's body/collider sets and stepping pipeline behind the few
//! operations the scene needs: adding rectangles, hit-testing the pointer,
//! stepping, and clearing everything on teardown. Collision detection and
//! constraint solving stay inside the engine.

use glam::Vec2;
use rapier2d::prelude::*;

use crate::drag::MouseSpring;

/// Downward gravity in display units (y grows downward, 100 px per metre).
pub const GRAVITY: f32 = 980.0;

/// How a rectangle participates in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Responds to gravity, collisions, and the drag constraint.
    Dynamic,
    /// Immovable, like the ground.
    Fixed,
}

/// A rectangle to insert into the world.
#[derive(Debug, Clone, Copy)]
pub struct BoxSpec {
    pub center: Vec2,
    pub size: Vec2,
    pub kind: BodyKind,
    pub color: [f32; 4],
}

impl BoxSpec {
    pub fn dynamic(center: Vec2, size: Vec2, color: [f32; 4]) -> Self {
        Self {
            center,
            size,
            kind: BodyKind::Dynamic,
            color,
        }
    }

    pub fn fixed(center: Vec2, size: Vec2, color: [f32; 4]) -> Self {
        Self {
            center,
            size,
            kind: BodyKind::Fixed,
            color,
        }
    }
}

/// The simulation world for one mounted scene.
///
/// Owns every engine-side structure exclusively; nothing here is shared
/// across scene instances. `clear` releases all of it at once so teardown
/// leaves no bodies, contacts, or query caches behind.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    mouse_spring: Option<MouseSpring>,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            gravity: vector![0.0, GRAVITY],
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            mouse_spring: None,
        }
    }

    /// Insert one rectangle. The color rides in the body's `user_data`.
    pub fn add_box(&mut self, spec: BoxSpec) -> RigidBodyHandle {
        let builder = match spec.kind {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Fixed => RigidBodyBuilder::fixed(),
        };
        let body = builder
            .translation(vector![spec.center.x, spec.center.y])
            .user_data(pack_color(spec.color) as u128)
            .build();
        let handle = self.bodies.insert(body);

        let collider = ColliderBuilder::cuboid(spec.size.x * 0.5, spec.size.y * 0.5).build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        handle
    }

    /// Insert a batch of rectangles, returning their handles in order.
    pub fn add_boxes(&mut self, specs: &[BoxSpec]) -> Vec<RigidBodyHandle> {
        specs.iter().map(|spec| self.add_box(*spec)).collect()
    }

    /// Attach the pointer drag constraint. The world holds at most one.
    pub fn attach_mouse_spring(&mut self, spring: MouseSpring) {
        self.mouse_spring = Some(spring);
    }

    pub fn mouse_spring(&self) -> Option<&MouseSpring> {
        self.mouse_spring.as_ref()
    }

    pub fn mouse_spring_mut(&mut self) -> Option<&mut MouseSpring> {
        self.mouse_spring.as_mut()
    }

    /// Grab the topmost dynamic body under `point`, if any.
    pub fn begin_drag(&mut self, point: Vec2) -> bool {
        let Some(handle) = self.body_at_point(point) else {
            return false;
        };
        match self.mouse_spring.as_mut() {
            Some(spring) => {
                spring.grab(&self.bodies, handle, point);
                spring.is_active()
            }
            None => false,
        }
    }

    /// Move the drag target to follow the pointer.
    pub fn drag_to(&mut self, point: Vec2) {
        if let Some(spring) = self.mouse_spring.as_mut() {
            spring.set_target(point);
        }
    }

    /// Let go of whatever the pointer was holding.
    pub fn end_drag(&mut self) {
        if let Some(spring) = self.mouse_spring.as_mut() {
            spring.release();
        }
    }

    /// Find a dynamic body whose collider contains `point`.
    ///
    /// Fixed bodies are excluded: the ground is never draggable.
    pub fn body_at_point(&mut self, point: Vec2) -> Option<RigidBodyHandle> {
        self.query_pipeline.update(&self.bodies, &self.colliders);

        let p = point![point.x, point.y];
        let mut hit = None;
        self.query_pipeline.intersections_with_point(
            &self.bodies,
            &self.colliders,
            &p,
            QueryFilter::only_dynamic(),
            |collider| {
                hit = self.colliders[collider].parent();
                hit.is_none()
            },
        );
        hit
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// The drag constraint is applied first so the engine's solver sees its
    /// impulse in the same step.
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;

        if let Some(spring) = self.mouse_spring.as_mut() {
            spring.apply(&mut self.bodies, dt);
        }

        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Remove every body, collider, and constraint and drop the engine's
    /// internal caches. The world is reusable but empty afterwards.
    pub fn clear(&mut self) {
        self.bodies = RigidBodySet::new();
        self.colliders = ColliderSet::new();
        self.impulse_joints = ImpulseJointSet::new();
        self.multibody_joints = MultibodyJointSet::new();
        self.islands = IslandManager::new();
        self.broad_phase = DefaultBroadPhase::new();
        self.narrow_phase = NarrowPhase::new();
        self.query_pipeline = QueryPipeline::new();
        self.mouse_spring = None;
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn dynamic_body_count(&self) -> usize {
        self.bodies.iter().filter(|(_, b)| b.is_dynamic()).count()
    }

    pub fn fixed_body_count(&self) -> usize {
        self.bodies.iter().filter(|(_, b)| b.is_fixed()).count()
    }

    /// Joints plus the mouse spring, matching what the scene added.
    pub fn constraint_count(&self) -> usize {
        self.impulse_joints.iter().count() + usize::from(self.mouse_spring.is_some())
    }

    pub fn translation(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.bodies
            .get(handle)
            .map(|b| Vec2::new(b.translation().x, b.translation().y))
    }

    pub fn rotation(&self, handle: RigidBodyHandle) -> Option<f32> {
        self.bodies.get(handle).map(|b| b.rotation().angle())
    }

    pub fn linear_velocity(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.bodies
            .get(handle)
            .map(|b| Vec2::new(b.linvel().x, b.linvel().y))
    }

    pub fn bodies(&self) -> &RigidBodySet {
        &self.bodies
    }

    pub fn colliders(&self) -> &ColliderSet {
        &self.colliders
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Pack an RGBA color into the low 32 bits of a body's `user_data`.
pub fn pack_color(color: [f32; 4]) -> u32 {
    let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
    q(color[0]) | q(color[1]) << 8 | q(color[2]) << 16 | q(color[3]) << 24
}

/// Inverse of [`pack_color`].
pub fn unpack_color(packed: u32) -> [f32; 4] {
    [
        (packed & 0xff) as f32 / 255.0,
        (packed >> 8 & 0xff) as f32 / 255.0,
        (packed >> 16 & 0xff) as f32 / 255.0,
        (packed >> 24 & 0xff) as f32 / 255.0,
    ]
}
