//! Pointer drag constraint
//!
//! A soft spring linking the pointer to one grabbed dynamic body. The
//! constraint exists for the whole mounted lifetime of the scene; grabbing
//! only fills in which body it acts on.

use glam::Vec2;
use rapier2d::prelude::*;

/// Fraction of the pointer gap the spring aims to close per fixed step.
pub const DRAG_STIFFNESS: f32 = 0.2;

/// The drag constraint.
///
/// While a body is grabbed, each step applies an impulse at the grab anchor
/// that moves the anchor a `stiffness` fraction of the way to the pointer
/// target. The anchor is remembered in the body's local frame, so dragging
/// a corner spins the box the way grabbing a real object off-center would.
#[derive(Debug, Clone)]
pub struct MouseSpring {
    pub stiffness: f32,
    /// Draw the anchor-to-pointer line. Off by default.
    pub visible: bool,
    target: Vec2,
    grab: Option<Grab>,
}

#[derive(Debug, Clone, Copy)]
struct Grab {
    body: RigidBodyHandle,
    /// Grab point in the body's local frame.
    local_anchor: Point<Real>,
}

impl MouseSpring {
    pub fn new(stiffness: f32) -> Self {
        Self {
            stiffness,
            visible: false,
            target: Vec2::ZERO,
            grab: None,
        }
    }

    /// Latch onto `body` at the world-space grab point.
    pub fn grab(&mut self, bodies: &RigidBodySet, body: RigidBodyHandle, point: Vec2) {
        let Some(rb) = bodies.get(body) else {
            return;
        };
        let world = point![point.x, point.y];
        self.target = point;
        self.grab = Some(Grab {
            body,
            local_anchor: rb.position().inverse_transform_point(&world),
        });
    }

    /// Let go of the grabbed body, if any.
    pub fn release(&mut self) {
        self.grab = None;
    }

    pub fn set_target(&mut self, point: Vec2) {
        self.target = point;
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn grabbed_body(&self) -> Option<RigidBodyHandle> {
        self.grab.map(|g| g.body)
    }

    pub fn is_active(&self) -> bool {
        self.grab.is_some()
    }

    /// World-space position of the grab anchor, for drawing the drag line.
    pub fn anchor_world(&self, bodies: &RigidBodySet) -> Option<Vec2> {
        let grab = self.grab?;
        let rb = bodies.get(grab.body)?;
        let p = rb.position().transform_point(&grab.local_anchor);
        Some(Vec2::new(p.x, p.y))
    }

    /// Pull the grabbed body toward the target for one fixed step.
    ///
    /// Releases automatically if the body no longer exists (the world may
    /// have been cleared out from under a stale grab).
    pub fn apply(&mut self, bodies: &mut RigidBodySet, dt: f32) {
        let Some(grab) = self.grab else {
            return;
        };
        let Some(rb) = bodies.get_mut(grab.body) else {
            self.grab = None;
            return;
        };
        if dt <= 0.0 {
            return;
        }

        let anchor = rb.position().transform_point(&grab.local_anchor);
        let gap = vector![self.target.x - anchor.x, self.target.y - anchor.y];

        // Velocity-level spring: aim the anchor at `stiffness` of the gap
        // per step, measured against the anchor's current velocity.
        let delta_v = gap * (self.stiffness / dt) - rb.velocity_at_point(&anchor);
        let impulse = delta_v * rb.mass();
        rb.apply_impulse_at_point(impulse, anchor, true);
    }
}

impl Default for MouseSpring {
    fn default() -> Self {
        Self::new(DRAG_STIFFNESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_body_set() -> (RigidBodySet, ColliderSet, RigidBodyHandle) {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let handle = bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(vector![10.0, 20.0])
                .build(),
        );
        colliders.insert_with_parent(ColliderBuilder::cuboid(5.0, 5.0).build(), handle, &mut bodies);
        (bodies, colliders, handle)
    }

    #[test]
    fn defaults_match_the_scene_contract() {
        let spring = MouseSpring::default();
        assert_eq!(spring.stiffness, DRAG_STIFFNESS);
        assert!(!spring.visible);
        assert!(!spring.is_active());
    }

    #[test]
    fn grab_remembers_the_local_anchor() {
        let (bodies, _colliders, handle) = one_body_set();
        let mut spring = MouseSpring::default();

        // Grab the body 3 units right of its center.
        spring.grab(&bodies, handle, Vec2::new(13.0, 20.0));
        assert_eq!(spring.grabbed_body(), Some(handle));
        assert_eq!(spring.anchor_world(&bodies), Some(Vec2::new(13.0, 20.0)));

        spring.release();
        assert!(!spring.is_active());
        assert_eq!(spring.anchor_world(&bodies), None);
    }

    #[test]
    fn apply_pulls_the_body_toward_the_target() {
        let (mut bodies, _colliders, handle) = one_body_set();
        let mut spring = MouseSpring::default();

        spring.grab(&bodies, handle, Vec2::new(10.0, 20.0));
        spring.set_target(Vec2::new(60.0, 20.0));
        spring.apply(&mut bodies, 1.0 / 60.0);

        // The impulse sets a velocity toward the target; integration is the
        // engine's job, so only the velocity is checked here.
        let vel = bodies[handle].linvel();
        assert!(vel.x > 0.0, "expected +x velocity, got {vel:?}");
    }

    #[test]
    fn apply_releases_a_stale_grab() {
        let (bodies, _colliders, handle) = one_body_set();
        let mut spring = MouseSpring::default();
        spring.grab(&bodies, handle, Vec2::new(10.0, 20.0));

        // The world this handle came from is gone.
        let mut other = RigidBodySet::new();
        spring.apply(&mut other, 1.0 / 60.0);

        assert!(!spring.is_active());
    }
}
