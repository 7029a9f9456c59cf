//! Draggable rigid-body sandbox
//!
//! A fixed 800x600 scene: two dynamic boxes fall onto a static ground and
//! can be grabbed with the mouse through a soft spring constraint. The
//! rigid-body dynamics (integration, collisions, contact solving) live in
//! the external engine; this crate owns the scene lifecycle, the
//! fixed-step runner, the drag constraint, and the renderer.

pub mod drag;
pub mod renderer;
pub mod runner;
pub mod scene;
pub mod world;
