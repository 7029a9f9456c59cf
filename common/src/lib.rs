//! Shared windowing and camera utilities for the sandbox scene.
//!
//! This crate owns the window/GPU plumbing (surface, device, queue) and the
//! fixed screen-space camera; the scene crate builds its world and renderer
//! on top of these.

pub mod camera;
pub mod graphics;

pub use camera::*;
pub use graphics::*;
