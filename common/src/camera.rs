//! Fixed screen-space camera

use glam::{Mat4, Vec2};
use winit::dpi::PhysicalSize;

/// Orthographic camera over a fixed scene rectangle, y growing downward.
///
/// The scene works in display units (pixels of the logical 800x600 canvas),
/// with the origin at the top-left corner. The camera never pans or zooms;
/// it only maps that rectangle onto the surface.
#[derive(Debug, Clone, Copy)]
pub struct ScreenCamera {
    pub width: f32,
    pub height: f32,
}

impl ScreenCamera {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// View-projection matrix mapping scene coordinates to clip space.
    pub fn view_projection(&self) -> Mat4 {
        // Top of the scene (y = 0) maps to the top of clip space.
        Mat4::orthographic_rh(0.0, self.width, self.height, 0.0, -1.0, 1.0)
    }

    /// Map a cursor position in physical window pixels to scene coordinates.
    pub fn window_to_scene(&self, x: f64, y: f64, window: PhysicalSize<u32>) -> Vec2 {
        let sx = x as f32 / window.width.max(1) as f32 * self.width;
        let sy = y as f32 / window.height.max(1) as f32 * self.height;
        Vec2::new(sx, sy)
    }
}

/// Camera data as uploaded to the shader
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn from_camera(camera: &ScreenCamera) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_to_scene_scales_physical_pixels() {
        let camera = ScreenCamera::new(800.0, 600.0);
        // 2x DPI window: physical 1600x1200 backs the 800x600 scene.
        let window = PhysicalSize::new(1600, 1200);

        let p = camera.window_to_scene(800.0, 600.0, window);
        assert_eq!(p, Vec2::new(400.0, 300.0));

        let corner = camera.window_to_scene(1600.0, 1200.0, window);
        assert_eq!(corner, Vec2::new(800.0, 600.0));
    }

    #[test]
    fn view_projection_maps_scene_corners_to_clip_space() {
        let camera = ScreenCamera::new(800.0, 600.0);
        let vp = camera.view_projection();

        // Top-left corner of the scene is the top-left of clip space.
        let tl = vp.project_point3(glam::Vec3::new(0.0, 0.0, 0.0));
        assert!((tl.x - -1.0).abs() < 1e-6);
        assert!((tl.y - 1.0).abs() < 1e-6);

        // Bottom-right corner of the scene is the bottom-right of clip space.
        let br = vp.project_point3(glam::Vec3::new(800.0, 600.0, 0.0));
        assert!((br.x - 1.0).abs() < 1e-6);
        assert!((br.y - -1.0).abs() < 1e-6);
    }
}
