//! Draggable rigid-body sandbox
//!
//! Two boxes drop onto a static ground; grab and throw them with the
//! mouse. Physics runs at a fixed 60 Hz, decoupled from the render rate.
//!
//! Controls:
//! - Left mouse: grab and drag a box
//! - B: drop a new box at the cursor
//! - V: toggle the drag-line overlay
//! - Space: pause/resume
//! - R: rebuild the scene
//! - Escape: quit

use box_sim::renderer::Renderer;
use box_sim::scene::{Scene, SCENE_HEIGHT, SCENE_WIDTH};
use common::{RenderContext, ScreenCamera};
use glam::Vec2;
use winit::{
    event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

const MAX_BOXES: usize = 256;

struct App {
    ctx: RenderContext,
    renderer: Renderer,
    camera: ScreenCamera,
    scene: Scene,
    cursor: Vec2,
    paused: bool,
}

impl App {
    fn new(ctx: RenderContext) -> Self {
        let renderer = Renderer::new(&ctx, MAX_BOXES);
        let camera = ScreenCamera::new(SCENE_WIDTH, SCENE_HEIGHT);

        let mut scene = Scene::new();
        scene.mount();

        Self {
            ctx,
            renderer,
            camera,
            scene,
            cursor: Vec2::ZERO,
            paused: false,
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
    }

    fn update(&mut self, dt: f32) {
        if !self.paused {
            self.scene.advance(dt);
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.update_camera(&self.ctx.queue, &self.camera);
        let (num_boxes, num_line_vertices) =
            self.renderer.update_scene(&self.ctx.queue, &self.scene);

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer
            .render(&mut encoder, &view, num_boxes, num_line_vertices);

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn handle_cursor(&mut self, x: f64, y: f64) {
        self.cursor = self.camera.window_to_scene(x, y, self.ctx.size);
        self.scene.drag_to(self.cursor);
    }

    fn handle_mouse_button(&mut self, state: ElementState, button: MouseButton) {
        if button != MouseButton::Left {
            return;
        }
        match state {
            ElementState::Pressed => {
                self.scene.begin_drag(self.cursor);
            }
            ElementState::Released => {
                self.scene.end_drag();
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        if state != ElementState::Pressed {
            return;
        }

        match key {
            KeyCode::Space => self.paused = !self.paused,
            KeyCode::KeyR => {
                self.scene.unmount();
                self.scene.mount();
            }
            KeyCode::KeyB => {
                self.scene.spawn_box(self.cursor);
            }
            KeyCode::KeyV => {
                if let Some(world) = self.scene.world_mut() {
                    if let Some(spring) = world.mouse_spring_mut() {
                        spring.visible = !spring.visible;
                    }
                }
            }
            _ => {}
        }
    }
}

fn main() {
    env_logger::init();

    println!("Box Sandbox - Draggable Rigid Bodies");
    println!();
    println!("Controls:");
    println!("  Left mouse - Grab and drag a box");
    println!("  B          - Drop a new box at the cursor");
    println!("  V          - Toggle the drag-line overlay");
    println!("  Space      - Pause/Resume");
    println!("  R          - Rebuild the scene");
    println!("  Escape     - Quit");
    println!();

    let (ctx, event_loop) = pollster::block_on(RenderContext::new(
        "Box Sandbox",
        SCENE_WIDTH as u32,
        SCENE_HEIGHT as u32,
    ));

    let mut app = App::new(ctx);
    let mut last_time = std::time::Instant::now();

    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Poll);

            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::Resized(size) => app.resize(size),
                    WindowEvent::CursorMoved { position, .. } => {
                        app.handle_cursor(position.x, position.y);
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        app.handle_mouse_button(state, button);
                    }
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(key),
                                state,
                                ..
                            },
                        ..
                    } => {
                        if key == KeyCode::Escape {
                            elwt.exit();
                        } else {
                            app.handle_key(key, state);
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        let now = std::time::Instant::now();
                        let dt = (now - last_time).as_secs_f32().min(0.1);
                        last_time = now;

                        app.update(dt);
                        match app.render() {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost) => app.resize(app.ctx.size),
                            Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                            Err(e) => log::warn!("render error: {e:?}"),
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    app.ctx.window.request_redraw();
                }
                _ => {}
            }
        })
        .expect("Event loop error");
}
