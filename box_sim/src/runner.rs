//! Fixed-timestep runner
//!
//! Converts the variable-rate frame loop into fixed physics steps, so
//! simulation speed is independent of the render rate.

use crate::world::PhysicsWorld;

/// Seconds of simulation per physics step (60 Hz).
pub const STEP_DT: f32 = 1.0 / 60.0;

/// Longest frame the accumulator will absorb; slower frames are clamped so
/// a stall does not turn into a burst of catch-up steps.
const MAX_FRAME_DT: f32 = 0.1;

/// Accumulator driving [`PhysicsWorld::step`] at a fixed cadence.
///
/// Created stopped; the scene starts it on mount and stops it on unmount.
/// While stopped, `advance` performs no steps and the step counter freezes.
#[derive(Debug, Clone)]
pub struct Runner {
    step_dt: f32,
    accumulator: f32,
    running: bool,
    steps: u64,
}

impl Runner {
    pub fn new() -> Self {
        Self {
            step_dt: STEP_DT,
            accumulator: 0.0,
            running: false,
            steps: 0,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stop ticking and discard any partially-accumulated frame time.
    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn step_dt(&self) -> f32 {
        self.step_dt
    }

    /// Total fixed steps performed since creation.
    pub fn total_steps(&self) -> u64 {
        self.steps
    }

    /// Feed one frame's wall-clock time; steps the world zero or more times
    /// and returns how many steps ran.
    pub fn advance(&mut self, world: &mut PhysicsWorld, frame_dt: f32) -> u32 {
        if !self.running {
            return 0;
        }

        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut performed = 0;
        while self.accumulator >= self.step_dt {
            world.step(self.step_dt);
            self.accumulator -= self.step_dt;
            performed += 1;
            self.steps += 1;
        }
        performed
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}
