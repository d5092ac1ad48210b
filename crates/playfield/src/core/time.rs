/// Default cap on cycles run for one host frame.
pub const DEFAULT_MAX_STEPS: u32 = 10;

/// Converts variable host frame times into a whole number of fixed cycles.
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
    max_steps: u32,
    cycles: u64,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt: dt.max(f32::EPSILON),
            accumulator: 0.0,
            max_steps: DEFAULT_MAX_STEPS,
            cycles: 0,
        }
    }

    /// Limit how many cycles a single long frame may trigger.
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Add host frame time. Returns the number of cycles to run now.
    ///
    /// Time beyond `max_steps` cycles is dropped so a stalled host does not
    /// trigger a burst of catch-up cycles.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        self.cycles += steps as u64;
        steps
    }

    /// Fraction of the next cycle already accumulated, in [0, 1).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Cycles handed out since creation or the last reset.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.cycles = 0;
    }
}
