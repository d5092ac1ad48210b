use playfield::{
    FixedTimestep, InputEvent, InputQueue, Sketch, SketchConfig, SketchContext,
};

const IDENTITY: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 1.0, 0.0,
    0.0, 0.0, 0.0, 1.0,
];

/// Floats per flattened debug segment: x0, y0, x1, y1, r, g, b, a.
pub const DEBUG_SEGMENT_FLOATS: usize = 8;

/// Drives a sketch from host frame callbacks.
///
/// Each concrete sketch gets a `thread_local!` runner and free
/// `#[wasm_bindgen]` functions (see `export_sketch!`), because wasm-bindgen
/// cannot export generic structs directly.
pub struct SketchRunner<S: Sketch> {
    sketch: S,
    ctx: Option<SketchContext>,
    input: InputQueue,
    timestep: FixedTimestep,
    config: SketchConfig,
    view: [f32; 16],
    debug_segments: Vec<f32>,
}

impl<S: Sketch> SketchRunner<S> {
    pub fn new(sketch: S) -> Self {
        let config = sketch.config();
        Self {
            timestep: FixedTimestep::new(config.fixed_dt),
            sketch,
            ctx: None,
            input: InputQueue::new(),
            config,
            view: IDENTITY,
            debug_segments: Vec::new(),
        }
    }

    /// Run the sketch's setup. Ticks before this are ignored.
    pub fn init(&mut self) {
        let ctx = SketchContext::start(&mut self.sketch);
        self.config = ctx.config().clone();
        self.timestep = FixedTimestep::new(self.config.fixed_dt);
        self.ctx = Some(ctx);
    }

    pub fn is_initialized(&self) -> bool {
        self.ctx.is_some()
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Advance by host frame time, running as many fixed cycles as are due.
    /// Queued input goes to the first of them; with no cycle due it waits.
    pub fn tick(&mut self, dt: f32) {
        let Some(ctx) = self.ctx.as_mut() else {
            return;
        };

        let steps = self.timestep.accumulate(dt);
        for step in 0..steps {
            let events = if step == 0 { self.input.drain() } else { Vec::new() };
            ctx.run_cycle(&mut self.sketch, events);
        }

        if steps > 0 {
            self.view = ctx.render_buffer.view_cols();
            self.debug_segments.clear();
            for line in &ctx.render_buffer.debug_lines {
                for pair in line.points.windows(2) {
                    self.debug_segments.extend_from_slice(&[
                        pair[0][0], pair[0][1], pair[1][0], pair[1][1],
                        line.color[0], line.color[1], line.color[2], line.color[3],
                    ]);
                }
            }
        }
    }

    pub fn sketch(&self) -> &S {
        &self.sketch
    }

    pub fn context(&self) -> Option<&SketchContext> {
        self.ctx.as_ref()
    }

    pub fn context_mut(&mut self) -> Option<&mut SketchContext> {
        self.ctx.as_mut()
    }

    // ---- Pointer accessors for host-side reads ----

    pub fn instances_ptr(&self) -> *const f32 {
        match &self.ctx {
            Some(ctx) => ctx.render_buffer.instances_ptr(),
            None => std::ptr::null(),
        }
    }

    pub fn instance_count(&self) -> u32 {
        self.ctx.as_ref().map_or(0, |c| c.render_buffer.instance_count())
    }

    pub fn view_ptr(&self) -> *const f32 {
        self.view.as_ptr()
    }

    pub fn debug_segments_ptr(&self) -> *const f32 {
        self.debug_segments.as_ptr()
    }

    pub fn debug_segment_count(&self) -> u32 {
        (self.debug_segments.len() / DEBUG_SEGMENT_FLOATS) as u32
    }

    pub fn canvas_width(&self) -> f32 {
        self.config.canvas_width
    }

    pub fn canvas_height(&self) -> f32 {
        self.config.canvas_height
    }

    pub fn max_instances(&self) -> u32 {
        self.config.max_instances as u32
    }

    pub fn frame_count(&self) -> u32 {
        self.ctx.as_ref().map_or(0, |c| c.frame_count() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playfield::KeyCode;

    #[derive(Default)]
    struct Dots {
        presses: u32,
    }

    impl Sketch for Dots {
        fn config(&self) -> SketchConfig {
            SketchConfig {
                fixed_dt: 0.5,
                ..Default::default()
            }
        }

        fn setup(&mut self, ctx: &mut SketchContext) {
            let dot = ctx.create_sprite(0.0, 0.0, 4.0, 4.0);
            ctx.world.sprite_mut(dot).unwrap().debug = true;
        }

        fn draw(&mut self, ctx: &mut SketchContext) {
            if ctx.input.key_went_down("space") {
                self.presses += 1;
            }
            ctx.draw_sprites();
        }
    }

    #[test]
    fn ticks_before_init_do_nothing() {
        let mut runner = SketchRunner::new(Dots::default());
        runner.tick(10.0);
        assert!(!runner.is_initialized());
        assert_eq!(runner.instance_count(), 0);
        assert!(runner.instances_ptr().is_null());
    }

    #[test]
    fn frame_time_becomes_fixed_cycles() {
        let mut runner = SketchRunner::new(Dots::default());
        runner.init();
        runner.tick(0.25);
        assert_eq!(runner.frame_count(), 0);
        runner.tick(0.25);
        assert_eq!(runner.frame_count(), 1);
        runner.tick(1.0);
        assert_eq!(runner.frame_count(), 3);
        assert_eq!(runner.instance_count(), 1);
        assert!(runner.debug_segment_count() >= 4);
    }

    #[test]
    fn input_waits_for_a_cycle_and_is_seen_once() {
        let mut runner = SketchRunner::new(Dots::default());
        runner.init();
        runner.push_input(InputEvent::KeyDown { key: KeyCode::SPACE, repeat: false });
        runner.tick(0.1);
        assert_eq!(runner.sketch().presses, 0);
        runner.tick(1.0);
        assert_eq!(runner.sketch().presses, 1);
        assert_eq!(runner.frame_count(), 2);
    }

    #[test]
    fn view_defaults_to_identity() {
        let mut runner = SketchRunner::new(Dots::default());
        runner.init();
        runner.tick(0.5);
        let view = unsafe { std::slice::from_raw_parts(runner.view_ptr(), 16) };
        assert_eq!(view[0], 1.0);
        assert_eq!(view[12], 0.0);
        assert_eq!(runner.canvas_width(), 800.0);
    }
}
