use serde::Deserialize;

use crate::api::types::SpriteId;
use crate::assets::error::AssetError;
use crate::assets::loader::{load_animation, AssetLoader};
use crate::components::animation::{Animation, DEFAULT_FRAME_DELAY};
use crate::components::group::Group;
use crate::components::sprite::MouseTransitions;
use crate::core::quadtree::QuadTreeConfig;
use crate::core::world::World;
use crate::input::keys::MouseButton;
use crate::input::queue::InputEvent;
use crate::input::state::InputState;
use crate::renderer::camera::Camera;
use crate::renderer::instance::RenderBuffer;
use crate::systems::render;
use crate::systems::update::{update_mouse, update_sprites};

/// Runtime configuration, provided by the sketch.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// Seconds per cycle (default: 1/60).
    pub fixed_dt: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Initial render buffer capacity (default: 512).
    pub max_instances: usize,
    /// Start with the quadtree enabled (default: true).
    pub quad_tree: bool,
    pub quad_tree_max_objects: usize,
    pub quad_tree_max_levels: usize,
    /// Frame delay for animations loaded through the context.
    pub default_frame_delay: u32,
    /// Drop removed sprite data at the end of every cycle. Ids held in
    /// groups then stop resolving (default: false).
    pub purge_removed: bool,
}

impl Default for SketchConfig {
    fn default() -> Self {
        let quad_tree = QuadTreeConfig::default();
        Self {
            fixed_dt: 1.0 / 60.0,
            canvas_width: 800.0,
            canvas_height: 600.0,
            max_instances: 512,
            quad_tree: true,
            quad_tree_max_objects: quad_tree.max_objects,
            quad_tree_max_levels: quad_tree.max_levels,
            default_frame_delay: DEFAULT_FRAME_DELAY,
            purge_removed: false,
        }
    }
}

impl SketchConfig {
    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn quad_tree_config(&self) -> QuadTreeConfig {
        QuadTreeConfig {
            max_objects: self.quad_tree_max_objects,
            max_levels: self.quad_tree_max_levels,
        }
    }
}

/// The contract every sketch fulfills.
pub trait Sketch {
    /// Called once before setup.
    fn config(&self) -> SketchConfig {
        SketchConfig::default()
    }

    /// Create sprites, groups and animations.
    fn setup(&mut self, ctx: &mut SketchContext);

    /// Called once per cycle, after the update pass. User logic, collision
    /// queries and drawing happen here.
    fn draw(&mut self, ctx: &mut SketchContext);
}

/// Everything a sketch reads and mutates during a cycle.
pub struct SketchContext {
    pub world: World,
    pub input: InputState,
    pub camera: Camera,
    pub render_buffer: RenderBuffer,
    config: SketchConfig,
    updating: bool,
    frame_count: u64,
    mouse_changes: Vec<(SpriteId, MouseTransitions)>,
}

impl SketchContext {
    pub fn new(config: SketchConfig) -> Self {
        Self {
            world: World::with_quad_tree(config.quad_tree, config.quad_tree_config()),
            input: InputState::new(),
            camera: Camera::for_canvas(config.canvas_width, config.canvas_height),
            render_buffer: RenderBuffer::with_capacity(config.max_instances),
            config,
            updating: true,
            frame_count: 0,
            mouse_changes: Vec::new(),
        }
    }

    /// Build a context from the sketch's config and run its setup.
    pub fn start<S: Sketch + ?Sized>(sketch: &mut S) -> Self {
        let mut ctx = Self::new(sketch.config());
        sketch.setup(&mut ctx);
        log::info!("sketch started with {} sprites", ctx.world.len());
        ctx
    }

    /// Run one cycle: input, camera mouse, update pass, the sketch's draw,
    /// then input bookkeeping.
    pub fn run_cycle<S: Sketch + ?Sized>(&mut self, sketch: &mut S, events: impl IntoIterator<Item = InputEvent>) {
        self.input.apply_events(events);
        let pointer = self.input.pointer();
        self.camera.update_mouse(pointer.x, pointer.y);

        self.mouse_changes.clear();
        if self.updating {
            update_sprites(&mut self.world);
            self.mouse_changes = update_mouse(
                &mut self.world,
                self.camera.mouse(),
                self.input.mouse_down(MouseButton::Left),
            );
        }

        self.render_buffer.clear();
        self.render_buffer.set_view(self.camera.view_matrix());
        sketch.draw(self);

        self.input.end_cycle();
        if self.config.purge_removed {
            self.world.purge_removed();
        }
        self.frame_count += 1;
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    /// Cycles completed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Pause or resume the update pass. Drawing continues either way.
    pub fn update_sprites(&mut self, enabled: bool) {
        if enabled != self.updating {
            log::debug!("sprite updates {}", if enabled { "resumed" } else { "paused" });
        }
        self.updating = enabled;
    }

    pub fn is_updating(&self) -> bool {
        self.updating
    }

    /// Mouse transitions reported by this cycle's update pass.
    pub fn mouse_changes(&self) -> &[(SpriteId, MouseTransitions)] {
        &self.mouse_changes
    }

    pub fn mouse_x(&self) -> f32 {
        self.camera.mouse_x()
    }

    pub fn mouse_y(&self) -> f32 {
        self.camera.mouse_y()
    }

    // -- Sprites and groups --

    pub fn create_sprite(&mut self, x: f32, y: f32, width: f32, height: f32) -> SpriteId {
        self.world.create_sprite(x, y, width, height)
    }

    pub fn create_sprite_at(&mut self, x: f32, y: f32) -> SpriteId {
        self.world.create_sprite_at(x, y)
    }

    pub fn create_group(&mut self) -> Group {
        self.world.create_group()
    }

    pub fn get_sprites(&self) -> Vec<SpriteId> {
        self.world.get_sprites()
    }

    pub fn remove_sprite(&mut self, id: SpriteId) {
        self.world.remove_sprite(id);
    }

    pub fn use_quad_tree(&mut self, enabled: bool) {
        self.world.use_quad_tree(enabled);
    }

    /// Load an animation with the configured default frame delay.
    pub fn load_animation(&self, loader: &mut impl AssetLoader, files: &[&str]) -> Result<Animation, AssetError> {
        Ok(load_animation(loader, files)?.with_frame_delay(self.config.default_frame_delay))
    }

    // -- Drawing --

    pub fn draw_sprites(&mut self) {
        render::draw_sprites(&self.world, &self.camera, &mut self.render_buffer);
    }

    pub fn draw_group(&mut self, group: &Group) {
        group.draw(&self.world, &mut self.render_buffer);
    }

    pub fn draw_sprite(&mut self, id: SpriteId) {
        if let Some(sprite) = self.world.sprite(id) {
            render::draw_sprite(sprite, &mut self.render_buffer);
        }
    }

    pub fn draw_animation(&mut self, anim: &mut Animation, x: f32, y: f32, rotation: f32) {
        render::draw_animation(anim, x, y, rotation, &mut self.render_buffer);
    }
}

impl Default for SketchContext {
    fn default() -> Self {
        Self::new(SketchConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::loader::tests::FakeLoader;
    use crate::input::keys::KeyCode;
    use glam::Vec2;

    /// Records what the draw callback observed each cycle.
    #[derive(Default)]
    struct Recorder {
        config: SketchConfig,
        ship: Option<SpriteId>,
        went_down: Vec<bool>,
        positions: Vec<Vec2>,
        draw: bool,
    }

    impl Sketch for Recorder {
        fn config(&self) -> SketchConfig {
            self.config.clone()
        }

        fn setup(&mut self, ctx: &mut SketchContext) {
            let ship = ctx.create_sprite(0.0, 0.0, 10.0, 10.0);
            ctx.world.sprite_mut(ship).unwrap().velocity = Vec2::new(5.0, 0.0);
            self.ship = Some(ship);
        }

        fn draw(&mut self, ctx: &mut SketchContext) {
            self.went_down.push(ctx.input.key_went_down("space"));
            if let Some(ship) = self.ship.and_then(|id| ctx.world.sprite(id)) {
                self.positions.push(ship.position);
            }
            if self.draw {
                ctx.draw_sprites();
            }
        }
    }

    fn key(code: KeyCode, down: bool) -> InputEvent {
        if down {
            InputEvent::KeyDown { key: code, repeat: false }
        } else {
            InputEvent::KeyUp { key: code }
        }
    }

    fn idle() -> Vec<InputEvent> {
        Vec::new()
    }

    #[test]
    fn key_press_is_seen_on_exactly_one_cycle() {
        let mut sketch = Recorder::default();
        let mut ctx = SketchContext::start(&mut sketch);

        ctx.run_cycle(&mut sketch, [key(KeyCode::SPACE, true)]);
        ctx.run_cycle(&mut sketch, idle());
        ctx.run_cycle(&mut sketch, [InputEvent::KeyDown { key: KeyCode::SPACE, repeat: true }]);
        ctx.run_cycle(&mut sketch, [key(KeyCode::SPACE, false)]);
        ctx.run_cycle(&mut sketch, [key(KeyCode::SPACE, true)]);

        assert_eq!(sketch.went_down, vec![true, false, false, false, true]);
    }

    #[test]
    fn update_pass_runs_before_draw() {
        let mut sketch = Recorder::default();
        let mut ctx = SketchContext::start(&mut sketch);
        for _ in 0..10 {
            ctx.run_cycle(&mut sketch, idle());
        }
        assert_eq!(sketch.positions[0], Vec2::new(5.0, 0.0));
        assert_eq!(sketch.positions[9], Vec2::new(50.0, 0.0));
        assert_eq!(ctx.frame_count(), 10);
    }

    #[test]
    fn paused_updates_still_draw() {
        let mut sketch = Recorder {
            draw: true,
            ..Default::default()
        };
        let mut ctx = SketchContext::start(&mut sketch);
        ctx.update_sprites(false);
        ctx.run_cycle(&mut sketch, idle());
        ctx.run_cycle(&mut sketch, idle());

        assert_eq!(sketch.positions, vec![Vec2::ZERO, Vec2::ZERO]);
        assert_eq!(ctx.render_buffer.instance_count(), 1);

        ctx.update_sprites(true);
        ctx.run_cycle(&mut sketch, idle());
        assert_eq!(sketch.positions[2], Vec2::new(5.0, 0.0));
    }

    #[test]
    fn render_buffer_holds_one_cycle() {
        let mut sketch = Recorder {
            draw: true,
            ..Default::default()
        };
        let mut ctx = SketchContext::start(&mut sketch);
        ctx.create_sprite(100.0, 100.0, 10.0, 10.0);
        ctx.run_cycle(&mut sketch, idle());
        ctx.run_cycle(&mut sketch, idle());
        assert_eq!(ctx.render_buffer.instance_count(), 2);
    }

    #[test]
    fn camera_translates_the_pointer() {
        let mut sketch = Recorder::default();
        let mut ctx = SketchContext::start(&mut sketch);
        ctx.camera.on();
        ctx.camera.position = Vec2::new(1000.0, 1000.0);
        ctx.camera.zoom = 2.0;

        ctx.run_cycle(&mut sketch, [InputEvent::PointerMove { x: 420.0, y: 300.0 }]);
        assert!((ctx.mouse_x() - 1010.0).abs() < 1e-4);
        assert!((ctx.mouse_y() - 1000.0).abs() < 1e-4);
    }

    #[test]
    fn mouse_active_sprites_report_presses() {
        let mut sketch = Recorder::default();
        let mut ctx = SketchContext::start(&mut sketch);
        let button = ctx.create_sprite(50.0, 50.0, 20.0, 20.0);
        ctx.world.sprite_mut(button).unwrap().mouse_active = true;

        ctx.run_cycle(
            &mut sketch,
            [InputEvent::PointerDown { x: 52.0, y: 48.0, button: MouseButton::Left }],
        );
        let changes = ctx.mouse_changes();
        assert_eq!(changes.len(), 1);
        assert!(changes[0].1.entered && changes[0].1.pressed);
        assert!(ctx.world.sprite(button).unwrap().mouse_is_pressed());
    }

    #[test]
    fn bounce_in_draw_precedes_next_friction() {
        struct Bouncer {
            ball: SpriteId,
            wall: SpriteId,
        }
        impl Sketch for Bouncer {
            fn setup(&mut self, _ctx: &mut SketchContext) {}
            fn draw(&mut self, ctx: &mut SketchContext) {
                ctx.world.bounce(&self.ball, &self.wall);
            }
        }

        let mut ctx = SketchContext::default();
        let ball = ctx.create_sprite(0.0, 0.0, 10.0, 10.0);
        let wall = ctx.create_sprite(11.0, 0.0, 10.0, 10.0);
        {
            let s = ctx.world.sprite_mut(ball).unwrap();
            s.velocity = Vec2::new(2.0, 0.0);
            s.friction = 0.5;
        }
        ctx.world.sprite_mut(wall).unwrap().immovable = true;
        let mut sketch = Bouncer { ball, wall };

        // Cycle 1: v = 1, x = 1, touching only. Cycle 2: v = 0.5, x = 1.5,
        // overlapping by 0.5, so the bounce flips v to -0.5.
        ctx.run_cycle(&mut sketch, idle());
        assert_eq!(ctx.world.sprite(ball).unwrap().velocity, Vec2::new(1.0, 0.0));
        ctx.run_cycle(&mut sketch, idle());
        assert_eq!(ctx.world.sprite(ball).unwrap().velocity, Vec2::new(-0.5, 0.0));
        ctx.run_cycle(&mut sketch, idle());
        assert_eq!(ctx.world.sprite(ball).unwrap().velocity, Vec2::new(-0.25, 0.0));
        assert_eq!(ctx.world.sprite(wall).unwrap().position, Vec2::new(11.0, 0.0));
    }

    #[test]
    fn purge_config_drops_removed_sprites() {
        let mut sketch = Recorder {
            config: SketchConfig {
                purge_removed: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut ctx = SketchContext::start(&mut sketch);
        let doomed = ctx.create_sprite(0.0, 0.0, 1.0, 1.0);
        ctx.remove_sprite(doomed);
        assert!(ctx.world.sprite(doomed).is_some());
        ctx.run_cycle(&mut sketch, idle());
        assert!(ctx.world.sprite(doomed).is_none());
    }

    #[test]
    fn config_from_partial_json() {
        let config = SketchConfig::from_json(r#"{ "canvas_width": 320, "quad_tree": false }"#).unwrap();
        assert_eq!(config.canvas_width, 320.0);
        assert!(!config.quad_tree);
        assert_eq!(config.canvas_height, 600.0);
        assert_eq!(config.default_frame_delay, DEFAULT_FRAME_DELAY);

        let ctx = SketchContext::new(config);
        assert!(!ctx.world.quad_tree_enabled());
        assert_eq!(ctx.camera.position, Vec2::new(160.0, 300.0));
    }

    #[test]
    fn loaded_animations_use_configured_delay() {
        let ctx = SketchContext::new(SketchConfig {
            default_frame_delay: 9,
            ..Default::default()
        });
        let mut loader = FakeLoader::default();
        let anim = ctx.load_animation(&mut loader, &["a1.png", "a3.png"]).unwrap();
        assert_eq!(anim.frame_delay, 9);
        assert_eq!(anim.frame_count(), 3);
    }
}
