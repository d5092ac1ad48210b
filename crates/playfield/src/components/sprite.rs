use std::fmt;
use std::rc::Rc;

use glam::Vec2;

use crate::api::types::{GroupId, ImageHandle, SpriteId};
use crate::components::animation::{Animation, AnimationSet};
use crate::components::collider::Collider;
use crate::core::geometry::{direction_vector, vector_angle, Aabb, Shape};
use crate::renderer::instance::RenderBuffer;

/// Placeholder size used when a sprite is created without one.
pub const DEFAULT_SIZE: f32 = 100.0;

/// Pluggable drawing strategy replacing the built-in placeholder/image renderer.
///
/// Instances are pushed in world space; the draw pass applies the camera.
pub trait SpriteRenderer {
    fn draw(&self, sprite: &Sprite, buffer: &mut RenderBuffer);
}

impl<F> SpriteRenderer for F
where
    F: Fn(&Sprite, &mut RenderBuffer),
{
    fn draw(&self, sprite: &Sprite, buffer: &mut RenderBuffer) {
        self(sprite, buffer)
    }
}

/// Shared handle to a custom renderer.
#[derive(Clone)]
pub struct CustomDraw(pub Rc<dyn SpriteRenderer>);

impl fmt::Debug for CustomDraw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomDraw(..)")
    }
}

/// Mouse state changes reported by [`Sprite::mouse_update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseTransitions {
    pub entered: bool,
    pub exited: bool,
    pub pressed: bool,
    pub released: bool,
}

impl MouseTransitions {
    pub fn any(&self) -> bool {
        self.entered || self.exited || self.pressed || self.released
    }
}

/// A positioned, velocity-bearing, renderable simulation entity.
///
/// Angles are in degrees. Velocities are in units per cycle.
#[derive(Debug, Clone)]
pub struct Sprite {
    /// Unique identifier.
    pub id: SpriteId,
    /// Center position in world space.
    pub position: Vec2,
    pub velocity: Vec2,
    /// Unscaled placeholder width.
    pub original_width: f32,
    /// Unscaled placeholder height.
    pub original_height: f32,
    pub scale: f32,
    /// Visual rotation. Not the direction of motion.
    pub rotation: f32,
    /// Rotation change per cycle.
    pub rotation_speed: f32,
    /// Lock the visual rotation to the direction of motion.
    pub rotate_to_direction: bool,
    /// Weight in momentum exchange during bounces.
    pub mass: f32,
    /// Velocity damping per cycle, 0 (none) to 1 (full stop).
    pub friction: f32,
    /// 1 is perfectly elastic, 0 perfectly inelastic, above 1 adds energy.
    pub restitution: f32,
    /// Infinite mass: never moved or deflected by collisions.
    pub immovable: bool,
    /// Cycles before self removal. 0 removes on the next update; -1
    /// disables the countdown.
    pub life: i32,
    /// Speed cap; -1 means unlimited.
    pub max_speed: f32,
    /// Draw order: lower depth is drawn first.
    pub depth: f32,
    pub visible: bool,
    /// Draw the collider outline and center.
    pub debug: bool,
    /// Placeholder rectangle color (RGBA, 0-1).
    pub shape_color: [f32; 4],
    /// Track mouse over/pressed state during updates.
    pub mouse_active: bool,
    mouse_is_over: bool,
    mouse_is_pressed: bool,
    removed: bool,
    mirror: Vec2,
    collider: Option<Collider>,
    animations: AnimationSet,
    groups: Vec<GroupId>,
    renderer: Option<CustomDraw>,
}

impl Sprite {
    /// Create a sprite with a placeholder rectangle of the given size.
    pub fn new(id: SpriteId, position: Vec2, width: f32, height: f32) -> Self {
        Self {
            id,
            position,
            velocity: Vec2::ZERO,
            original_width: width,
            original_height: height,
            scale: 1.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            rotate_to_direction: false,
            mass: 1.0,
            friction: 0.0,
            restitution: 1.0,
            immovable: false,
            life: -1,
            max_speed: -1.0,
            depth: 0.0,
            visible: true,
            debug: false,
            shape_color: [0.5, 0.5, 0.5, 1.0],
            mouse_active: false,
            mouse_is_over: false,
            mouse_is_pressed: false,
            removed: false,
            mirror: Vec2::ONE,
            collider: None,
            animations: AnimationSet::new(),
            groups: Vec::new(),
            renderer: None,
        }
    }

    // -- Builder pattern --

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.collider = Some(collider);
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_life(mut self, life: i32) -> Self {
        self.life = life;
        self
    }

    // -- Lifecycle --

    /// Mark the sprite removed. It will not be updated, drawn or collided again.
    pub fn remove(&mut self) {
        if !self.removed {
            log::debug!("sprite {:?} removed", self.id);
        }
        self.removed = true;
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Groups this sprite has been added to.
    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }

    pub(crate) fn join_group(&mut self, group: GroupId) {
        if !self.groups.contains(&group) {
            self.groups.push(group);
        }
    }

    pub(crate) fn leave_group(&mut self, group: GroupId) {
        self.groups.retain(|g| *g != group);
    }

    /// Advance one cycle: rotation, friction, speed cap, integration,
    /// life countdown and animation. Removed sprites are left untouched.
    pub fn update(&mut self) {
        if self.removed {
            return;
        }

        if self.rotate_to_direction && self.velocity != Vec2::ZERO {
            self.rotation = self.direction();
        }

        let damping = 1.0 - self.friction.clamp(0.0, 1.0);
        self.velocity *= damping;

        if self.max_speed >= 0.0 {
            self.limit_speed(self.max_speed);
        }

        self.position += self.velocity;
        self.rotation += self.rotation_speed;

        if self.life > 0 {
            self.life -= 1;
        }
        if self.life == 0 {
            self.remove();
        }

        if let Some(anim) = self.animations.current_mut() {
            anim.update();
        }
    }

    // -- Motion --

    /// Scalar speed.
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Direction of motion in degrees.
    pub fn direction(&self) -> f32 {
        vector_angle(self.velocity)
    }

    pub fn set_velocity(&mut self, x: f32, y: f32) {
        self.velocity = Vec2::new(x, y);
    }

    /// Overwrite the velocity with `speed` along `angle`.
    ///
    /// Without an angle the current direction is kept; a stationary sprite
    /// uses its rotation instead.
    pub fn set_speed(&mut self, speed: f32, angle: Option<f32>) {
        let angle = angle.unwrap_or_else(|| {
            if self.velocity != Vec2::ZERO {
                self.direction()
            } else {
                self.rotation
            }
        });
        self.velocity = direction_vector(angle) * speed;
    }

    /// Push the sprite along `angle`, adding to the current velocity.
    pub fn add_speed(&mut self, speed: f32, angle: f32) {
        self.velocity += direction_vector(angle) * speed;
    }

    /// Push the sprite toward a point, adding to the current velocity.
    pub fn attraction_point(&mut self, magnitude: f32, x: f32, y: f32) {
        let angle = vector_angle(Vec2::new(x, y) - self.position);
        self.add_speed(magnitude, angle);
    }

    /// Scale the velocity down so its magnitude is at most `max`.
    pub fn limit_speed(&mut self, max: f32) {
        let max = max.max(0.0);
        let speed = self.speed();
        if speed > max {
            self.velocity *= max / speed;
        }
    }

    // -- Visuals --

    /// Set horizontal mirroring (1 or -1) and return the current value.
    /// Other values are ignored, so `mirror_x(None)` is a getter.
    pub fn mirror_x(&mut self, dir: Option<f32>) -> f32 {
        if let Some(d) = dir.filter(|d| *d == 1.0 || *d == -1.0) {
            self.mirror.x = d;
        }
        self.mirror.x
    }

    /// Vertical counterpart of [`Sprite::mirror_x`].
    pub fn mirror_y(&mut self, dir: Option<f32>) -> f32 {
        if let Some(d) = dir.filter(|d| *d == 1.0 || *d == -1.0) {
            self.mirror.y = d;
        }
        self.mirror.y
    }

    pub fn mirror(&self) -> Vec2 {
        self.mirror
    }

    pub fn add_animation(&mut self, label: impl Into<String>, animation: Animation) {
        self.animations.add(label, animation);
    }

    /// Add a still image as a one-frame animation.
    pub fn add_image(&mut self, label: impl Into<String>, image: ImageHandle) {
        self.animations.add(label, Animation::single(image));
    }

    pub fn change_animation(&mut self, label: &str) -> bool {
        self.animations.change(label)
    }

    pub fn change_image(&mut self, label: &str) -> bool {
        self.change_animation(label)
    }

    pub fn animation_label(&self) -> Option<&str> {
        self.animations.label()
    }

    pub fn animation(&self) -> Option<&Animation> {
        self.animations.current()
    }

    pub fn animation_mut(&mut self) -> Option<&mut Animation> {
        self.animations.current_mut()
    }

    pub fn animations(&self) -> &AnimationSet {
        &self.animations
    }

    /// Unscaled size of the current visual: animation frame or placeholder.
    pub fn visual_size(&self) -> Vec2 {
        match self.animations.current() {
            Some(anim) => Vec2::new(anim.width(), anim.height()),
            None => Vec2::new(self.original_width, self.original_height),
        }
    }

    /// Scaled width of the current visual.
    pub fn width(&self) -> f32 {
        self.visual_size().x * self.scale
    }

    /// Scaled height of the current visual.
    pub fn height(&self) -> f32 {
        self.visual_size().y * self.scale
    }

    /// Bounding box of the current visual in world space.
    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_center(self.position, Vec2::new(self.width(), self.height()))
    }

    pub fn set_renderer(&mut self, renderer: impl SpriteRenderer + 'static) {
        self.renderer = Some(CustomDraw(Rc::new(renderer)));
    }

    pub fn clear_renderer(&mut self) {
        self.renderer = None;
    }

    pub fn renderer(&self) -> Option<&CustomDraw> {
        self.renderer.as_ref()
    }

    // -- Colliders --

    pub fn collider(&self) -> Option<&Collider> {
        self.collider.as_ref()
    }

    pub fn set_collider(&mut self, collider: Collider) {
        self.collider = Some(collider);
    }

    /// Collider matching the unscaled visual bounds.
    pub fn default_collider(&self) -> Collider {
        let size = self.visual_size();
        Collider::rectangle(size.x, size.y)
    }

    /// Replace the collider with one matching the current visual bounds.
    pub fn set_default_collider(&mut self) {
        self.collider = Some(self.default_collider());
    }

    /// The collider, creating the default one first if none was set.
    pub fn ensure_collider(&mut self) -> Collider {
        match self.collider {
            Some(collider) => collider,
            None => {
                let collider = self.default_collider();
                self.collider = Some(collider);
                collider
            }
        }
    }

    /// World-space collider shape. Uses the default collider without
    /// storing it when none has been set.
    pub fn shape(&self) -> Shape {
        self.collider
            .unwrap_or_else(|| self.default_collider())
            .world_shape(self.position, self.scale)
    }

    /// Whether a world-space point lies on the collider.
    pub fn overlap_point(&mut self, x: f32, y: f32) -> bool {
        self.ensure_collider();
        self.shape().contains_point(Vec2::new(x, y))
    }

    // -- Mouse --

    pub fn mouse_is_over(&self) -> bool {
        self.mouse_is_over
    }

    pub fn mouse_is_pressed(&self) -> bool {
        self.mouse_is_pressed
    }

    /// Refresh mouse state against a world-space pointer.
    ///
    /// A press starts when the button is down over the collider and lasts
    /// until the button is released, even if the pointer leaves.
    pub fn mouse_update(&mut self, pointer: Vec2, button_down: bool) -> MouseTransitions {
        self.ensure_collider();
        let was_over = self.mouse_is_over;
        let was_pressed = self.mouse_is_pressed;

        self.mouse_is_over = self.shape().contains_point(pointer);
        if self.mouse_is_over && button_down {
            self.mouse_is_pressed = true;
        }
        if !button_down {
            self.mouse_is_pressed = false;
        }

        MouseTransitions {
            entered: self.mouse_is_over && !was_over,
            exited: !self.mouse_is_over && was_over,
            pressed: self.mouse_is_pressed && !was_pressed,
            released: !self.mouse_is_pressed && was_pressed,
        }
    }
}
