use std::cmp::Ordering;

use crate::api::types::{FrameRect, SpriteId};
use crate::components::animation::{Animation, Frame};
use crate::components::sprite::Sprite;
use crate::core::world::World;
use crate::renderer::camera::Camera;
use crate::renderer::instance::{RenderBuffer, RenderInstance};
use crate::systems::debug::debug_draw_sprite;

/// Draw every active sprite in the world, lowest depth first.
///
/// Records the camera view on the buffer. Sprites with equal depth keep
/// creation order.
pub fn draw_sprites(world: &World, camera: &Camera, buffer: &mut RenderBuffer) {
    buffer.set_view(camera.view_matrix());
    let ids = world.get_sprites();
    draw_sprite_list(world, &ids, buffer);
}

/// Draw the listed sprites in depth order. Removed and unknown ids are
/// skipped.
pub fn draw_sprite_list(world: &World, ids: &[SpriteId], buffer: &mut RenderBuffer) {
    let mut sprites: Vec<&Sprite> = ids
        .iter()
        .filter_map(|id| world.sprite(*id))
        .filter(|s| !s.is_removed())
        .collect();
    sprites.sort_by(|a, b| a.depth.partial_cmp(&b.depth).unwrap_or(Ordering::Equal));
    for sprite in sprites {
        draw_sprite(sprite, buffer);
    }
}

/// Draw one sprite: its custom renderer if set, else the current
/// animation frame, else the colored placeholder rectangle.
pub fn draw_sprite(sprite: &Sprite, buffer: &mut RenderBuffer) {
    if sprite.is_removed() {
        return;
    }

    if sprite.visible {
        if let Some(custom) = sprite.renderer() {
            custom.0.draw(sprite, buffer);
        } else {
            match sprite.animation() {
                Some(anim) => {
                    if let Some(instance) = frame_instance(anim, sprite.position.x, sprite.position.y) {
                        let mirror = sprite.mirror();
                        buffer.push(
                            instance
                                .with_scale(sprite.scale)
                                .with_rotation_degrees(sprite.rotation)
                                .with_mirror(mirror.x, mirror.y),
                        );
                    }
                }
                None => buffer.push(placeholder_instance(sprite)),
            }
        }
    }

    if sprite.debug {
        debug_draw_sprite(sprite, buffer);
    }
}

/// Flat rectangle at the sprite's placeholder size.
pub fn placeholder_instance(sprite: &Sprite) -> RenderInstance {
    let mirror = sprite.mirror();
    RenderInstance::rect(
        sprite.position.x,
        sprite.position.y,
        sprite.original_width,
        sprite.original_height,
        sprite.shape_color,
    )
    .with_scale(sprite.scale)
    .with_rotation_degrees(sprite.rotation)
    .with_mirror(mirror.x, mirror.y)
}

fn frame_instance(anim: &Animation, x: f32, y: f32) -> Option<RenderInstance> {
    if !anim.visible {
        return None;
    }
    let frame: &Frame = anim.frame_image()?;
    let rect = frame.rect.unwrap_or(FrameRect {
        x: 0.0,
        y: 0.0,
        width: frame.image.width,
        height: frame.image.height,
    });
    Some(RenderInstance::image(x, y, frame.image, rect))
}

/// Draw an animation no sprite owns, then advance it one cycle.
pub fn draw_animation(anim: &mut Animation, x: f32, y: f32, rotation: f32, buffer: &mut RenderBuffer) {
    if let Some(instance) = frame_instance(anim, x, y) {
        buffer.push(instance.with_rotation_degrees(rotation));
    }
    anim.update();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::ImageHandle;
    use glam::Vec2;

    #[test]
    fn sprites_draw_in_depth_order() {
        let mut world = World::new();
        let a = world.create_sprite(1.0, 0.0, 10.0, 10.0);
        let b = world.create_sprite(2.0, 0.0, 10.0, 10.0);
        let c = world.create_sprite(3.0, 0.0, 10.0, 10.0);
        world.sprite_mut(a).unwrap().depth = 5.0;
        world.sprite_mut(c).unwrap().depth = -1.0;
        world.sprite_mut(b).unwrap().depth = 0.0;

        let mut buffer = RenderBuffer::new();
        draw_sprites(&world, &Camera::default(), &mut buffer);
        let xs: Vec<f32> = buffer.instances.iter().map(|i| i.x).collect();
        assert_eq!(xs, vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn removed_and_hidden_sprites_are_not_drawn() {
        let mut world = World::new();
        let a = world.create_sprite(0.0, 0.0, 10.0, 10.0);
        let b = world.create_sprite(0.0, 0.0, 10.0, 10.0);
        world.remove_sprite(a);
        world.sprite_mut(b).unwrap().visible = false;

        let mut buffer = RenderBuffer::new();
        draw_sprite_list(&world, &[a, b], &mut buffer);
        assert_eq!(buffer.instance_count(), 0);
    }

    #[test]
    fn placeholder_uses_scaled_size_and_color() {
        let mut s = Sprite::new(SpriteId(1), Vec2::ZERO, 20.0, 10.0);
        s.scale = 2.0;
        s.shape_color = [1.0, 0.0, 0.0, 1.0];
        let mut buffer = RenderBuffer::new();
        draw_sprite(&s, &mut buffer);

        let inst = buffer.instances[0];
        assert!(!inst.has_image());
        assert_eq!((inst.width, inst.height), (40.0, 20.0));
        assert_eq!([inst.r, inst.g, inst.b, inst.a], [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn animated_sprite_draws_its_frame_mirrored() {
        let mut s = Sprite::new(SpriteId(1), Vec2::new(5.0, 5.0), 10.0, 10.0);
        s.add_image("idle", ImageHandle::new(9, 32.0, 16.0));
        s.mirror_x(Some(-1.0));
        let mut buffer = RenderBuffer::new();
        draw_sprite(&s, &mut buffer);

        let inst = buffer.instances[0];
        assert_eq!(inst.image, 9.0);
        assert_eq!((inst.width, inst.height), (32.0, 16.0));
        assert_eq!(inst.mirror_x, -1.0);
    }

    #[test]
    fn custom_renderer_replaces_default_drawing() {
        let mut s = Sprite::new(SpriteId(1), Vec2::ZERO, 10.0, 10.0);
        s.set_renderer(|sprite: &Sprite, buffer: &mut RenderBuffer| {
            buffer.push(RenderInstance::rect(sprite.position.x, 0.0, 1.0, 1.0, [0.0; 4]));
            buffer.push(RenderInstance::rect(sprite.position.x, 1.0, 1.0, 1.0, [0.0; 4]));
        });
        let mut buffer = RenderBuffer::new();
        draw_sprite(&s, &mut buffer);
        assert_eq!(buffer.instance_count(), 2);
    }

    #[test]
    fn debug_sprites_add_outlines() {
        let mut s = Sprite::new(SpriteId(1), Vec2::ZERO, 10.0, 10.0);
        s.debug = true;
        let mut buffer = RenderBuffer::new();
        draw_sprite(&s, &mut buffer);
        assert_eq!(buffer.instance_count(), 1);
        assert!(!buffer.debug_lines.is_empty());
    }

    #[test]
    fn standalone_animation_advances_when_drawn() {
        let frames = (0..3).map(|i| ImageHandle::new(i, 8.0, 8.0));
        let mut anim = Animation::from_images(frames).with_frame_delay(1);
        let mut buffer = RenderBuffer::new();

        draw_animation(&mut anim, 0.0, 0.0, 0.0, &mut buffer);
        draw_animation(&mut anim, 0.0, 0.0, 0.0, &mut buffer);
        let images: Vec<f32> = buffer.instances.iter().map(|i| i.image).collect();
        assert_eq!(images, vec![0.0, 1.0]);
    }

    #[test]
    fn camera_view_is_recorded() {
        let world = World::new();
        let mut camera = Camera::for_canvas(100.0, 100.0);
        camera.on();
        camera.zoom = 2.0;
        let mut buffer = RenderBuffer::new();
        draw_sprites(&world, &camera, &mut buffer);
        assert_eq!(buffer.view(), camera.view_matrix());
    }
}
