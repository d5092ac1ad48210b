//! Collider outlines for sprites with `debug` set.
//!
//! Outlines are pushed as debug lines next to the sprite quads; the host
//! draws them on top with the same view transform.

use crate::components::sprite::Sprite;
use crate::core::geometry::Shape;
use crate::renderer::instance::{DebugLine, RenderBuffer};

/// Outline color for colliders.
pub const COLLIDER_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
/// Line width in world units.
pub const LINE_WIDTH: f32 = 1.0;

const CIRCLE_SEGMENTS: usize = 24;
const CROSS_HALF: f32 = 3.0;

/// Push the sprite's collider outline and a small cross at its center.
pub fn debug_draw_sprite(sprite: &Sprite, buffer: &mut RenderBuffer) {
    let shape = sprite.shape();
    buffer.push_line(DebugLine {
        points: collider_outline(&shape),
        width: LINE_WIDTH,
        color: COLLIDER_COLOR,
    });

    let c = sprite.position;
    buffer.push_line(DebugLine {
        points: vec![[c.x - CROSS_HALF, c.y], [c.x + CROSS_HALF, c.y]],
        width: LINE_WIDTH,
        color: COLLIDER_COLOR,
    });
    buffer.push_line(DebugLine {
        points: vec![[c.x, c.y - CROSS_HALF], [c.x, c.y + CROSS_HALF]],
        width: LINE_WIDTH,
        color: COLLIDER_COLOR,
    });
}

/// Closed outline points for a world-space shape.
pub fn collider_outline(shape: &Shape) -> Vec<[f32; 2]> {
    match *shape {
        Shape::Circle { center, radius } => (0..=CIRCLE_SEGMENTS)
            .map(|i| {
                let angle = (i as f32 / CIRCLE_SEGMENTS as f32) * std::f32::consts::TAU;
                [center.x + angle.cos() * radius, center.y + angle.sin() * radius]
            })
            .collect(),
        Shape::Rect(aabb) => vec![
            [aabb.min.x, aabb.min.y],
            [aabb.max.x, aabb.min.y],
            [aabb.max.x, aabb.max.y],
            [aabb.min.x, aabb.max.y],
            [aabb.min.x, aabb.min.y],
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::SpriteId;
    use crate::components::collider::Collider;
    use glam::Vec2;

    #[test]
    fn rectangle_outline_is_closed() {
        let s = Sprite::new(SpriteId(1), Vec2::new(10.0, 10.0), 4.0, 2.0);
        let points = collider_outline(&s.shape());
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], points[4]);
        assert_eq!(points[0], [8.0, 9.0]);
    }

    #[test]
    fn circle_outline_stays_on_radius() {
        let mut s = Sprite::new(SpriteId(1), Vec2::ZERO, 10.0, 10.0);
        s.set_collider(Collider::circle(5.0));
        let points = collider_outline(&s.shape());
        assert!(points.len() > CIRCLE_SEGMENTS);
        for [x, y] in points {
            assert!((Vec2::new(x, y).length() - 5.0).abs() < 1e-4);
        }
    }

    #[test]
    fn debug_draw_adds_outline_and_cross() {
        let s = Sprite::new(SpriteId(1), Vec2::ZERO, 10.0, 10.0);
        let mut buffer = RenderBuffer::new();
        debug_draw_sprite(&s, &mut buffer);
        assert_eq!(buffer.debug_lines.len(), 3);
        assert!(buffer.instances.is_empty());
    }
}
