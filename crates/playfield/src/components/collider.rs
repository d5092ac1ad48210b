use glam::Vec2;

use crate::core::geometry::{Aabb, Shape};

/// Collider geometry in sprite-local units (before the sprite's scale).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    /// Axis-aligned box. Sprite rotation does not rotate it.
    Rectangle { width: f32, height: f32 },
    Circle { radius: f32 },
}

/// Invisible shape used for overlap, collision and mouse queries.
/// Independent of the sprite's visual bounds once set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub shape: ColliderShape,
    /// Offset of the collider center from the sprite center.
    pub offset: Vec2,
}

impl Collider {
    pub fn rectangle(width: f32, height: f32) -> Self {
        Self {
            shape: ColliderShape::Rectangle { width, height },
            offset: Vec2::ZERO,
        }
    }

    pub fn circle(radius: f32) -> Self {
        Self {
            shape: ColliderShape::Circle { radius },
            offset: Vec2::ZERO,
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Project into world space for a sprite at `position` with uniform `scale`.
    pub fn world_shape(&self, position: Vec2, scale: f32) -> Shape {
        let center = position + self.offset * scale;
        match self.shape {
            ColliderShape::Rectangle { width, height } => {
                Shape::Rect(Aabb::from_center(center, Vec2::new(width, height) * scale))
            }
            ColliderShape::Circle { radius } => Shape::Circle {
                center,
                radius: radius.abs() * scale.abs(),
            },
        }
    }

    pub fn is_circle(&self) -> bool {
        matches!(self.shape, ColliderShape::Circle { .. })
    }
}
