//! Shape math shared by colliders, the quadtree and the collision queries.
//!
//! Conventions: y grows downward, angles are in degrees, and "touching"
//! (penetration up to [`CONTACT_EPSILON`]) is not an overlap.

use glam::Vec2;

/// Penetration depth at or below this counts as touching. Absorbs the
/// rounding left behind after a pair is pushed apart by its MTV.
pub const CONTACT_EPSILON: f32 = 1e-3;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Build from a center and full size. Negative sizes are normalized.
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn half_size(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// Strict overlap: boxes sharing only an edge do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Inclusive point containment.
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Whether `other` lies entirely inside this box.
    pub fn contains(&self, other: &Aabb) -> bool {
        other.min.x >= self.min.x
            && other.max.x <= self.max.x
            && other.min.y >= self.min.y
            && other.max.y <= self.max.y
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }
}

/// A collider projected into world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Rect(Aabb),
    Circle { center: Vec2, radius: f32 },
}

impl Shape {
    pub fn bounds(&self) -> Aabb {
        match *self {
            Shape::Rect(aabb) => aabb,
            Shape::Circle { center, radius } => {
                Aabb::from_center(center, Vec2::splat(radius * 2.0))
            }
        }
    }

    pub fn center(&self) -> Vec2 {
        match *self {
            Shape::Rect(aabb) => aabb.center(),
            Shape::Circle { center, .. } => center,
        }
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        match *self {
            Shape::Rect(aabb) => aabb.contains_point(p),
            Shape::Circle { center, radius } => center.distance_squared(p) <= radius * radius,
        }
    }

    pub fn translated(&self, delta: Vec2) -> Shape {
        match *self {
            Shape::Rect(aabb) => Shape::Rect(Aabb::new(aabb.min + delta, aabb.max + delta)),
            Shape::Circle { center, radius } => Shape::Circle {
                center: center + delta,
                radius,
            },
        }
    }

    pub fn overlaps(&self, other: &Shape) -> bool {
        self.penetration(other).is_some()
    }

    /// Minimum translation vector that moves `other` out of `self`.
    ///
    /// Returns `None` when the shapes do not overlap. The vector points from
    /// `self` toward `other`; applying its negation to `self` separates the
    /// pair just as well.
    pub fn penetration(&self, other: &Shape) -> Option<Vec2> {
        match (*self, *other) {
            (Shape::Rect(a), Shape::Rect(b)) => rect_rect(&a, &b),
            (Shape::Circle { center: ca, radius: ra }, Shape::Circle { center: cb, radius: rb }) => {
                circle_circle(ca, ra, cb, rb)
            }
            (Shape::Rect(a), Shape::Circle { center, radius }) => rect_circle(&a, center, radius),
            (Shape::Circle { center, radius }, Shape::Rect(b)) => {
                rect_circle(&b, center, radius).map(|v| -v)
            }
        }
    }
}

fn rect_rect(a: &Aabb, b: &Aabb) -> Option<Vec2> {
    if !a.intersects(b) {
        return None;
    }
    let push_right = a.max.x - b.min.x;
    let push_left = b.max.x - a.min.x;
    let push_down = a.max.y - b.min.y;
    let push_up = b.max.y - a.min.y;

    let dx = if push_right < push_left { push_right } else { -push_left };
    let dy = if push_down < push_up { push_down } else { -push_up };

    if dx.abs().min(dy.abs()) <= CONTACT_EPSILON {
        return None;
    }
    if dx.abs() < dy.abs() {
        Some(Vec2::new(dx, 0.0))
    } else {
        Some(Vec2::new(0.0, dy))
    }
}

fn circle_circle(ca: Vec2, ra: f32, cb: Vec2, rb: f32) -> Option<Vec2> {
    let d = cb - ca;
    let dist_sq = d.length_squared();
    let reach = ra + rb;
    if dist_sq >= reach * reach {
        return None;
    }
    let dist = dist_sq.sqrt();
    if reach - dist <= CONTACT_EPSILON {
        return None;
    }
    // Concentric circles: pick an arbitrary but stable axis.
    let normal = if dist > 0.0 { d / dist } else { Vec2::X };
    Some(normal * (reach - dist))
}

/// MTV moving the circle out of the box.
fn rect_circle(a: &Aabb, center: Vec2, radius: f32) -> Option<Vec2> {
    let closest = a.closest_point(center);
    let d = center - closest;
    let dist_sq = d.length_squared();

    if dist_sq > 0.0 {
        if dist_sq >= radius * radius {
            return None;
        }
        let dist = dist_sq.sqrt();
        if radius - dist <= CONTACT_EPSILON {
            return None;
        }
        return Some(d / dist * (radius - dist));
    }

    // Center inside the box: leave through the nearest face.
    let to_left = center.x - a.min.x;
    let to_right = a.max.x - center.x;
    let to_top = center.y - a.min.y;
    let to_bottom = a.max.y - center.y;
    let nearest = to_left.min(to_right).min(to_top).min(to_bottom);

    let push = if nearest == to_left {
        Vec2::new(-(to_left + radius), 0.0)
    } else if nearest == to_right {
        Vec2::new(to_right + radius, 0.0)
    } else if nearest == to_top {
        Vec2::new(0.0, -(to_top + radius))
    } else {
        Vec2::new(0.0, to_bottom + radius)
    };
    Some(push)
}

/// Unit vector for an angle in degrees.
pub fn direction_vector(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

/// Angle of a vector in degrees, in (-180, 180].
pub fn vector_angle(v: Vec2) -> f32 {
    v.y.atan2(v.x).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Shape {
        Shape::Rect(Aabb::from_center(Vec2::new(x, y), Vec2::new(w, h)))
    }

    fn circle(x: f32, y: f32, r: f32) -> Shape {
        Shape::Circle { center: Vec2::new(x, y), radius: r }
    }

    #[test]
    fn circles_overlap_within_radius_sum() {
        assert!(circle(0.0, 0.0, 5.0).overlaps(&circle(8.0, 0.0, 5.0)));
        assert!(!circle(0.0, 0.0, 5.0).overlaps(&circle(12.0, 0.0, 5.0)));
    }

    #[test]
    fn touching_is_not_overlap() {
        assert!(!circle(0.0, 0.0, 5.0).overlaps(&circle(10.0, 0.0, 5.0)));
        assert!(!rect(0.0, 0.0, 10.0, 10.0).overlaps(&rect(10.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn rounding_depth_contact_is_touching() {
        let depth = 2e-4;
        assert!(!circle(0.0, 0.0, 5.0).overlaps(&circle(10.0 - depth, 0.0, 5.0)));
        assert!(!rect(0.0, 0.0, 10.0, 10.0).overlaps(&rect(10.0 - depth, 3.0, 10.0, 10.0)));
        assert!(!rect(0.0, 0.0, 10.0, 10.0).overlaps(&circle(10.0 - depth, 0.0, 5.0)));
        assert!(circle(0.0, 0.0, 5.0).overlaps(&circle(9.99, 0.0, 5.0)));
    }

    #[test]
    fn rect_mtv_uses_shallowest_axis() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(8.0, 1.0, 10.0, 10.0);
        let mtv = a.penetration(&b).unwrap();
        assert_eq!(mtv, Vec2::new(2.0, 0.0));
        assert!(!a.overlaps(&b.translated(mtv)));
    }

    #[test]
    fn rect_mtv_points_toward_other() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(-3.0, -9.0, 10.0, 10.0);
        let mtv = a.penetration(&b).unwrap();
        assert_eq!(mtv, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn circle_mtv_separates_exactly() {
        let a = circle(0.0, 0.0, 5.0);
        let b = circle(8.0, 0.0, 5.0);
        let mtv = a.penetration(&b).unwrap();
        assert_eq!(mtv, Vec2::new(2.0, 0.0));
        assert!(!a.overlaps(&b.translated(mtv)));
    }

    #[test]
    fn mixed_pair_uses_closest_point() {
        let boxed = rect(0.0, 0.0, 10.0, 10.0);
        // Circle to the right of the box, 3 units inside its reach.
        let c = circle(7.0, 0.0, 5.0);
        let mtv = boxed.penetration(&c).unwrap();
        assert_eq!(mtv, Vec2::new(3.0, 0.0));
        // Reverse order gives the reverse vector.
        assert_eq!(c.penetration(&boxed).unwrap(), Vec2::new(-3.0, 0.0));
        // Near the corner but outside the radius.
        assert!(!boxed.overlaps(&circle(9.0, 9.0, 5.0)));
    }

    #[test]
    fn circle_center_inside_box_exits_nearest_face() {
        let boxed = rect(0.0, 0.0, 20.0, 20.0);
        let c = circle(8.0, 0.0, 1.0);
        let mtv = boxed.penetration(&c).unwrap();
        assert_eq!(mtv, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn angles_round_trip() {
        let v = direction_vector(90.0);
        assert!(v.x.abs() < 1e-6 && (v.y - 1.0).abs() < 1e-6);
        assert!((vector_angle(Vec2::new(0.0, -1.0)) + 90.0).abs() < 1e-4);
    }

    #[test]
    fn aabb_contains_and_union() {
        let a = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::new(Vec2::splat(2.0), Vec2::splat(4.0));
        assert!(a.contains(&b));
        assert!(!b.contains(&a));
        let u = b.union(&Aabb::new(Vec2::splat(-1.0), Vec2::ZERO));
        assert_eq!(u.min, Vec2::splat(-1.0));
        assert_eq!(u.max, Vec2::splat(4.0));
    }
}
