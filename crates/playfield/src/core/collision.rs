//! Overlap, collide, displace and bounce queries between sprite sets.
//!
//! Pairs are visited in `a` order, then `b` order. With the quadtree on,
//! each `a` sprite only runs exact tests against `b` members whose indexed
//! bounds touch its own, but the visiting order and the outcome are the
//! same as the all-pairs walk.

use std::collections::HashMap;

use glam::Vec2;

use crate::api::types::SpriteId;
use crate::components::group::SpriteSet;
use crate::components::sprite::Sprite;
use crate::core::world::World;

/// What a query does to an overlapping pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionMode {
    /// Report only.
    Overlap,
    /// Push the `a` sprite out of the `b` sprite.
    Collide,
    /// Push the `b` sprite out of the `a` sprite.
    Displace,
    /// Exchange momentum along the contact normal, then separate.
    Bounce,
}

/// Result of resolving one pair.
#[derive(Debug, Clone, Copy, Default)]
struct PairOutcome {
    hit: bool,
    moved_a: bool,
    moved_b: bool,
}

impl World {
    /// True if any sprite of `a` overlaps any sprite of `b`. No sprite moves.
    pub fn overlap(&mut self, a: &impl SpriteSet, b: &impl SpriteSet) -> bool {
        !self.query(a, b, CollisionMode::Overlap).is_empty()
    }

    /// Every overlapping `(a, b)` pair.
    pub fn overlap_pairs(&mut self, a: &impl SpriteSet, b: &impl SpriteSet) -> Vec<(SpriteId, SpriteId)> {
        self.query(a, b, CollisionMode::Overlap)
    }

    /// Overlapping sprites of `a` are moved out of `b`. Velocities are kept.
    pub fn collide(&mut self, a: &impl SpriteSet, b: &impl SpriteSet) -> bool {
        !self.query(a, b, CollisionMode::Collide).is_empty()
    }

    /// Overlapping sprites of `b` are moved out of `a`. Velocities are kept.
    pub fn displace(&mut self, a: &impl SpriteSet, b: &impl SpriteSet) -> bool {
        !self.query(a, b, CollisionMode::Displace).is_empty()
    }

    /// Overlapping pairs bounce off each other according to mass and restitution.
    pub fn bounce(&mut self, a: &impl SpriteSet, b: &impl SpriteSet) -> bool {
        !self.query(a, b, CollisionMode::Bounce).is_empty()
    }

    /// Run a query and return the pairs that overlapped when visited.
    pub fn query(
        &mut self,
        a: &impl SpriteSet,
        b: &impl SpriteSet,
        mode: CollisionMode,
    ) -> Vec<(SpriteId, SpriteId)> {
        let a_ids = a.sprite_ids(self);
        let b_ids = b.sprite_ids(self);

        for id in a_ids.iter().chain(b_ids.iter()) {
            if let Some(sprite) = self.sprite_mut(*id) {
                sprite.ensure_collider();
            }
        }

        if self.quad_tree_enabled() {
            self.sync_index();
            self.query_indexed(&a_ids, &b_ids, mode)
        } else {
            self.query_all_pairs(&a_ids, &b_ids, mode)
        }
    }

    fn query_all_pairs(
        &mut self,
        a_ids: &[SpriteId],
        b_ids: &[SpriteId],
        mode: CollisionMode,
    ) -> Vec<(SpriteId, SpriteId)> {
        let mut hits = Vec::new();
        for &ia in a_ids {
            for &ib in b_ids {
                if !self.is_active(ia) {
                    break;
                }
                if self.resolve_pair(ia, ib, mode).hit {
                    hits.push((ia, ib));
                }
            }
        }
        hits
    }

    fn query_indexed(
        &mut self,
        a_ids: &[SpriteId],
        b_ids: &[SpriteId],
        mode: CollisionMode,
    ) -> Vec<(SpriteId, SpriteId)> {
        let mut positions: HashMap<SpriteId, Vec<usize>> = HashMap::new();
        for (pos, id) in b_ids.iter().enumerate() {
            positions.entry(*id).or_default().push(pos);
        }

        let mut hits = Vec::new();
        for &ia in a_ids {
            // Next b position still to visit for this a.
            let mut cursor = 0;
            'requery: loop {
                let Some(area) = self.sprite(ia).filter(|s| !s.is_removed()).map(|s| s.shape().bounds()) else {
                    break;
                };
                let mut candidates: Vec<usize> = self
                    .quad_tree
                    .query(&area)
                    .iter()
                    .filter_map(|id| positions.get(id))
                    .flatten()
                    .copied()
                    .filter(|p| *p >= cursor)
                    .collect();
                candidates.sort_unstable();
                candidates.dedup();

                for pos in candidates {
                    cursor = pos + 1;
                    let ib = b_ids[pos];
                    let outcome = self.resolve_pair(ia, ib, mode);
                    if outcome.hit {
                        hits.push((ia, ib));
                    }
                    if outcome.moved_b {
                        self.reindex(ib);
                    }
                    if outcome.moved_a {
                        self.reindex(ia);
                    }
                    // Later b members may now touch a, including repeats of ib.
                    if outcome.moved_a || outcome.moved_b {
                        continue 'requery;
                    }
                }
                break;
            }
        }
        hits
    }

    fn reindex(&mut self, id: SpriteId) {
        if let Some(bounds) = self.sprite(id).map(|s| s.shape().bounds()) {
            self.quad_tree.update(id, bounds);
        }
    }

    fn resolve_pair(&mut self, ia: SpriteId, ib: SpriteId, mode: CollisionMode) -> PairOutcome {
        let Some((sa, sb)) = self.pair_mut(ia, ib) else {
            return PairOutcome::default();
        };
        if sa.is_removed() || sb.is_removed() {
            return PairOutcome::default();
        }
        let Some(mtv) = sa.shape().penetration(&sb.shape()) else {
            return PairOutcome::default();
        };

        let mut outcome = PairOutcome {
            hit: true,
            ..Default::default()
        };

        match mode {
            CollisionMode::Overlap => {}
            CollisionMode::Collide => {
                if !sa.immovable {
                    sa.position -= mtv;
                    outcome.moved_a = true;
                }
            }
            CollisionMode::Displace => {
                if !sb.immovable {
                    sb.position += mtv;
                    outcome.moved_b = true;
                }
            }
            CollisionMode::Bounce => {
                let (moved_a, moved_b) = bounce_pair(sa, sb, mtv);
                outcome.moved_a = moved_a;
                outcome.moved_b = moved_b;
            }
        }
        outcome
    }
}

fn inverse_mass(sprite: &Sprite) -> f32 {
    if sprite.immovable {
        0.0
    } else {
        1.0 / sprite.mass.max(f32::EPSILON)
    }
}

/// Impulse response along the MTV normal, then positional separation split
/// by inverse mass. Returns which sprites moved.
fn bounce_pair(sa: &mut Sprite, sb: &mut Sprite, mtv: Vec2) -> (bool, bool) {
    let inv_a = inverse_mass(sa);
    let inv_b = inverse_mass(sb);
    let inv_sum = inv_a + inv_b;
    if inv_sum <= 0.0 {
        return (false, false);
    }

    let normal = mtv.normalize_or_zero();
    let closing = (sb.velocity - sa.velocity).dot(normal);
    if closing < 0.0 {
        let restitution = sa.restitution.max(0.0) * sb.restitution.max(0.0);
        let impulse = -(1.0 + restitution) * closing / inv_sum;
        sa.velocity -= normal * (impulse * inv_a);
        sb.velocity += normal * (impulse * inv_b);
    }

    sa.position -= mtv * (inv_a / inv_sum);
    sb.position += mtv * (inv_b / inv_sum);
    (inv_a > 0.0, inv_b > 0.0)
}
