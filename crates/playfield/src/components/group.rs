//! Groups of sprite references and the `SpriteSet` capability shared by
//! everything the collision queries accept.

use crate::api::types::{GroupId, SpriteId};
use crate::core::world::World;
use crate::renderer::instance::RenderBuffer;
use crate::systems::render::draw_sprite_list;

/// Anything that can name a sequence of sprites.
///
/// A single sprite is a one-element set, so sprite-vs-group and
/// group-vs-group queries share one code path.
pub trait SpriteSet {
    fn sprite_ids(&self, world: &World) -> Vec<SpriteId>;
}

impl SpriteSet for SpriteId {
    fn sprite_ids(&self, _world: &World) -> Vec<SpriteId> {
        vec![*self]
    }
}

impl SpriteSet for [SpriteId] {
    fn sprite_ids(&self, _world: &World) -> Vec<SpriteId> {
        self.to_vec()
    }
}

impl SpriteSet for Vec<SpriteId> {
    fn sprite_ids(&self, _world: &World) -> Vec<SpriteId> {
        self.clone()
    }
}

impl<T: SpriteSet + ?Sized> SpriteSet for &T {
    fn sprite_ids(&self, world: &World) -> Vec<SpriteId> {
        (**self).sprite_ids(world)
    }
}

/// Every active sprite in the world, in creation order.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllSprites;

impl SpriteSet for AllSprites {
    fn sprite_ids(&self, world: &World) -> Vec<SpriteId> {
        world.get_sprites()
    }
}

/// An ordered collection of sprite references.
///
/// A group never owns its sprites: removing a member only drops the
/// reference. Use [`Group::remove_sprites`] to remove the sprites themselves.
#[derive(Debug, Clone)]
pub struct Group {
    id: GroupId,
    members: Vec<SpriteId>,
}

impl Group {
    pub(crate) fn new(id: GroupId) -> Self {
        Self {
            id,
            members: Vec::new(),
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Add a sprite. Returns false for duplicates and unknown sprites.
    pub fn add(&mut self, world: &mut World, sprite: SpriteId) -> bool {
        if self.members.contains(&sprite) {
            return false;
        }
        let Some(s) = world.sprite_mut(sprite) else {
            log::warn!("cannot add unknown sprite {sprite:?} to group {:?}", self.id);
            return false;
        };
        s.join_group(self.id);
        self.members.push(sprite);
        true
    }

    /// Drop a sprite reference. Returns true if it was a member.
    pub fn remove(&mut self, world: &mut World, sprite: SpriteId) -> bool {
        let Some(idx) = self.index_of(sprite) else {
            return false;
        };
        self.members.remove(idx);
        if let Some(s) = world.sprite_mut(sprite) {
            s.leave_group(self.id);
        }
        true
    }

    pub fn contains(&self, sprite: SpriteId) -> bool {
        self.members.contains(&sprite)
    }

    pub fn index_of(&self, sprite: SpriteId) -> Option<usize> {
        self.members.iter().position(|m| *m == sprite)
    }

    pub fn get(&self, index: usize) -> Option<SpriteId> {
        self.members.get(index).copied()
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = SpriteId> + '_ {
        self.members.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<SpriteId> {
        self.members.clone()
    }

    /// Drop every reference. The sprites themselves are untouched.
    pub fn clear(&mut self, world: &mut World) {
        for id in self.members.drain(..) {
            if let Some(s) = world.sprite_mut(id) {
                s.leave_group(self.id);
            }
        }
    }

    /// Remove every member from the world and empty the group.
    pub fn remove_sprites(&mut self, world: &mut World) {
        for id in self.members.drain(..) {
            if let Some(s) = world.sprite_mut(id) {
                s.leave_group(self.id);
            }
            world.remove_sprite(id);
        }
    }

    /// Lowest member depth, or 0 for an empty group.
    pub fn min_depth(&self, world: &World) -> f32 {
        self.depths(world).reduce(f32::min).unwrap_or(0.0)
    }

    /// Highest member depth, or 0 for an empty group.
    pub fn max_depth(&self, world: &World) -> f32 {
        self.depths(world).reduce(f32::max).unwrap_or(0.0)
    }

    fn depths<'a>(&'a self, world: &'a World) -> impl Iterator<Item = f32> + 'a {
        self.members
            .iter()
            .filter_map(|id| world.sprite(*id))
            .map(|s| s.depth)
    }

    // -- Bulk queries --

    pub fn overlap(&self, world: &mut World, target: &impl SpriteSet) -> bool {
        world.overlap(self, target)
    }

    /// Members overlapping `target` are pushed out of it.
    pub fn collide(&self, world: &mut World, target: &impl SpriteSet) -> bool {
        world.collide(self, target)
    }

    /// Members push overlapping `target` sprites out of the way.
    pub fn displace(&self, world: &mut World, target: &impl SpriteSet) -> bool {
        world.displace(self, target)
    }

    pub fn bounce(&self, world: &mut World, target: &impl SpriteSet) -> bool {
        world.bounce(self, target)
    }

    /// Draw the members in depth order.
    pub fn draw(&self, world: &World, buffer: &mut RenderBuffer) {
        draw_sprite_list(world, &self.members, buffer);
    }
}

impl SpriteSet for Group {
    fn sprite_ids(&self, _world: &World) -> Vec<SpriteId> {
        self.members.clone()
    }
}
