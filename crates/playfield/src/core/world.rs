use std::collections::HashMap;

use glam::Vec2;

use crate::api::types::{GroupId, SpriteId};
use crate::components::group::Group;
use crate::components::sprite::{Sprite, DEFAULT_SIZE};
use crate::core::quadtree::{QuadTree, QuadTreeConfig};

/// Sprite storage and the registry of every live sprite.
///
/// Sprites are kept in creation order in a flat Vec. Removal only flags a
/// sprite; its data stays readable (and groups may still reference it) until
/// [`World::purge_removed`] drops it.
pub struct World {
    sprites: Vec<Sprite>,
    index: HashMap<SpriteId, usize>,
    next_sprite_id: u32,
    next_group_id: u32,
    use_quad_tree: bool,
    pub(crate) quad_tree: QuadTree,
}

impl World {
    pub fn new() -> Self {
        Self::with_quad_tree(true, QuadTreeConfig::default())
    }

    pub fn with_quad_tree(enabled: bool, config: QuadTreeConfig) -> Self {
        Self {
            sprites: Vec::with_capacity(256),
            index: HashMap::with_capacity(256),
            next_sprite_id: 1,
            next_group_id: 1,
            use_quad_tree: enabled,
            quad_tree: QuadTree::new(config),
        }
    }

    /// Create a sprite with a placeholder rectangle and register it.
    pub fn create_sprite(&mut self, x: f32, y: f32, width: f32, height: f32) -> SpriteId {
        let id = SpriteId(self.next_sprite_id);
        self.next_sprite_id = self.next_sprite_id.saturating_add(1);
        self.spawn(Sprite::new(id, Vec2::new(x, y), width, height));
        id
    }

    /// Create a sprite with the default 100x100 placeholder.
    pub fn create_sprite_at(&mut self, x: f32, y: f32) -> SpriteId {
        self.create_sprite(x, y, DEFAULT_SIZE, DEFAULT_SIZE)
    }

    /// Register a pre-built sprite. Its id must come from this world's
    /// counter or be otherwise unique; a duplicate id replaces nothing and
    /// is ignored.
    pub fn spawn(&mut self, sprite: Sprite) {
        if self.index.contains_key(&sprite.id) {
            log::warn!("sprite {:?} already exists, ignoring spawn", sprite.id);
            return;
        }
        self.next_sprite_id = self.next_sprite_id.max(sprite.id.0.saturating_add(1));
        self.index.insert(sprite.id, self.sprites.len());
        self.sprites.push(sprite);
    }

    /// Remove a sprite from every later update, draw and collision pass.
    pub fn remove_sprite(&mut self, id: SpriteId) {
        if let Some(sprite) = self.sprite_mut(id) {
            sprite.remove();
        }
        self.quad_tree.remove(id);
    }

    /// Drop the data of removed sprites. Ids held elsewhere become dangling
    /// and are skipped by every lookup.
    pub fn purge_removed(&mut self) -> usize {
        let before = self.sprites.len();
        self.sprites.retain(|s| !s.is_removed());
        let purged = before - self.sprites.len();
        if purged > 0 {
            self.index = self
                .sprites
                .iter()
                .enumerate()
                .map(|(i, s)| (s.id, i))
                .collect();
            log::debug!("purged {purged} removed sprites");
        }
        purged
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.index.get(&id).map(|&i| &self.sprites[i])
    }

    pub fn sprite_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.index.get(&id).map(|&i| &mut self.sprites[i])
    }

    /// Mutable access to two distinct sprites at once.
    pub fn pair_mut(&mut self, a: SpriteId, b: SpriteId) -> Option<(&mut Sprite, &mut Sprite)> {
        let ia = *self.index.get(&a)?;
        let ib = *self.index.get(&b)?;
        if ia == ib {
            return None;
        }
        if ia < ib {
            let (lo, hi) = self.sprites.split_at_mut(ib);
            Some((&mut lo[ia], &mut hi[0]))
        } else {
            let (lo, hi) = self.sprites.split_at_mut(ia);
            Some((&mut hi[0], &mut lo[ib]))
        }
    }

    /// Whether the sprite exists and has not been removed.
    pub fn is_active(&self, id: SpriteId) -> bool {
        self.sprite(id).is_some_and(|s| !s.is_removed())
    }

    /// Ids of every active sprite, in creation order.
    pub fn get_sprites(&self) -> Vec<SpriteId> {
        self.iter().map(|s| s.id).collect()
    }

    /// Iterate over active sprites.
    pub fn iter(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter().filter(|s| !s.is_removed())
    }

    /// Iterate over active sprites mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Sprite> {
        self.sprites.iter_mut().filter(|s| !s.is_removed())
    }

    /// Number of active sprites.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create an empty group bound to this world's id space.
    pub fn create_group(&mut self) -> Group {
        let id = GroupId(self.next_group_id);
        self.next_group_id = self.next_group_id.saturating_add(1);
        Group::new(id)
    }

    // -- Spatial index --

    /// Turn the quadtree on or off. Only query cost changes, never results.
    pub fn use_quad_tree(&mut self, enabled: bool) {
        if enabled != self.use_quad_tree {
            log::info!("quadtree {}", if enabled { "enabled" } else { "disabled" });
        }
        self.use_quad_tree = enabled;
        if enabled {
            self.rebuild_index();
        } else {
            self.quad_tree.clear();
        }
    }

    pub fn quad_tree_enabled(&self) -> bool {
        self.use_quad_tree
    }

    /// Rebuild the quadtree from every active sprite's collider bounds.
    pub fn rebuild_index(&mut self) {
        if !self.use_quad_tree {
            return;
        }
        let items: Vec<_> = self.iter().map(|s| (s.id, s.shape().bounds())).collect();
        self.quad_tree.rebuild(items);
    }

    /// Bring quadtree entries in line with current sprite bounds.
    pub(crate) fn sync_index(&mut self) {
        let items: Vec<_> = self.iter().map(|s| (s.id, s.shape().bounds())).collect();
        self.quad_tree.sync(items);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
