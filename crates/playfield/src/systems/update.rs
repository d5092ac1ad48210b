use glam::Vec2;

use crate::api::types::SpriteId;
use crate::components::sprite::MouseTransitions;
use crate::core::world::World;

/// Advance every active sprite one cycle, in creation order, then rebuild
/// the spatial index from the new positions.
///
/// Sprites whose life runs out are removed during the pass.
pub fn update_sprites(world: &mut World) {
    let mut expired = 0usize;
    for sprite in world.iter_mut() {
        sprite.update();
        if sprite.is_removed() {
            expired += 1;
        }
    }
    if expired > 0 {
        log::debug!("{expired} sprites reached the end of their life");
    }
    world.rebuild_index();
}

/// Refresh mouse state for sprites with `mouse_active` set.
///
/// `pointer` is in world space. Returns the sprites whose state changed.
pub fn update_mouse(world: &mut World, pointer: Vec2, button_down: bool) -> Vec<(SpriteId, MouseTransitions)> {
    world
        .iter_mut()
        .filter(|s| s.mouse_active)
        .filter_map(|s| {
            let transitions = s.mouse_update(pointer, button_down);
            transitions.any().then_some((s.id, transitions))
        })
        .collect()
}
