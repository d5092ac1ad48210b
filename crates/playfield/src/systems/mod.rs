pub mod debug;
pub mod render;
pub mod update;

pub use render::{draw_animation, draw_sprite, draw_sprites};
pub use update::{update_mouse, update_sprites};
