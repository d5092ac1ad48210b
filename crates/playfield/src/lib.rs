pub mod api;
pub mod assets;
pub mod components;
pub mod core;
pub mod input;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use crate::api::sketch::{Sketch, SketchConfig, SketchContext};
pub use crate::api::types::{FrameRect, GroupId, ImageHandle, SpriteId};
pub use crate::assets::{expand_sequence, load_animation, AssetError, AssetLoader, SheetFrame, SpriteSheet};
pub use crate::components::animation::{Animation, AnimationSet, Frame, DEFAULT_FRAME_DELAY};
pub use crate::components::collider::{Collider, ColliderShape};
pub use crate::components::group::{AllSprites, Group, SpriteSet};
pub use crate::components::sprite::{CustomDraw, MouseTransitions, Sprite, SpriteRenderer, DEFAULT_SIZE};
pub use crate::core::collision::CollisionMode;
pub use crate::core::geometry::{Aabb, Shape};
pub use crate::core::quadtree::{QuadTree, QuadTreeConfig};
pub use crate::core::time::FixedTimestep;
pub use crate::core::world::World;
pub use crate::input::{ButtonState, InputEvent, InputQueue, InputState, KeyCode, MouseButton};
pub use crate::renderer::{Camera, DebugLine, RenderBuffer, RenderInstance};
pub use crate::systems::render::{draw_animation, draw_sprite, draw_sprites};
