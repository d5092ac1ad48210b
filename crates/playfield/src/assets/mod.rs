pub mod error;
pub mod loader;
pub mod sheet;

pub use error::AssetError;
pub use loader::{expand_sequence, load_animation, AssetLoader};
pub use sheet::{SheetFrame, SpriteSheet};
