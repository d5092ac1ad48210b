pub mod animation;
pub mod collider;
pub mod group;
pub mod sprite;
