pub mod collision;
pub mod geometry;
pub mod quadtree;
pub mod time;
pub mod world;
