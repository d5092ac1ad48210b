/// Unique identifier for a sprite in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(pub u32);

/// Unique identifier for a group.
/// Sprites record the groups they belong to by this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub u32);

/// Opaque handle to an image owned by the host's asset loader.
///
/// The runtime never decodes pixels; it only needs the image's size for
/// default colliders and bounding boxes, and the id to tell the renderer
/// which texture to sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageHandle {
    pub id: u32,
    pub width: f32,
    pub height: f32,
}

impl ImageHandle {
    pub fn new(id: u32, width: f32, height: f32) -> Self {
        Self { id, width, height }
    }
}

/// Source rectangle of a frame inside a larger image (sprite sheets).
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct FrameRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}
