use serde::{Deserialize, Serialize};

use crate::api::types::{FrameRect, ImageHandle};
use crate::assets::error::AssetError;
use crate::components::animation::{Animation, Frame};

/// Upper bound on the cells a grid sheet may produce.
pub const MAX_GRID_CELLS: usize = 1 << 16;

/// One named region of a sprite sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetFrame {
    #[serde(default)]
    pub name: Option<String>,
    pub frame: FrameRect,
}

/// JSON layout accepted by [`SpriteSheet::from_json`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SheetDescriptor {
    frames: Vec<SheetFrame>,
}

/// An image cut into frames, either on a regular grid or from an explicit
/// frame list.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    image: ImageHandle,
    frames: Vec<SheetFrame>,
}

impl SpriteSheet {
    /// Cut the image into `frame_width` x `frame_height` cells, row by row.
    /// `count` limits the number of frames; `None` takes every full cell.
    pub fn from_grid(
        image: ImageHandle,
        frame_width: f32,
        frame_height: f32,
        count: Option<usize>,
    ) -> Result<Self, AssetError> {
        if frame_width <= 0.0 || frame_height <= 0.0 {
            return Err(AssetError::Decode(format!(
                "invalid frame size {frame_width}x{frame_height}"
            )));
        }
        let cols = (image.width / frame_width).floor() as usize;
        let rows = (image.height / frame_height).floor() as usize;
        let available = cols
            .checked_mul(rows)
            .filter(|n| *n <= MAX_GRID_CELLS)
            .ok_or_else(|| {
                AssetError::Decode(format!(
                    "frame size {frame_width}x{frame_height} cuts {}x{} into too many cells",
                    image.width, image.height
                ))
            })?;
        if available == 0 {
            return Err(AssetError::Decode(format!(
                "frame size {frame_width}x{frame_height} exceeds image {}x{}",
                image.width, image.height
            )));
        }

        let wanted = count.unwrap_or(available);
        if wanted > available {
            log::warn!("sprite sheet has {available} cells, {wanted} requested");
        }

        let frames = (0..wanted.min(available))
            .map(|i| SheetFrame {
                name: None,
                frame: FrameRect {
                    x: (i % cols) as f32 * frame_width,
                    y: (i / cols) as f32 * frame_height,
                    width: frame_width,
                    height: frame_height,
                },
            })
            .collect();
        Ok(Self { image, frames })
    }

    /// Parse a `{"frames": [{"name": ..., "frame": {x, y, width, height}}]}`
    /// frame list.
    pub fn from_json(image: ImageHandle, json: &str) -> Result<Self, AssetError> {
        let desc: SheetDescriptor = serde_json::from_str(json)?;
        Ok(Self {
            image,
            frames: desc.frames,
        })
    }

    pub fn image(&self) -> ImageHandle {
        self.image
    }

    pub fn frames(&self) -> &[SheetFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame_named(&self, name: &str) -> Option<Frame> {
        self.frames
            .iter()
            .find(|f| f.name.as_deref() == Some(name))
            .map(|f| Frame::sub_image(self.image, f.frame))
    }

    /// Every frame in order as one animation.
    pub fn animation(&self) -> Result<Animation, AssetError> {
        if self.frames.is_empty() {
            return Err(AssetError::EmptyAnimation);
        }
        Ok(Animation::new(
            self.frames
                .iter()
                .map(|f| Frame::sub_image(self.image, f.frame))
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet_image() -> ImageHandle {
        ImageHandle::new(1, 64.0, 32.0)
    }

    #[test]
    fn grid_cuts_row_by_row() {
        let sheet = SpriteSheet::from_grid(sheet_image(), 16.0, 16.0, None).unwrap();
        assert_eq!(sheet.len(), 8);
        assert_eq!(sheet.frames()[5].frame, FrameRect { x: 16.0, y: 16.0, width: 16.0, height: 16.0 });

        let sheet = SpriteSheet::from_grid(sheet_image(), 16.0, 16.0, Some(3)).unwrap();
        let anim = sheet.animation().unwrap();
        assert_eq!(anim.frame_count(), 3);
        assert_eq!(anim.width(), 16.0);
    }

    #[test]
    fn oversized_cells_are_rejected() {
        let err = SpriteSheet::from_grid(sheet_image(), 100.0, 16.0, None).unwrap_err();
        assert!(matches!(err, AssetError::Decode(_)));
        assert!(SpriteSheet::from_grid(sheet_image(), 0.0, 16.0, None).is_err());
    }

    #[test]
    fn degenerate_cell_sizes_are_rejected() {
        let err = SpriteSheet::from_grid(sheet_image(), 1e-30, 1e-30, None).unwrap_err();
        assert!(matches!(err, AssetError::Decode(_)));
        let err = SpriteSheet::from_grid(sheet_image(), 1e-30, 16.0, Some(1)).unwrap_err();
        assert!(matches!(err, AssetError::Decode(_)));
        assert!(SpriteSheet::from_grid(sheet_image(), 0.25, 0.25, None).is_ok());
    }

    #[test]
    fn json_frame_list() {
        let json = r#"{
            "frames": [
                { "name": "stand", "frame": { "x": 0, "y": 0, "width": 20, "height": 32 } },
                { "frame": { "x": 20, "y": 0, "width": 24, "height": 32 } }
            ]
        }"#;
        let sheet = SpriteSheet::from_json(sheet_image(), json).unwrap();
        assert_eq!(sheet.len(), 2);
        let stand = sheet.frame_named("stand").unwrap();
        assert_eq!(stand.width(), 20.0);
        assert!(sheet.frame_named("jump").is_none());
    }

    #[test]
    fn bad_json_is_a_json_error() {
        let err = SpriteSheet::from_json(sheet_image(), "{\"frames\": 3}").unwrap_err();
        assert!(matches!(err, AssetError::Json(_)));

        let empty = SpriteSheet::from_json(sheet_image(), "{\"frames\": []}").unwrap();
        assert_eq!(empty.animation().unwrap_err(), AssetError::EmptyAnimation);
    }
}
