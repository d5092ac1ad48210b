use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::api::types::{FrameRect, ImageHandle};

/// Image slot used by placeholder rectangles.
pub const NO_IMAGE: f32 = -1.0;

/// One drawn quad, laid out for a host renderer to read as raw floats.
/// 16 floats = 64 bytes stride.
///
/// Positions are in world space; the host applies [`RenderBuffer::view`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    /// Quad center X.
    pub x: f32,
    /// Quad center Y.
    pub y: f32,
    /// Rendered width (scale applied).
    pub width: f32,
    /// Rendered height (scale applied).
    pub height: f32,
    /// Rotation in radians, clockwise with y down.
    pub rotation: f32,
    /// 1 or -1.
    pub mirror_x: f32,
    /// 1 or -1.
    pub mirror_y: f32,
    /// Image id, or [`NO_IMAGE`] for a flat colored rectangle.
    pub image: f32,
    /// Source rectangle inside the image, in pixels.
    pub src_x: f32,
    pub src_y: f32,
    pub src_w: f32,
    pub src_h: f32,
    /// RGBA tint (placeholder fill color for rectangles).
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl RenderInstance {
    pub const FLOATS: usize = 16;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    /// Flat colored rectangle.
    pub fn rect(x: f32, y: f32, width: f32, height: f32, color: [f32; 4]) -> Self {
        Self {
            x,
            y,
            width,
            height,
            mirror_x: 1.0,
            mirror_y: 1.0,
            image: NO_IMAGE,
            r: color[0],
            g: color[1],
            b: color[2],
            a: color[3],
            ..Default::default()
        }
    }

    /// Region of an image, drawn untinted.
    pub fn image(x: f32, y: f32, image: ImageHandle, rect: FrameRect) -> Self {
        Self {
            x,
            y,
            width: rect.width,
            height: rect.height,
            mirror_x: 1.0,
            mirror_y: 1.0,
            image: image.id as f32,
            src_x: rect.x,
            src_y: rect.y,
            src_w: rect.width,
            src_h: rect.height,
            r: 1.0,
            g: 1.0,
            b: 1.0,
            a: 1.0,
            ..Default::default()
        }
    }

    pub fn with_rotation_degrees(mut self, degrees: f32) -> Self {
        self.rotation = degrees.to_radians();
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.width *= scale;
        self.height *= scale;
        self
    }

    pub fn with_mirror(mut self, mirror_x: f32, mirror_y: f32) -> Self {
        self.mirror_x = mirror_x;
        self.mirror_y = mirror_y;
        self
    }

    pub fn has_image(&self) -> bool {
        self.image >= 0.0
    }
}

/// An open or closed polyline in world space, used for collider outlines.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugLine {
    pub points: Vec<[f32; 2]>,
    pub width: f32,
    pub color: [f32; 4],
}

/// Everything one draw pass produced: quads in draw order, debug lines and
/// the camera view in effect.
pub struct RenderBuffer {
    pub instances: Vec<RenderInstance>,
    pub debug_lines: Vec<DebugLine>,
    view: Mat4,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(512)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            debug_lines: Vec::new(),
            view: Mat4::IDENTITY,
        }
    }

    /// Drop the previous cycle's output. The view resets to identity.
    pub fn clear(&mut self) {
        self.instances.clear();
        self.debug_lines.clear();
        self.view = Mat4::IDENTITY;
    }

    pub fn push(&mut self, instance: RenderInstance) {
        self.instances.push(instance);
    }

    pub fn push_line(&mut self, line: DebugLine) {
        self.debug_lines.push(line);
    }

    pub fn set_view(&mut self, view: Mat4) {
        self.view = view;
    }

    /// World-to-screen transform to apply to every instance.
    pub fn view(&self) -> Mat4 {
        self.view
    }

    /// Column-major view matrix for handing to the host.
    pub fn view_cols(&self) -> [f32; 16] {
        self.view.to_cols_array()
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Instance data as a flat float slice.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Raw pointer to instance data for host-side reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_instance_is_16_floats() {
        assert_eq!(std::mem::size_of::<RenderInstance>(), RenderInstance::STRIDE_BYTES);
        assert_eq!(RenderInstance::FLOATS, 16);
    }

    #[test]
    fn rect_has_no_image() {
        let inst = RenderInstance::rect(1.0, 2.0, 3.0, 4.0, [0.5, 0.5, 0.5, 1.0]);
        assert!(!inst.has_image());
        assert_eq!(inst.mirror_x, 1.0);
    }

    #[test]
    fn image_uses_source_rect_size() {
        let handle = ImageHandle::new(7, 64.0, 32.0);
        let rect = FrameRect { x: 32.0, y: 0.0, width: 32.0, height: 32.0 };
        let inst = RenderInstance::image(0.0, 0.0, handle, rect).with_scale(2.0);
        assert!(inst.has_image());
        assert_eq!(inst.image, 7.0);
        assert_eq!((inst.width, inst.src_w), (64.0, 32.0));
    }

    #[test]
    fn buffer_flattens_and_clears() {
        let mut buf = RenderBuffer::new();
        buf.push(RenderInstance::default());
        buf.push(RenderInstance::default());
        buf.set_view(Mat4::from_scale(glam::Vec3::splat(2.0)));
        assert_eq!(buf.instance_count(), 2);
        assert_eq!(buf.as_floats().len(), 32);

        buf.clear();
        assert_eq!(buf.instance_count(), 0);
        assert_eq!(buf.view(), Mat4::IDENTITY);
    }
}
