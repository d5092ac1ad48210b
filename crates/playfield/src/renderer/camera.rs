use glam::{Mat4, Vec2, Vec3};

/// View transform for the draw pass.
///
/// While active, the camera position is shown at the canvas center and
/// world distances are multiplied by `zoom`. While inactive, world and
/// screen coordinates coincide.
#[derive(Debug, Clone)]
pub struct Camera {
    /// World point shown at the canvas center.
    pub position: Vec2,
    /// Screen units per world unit.
    pub zoom: f32,
    active: bool,
    canvas: Vec2,
    mouse: Vec2,
}

impl Camera {
    pub fn new(x: f32, y: f32, zoom: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            zoom,
            active: false,
            canvas: Vec2::ZERO,
            mouse: Vec2::ZERO,
        }
    }

    /// Camera centered on a canvas of the given size, zoom 1.
    pub fn for_canvas(width: f32, height: f32) -> Self {
        let mut camera = Self::new(width / 2.0, height / 2.0, 1.0);
        camera.canvas = Vec2::new(width, height);
        camera
    }

    pub fn on(&mut self) {
        self.active = true;
    }

    pub fn off(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_canvas_size(&mut self, width: f32, height: f32) {
        self.canvas = Vec2::new(width, height);
    }

    pub fn canvas_size(&self) -> Vec2 {
        self.canvas
    }

    pub fn look_at(&mut self, target: Vec2) {
        self.position = target;
    }

    /// World-to-screen matrix. Identity while inactive.
    pub fn view_matrix(&self) -> Mat4 {
        if !self.active {
            return Mat4::IDENTITY;
        }
        let half = self.canvas / 2.0;
        Mat4::from_translation(Vec3::new(half.x, half.y, 0.0))
            * Mat4::from_scale(Vec3::new(self.zoom, self.zoom, 1.0))
            * Mat4::from_translation(Vec3::new(-self.position.x, -self.position.y, 0.0))
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        if !self.active {
            return world;
        }
        (world - self.position) * self.zoom + self.canvas / 2.0
    }

    /// Inverse of [`Camera::world_to_screen`]. A zero zoom maps every
    /// screen point to the camera position.
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        if !self.active {
            return screen;
        }
        if self.zoom == 0.0 {
            return self.position;
        }
        (screen - self.canvas / 2.0) / self.zoom + self.position
    }

    /// Translate the raw canvas pointer into world space.
    /// Called once per cycle before the update pass.
    pub fn update_mouse(&mut self, raw_x: f32, raw_y: f32) {
        self.mouse = self.screen_to_world(Vec2::new(raw_x, raw_y));
    }

    pub fn mouse_x(&self) -> f32 {
        self.mouse.x
    }

    pub fn mouse_y(&self) -> f32 {
        self.mouse.y
    }

    pub fn mouse(&self) -> Vec2 {
        self.mouse
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn inactive_camera_is_identity() {
        let mut cam = Camera::for_canvas(800.0, 600.0);
        cam.position = Vec2::new(1000.0, 1000.0);
        cam.zoom = 3.0;
        assert_eq!(cam.view_matrix(), Mat4::IDENTITY);
        cam.update_mouse(10.0, 20.0);
        assert_eq!(cam.mouse(), Vec2::new(10.0, 20.0));
    }

    #[test]
    fn active_camera_centers_its_position() {
        let mut cam = Camera::for_canvas(800.0, 600.0);
        cam.on();
        cam.look_at(Vec2::new(1000.0, 50.0));
        cam.zoom = 2.0;

        assert!(close(cam.world_to_screen(Vec2::new(1000.0, 50.0)), Vec2::new(400.0, 300.0)));
        assert!(close(cam.world_to_screen(Vec2::new(1010.0, 50.0)), Vec2::new(420.0, 300.0)));

        let m = cam.view_matrix();
        let p = m.transform_point3(Vec3::new(1010.0, 50.0, 0.0));
        assert!(close(Vec2::new(p.x, p.y), Vec2::new(420.0, 300.0)));
    }

    #[test]
    fn mouse_is_inverse_transformed() {
        let mut cam = Camera::for_canvas(800.0, 600.0);
        cam.on();
        cam.position = Vec2::new(0.0, 0.0);
        cam.zoom = 0.5;
        cam.update_mouse(500.0, 300.0);
        assert!(close(cam.mouse(), Vec2::new(200.0, 0.0)));
        assert!(close(cam.world_to_screen(cam.mouse()), Vec2::new(500.0, 300.0)));
    }

    #[test]
    fn on_off_toggles() {
        let mut cam = Camera::default();
        assert!(!cam.is_active());
        cam.on();
        assert!(cam.is_active());
        cam.off();
        assert!(!cam.is_active());
    }
}
