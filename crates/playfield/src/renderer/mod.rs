pub mod camera;
pub mod instance;

pub use camera::Camera;
pub use instance::{DebugLine, RenderBuffer, RenderInstance};
