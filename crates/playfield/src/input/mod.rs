pub mod keys;
pub mod queue;
pub mod state;

pub use keys::{KeyCode, MouseButton};
pub use queue::{InputEvent, InputQueue};
pub use state::{ButtonState, InputState};
