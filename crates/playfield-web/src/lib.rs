pub mod runner;

pub use runner::SketchRunner;

// Used by `export_sketch!` expansions in the sketch crate.
pub use console_error_panic_hook;
pub use console_log;
pub use log;
pub use playfield;

/// Generate the `#[wasm_bindgen]` exports for a sketch.
///
/// Generates:
/// - `thread_local!` storage for the SketchRunner
/// - a `with_runner()` helper
/// - exports for init, tick, pointer and key input, and buffer accessors
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod sketch;
/// use sketch::Asteroids;
///
/// playfield_web::export_sketch!(Asteroids, "asteroids");
/// ```
///
/// The sketch type must implement `playfield::Sketch` and `Default`.
#[macro_export]
macro_rules! export_sketch {
    ($sketch_type:ty, $sketch_name:literal) => {
        use std::cell::RefCell;

        use $crate::playfield::{InputEvent, KeyCode, MouseButton};

        thread_local! {
            static RUNNER: RefCell<Option<$crate::SketchRunner<$sketch_type>>> = RefCell::new(None);
        }

        /// Runs `f` on the runner, or returns `None` before `sketch_init`.
        fn with_runner<R>(f: impl FnOnce(&mut $crate::SketchRunner<$sketch_type>) -> R) -> Option<R> {
            RUNNER.with(|cell| cell.borrow_mut().as_mut().map(f))
        }

        #[wasm_bindgen]
        pub fn sketch_init() {
            $crate::console_error_panic_hook::set_once();
            let _ = $crate::console_log::init_with_level($crate::log::Level::Info);

            let mut runner = $crate::SketchRunner::new(<$sketch_type>::default());
            runner.init();
            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });
            $crate::log::info!("{}: initialized", $sketch_name);
        }

        #[wasm_bindgen]
        pub fn sketch_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn sketch_pointer_down(x: f32, y: f32, button: u32) {
            if let Some(button) = MouseButton::from_dom(button) {
                with_runner(|r| r.push_input(InputEvent::PointerDown { x, y, button }));
            }
        }

        #[wasm_bindgen]
        pub fn sketch_pointer_up(x: f32, y: f32, button: u32) {
            if let Some(button) = MouseButton::from_dom(button) {
                with_runner(|r| r.push_input(InputEvent::PointerUp { x, y, button }));
            }
        }

        #[wasm_bindgen]
        pub fn sketch_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn sketch_key_down(key_code: u32, repeat: bool) {
            with_runner(|r| r.push_input(InputEvent::KeyDown { key: KeyCode(key_code), repeat }));
        }

        #[wasm_bindgen]
        pub fn sketch_key_up(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyUp { key: KeyCode(key_code) }));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_instances_ptr() -> *const f32 {
            with_runner(|r| r.instances_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_instance_count() -> u32 {
            with_runner(|r| r.instance_count()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_view_ptr() -> *const f32 {
            with_runner(|r| r.view_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_debug_segments_ptr() -> *const f32 {
            with_runner(|r| r.debug_segments_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_debug_segment_count() -> u32 {
            with_runner(|r| r.debug_segment_count()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_canvas_width() -> f32 {
            with_runner(|r| r.canvas_width()).unwrap_or(0.0)
        }

        #[wasm_bindgen]
        pub fn get_canvas_height() -> f32 {
            with_runner(|r| r.canvas_height()).unwrap_or(0.0)
        }

        #[wasm_bindgen]
        pub fn get_max_instances() -> u32 {
            with_runner(|r| r.max_instances()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_frame_count() -> u32 {
            with_runner(|r| r.frame_count()).unwrap_or(0)
        }
    };
}
