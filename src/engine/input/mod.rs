// Input handling system
//
// - `action`: game actions and the default key bindings
// - `config`: key binding table
// - `manager`: turns winit keyboard events into `InputEvent`s
//
// ```rust
// let mut input = InputManager::new();
//
// // In the event loop
// input.process_keyboard_event(&key_event);
//
// // Once per frame
// for event in input.drain_events() {
//     engine.handle_input(event);
// }
// ```

pub mod action;
pub mod config;
pub mod manager;

// Re-export commonly used types
pub use action::Action;
pub use manager::{InputEvent, InputManager};
