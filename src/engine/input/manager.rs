// Input manager - turns raw keyboard events into game input events

use super::action::Action;
use super::config::InputConfig;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

/// A bound key going down or up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub action: Action,
    pub pressed: bool,
    /// Auto-repeat of a key that is still held
    pub repeat: bool,
    /// Shift was held when the event fired
    pub shift: bool,
}

/// Queues input events for the game
#[derive(Debug)]
pub struct InputManager {
    /// Key bindings
    config: InputConfig,

    /// Current modifier state
    modifiers: ModifiersState,

    /// Events since the last drain
    events: Vec<InputEvent>,
}

impl InputManager {
    /// Create a new input manager with the default bindings
    pub fn new() -> Self {
        Self::with_config(InputConfig::default())
    }

    pub fn with_config(config: InputConfig) -> Self {
        Self {
            config,
            modifiers: ModifiersState::empty(),
            events: Vec::new(),
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        // Only process physical key presses
        if let PhysicalKey::Code(key_code) = event.physical_key {
            self.process_key(key_code, event.state == ElementState::Pressed, event.repeat);
        }
    }

    /// Record modifier changes (shift selects running)
    pub fn set_modifiers(&mut self, modifiers: ModifiersState) {
        self.modifiers = modifiers;
    }

    /// Process a key transition
    ///
    /// Repeats are queued with `repeat` set; the consumer decides which
    /// actions follow them (a shift change while a direction is held
    /// switches between walking and running).
    pub fn process_key(&mut self, key_code: KeyCode, pressed: bool, repeat: bool) {
        let Some(action) = self.config.get_action(key_code) else {
            return;
        };

        self.events.push(InputEvent {
            action,
            pressed,
            repeat,
            shift: self.modifiers.shift_key(),
        });
    }

    /// Take every queued event, oldest first
    pub fn drain_events(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}
