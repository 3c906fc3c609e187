// Key binding table

use super::action::{default_bindings, Action};
use std::collections::HashMap;
use winit::keyboard::KeyCode;

/// Maps physical keys to game actions
#[derive(Debug, Clone)]
pub struct InputConfig {
    bindings: HashMap<KeyCode, Action>,
}

impl InputConfig {
    /// Create a configuration from a list of bindings; later entries win
    pub fn from_bindings(bindings: Vec<(KeyCode, Action)>) -> Self {
        let mut config = Self {
            bindings: HashMap::new(),
        };
        for (key, action) in bindings {
            config.bind(key, action);
        }
        config
    }

    /// Bind a key to an action, replacing any previous binding of that key
    pub fn bind(&mut self, key: KeyCode, action: Action) {
        self.bindings.insert(key, action);
    }

    /// Get the action bound to a key
    pub fn get_action(&self, key: KeyCode) -> Option<Action> {
        self.bindings.get(&key).copied()
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self::from_bindings(default_bindings())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let config = InputConfig::default();
        assert_eq!(config.get_action(KeyCode::ArrowLeft), Some(Action::Left));
        assert_eq!(config.get_action(KeyCode::Enter), Some(Action::Start));
        assert_eq!(config.get_action(KeyCode::NumpadEnter), Some(Action::Start));
        assert_eq!(config.get_action(KeyCode::Escape), Some(Action::Reset));
        assert_eq!(config.get_action(KeyCode::KeyP), Some(Action::Pause));
        assert_eq!(config.get_action(KeyCode::KeyQ), None);
    }

    #[test]
    fn test_rebind_key() {
        let mut config = InputConfig::from_bindings(vec![(KeyCode::KeyA, Action::Left)]);
        config.bind(KeyCode::KeyA, Action::Right);

        assert_eq!(config.get_action(KeyCode::KeyA), Some(Action::Right));
    }
}
