// Game actions and the default key bindings

use winit::keyboard::KeyCode;

/// Represents all possible in-game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement
    Right,
    Down,
    Left,
    Up,

    // Combat
    Attack,

    // Meta actions
    Start,
    Reset,
    Pause,
}

impl Action {
    /// Whether a held key keeps firing this action on auto-repeat
    ///
    /// Movement and attack follow the key; the meta actions fire once per
    /// keydown.
    pub fn repeats(&self) -> bool {
        matches!(
            self,
            Self::Right | Self::Down | Self::Left | Self::Up | Self::Attack
        )
    }
}

/// Default keyboard bindings
pub fn default_bindings() -> Vec<(KeyCode, Action)> {
    vec![
        // Movement (arrow keys)
        (KeyCode::ArrowRight, Action::Right),
        (KeyCode::ArrowDown, Action::Down),
        (KeyCode::ArrowLeft, Action::Left),
        (KeyCode::ArrowUp, Action::Up),
        // Combat
        (KeyCode::Space, Action::Attack),
        // Meta
        (KeyCode::Enter, Action::Start),
        (KeyCode::NumpadEnter, Action::Start),
        (KeyCode::Escape, Action::Reset),
        (KeyCode::KeyP, Action::Pause),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_play_actions_repeat() {
        for action in [Action::Right, Action::Down, Action::Left, Action::Up, Action::Attack] {
            assert!(action.repeats(), "{action:?}");
        }
        for action in [Action::Start, Action::Reset, Action::Pause] {
            assert!(!action.repeats(), "{action:?}");
        }
    }
}
