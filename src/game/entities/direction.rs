// Facing / movement direction

use glam::Vec2;

/// Direction an entity is moving or facing
///
/// `None` is a valid idle state: nothing held, no patrol heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    None,
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    /// Legacy numeric encoding, 0 for `None`
    pub fn code(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Right => 1,
            Self::Down => 2,
            Self::Left => 3,
            Self::Up => 4,
        }
    }

    pub fn is_some(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    pub fn opposite(&self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Up => Self::Down,
        }
    }

    /// Unit vector in screen space (y grows downward)
    pub fn unit(&self) -> Vec2 {
        match self {
            Self::None => Vec2::ZERO,
            Self::Right => Vec2::X,
            Self::Down => Vec2::Y,
            Self::Left => Vec2::NEG_X,
            Self::Up => Vec2::NEG_Y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_codes() {
        assert_eq!(Direction::None.code(), 0);
        assert_eq!(Direction::Right.code(), 1);
        assert_eq!(Direction::Up.code(), 4);
    }

    #[test]
    fn test_opposite() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::None.opposite(), Direction::None);
    }

    #[test]
    fn test_unit_vectors_point_down_screen() {
        assert_eq!(Direction::Down.unit(), Vec2::new(0.0, 1.0));
        assert_eq!(Direction::Up.unit(), Vec2::new(0.0, -1.0));
        assert!(Direction::Left.is_horizontal());
        assert!(!Direction::Up.is_horizontal());
    }
}
