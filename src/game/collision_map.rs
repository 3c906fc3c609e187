// Static collision map for the dungeon level

use glam::Vec2;

use crate::core::math::SurfaceSize;
use crate::game::entities::Direction;

/// Comparison applied to a coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cmp {
    Lt,
    Le,
    Gt,
    Ge,
}

/// `coordinate <cmp> value + half * extent`
///
/// `extent` is the box height for Y bounds and the box width for X bounds,
/// so `half` is usually `0.0`, `0.5` or `-0.5`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bound {
    cmp: Cmp,
    value: f32,
    half: f32,
}

impl Bound {
    const fn new(cmp: Cmp, value: f32) -> Self {
        Self {
            cmp,
            value,
            half: 0.0,
        }
    }

    const fn scaled(cmp: Cmp, value: f32, half: f32) -> Self {
        Self { cmp, value, half }
    }

    fn holds(&self, coordinate: f32, extent: f32) -> bool {
        let limit = self.value + self.half * extent;
        match self.cmp {
            Cmp::Lt => coordinate < limit,
            Cmp::Le => coordinate <= limit,
            Cmp::Gt => coordinate > limit,
            Cmp::Ge => coordinate >= limit,
        }
    }
}

/// One exclusion band: inside the Y range and matching any X bound means blocked
#[derive(Debug, Clone, Copy)]
struct Rule {
    direction: Direction,
    y: [Bound; 2],
    x_any: &'static [Bound],
}

impl Rule {
    fn blocks(&self, direction: Direction, pos: Vec2, size: Vec2) -> bool {
        self.direction == direction
            && self.y.iter().all(|b| b.holds(pos.y, size.y))
            && self.x_any.iter().any(|b| b.holds(pos.x, size.x))
    }
}

/// Walls, the stairs and the gate opening of level one
const LEVEL_ONE: &[Rule] = &[
    // Stairs
    Rule {
        direction: Direction::Up,
        y: [Bound::scaled(Cmp::Ge, 400.0, 0.5), Bound::new(Cmp::Le, 431.0)],
        x_any: &[Bound::new(Cmp::Lt, 205.0), Bound::new(Cmp::Gt, 265.0)],
    },
    // Top wall around the gate
    Rule {
        direction: Direction::Up,
        y: [Bound::new(Cmp::Ge, 0.0), Bound::new(Cmp::Le, 71.0)],
        x_any: &[Bound::new(Cmp::Lt, 190.0), Bound::new(Cmp::Gt, 265.0)],
    },
    Rule {
        direction: Direction::Down,
        y: [Bound::new(Cmp::Ge, 386.0), Bound::scaled(Cmp::Le, 431.0, -0.5)],
        x_any: &[Bound::new(Cmp::Lt, 205.0), Bound::new(Cmp::Gt, 265.0)],
    },
    Rule {
        direction: Direction::Right,
        y: [Bound::new(Cmp::Gt, 386.0), Bound::new(Cmp::Lt, 431.0)],
        x_any: &[
            Bound::scaled(Cmp::Le, 190.0, -0.5),
            Bound::scaled(Cmp::Ge, 280.0, -0.5),
        ],
    },
    Rule {
        direction: Direction::Right,
        y: [Bound::new(Cmp::Ge, 0.0), Bound::new(Cmp::Lt, 70.0)],
        x_any: &[Bound::new(Cmp::Ge, 265.0)],
    },
    Rule {
        direction: Direction::Left,
        y: [Bound::new(Cmp::Gt, 386.0), Bound::new(Cmp::Lt, 431.0)],
        x_any: &[
            Bound::scaled(Cmp::Le, 190.0, 0.5),
            Bound::scaled(Cmp::Ge, 280.0, 0.5),
        ],
    },
    Rule {
        direction: Direction::Left,
        y: [Bound::new(Cmp::Ge, 0.0), Bound::new(Cmp::Lt, 70.0)],
        x_any: &[Bound::new(Cmp::Le, 190.0)],
    },
];

/// Answers "may this box move in this direction from here?"
///
/// Rules are checked in order; outside every band, movement is limited to the
/// play surface.
#[derive(Debug, Clone)]
pub struct CollisionMap {
    rules: &'static [Rule],
    surface: SurfaceSize,
}

impl CollisionMap {
    /// The map of the dungeon level
    pub fn level_one(surface: SurfaceSize) -> Self {
        Self {
            rules: LEVEL_ONE,
            surface,
        }
    }

    /// A map with no walls, only the surface edges
    #[cfg(test)]
    pub fn open(surface: SurfaceSize) -> Self {
        Self { rules: &[], surface }
    }

    /// True when a band forbids moving `direction` from `pos`
    pub fn is_blocked(&self, direction: Direction, pos: Vec2, size: Vec2) -> bool {
        self.rules.iter().any(|r| r.blocks(direction, pos, size))
    }

    /// Position after moving `speed * dt` in `direction`, honouring walls and edges
    pub fn resolve(&self, direction: Direction, pos: Vec2, size: Vec2, speed: f32, dt: f32) -> Vec2 {
        if self.is_blocked(direction, pos, size) {
            return pos;
        }

        let step = speed * dt;
        let (w, h) = (size.x, size.y);
        let mut next = pos;

        match direction {
            Direction::Up => {
                if pos.y > h / 2.0 {
                    next.y -= step;
                }
            }
            Direction::Down => {
                if pos.y < self.surface.height - (h + h / 2.0) {
                    next.y += step;
                }
            }
            Direction::Right => {
                if pos.x < self.surface.width - (w + w / 2.0) {
                    next.x += step;
                }
            }
            Direction::Left => {
                if pos.x < 0.0 {
                    next.x = 0.0;
                } else if pos.x > w / 2.0 {
                    next.x -= step;
                }
            }
            Direction::None => {}
        }

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const PLAYER: Vec2 = Vec2::new(48.0, 48.0);

    fn map() -> CollisionMap {
        CollisionMap::level_one(SurfaceSize::new(510.0, 606.0))
    }

    /// Every displacement must be zero inside a band, for any speed or dt
    fn assert_frozen(direction: Direction, pos: Vec2) {
        let map = map();
        assert!(map.is_blocked(direction, pos, PLAYER), "{direction:?} at {pos:?}");
        for speed in [1.0, 85.0, 165.0, 1000.0] {
            for dt in [0.001, 0.016, 0.25] {
                assert_eq!(map.resolve(direction, pos, PLAYER, speed, dt), pos);
            }
        }
    }

    #[test]
    fn test_up_blocked_on_stairs_outside_opening() {
        // 400 + 24 <= y <= 431
        for y in [424.0, 428.0, 431.0] {
            for x in [0.0, 100.0, 204.9, 265.1, 400.0] {
                assert_frozen(Direction::Up, Vec2::new(x, y));
            }
        }
    }

    #[test]
    fn test_up_blocked_below_top_wall() {
        for y in [0.0, 35.0, 71.0] {
            for x in [10.0, 189.9, 265.5, 450.0] {
                assert_frozen(Direction::Up, Vec2::new(x, y));
            }
        }
    }

    #[test]
    fn test_down_blocked_above_stairs() {
        // 386 <= y <= 431 - 24
        for y in [386.0, 400.0, 407.0] {
            for x in [0.0, 204.0, 266.0, 462.0] {
                assert_frozen(Direction::Down, Vec2::new(x, y));
            }
        }
    }

    #[test]
    fn test_right_blocked_by_stair_walls() {
        // 386 < y < 431, x <= 166 or x >= 256
        for y in [386.5, 400.0, 430.9] {
            for x in [0.0, 166.0, 256.0, 300.0] {
                assert_frozen(Direction::Right, Vec2::new(x, y));
            }
        }
        // Top band only blocks from 265 rightwards
        for x in [265.0, 300.0, 400.0] {
            assert_frozen(Direction::Right, Vec2::new(x, 50.0));
        }
    }

    #[test]
    fn test_right_free_left_of_top_wall_edge() {
        let map = map();
        for x in [0.0, 264.9] {
            let pos = Vec2::new(x, 50.0);
            assert!(!map.is_blocked(Direction::Right, pos, PLAYER));
            let next = map.resolve(Direction::Right, pos, PLAYER, 85.0, 0.1);
            assert_relative_eq!(next.x, x + 8.5);
            assert_eq!(next.y, 50.0);
        }
    }

    #[test]
    fn test_left_blocked_by_stair_walls() {
        // 386 < y < 431, x <= 214 or x >= 304
        for y in [386.5, 400.0, 430.9] {
            for x in [30.0, 214.0, 304.0, 400.0] {
                assert_frozen(Direction::Left, Vec2::new(x, y));
            }
        }
        for x in [30.0, 190.0] {
            assert_frozen(Direction::Left, Vec2::new(x, 69.9));
        }
    }

    #[test]
    fn test_opening_lets_player_through() {
        let map = map();
        let pos = Vec2::new(230.0, 428.0);
        let next = map.resolve(Direction::Up, pos, PLAYER, 85.0, 0.1);
        assert_relative_eq!(next.y, 419.5);
        assert_eq!(next.x, pos.x);

        let gate = Vec2::new(220.0, 50.0);
        let next = map.resolve(Direction::Up, gate, PLAYER, 100.0, 0.1);
        assert_relative_eq!(next.y, 40.0);
    }

    #[test]
    fn test_band_edges() {
        let map = map();
        // Just below the stairs band moving up is free
        assert!(!map.is_blocked(Direction::Up, Vec2::new(100.0, 431.5), PLAYER));
        // Right band is exclusive on both y ends
        assert!(!map.is_blocked(Direction::Right, Vec2::new(100.0, 386.0), PLAYER));
        assert!(!map.is_blocked(Direction::Right, Vec2::new(100.0, 431.0), PLAYER));
        // Between the stair walls right is free
        assert!(!map.is_blocked(Direction::Right, Vec2::new(200.0, 400.0), PLAYER));
    }

    #[test]
    fn test_surface_edges() {
        let map = map();
        let size = PLAYER;

        // Up stops at half the height
        let top = Vec2::new(230.0, 24.0);
        assert_eq!(map.resolve(Direction::Up, top, size, 85.0, 0.1), top);

        // Down stops at surface_h - 1.5h
        let bottom = Vec2::new(100.0, 606.0 - 72.0);
        assert_eq!(map.resolve(Direction::Down, bottom, size, 85.0, 0.1), bottom);

        // Right stops at surface_w - 1.5w
        let right = Vec2::new(510.0 - 72.0, 200.0);
        assert_eq!(map.resolve(Direction::Right, right, size, 85.0, 0.1), right);

        // Left snaps negative x back to zero
        let off = Vec2::new(-5.0, 200.0);
        assert_eq!(map.resolve(Direction::Left, off, size, 85.0, 0.1), Vec2::new(0.0, 200.0));

        // Left stops at half the width
        let left = Vec2::new(24.0, 200.0);
        assert_eq!(map.resolve(Direction::Left, left, size, 85.0, 0.1), left);
    }

    #[test]
    fn test_free_movement_scales_with_dt() {
        let map = map();
        let pos = Vec2::new(200.0, 250.0);
        let next = map.resolve(Direction::Right, pos, PLAYER, 85.0, 0.5);
        assert_relative_eq!(next.x, 242.5);

        let next = map.resolve(Direction::Down, pos, PLAYER, 165.0, 0.1);
        assert_relative_eq!(next.y, 266.5);
    }

    #[test]
    fn test_no_direction_never_moves() {
        let pos = Vec2::new(200.0, 250.0);
        assert_eq!(map().resolve(Direction::None, pos, PLAYER, 85.0, 1.0), pos);
    }

    #[test]
    fn test_open_map_has_no_walls() {
        let map = CollisionMap::open(SurfaceSize::new(510.0, 606.0));
        assert!(!map.is_blocked(Direction::Up, Vec2::new(0.0, 428.0), PLAYER));
        let edge = Vec2::new(510.0 - 72.0, 428.0);
        assert_eq!(map.resolve(Direction::Right, edge, PLAYER, 85.0, 0.1), edge);
    }
}
