// Entity system
//
// Everything that lives on the play surface:
// - Entity record, sprite and behavior dispatch
// - Sprite-sheet animation and named actions
// - Player controller, slime AI and pickups

pub mod animation;
pub mod direction;
pub mod enemy;
pub mod entity;
pub mod player;
pub mod prop;

// Re-export commonly used types
pub use animation::{ActionName, ActionTable, AnimationState, SpriteAction};
pub use direction::Direction;
pub use enemy::EnemyState;
pub use entity::{Behavior, Entity, HpBarStyle, Outcome, Sprite};
pub use player::PlayerState;
pub use prop::{Effect, PropState};

/// Builders shared by the game's unit tests
#[cfg(test)]
pub(crate) mod fixtures {
    use glam::Vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{Direction, Entity};
    use crate::config::GameConfig;
    use crate::engine::assets::DecodedImage;
    use crate::engine::audio::SoundBoard;
    use crate::game::collision_map::CollisionMap;
    use crate::game::level::{self, SlimeColor};
    use crate::game::world::{GameEvent, TickContext};

    /// Owns everything a `TickContext` borrows
    pub struct TestContext {
        pub config: GameConfig,
        pub audio: SoundBoard,
        pub rng: StdRng,
        pub events: Vec<GameEvent>,
    }

    impl TestContext {
        pub fn new() -> Self {
            Self::seeded(7)
        }

        pub fn seeded(seed: u64) -> Self {
            Self {
                config: GameConfig::default(),
                audio: SoundBoard::new(),
                rng: StdRng::seed_from_u64(seed),
                events: Vec::new(),
            }
        }

        pub fn ctx(&mut self) -> TickContext<'_> {
            TickContext {
                config: &self.config,
                audio: &mut self.audio,
                rng: &mut self.rng,
                events: &mut self.events,
            }
        }

        pub fn collision() -> CollisionMap {
            CollisionMap::level_one(GameConfig::default().surface)
        }
    }

    pub fn player_at(pos: Vec2) -> Entity {
        let mut player = level::player(&GameConfig::default());
        player.pos = pos;
        player
    }

    /// Blue slime standing still
    pub fn enemy_at(pos: Vec2) -> Entity {
        level::slime(SlimeColor::Blue, pos, Direction::None, 0.0, 0, &GameConfig::default())
    }

    pub fn potion_at(pos: Vec2) -> Entity {
        level::potion(pos, 0, &GameConfig::default())
    }

    pub fn torch(pos: Vec2) -> Entity {
        level::torch(pos, &GameConfig::default())
    }

    pub fn blank_image(width: u32, height: u32) -> DecodedImage {
        DecodedImage {
            width,
            height,
            rgba: vec![0; (width * height * 4) as usize],
        }
    }
}
