// Level factory: the dungeon's fixed layout plus its randomised population

use glam::Vec2;
use log::info;
use rand::rngs::StdRng;
use rand::Rng;

use crate::config::GameConfig;
use crate::game::collision_map::CollisionMap;
use crate::game::entities::{
    ActionName, ActionTable, AnimationState, Behavior, Direction, Effect, EnemyState, Entity,
    PlayerState, PropState, Sprite, SpriteAction,
};
use crate::game::world::World;

/// Background of the level
pub const BACKGROUND: &str = "images/map/level_one.jpg";

/// Rows slimes patrol along, aligned with the side gates
const ENEMY_ROWS: [f32; 3] = [140.0, 230.0, 320.0];

/// Player and slime sheets: four 48 px frames in one row
const SHEET_WIDTH: f32 = 192.0;
const SHEET_HEIGHT: f32 = 48.0;
const SHEET_COLUMNS: u32 = 4;

/// Slime colour variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlimeColor {
    Blue,
    Red,
    Green,
}

impl SlimeColor {
    pub const ALL: [SlimeColor; 3] = [SlimeColor::Blue, SlimeColor::Red, SlimeColor::Green];

    pub fn name(&self) -> &'static str {
        match self {
            SlimeColor::Blue => "blue",
            SlimeColor::Red => "red",
            SlimeColor::Green => "green",
        }
    }
}

/// File suffix of every character action
const ACTION_SUFFIXES: [(ActionName, &str); 13] = [
    (ActionName::Idle, "idle"),
    (ActionName::Right, "right"),
    (ActionName::Down, "down"),
    (ActionName::Left, "left"),
    (ActionName::Up, "up"),
    (ActionName::AttackRight, "attack-right"),
    (ActionName::AttackDown, "attack-down"),
    (ActionName::AttackLeft, "attack-left"),
    (ActionName::AttackUp, "attack-up"),
    (ActionName::HitRight, "hit-right"),
    (ActionName::HitDown, "hit-down"),
    (ActionName::HitLeft, "hit-left"),
    (ActionName::HitUp, "hit-up"),
];

/// Full action table for sheets named `{prefix}{suffix}.png`
fn character_actions(prefix: &str) -> ActionTable {
    ACTION_SUFFIXES
        .iter()
        .fold(ActionTable::new(), |table, (name, suffix)| {
            table.with_action(
                *name,
                SpriteAction::new(format!("{prefix}{suffix}.png"), SHEET_WIDTH, SHEET_COLUMNS),
            )
        })
}

/// Single-action sprite for props
fn prop_sprite(source: &str, sheet_width: f32, columns: u32, start_frame: u32, config: &GameConfig) -> Sprite {
    let action = SpriteAction::new(source, sheet_width, columns);
    let animation = AnimationState::new(
        source,
        action.frame_width(),
        action.columns,
        start_frame,
        config.animation_interval,
    );
    Sprite::new(ActionTable::new().with_action(ActionName::Idle, action), animation)
}

/// The player at the foot of the stairs
pub fn player(config: &GameConfig) -> Entity {
    let surface = config.surface;
    let idle = "images/player/p-idle.png";
    let animation = AnimationState::new(
        idle,
        SHEET_WIDTH / SHEET_COLUMNS as f32,
        SHEET_COLUMNS,
        0,
        config.animation_interval,
    );

    let mut player = Entity::new(
        Vec2::new(surface.width / 2.0 - 20.0, surface.height - 100.0),
        SHEET_HEIGHT,
        Sprite::new(character_actions("images/player/p-"), animation),
        Behavior::Player(PlayerState::new()),
    );
    player.walk_speed = config.player_walk_speed;
    player.run_speed = config.player_run_speed();
    player.hp = config.player_max_hp;
    player.max_hp = config.player_max_hp;
    player.controllable = true;
    player
}

/// A patrolling slime
pub fn slime(
    color: SlimeColor,
    pos: Vec2,
    direction: Direction,
    speed: f32,
    start_frame: u32,
    config: &GameConfig,
) -> Entity {
    let prefix = format!("images/enemy/slime-{}-", color.name());
    let sheet = format!("{prefix}{}.png", facing_suffix(direction));
    let animation = AnimationState::new(
        sheet,
        SHEET_WIDTH / SHEET_COLUMNS as f32,
        SHEET_COLUMNS,
        start_frame,
        config.animation_interval,
    );

    Entity::new(
        pos,
        SHEET_HEIGHT,
        Sprite::new(character_actions(&prefix), animation),
        Behavior::Enemy(EnemyState::default()),
    )
    .with_motion(direction, speed)
}

fn facing_suffix(direction: Direction) -> &'static str {
    match direction {
        Direction::Right => "right",
        Direction::Left => "left",
        Direction::Up => "up",
        Direction::Down => "down",
        Direction::None => "idle",
    }
}

pub fn torch(pos: Vec2, config: &GameConfig) -> Entity {
    Entity::new(
        pos,
        24.0,
        prop_sprite("images/assets/torch.png", 96.0, 4, 0, config),
        Behavior::Prop(PropState::default()),
    )
}

/// The exit gate, raised by the exit sequence
pub fn gate(config: &GameConfig) -> Entity {
    Entity::new(
        Vec2::new(204.0, 0.0),
        26.0,
        prop_sprite("images/assets/level_one_gate.jpg", 97.0, 1, 0, config),
        Behavior::Prop(PropState::default()),
    )
    .with_tag("gate")
}

/// Key that opens the gate once the slimes are gone
pub fn gate_key(config: &GameConfig) -> Entity {
    Entity::new(
        Vec2::new(235.0, 31.0),
        48.0,
        prop_sprite("images/assets/gate-key.png", 192.0, 4, 0, config),
        Behavior::Prop(PropState::with_effect(Effect::UnlockGate)),
    )
    .with_tag("gatekey")
}

pub fn potion(pos: Vec2, start_frame: u32, config: &GameConfig) -> Entity {
    Entity::new(
        pos,
        48.0,
        prop_sprite("images/assets/hp-potion.png", 192.0, 4, start_frame, config),
        Behavior::Prop(PropState::with_effect(Effect::Heal {
            amount: 25,
            cap: config.player_max_hp,
        })),
    )
}

/// 20 to 35 slimes entering alternately from the right and the left
pub fn spawn_enemies(config: &GameConfig, rng: &mut StdRng) -> Vec<Entity> {
    let width = config.surface.width;
    let count = rng.gen_range(20..=35);

    (0..count)
        .map(|i| {
            let offset = rng.gen_range(50..=150) as f32;
            let (x, direction) = if i % 2 == 0 {
                (width + offset, Direction::Left)
            } else {
                (-offset, Direction::Right)
            };

            let color = SlimeColor::ALL[rng.gen_range(0..SlimeColor::ALL.len())];
            let y = ENEMY_ROWS[rng.gen_range(0..ENEMY_ROWS.len())];
            let speed = 100.0 + rng.gen_range(0..150) as f32;
            let start_frame = rng.gen_range(0..SHEET_COLUMNS);

            slime(color, Vec2::new(x, y), direction, speed, start_frame, config)
        })
        .collect()
}

/// Torches, the gate, its key and 1 to 8 potions on the grid
pub fn spawn_props(config: &GameConfig, rng: &mut StdRng) -> Vec<Entity> {
    let mut props = vec![
        torch(Vec2::new(185.0, 430.0), config),
        torch(Vec2::new(300.0, 430.0), config),
        gate(config),
        gate_key(config),
    ];

    let potions = rng.gen_range(1..=8);
    for _ in 0..potions {
        let x = 35.0 * rng.gen_range(1..=11) as f32;
        let y = 71.0 * rng.gen_range(1..=5) as f32;
        let start_frame = rng.gen_range(0..=4);
        props.push(potion(Vec2::new(x, y), start_frame, config));
    }

    props
}

/// Build a fresh level
pub fn build(config: &GameConfig, rng: &mut StdRng) -> World {
    let props = spawn_props(config, rng);
    let enemies = spawn_enemies(config, rng);
    info!("Level built: {} slimes, {} props", enemies.len(), props.len());

    World::new(
        player(config),
        enemies,
        props,
        CollisionMap::level_one(config.surface),
        BACKGROUND,
    )
}

/// Every image the level can show, for preloading
pub fn image_paths() -> Vec<String> {
    let mut paths = vec![
        BACKGROUND.to_string(),
        "images/assets/torch.png".to_string(),
        "images/assets/level_one_gate.jpg".to_string(),
        "images/assets/gate-key.png".to_string(),
        "images/assets/hp-potion.png".to_string(),
    ];

    let mut prefixes = vec!["images/player/p-".to_string()];
    prefixes.extend(
        SlimeColor::ALL
            .iter()
            .map(|color| format!("images/enemy/slime-{}-", color.name())),
    );
    for prefix in prefixes {
        paths.extend(
            ACTION_SUFFIXES
                .iter()
                .map(|(_, suffix)| format!("{prefix}{suffix}.png")),
        );
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::entity::Status;
    use rand::SeedableRng;

    #[test]
    fn test_player_spawn() {
        let config = GameConfig::default();
        let player = player(&config);

        assert_eq!(player.pos, Vec2::new(235.0, 506.0));
        assert_eq!(player.size(), Vec2::new(48.0, 48.0));
        assert_eq!(player.walk_speed, 85.0);
        assert_eq!(player.run_speed, 165.0);
        assert!(player.controllable);
        assert_eq!(player.sprite.actions.len(), 13);
    }

    #[test]
    fn test_enemy_population() {
        let config = GameConfig::default();
        for seed in 0..30 {
            let mut rng = StdRng::seed_from_u64(seed);
            let enemies = spawn_enemies(&config, &mut rng);
            assert!((20..=35).contains(&enemies.len()));

            for (i, enemy) in enemies.iter().enumerate() {
                assert!(ENEMY_ROWS.contains(&enemy.pos.y));
                assert!((100.0..250.0).contains(&enemy.speed));
                assert_eq!(enemy.status, Status::Alive);

                if i % 2 == 0 {
                    assert_eq!(enemy.direction, Direction::Left);
                    assert!((560.0..=660.0).contains(&enemy.pos.x));
                } else {
                    assert_eq!(enemy.direction, Direction::Right);
                    assert!((-150.0..=-50.0).contains(&enemy.pos.x));
                }
            }
        }
    }

    #[test]
    fn test_slime_sheets_follow_colour_and_heading() {
        let config = GameConfig::default();
        let slime = slime(SlimeColor::Red, Vec2::ZERO, Direction::Left, 100.0, 2, &config);

        assert_eq!(slime.sprite.animation.image(), "images/enemy/slime-red-left.png");
        assert_eq!(slime.sprite.animation.current_frame(), 2);
        assert_eq!(
            slime.sprite.actions.get(ActionName::HitDown).map(|a| a.source.as_str()),
            Some("images/enemy/slime-red-hit-down.png")
        );
    }

    #[test]
    fn test_props_layout() {
        let config = GameConfig::default();
        for seed in 0..30 {
            let mut rng = StdRng::seed_from_u64(seed);
            let props = spawn_props(&config, &mut rng);
            let potions = &props[4..];

            assert!((1..=8).contains(&potions.len()));
            for potion in potions {
                assert_eq!(potion.pos.x % 35.0, 0.0);
                assert_eq!(potion.pos.y % 71.0, 0.0);
                assert!((35.0..=385.0).contains(&potion.pos.x));
                assert!((71.0..=355.0).contains(&potion.pos.y));
            }
        }
    }

    #[test]
    fn test_gate_and_key() {
        let config = GameConfig::default();
        let gate = gate(&config);
        assert_eq!(gate.tag, Some("gate"));
        assert_eq!(gate.size(), Vec2::new(97.0, 26.0));

        let key = gate_key(&config);
        assert_eq!(key.tag, Some("gatekey"));
        assert_eq!(key.pos, Vec2::new(235.0, 31.0));
        match &key.behavior {
            Behavior::Prop(state) => assert_eq!(state.effect, Some(Effect::UnlockGate)),
            _ => panic!("gate key must be a prop"),
        }
    }

    #[test]
    fn test_image_paths_cover_every_sheet() {
        let paths = image_paths();
        assert_eq!(paths.len(), 5 + 4 * 13);
        assert!(paths.contains(&"images/player/p-attack-left.png".to_string()));
        assert!(paths.contains(&"images/enemy/slime-green-hit-up.png".to_string()));

        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let world = build(&config, &mut rng);
        for entity in world.entities() {
            assert!(paths.iter().any(|p| p == entity.sprite.animation.image()));
        }
    }
}
