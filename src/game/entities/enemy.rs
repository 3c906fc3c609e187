// Slime AI: patrol across the level, chase the player when close, trade hits

use glam::Vec2;
use log::debug;
use rand::Rng;

use super::animation::ActionName;
use super::direction::Direction;
use super::entity::{Entity, Outcome, Status};
use super::player;
use crate::core::math::boxes_within_proximity;
use crate::engine::audio::Cue;
use crate::game::world::TickContext;

/// Extent divisor for noticing the player
const CHASE_SCALE: f32 = 1.5;
/// Extent divisor for trading hits
const COMBAT_SCALE: f32 = 2.0;

/// Patrol wraps this far past the surface edges
const WRAP_MARGIN: f32 = 100.0;

/// Chase decisions draw from `0..CHASE_ROLLS`
const CHASE_ROLLS: u32 = 8;

/// AI counters of one slime
#[derive(Debug, Clone, Default)]
pub struct EnemyState {
    /// Player spotted; never cleared
    pub follow: bool,
    /// Ticks since the last chase decision
    pub tracker: u32,
    /// Ticks of contact since the last hit landed
    pub hit_tracker: u32,
}

/// One tick of enemy behavior
pub(crate) fn update(
    enemy: &mut Entity,
    state: &mut EnemyState,
    player: Option<&mut Entity>,
    dt: f32,
    ctx: &mut TickContext,
) -> Outcome {
    patrol(enemy, dt, ctx);

    match player {
        Some(player) if player.is_alive() => {
            chase(enemy, state, player, ctx);
            combat(enemy, state, player, ctx)
        }
        _ => Outcome::Nothing,
    }
}

/// Horizontal movement with wrap-around past the surface edges
fn patrol(enemy: &mut Entity, dt: f32, ctx: &mut TickContext) {
    if !enemy.direction.is_horizontal() {
        return;
    }
    enemy.pos.x += enemy.direction.unit().x * enemy.speed * dt;

    let width = ctx.config.surface.width;
    if enemy.direction == Direction::Right && enemy.pos.x > width + WRAP_MARGIN {
        enemy.pos.x = -WRAP_MARGIN;
        enemy.speed = 10.0 + ctx.rng.gen_range(0..100) as f32;
    } else if enemy.direction == Direction::Left && enemy.pos.x < -WRAP_MARGIN {
        enemy.pos.x = width + 20.0;
        enemy.speed = 10.0 + ctx.rng.gen_range(0..100) as f32;
    }
}

/// Follow the player in short random steps once spotted
fn chase(enemy: &mut Entity, state: &mut EnemyState, player: &Entity, ctx: &mut TickContext) {
    if !state.follow {
        if boxes_within_proximity(
            player.pos,
            player.size() / CHASE_SCALE,
            enemy.pos,
            enemy.size() / CHASE_SCALE,
        ) {
            debug!("Slime at {:?} spotted the player", enemy.pos);
            state.follow = true;
        }
        return;
    }

    state.tracker += 1;
    enemy.speed = 0.0;
    enemy.direction = Direction::None;

    if state.tracker < ctx.config.chase_cadence {
        return;
    }
    state.tracker = 0;

    let roll = ctx.rng.gen_range(0..CHASE_ROLLS);
    let heading = chase_heading(roll, enemy.pos, player.pos);

    enemy.sprite.set_action(ActionName::walking(heading));
    if heading.is_some() {
        enemy.pos += heading.unit() * ctx.config.chase_step;
        enemy.direction = heading;
    }
}

/// Step picked by a chase roll: `0..3` closes in horizontally, `4..6`
/// vertically, anything else waits
fn chase_heading(roll: u32, from: Vec2, target: Vec2) -> Direction {
    let delta = target - from;
    match roll {
        0..=2 if delta.x < 0.0 => Direction::Left,
        0..=2 => Direction::Right,
        4 | 5 if delta.y < 0.0 => Direction::Up,
        4 | 5 => Direction::Down,
        _ => Direction::None,
    }
}

/// Exchange hits with the player while touching
fn combat(enemy: &mut Entity, state: &mut EnemyState, player: &mut Entity, ctx: &mut TickContext) -> Outcome {
    if !boxes_within_proximity(
        player.pos,
        player.size() / COMBAT_SCALE,
        enemy.pos,
        enemy.size() / COMBAT_SCALE,
    ) {
        return Outcome::Nothing;
    }

    let Some((attacking, facing)) = player::attack_state(player) else {
        return Outcome::Nothing;
    };

    if !attacking {
        if state.hit_tracker < ctx.config.hit_cooldown {
            state.hit_tracker += 1;
        } else if enemy.direction.is_some() {
            state.hit_tracker = 0;
            ctx.audio.play(Cue::EnemyHit);

            let direction = enemy.direction;
            if let Some(hit) = ActionName::hit_from(direction.opposite()) {
                player.sprite.set_action(hit);
            }
            if let Some(attack) = ActionName::attack(direction) {
                enemy.sprite.set_action(attack);
            }
            player::update_hp(player, -ctx.config.enemy_damage, ctx);
        }
        return Outcome::Nothing;
    }

    if !facing.is_some() {
        return Outcome::Nothing;
    }

    ctx.audio.play(Cue::PlayerHit);
    if let Some(hit) = ActionName::hit_from(facing.opposite()) {
        enemy.sprite.set_action(hit);
    }
    enemy.pos += facing.unit() * ctx.config.knockback;
    update_hp(enemy, -ctx.config.player_damage)
}

/// Apply damage; at zero hp the slime dies and is removed in the same call
pub fn update_hp(enemy: &mut Entity, delta: i32) -> Outcome {
    enemy.hp += delta;

    if enemy.hp <= 0 && enemy.status == Status::Alive {
        debug!("Slime killed");
        enemy.status = Status::Dead;
        enemy.soft_remove();
        return Outcome::Killed;
    }
    Outcome::Nothing
}
