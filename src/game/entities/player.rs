// Keyboard-driven player controller

use log::info;

use super::animation::ActionName;
use super::direction::Direction;
use super::entity::{Behavior, Entity, Status};
use crate::engine::audio::{AudioSink, Cue};
use crate::engine::input::Action;
use crate::game::collision_map::CollisionMap;
use crate::game::world::{GameEvent, TickContext};

/// Input and sprite bookkeeping for the player
#[derive(Debug, Clone, Default)]
pub struct PlayerState {
    /// Attack key is down
    pub attacking: bool,
    /// Last direction the player walked in, `None` until the first move
    pub previous_direction: Direction,
    /// Column trackers for right, down, left, up
    trackers: [u32; 4],
    /// Walking sheet already applied for the current key activation
    sprite_updated: bool,
}

impl PlayerState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl PlayerState {
    /// Column tracker of a direction
    pub fn tracker(&self, direction: Direction) -> Option<u32> {
        tracker_slot(direction).map(|slot| self.trackers[slot])
    }
}

fn tracker_slot(direction: Direction) -> Option<usize> {
    match direction.code() {
        0 => None,
        code => Some(code as usize - 1),
    }
}

/// Direction an input action walks toward
pub fn heading(action: Action) -> Option<Direction> {
    match action {
        Action::Right => Some(Direction::Right),
        Action::Down => Some(Direction::Down),
        Action::Left => Some(Direction::Left),
        Action::Up => Some(Direction::Up),
        _ => None,
    }
}

/// Key down on a gameplay action
pub fn key_pressed(player: &mut Entity, action: Action, shift: bool, audio: &mut dyn AudioSink) {
    if !player.controllable {
        return;
    }
    let Behavior::Player(state) = &mut player.behavior else {
        return;
    };

    if let Some(direction) = heading(action) {
        player.speed = if shift { player.run_speed } else { player.walk_speed };

        if !player.direction.is_some() {
            player.direction = direction;
            state.previous_direction = direction;
        }
    } else if action == Action::Attack {
        state.attacking = true;
        let attack = ActionName::attack(state.previous_direction).unwrap_or(ActionName::AttackUp);
        player.sprite.set_action(attack);
        audio.play(Cue::PlayerHit);
    }
}

/// Key up on a gameplay action
pub fn key_released(player: &mut Entity, action: Action) {
    if !player.controllable {
        return;
    }
    let Behavior::Player(state) = &mut player.behavior else {
        return;
    };

    if heading(action).is_some() {
        player.direction = Direction::None;
        player.speed = 0.0;
    } else if action == Action::Attack {
        state.attacking = false;
    } else {
        return;
    }

    state.sprite_updated = false;
    player.sprite.set_action(ActionName::Idle);
}

/// Walk one tick in the held direction
pub(crate) fn update(player: &mut Entity, state: &mut PlayerState, collision: &CollisionMap, dt: f32) {
    let direction = player.direction;
    let Some(slot) = tracker_slot(direction) else {
        return;
    };

    if !state.sprite_updated {
        player.sprite.set_action(ActionName::walking(direction));
        state.sprite_updated = true;
        let x = player.width() * state.trackers[slot] as f32;
        player.sprite.animation.set_source_x(x);
        state.trackers[slot] += 1;
    }

    player.pos = collision.resolve(direction, player.pos, player.size(), player.speed, dt);

    if state.trackers[slot] == player.sprite.animation.frame_count() {
        state.trackers[slot] = 1;
    }
}

/// Apply damage or healing
///
/// Once hp has run out, the next call kills the player. Later calls do nothing.
pub fn update_hp(player: &mut Entity, delta: i32, ctx: &mut TickContext) {
    if player.hp > 0 {
        player.hp += delta;
        return;
    }

    if player.status == Status::Dead {
        return;
    }

    info!("Player died");
    player.status = Status::Dead;
    player.controllable = false;
    player.soft_remove();
    ctx.audio.stop(Cue::GamePlay);
    ctx.audio.play(Cue::GameOver);
    ctx.events.push(GameEvent::Lost {
        message: "You Lose!".to_string(),
    });
}

/// Player attack flag and facing, `None` for anything but the player
pub fn attack_state(player: &Entity) -> Option<(bool, Direction)> {
    match &player.behavior {
        Behavior::Player(state) => Some((state.attacking, state.previous_direction)),
        _ => None,
    }
}
