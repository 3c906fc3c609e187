// Simulation state of one level and the per-tick update order

use std::time::Duration;

use log::info;
use rand::rngs::StdRng;

use crate::config::GameConfig;
use crate::engine::assets::AssetCache;
use crate::engine::audio::{AudioSink, Cue};
use crate::engine::renderer::surface::{Rect, Surface};
use crate::game::collision_map::CollisionMap;
use crate::game::entities::{prop, ActionName, Direction, Effect, Entity, HpBarStyle, Outcome};

/// Something the engine has to react to after a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Won { message: String },
    Lost { message: String },
}

/// Everything outside the world an update needs
pub struct TickContext<'a> {
    pub config: &'a GameConfig,
    pub audio: &'a mut dyn AudioSink,
    pub rng: &'a mut StdRng,
    pub events: &'a mut Vec<GameEvent>,
}

/// Score counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub score: u32,
    pub enemies_killed: u32,
}

impl Score {
    pub fn record_kill(&mut self, points: u32) {
        self.enemies_killed += 1;
        self.score += points;
    }

    /// Score as shown in the corner: one leading zero, or `0000` before the first kill
    pub fn label(&self) -> String {
        if self.score > 0 {
            format!("0{}", self.score)
        } else {
            "0000".to_string()
        }
    }
}

const GATE_STEPS: u32 = 5;
const GATE_PERIOD: Duration = Duration::from_millis(500);
const GATE_RISE: f32 = 5.0;

const WALK_OUT_STEPS: u32 = 15;
const WALK_OUT_PERIOD: Duration = Duration::from_millis(250);
const WALK_OUT_STEP: f32 = 15.0;

/// Gate opening and walk-out after the key is picked up
///
/// Step `k` of each track fires once `k * period` has elapsed.
#[derive(Debug, Clone, Default)]
pub struct ExitSequence {
    elapsed: Duration,
    gate_steps: u32,
    player_steps: u32,
}

impl ExitSequence {
    /// Advance the clock, returns the gate and player steps now due
    fn advance(&mut self, dt: Duration) -> (u32, u32) {
        self.elapsed += dt;

        let due = |period: Duration, total: u32| {
            let reached = (self.elapsed.as_millis() / period.as_millis()) as u32 + 1;
            reached.min(total)
        };
        let gate = due(GATE_PERIOD, GATE_STEPS);
        let player = due(WALK_OUT_PERIOD, WALK_OUT_STEPS);

        let fired = (gate - self.gate_steps, player - self.player_steps);
        self.gate_steps = gate;
        self.player_steps = player;
        fired
    }

    pub fn is_finished(&self) -> bool {
        self.gate_steps == GATE_STEPS && self.player_steps == WALK_OUT_STEPS
    }
}

/// Owns every entity of the level
#[derive(Debug, Clone)]
pub struct World {
    player: Option<Entity>,
    enemies: Vec<Entity>,
    props: Vec<Entity>,
    score: Score,
    collision: CollisionMap,
    background: String,
    exit: Option<ExitSequence>,
}

impl World {
    pub fn new(
        player: Entity,
        enemies: Vec<Entity>,
        props: Vec<Entity>,
        collision: CollisionMap,
        background: &str,
    ) -> Self {
        Self {
            player: Some(player),
            enemies,
            props,
            score: Score::default(),
            collision,
            background: background.to_string(),
            exit: None,
        }
    }

    /// One simulation tick
    ///
    /// Animation clocks, slimes, then the player, then pickups and the exit
    /// sequence. Dead entities are compacted out once their pass is over.
    pub fn update(&mut self, dt: Duration, ctx: &mut TickContext) {
        let secs = dt.as_secs_f32();

        for entity in self.entities_mut() {
            entity.tick_animation(dt);
        }

        for enemy in &mut self.enemies {
            let outcome = enemy.update_behavior(self.player.as_mut(), &self.collision, secs, ctx);
            if outcome == Outcome::Killed {
                self.score.record_kill(ctx.config.kill_score);
            }
        }
        self.enemies.retain(Entity::is_alive);

        if let Some(player) = self.player.as_mut() {
            player.update_behavior(None, &self.collision, secs, ctx);
        }

        for i in 0..self.props.len() {
            let outcome = match self.player.as_mut() {
                Some(player) if player.is_alive() => {
                    self.props[i].update_behavior(Some(player), &self.collision, secs, ctx)
                }
                _ => Outcome::Nothing,
            };

            if let Outcome::Triggered(effect) = outcome {
                if self.apply_effect(&effect, ctx) {
                    prop::consume(&mut self.props[i], ctx.audio);
                }
            }
        }

        self.advance_exit(dt, ctx);
        self.props.retain(Entity::is_alive);
    }

    /// Apply a pickup effect, returns whether it was spent
    pub fn apply_effect(&mut self, effect: &Effect, ctx: &mut TickContext) -> bool {
        match effect {
            Effect::Heal { amount, cap } => {
                let Some(player) = self.player.as_mut() else {
                    return false;
                };
                if player.hp >= cap - amount {
                    player.hp = *cap;
                } else {
                    player.hp += amount;
                }
                true
            }
            Effect::UnlockGate => {
                if !self.enemies.is_empty() || self.exit.is_some() {
                    return false;
                }

                info!("Gate unlocked");
                if let Some(player) = self.player.as_mut() {
                    player.controllable = false;
                    player.direction = Direction::None;
                    player.speed = 0.0;
                }
                ctx.audio.stop(Cue::GamePlay);
                ctx.audio.play(Cue::Win);
                self.exit = Some(ExitSequence::default());
                true
            }
            Effect::EndLevel { message } => {
                info!("Level finished: {}", message);
                ctx.events.push(GameEvent::Won {
                    message: message.clone(),
                });
                true
            }
        }
    }

    fn advance_exit(&mut self, dt: Duration, ctx: &mut TickContext) {
        let Some(exit) = self.exit.as_mut() else {
            return;
        };

        let (gate_steps, player_steps) = exit.advance(dt);
        let finished = exit.is_finished();

        if let Some(gate) = self.props.iter_mut().find(|p| p.tag == Some("gate")) {
            gate.pos.y -= GATE_RISE * gate_steps as f32;
        }
        if let Some(player) = self.player.as_mut() {
            for _ in 0..player_steps {
                player.set_action(ActionName::Up);
                player.pos.y -= WALK_OUT_STEP;
            }
        }

        if finished {
            self.exit = None;
            self.apply_effect(
                &Effect::EndLevel {
                    message: "You Win!".to_string(),
                },
                ctx,
            );
        }
    }

    /// Draw the level: background, props, slimes, then the player
    pub fn render(&self, surface: &mut dyn Surface, assets: &AssetCache) {
        surface.clear();

        let size = surface.size();
        if let Some(handle) = assets.get(&self.background) {
            if let Some(image) = assets.image(handle) {
                surface.draw_image(
                    handle,
                    Rect::new(0.0, 0.0, image.width as f32, image.height as f32),
                    Rect::new(0.0, 0.0, size.width, size.height),
                );
            }
        }

        for prop in &self.props {
            prop.draw(surface, assets);
        }

        for enemy in &self.enemies {
            enemy.draw(surface, assets);
            enemy.hit_points(surface, HpBarStyle::enemy());
        }

        if let Some(player) = &self.player {
            player.draw(surface, assets);
            player.hit_points(surface, HpBarStyle::player(player.hp, player.max_hp));
        }
    }

    /// Props, slimes and the player, in draw order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.props
            .iter()
            .chain(self.enemies.iter())
            .chain(self.player.iter())
    }

    fn entities_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.props
            .iter_mut()
            .chain(self.enemies.iter_mut())
            .chain(self.player.iter_mut())
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.player.as_mut()
    }

    pub fn score(&self) -> Score {
        self.score
    }
}

#[cfg(test)]
impl World {
    pub fn player(&self) -> Option<&Entity> {
        self.player.as_ref()
    }

    pub fn enemies(&self) -> &[Entity] {
        &self.enemies
    }

    pub fn props(&self) -> &[Entity] {
        &self.props
    }

    /// First prop carrying `tag`
    pub fn find_prop(&self, tag: &str) -> Option<&Entity> {
        self.props.iter().find(|p| p.tag == Some(tag))
    }

    pub fn is_exiting(&self) -> bool {
        self.exit.is_some()
    }
}
