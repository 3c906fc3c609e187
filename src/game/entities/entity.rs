// Entity record shared by the player, enemies and props

use std::time::Duration;

use glam::Vec2;

use super::animation::{ActionName, ActionTable, AnimationState};
use super::direction::Direction;
use super::enemy::{self, EnemyState};
use super::player::{self, PlayerState};
use super::prop::{self, Effect, PropState};
use crate::engine::assets::AssetCache;
use crate::engine::renderer::surface::{Color, Rect, Surface};
use crate::game::collision_map::CollisionMap;
use crate::game::world::TickContext;

/// Off-surface parking spot for removed entities
pub const REMOVED_POSITION: Vec2 = Vec2::new(-100.0, -100.0);

/// Life status of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Alive,
    Dead,
}

/// Per-kind state and update logic
#[derive(Debug, Clone)]
pub enum Behavior {
    Player(PlayerState),
    Enemy(EnemyState),
    Prop(PropState),
}

impl Default for Behavior {
    fn default() -> Self {
        Behavior::Prop(PropState::default())
    }
}

/// What an entity's update asks the world to do
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Nothing,
    /// An enemy died this tick
    Killed,
    /// A prop was picked up and its effect should be applied
    Triggered(Effect),
}

/// Sprite sheet plus the actions it can switch to
#[derive(Debug, Clone)]
pub struct Sprite {
    pub actions: ActionTable,
    pub animation: AnimationState,
}

impl Sprite {
    pub fn new(actions: ActionTable, animation: AnimationState) -> Self {
        Self { actions, animation }
    }

    /// Swap to a named action; unknown names are ignored
    pub fn set_action(&mut self, name: ActionName) {
        if let Some(action) = self.actions.get(name) {
            self.animation.set_action(action);
        }
    }
}

/// Style of an HP bar drawn above an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HpBarStyle {
    /// Bar width is `hp / relativity`
    pub relativity: f32,
    /// Bar thickness
    pub weight: f32,
    pub offset: Vec2,
    pub color: Color,
}

impl HpBarStyle {
    /// Player bar, coloured by remaining health
    pub fn player(hp: i32, max_hp: i32) -> Self {
        let percent = if max_hp > 0 { hp * 100 / max_hp } else { 0 };
        let color = if percent < 30 {
            Color::RED
        } else if percent < 60 {
            Color::YELLOW
        } else if percent < 70 {
            Color::ORANGE
        } else {
            Color::from_hex(0x50C878)
        };

        Self {
            relativity: 2.0,
            weight: 5.0,
            offset: Vec2::new(-2.0, 0.0),
            color,
        }
    }

    pub fn enemy() -> Self {
        Self {
            relativity: 4.0,
            weight: 2.0,
            offset: Vec2::new(15.0, 0.0),
            color: Color::RED,
        }
    }
}

/// Anything positioned and animated on the play surface
#[derive(Debug, Clone)]
pub struct Entity {
    /// Optional lookup key, e.g. `"gate"`
    pub tag: Option<&'static str>,

    // Placement
    /// Top-left corner in surface pixels
    pub pos: Vec2,
    pub height: f32,

    // Movement
    pub direction: Direction,
    pub speed: f32,
    pub walk_speed: f32,
    pub run_speed: f32,

    // Health
    pub hp: i32,
    pub max_hp: i32,
    pub status: Status,

    /// Accepts player input
    pub controllable: bool,

    pub sprite: Sprite,
    pub behavior: Behavior,
}

impl Entity {
    pub fn new(pos: Vec2, height: f32, sprite: Sprite, behavior: Behavior) -> Self {
        Self {
            tag: None,
            pos,
            height,
            direction: Direction::None,
            speed: 0.0,
            walk_speed: 0.0,
            run_speed: 0.0,
            hp: 100,
            max_hp: 100,
            status: Status::Alive,
            controllable: false,
            sprite,
            behavior,
        }
    }

    /// Set the lookup tag (builder style)
    pub fn with_tag(mut self, tag: &'static str) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Set heading and speed (builder style)
    pub fn with_motion(mut self, direction: Direction, speed: f32) -> Self {
        self.direction = direction;
        self.speed = speed;
        self
    }

    /// Width of one frame of the active sheet
    pub fn width(&self) -> f32 {
        self.sprite.animation.frame_width()
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height)
    }

    pub fn is_alive(&self) -> bool {
        self.status == Status::Alive
    }

    pub fn set_action(&mut self, name: ActionName) {
        self.sprite.set_action(name);
    }

    /// Make the entity inert and park it off the surface
    ///
    /// The owning collection drops it on its next compaction.
    pub fn soft_remove(&mut self) {
        self.height = 0.0;
        self.sprite.animation.collapse();
        self.pos = REMOVED_POSITION;
        self.direction = Direction::None;
        self.speed = 0.0;
    }

    /// Feed the animation clock
    pub fn tick_animation(&mut self, dt: Duration) {
        self.sprite.animation.tick(dt);
    }

    /// Run this entity's behavior for one tick
    ///
    /// `player` is the controllable entity when updating anything else.
    pub fn update_behavior(
        &mut self,
        player: Option<&mut Entity>,
        collision: &CollisionMap,
        dt: f32,
        ctx: &mut TickContext,
    ) -> Outcome {
        let mut behavior = std::mem::take(&mut self.behavior);

        let outcome = match &mut behavior {
            Behavior::Player(state) => {
                player::update(self, state, collision, dt);
                Outcome::Nothing
            }
            Behavior::Enemy(state) => enemy::update(self, state, player, dt, ctx),
            Behavior::Prop(state) => match player {
                Some(player) => prop::pickup(self, state, player),
                None => Outcome::Nothing,
            },
        };

        self.behavior = behavior;
        outcome
    }

    /// Blit the current animation frame; skipped until the image is loaded
    pub fn draw(&self, surface: &mut dyn Surface, assets: &AssetCache) {
        let width = self.width();
        if width <= 0.0 || self.height <= 0.0 {
            return;
        }

        let animation = &self.sprite.animation;
        let Some(image) = assets.get(animation.image()) else {
            return;
        };

        let source = animation.source();
        surface.draw_image(
            image,
            Rect::new(source.x, source.y, width, self.height),
            Rect::new(self.pos.x, self.pos.y, width, self.height),
        );
    }

    /// Draw the HP bar while the entity is alive with health left
    pub fn hit_points(&self, surface: &mut dyn Surface, style: HpBarStyle) {
        if !self.is_alive() || self.hp <= 0 {
            return;
        }

        surface.fill_rect(
            Rect::new(
                self.pos.x + style.offset.x,
                self.pos.y + style.offset.y,
                self.hp as f32 / style.relativity,
                style.weight,
            ),
            style.color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::SurfaceSize;
    use crate::engine::renderer::surface::{DrawCommand, DrawList};
    use crate::game::entities::fixtures::{blank_image, torch};

    fn prop_entity() -> Entity {
        torch(Vec2::new(185.0, 430.0))
    }

    fn surface() -> DrawList {
        DrawList::new(SurfaceSize::new(510.0, 606.0))
    }

    #[test]
    fn test_soft_remove() {
        let mut entity = prop_entity().with_motion(Direction::Left, 120.0);
        entity.soft_remove();

        assert_eq!(entity.pos, REMOVED_POSITION);
        assert_eq!(entity.size(), Vec2::ZERO);
        assert_eq!(entity.direction, Direction::None);
        assert_eq!(entity.speed, 0.0);
    }

    #[test]
    fn test_hp_bar_only_while_alive_with_hp() {
        let mut entity = prop_entity();
        let style = HpBarStyle::enemy();

        for (hp, status, drawn) in [
            (100, Status::Alive, true),
            (1, Status::Alive, true),
            (0, Status::Alive, false),
            (-4, Status::Alive, false),
            (50, Status::Dead, false),
        ] {
            entity.hp = hp;
            entity.status = status;
            let mut list = surface();
            entity.hit_points(&mut list, style);
            assert_eq!(!list.is_empty(), drawn, "hp {hp} {status:?}");
        }
    }

    #[test]
    fn test_hp_bar_geometry() {
        let mut entity = prop_entity();
        entity.hp = 80;
        let mut list = surface();
        entity.hit_points(&mut list, HpBarStyle::enemy());

        assert_eq!(
            list.commands()[0],
            DrawCommand::FillRect {
                rect: Rect::new(200.0, 430.0, 20.0, 2.0),
                color: Color::RED,
            }
        );
    }

    #[test]
    fn test_player_bar_colour_by_percentage() {
        assert_eq!(HpBarStyle::player(29, 100).color, Color::RED);
        assert_eq!(HpBarStyle::player(30, 100).color, Color::YELLOW);
        assert_eq!(HpBarStyle::player(59, 100).color, Color::YELLOW);
        assert_eq!(HpBarStyle::player(65, 100).color, Color::ORANGE);
        assert_eq!(HpBarStyle::player(70, 100).color, Color::from_hex(0x50C878));
        assert_eq!(HpBarStyle::player(100, 100).offset, Vec2::new(-2.0, 0.0));
    }

    #[test]
    fn test_draw_skipped_until_loaded() {
        let entity = prop_entity();
        let mut assets = AssetCache::new("/nowhere");
        let mut list = surface();

        entity.draw(&mut list, &assets);
        assert!(list.is_empty());

        assets.insert("images/assets/torch.png", blank_image(96, 24));
        entity.draw(&mut list, &assets);
        assert_eq!(list.image_count(), 1);
    }

    #[test]
    fn test_draw_uses_current_frame() {
        let mut entity = prop_entity();
        let mut assets = AssetCache::new("/nowhere");
        let handle = assets.insert("images/assets/torch.png", blank_image(96, 24));

        entity.tick_animation(Duration::from_millis(400));
        let mut list = surface();
        entity.draw(&mut list, &assets);

        assert_eq!(
            list.commands()[0],
            DrawCommand::Image {
                image: handle,
                src: Rect::new(48.0, 0.0, 24.0, 24.0),
                dst: Rect::new(185.0, 430.0, 24.0, 24.0),
            }
        );
    }

    #[test]
    fn test_removed_entity_draws_nothing() {
        let mut entity = prop_entity();
        let mut assets = AssetCache::new("/nowhere");
        assets.insert("images/assets/torch.png", blank_image(96, 24));
        entity.soft_remove();

        let mut list = surface();
        entity.draw(&mut list, &assets);
        assert_eq!(list.image_count(), 0);
    }

    #[test]
    fn test_unknown_action_is_ignored() {
        let mut entity = prop_entity();
        entity.set_action(ActionName::AttackUp);
        assert_eq!(entity.sprite.animation.image(), "images/assets/torch.png");
        assert_eq!(entity.width(), 24.0);
    }
}
