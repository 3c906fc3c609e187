// Props: decorations and pickups with a one-shot effect

use log::debug;

use super::entity::{Behavior, Entity, Outcome, Status};
use crate::core::math::boxes_within_proximity;
use crate::engine::audio::{AudioSink, Cue};

/// What a pickup does when the player reaches it
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Restore hp, never past `cap`
    Heal { amount: i32, cap: i32 },
    /// Open the gate once every enemy is dead
    UnlockGate,
    /// Finish the level with the win overlay
    EndLevel { message: String },
}

/// Pickup flags of a prop
#[derive(Debug, Clone)]
pub struct PropState {
    /// Effect still available
    pub special: bool,
    pub effect: Option<Effect>,
}

impl Default for PropState {
    fn default() -> Self {
        Self {
            special: true,
            effect: None,
        }
    }
}

impl PropState {
    pub fn with_effect(effect: Effect) -> Self {
        Self {
            effect: Some(effect),
            ..Self::default()
        }
    }
}

/// Check pickup range and hand back the effect to apply
pub(crate) fn pickup(prop: &Entity, state: &PropState, player: &Entity) -> Outcome {
    let in_range = boxes_within_proximity(player.pos, player.size() / 2.0, prop.pos, prop.size() / 2.0);

    match &state.effect {
        Some(effect) if in_range && state.special => {
            debug!("Picked up {:?} at {:?}", effect, prop.pos);
            Outcome::Triggered(effect.clone())
        }
        _ => Outcome::Nothing,
    }
}

/// Spend the prop's effect and take it off the surface
pub fn consume(prop: &mut Entity, audio: &mut dyn AudioSink) {
    if let Behavior::Prop(state) = &mut prop.behavior {
        state.special = false;
    }
    audio.play(Cue::PickUp);
    prop.soft_remove();
    prop.status = Status::Dead;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::fixtures::{player_at, potion_at, TestContext};
    use glam::Vec2;

    fn check(prop: &mut Entity, player: &mut Entity) -> Outcome {
        let collision = TestContext::collision();
        let mut test = TestContext::new();
        prop.update_behavior(Some(player), &collision, 0.016, &mut test.ctx())
    }

    #[test]
    fn test_out_of_range_does_nothing() {
        let mut potion = potion_at(Vec2::new(35.0, 71.0));
        let mut player = player_at(Vec2::new(300.0, 400.0));
        assert_eq!(check(&mut potion, &mut player), Outcome::Nothing);
    }

    #[test]
    fn test_in_range_triggers_effect() {
        let mut potion = potion_at(Vec2::new(105.0, 142.0));
        let mut player = player_at(Vec2::new(110.0, 150.0));

        assert_eq!(
            check(&mut potion, &mut player),
            Outcome::Triggered(Effect::Heal { amount: 25, cap: 100 })
        );
    }

    #[test]
    fn test_consumed_prop_never_fires_again() {
        let mut audio = crate::engine::audio::SoundBoard::new();
        let mut potion = potion_at(Vec2::new(105.0, 142.0));
        let mut player = player_at(Vec2::new(110.0, 150.0));

        assert!(matches!(check(&mut potion, &mut player), Outcome::Triggered(_)));
        consume(&mut potion, &mut audio);
        assert_eq!(audio.play_count(Cue::PickUp), 1);
        assert_eq!(potion.status, Status::Dead);

        // Even dragged back under the player it stays spent
        potion.pos = player.pos;
        for _ in 0..10 {
            assert_eq!(check(&mut potion, &mut player), Outcome::Nothing);
        }
    }

    #[test]
    fn test_decoration_has_no_effect() {
        let mut torch = crate::game::entities::fixtures::torch(Vec2::new(185.0, 430.0));
        let mut player = player_at(Vec2::new(185.0, 430.0));
        assert_eq!(check(&mut torch, &mut player), Outcome::Nothing);
    }
}
