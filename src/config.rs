// Game configuration - tuning constants with environment overrides

use std::path::PathBuf;
use std::time::Duration;

use crate::core::math::SurfaceSize;

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// All tuning values for the game
///
/// The AI cadences are counted in simulation ticks (one per rendered frame),
/// not wall-clock time.
#[derive(Debug, Clone)]
pub struct GameConfig {
    // Window / surface
    /// Window title
    pub title: &'static str,
    /// Play surface size in pixels
    pub surface: SurfaceSize,

    // Assets
    /// Directory that image and audio paths are resolved against
    pub asset_dir: PathBuf,

    // Animation
    /// Period of the sprite animation clock
    pub animation_interval: Duration,

    // Player
    /// Walking speed (pixels/second)
    pub player_walk_speed: f32,
    /// Added to the walk speed while shift is held
    pub player_run_bonus: f32,
    /// Player hit points at spawn
    pub player_max_hp: i32,

    // Enemies
    /// Ticks between chase decisions
    pub chase_cadence: u32,
    /// Step taken toward the player on a chase decision (pixels)
    pub chase_step: f32,
    /// Ticks of sustained contact before an enemy lands a hit
    pub hit_cooldown: u32,
    /// HP the player loses per enemy hit
    pub enemy_damage: i32,
    /// HP an enemy loses per player hit
    pub player_damage: i32,
    /// Knockback applied to a struck enemy (pixels)
    pub knockback: f32,
    /// Score awarded per kill
    pub kill_score: u32,

    // Debug
    /// Outline every entity's bounding box
    pub debug_collision: bool,
    /// Fixed RNG seed (random when None)
    pub seed: Option<u64>,
}

/// Default asset directory (relative to the working directory)
const DEFAULT_ASSET_DIR: &str = "assets";

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "Slime Dungeon",
            surface: SurfaceSize::new(510.0, 606.0),

            asset_dir: PathBuf::from(DEFAULT_ASSET_DIR),

            animation_interval: Duration::from_millis(200),

            player_walk_speed: 85.0,
            player_run_bonus: 80.0,
            player_max_hp: 100,

            chase_cadence: 20,
            chase_step: 10.0,
            hit_cooldown: 10,
            enemy_damage: 2,
            player_damage: 20,
            knockback: 20.0,
            kill_score: 100,

            debug_collision: false,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Build the configuration from defaults plus `SLIME_*` environment overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("SLIME_ASSET_DIR") {
            config.asset_dir = PathBuf::from(dir);
        }

        if let Some(value) = lookup("SLIME_DEBUG_COLLISION") {
            config.debug_collision = parse_flag("SLIME_DEBUG_COLLISION", &value)?;
        }

        if let Some(value) = lookup("SLIME_SEED") {
            let seed = value.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                key: "SLIME_SEED",
                value: value.clone(),
                reason: e.to_string(),
            })?;
            config.seed = Some(seed);
        }

        Ok(config)
    }

    /// Speed used while shift is held
    pub fn player_run_speed(&self) -> f32 {
        self.player_walk_speed + self.player_run_bonus
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.surface, SurfaceSize::new(510.0, 606.0));
        assert_eq!(config.animation_interval, Duration::from_millis(200));
        assert_eq!(config.chase_cadence, 20);
        assert_eq!(config.hit_cooldown, 10);
        assert_eq!(config.asset_dir, PathBuf::from("assets"));
        assert!(!config.debug_collision);
    }

    #[test]
    fn test_run_speed() {
        let config = GameConfig::default();
        assert_eq!(config.player_run_speed(), 165.0);
    }

    #[test]
    fn test_env_overrides() {
        let config = GameConfig::from_lookup(lookup_from(&[
            ("SLIME_ASSET_DIR", "/opt/slime"),
            ("SLIME_DEBUG_COLLISION", "true"),
            ("SLIME_SEED", "42"),
        ]))
        .unwrap();

        assert_eq!(config.asset_dir, PathBuf::from("/opt/slime"));
        assert!(config.debug_collision);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_invalid_seed() {
        let err = GameConfig::from_lookup(lookup_from(&[("SLIME_SEED", "abc")])).unwrap_err();
        assert!(err.to_string().contains("SLIME_SEED"));
    }

    #[test]
    fn test_invalid_flag() {
        let result = GameConfig::from_lookup(lookup_from(&[("SLIME_DEBUG_COLLISION", "maybe")]));
        assert!(result.is_err());
    }
}
