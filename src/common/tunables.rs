//! Tunable gameplay constants.
//!
//! Units are world units (pixels) and seconds. `validate` runs once when the core plugin
//! installs the resource; gameplay code afterwards treats the values as sound.

use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{ensure_non_negative, ensure_positive, ConfigError};

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunables {
    pub pixels_per_meter: f32,
    pub rng_seed: u64,
    pub enemy: EnemyTunables,
    pub perception: PerceptionTunables,
    pub player: PlayerTunables,
    pub spell: SpellTunables,
    pub hazard: HazardTunables,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTunables {
    pub max_life: f32,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub combat_range: f32,
    /// Percentage in `0..=100`; a roll `<=` this value picks the ultimate attack.
    pub ultimate_attack_probability: u32,
    pub base_damage: f32,
    pub splash_damage: f32,
    pub base_attack_secs: f32,
    pub ultimate_attack_secs: f32,
    pub attack_cooldown_secs: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionTunables {
    pub ray_count: u32,
    /// Full cone, degrees.
    pub cone_angle_deg: f32,
    pub range: f32,
    /// Distance of the eye point in front of the agent's centre.
    pub eye_offset: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTunables {
    pub max_life: f32,
    pub walk_speed: f32,
    pub sprint_speed: f32,
    /// Degrees of yaw per unit of horizontal mouse motion.
    pub look_sensitivity: f32,
    pub idle_fov: f32,
    pub walk_fov: f32,
    pub run_fov: f32,
    pub fov_blend_secs: f32,
    pub flash_peak: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellTunables {
    pub damage: f32,
    pub fire_rate: f32,
    pub speed: f32,
    pub range: f32,
    pub pool_size: usize,
    pub flight_secs: f32,
    pub muzzle_offset: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardTunables {
    pub fire_dps: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: 20.0,
            rng_seed: 42,
            enemy: EnemyTunables::default(),
            perception: PerceptionTunables::default(),
            player: PlayerTunables::default(),
            spell: SpellTunables::default(),
            hazard: HazardTunables::default(),
        }
    }
}

impl Default for EnemyTunables {
    fn default() -> Self {
        Self {
            max_life: 100.0,
            walk_speed: 110.0,
            run_speed: 240.0,
            combat_range: 90.0,
            ultimate_attack_probability: 20,
            base_damage: 10.0,
            splash_damage: 25.0,
            base_attack_secs: 0.8,
            ultimate_attack_secs: 1.4,
            attack_cooldown_secs: 1.0,
        }
    }
}

impl Default for PerceptionTunables {
    fn default() -> Self {
        Self { ray_count: 5, cone_angle_deg: 60.0, range: 420.0, eye_offset: 18.0 }
    }
}

impl Default for PlayerTunables {
    fn default() -> Self {
        Self {
            max_life: 100.0,
            walk_speed: 200.0,
            sprint_speed: 340.0,
            look_sensitivity: 0.15,
            idle_fov: 75.0,
            walk_fov: 75.0,
            run_fov: 90.0,
            fov_blend_secs: 0.25,
            flash_peak: 0.45,
        }
    }
}

impl Default for SpellTunables {
    fn default() -> Self {
        Self {
            damage: 10.0,
            fire_rate: 0.25,
            speed: 900.0,
            range: 800.0,
            pool_size: 10,
            flight_secs: 1.0,
            muzzle_offset: 20.0,
        }
    }
}

impl Default for HazardTunables {
    fn default() -> Self {
        Self { fire_dps: 10.0 }
    }
}

impl Tunables {
    /// Parse and validate. Missing fields fall back to defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let tunables: Self = serde_json::from_str(json)?;
        tunables.validate()?;
        Ok(tunables)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("pixels_per_meter", self.pixels_per_meter)?;

        let e = &self.enemy;
        ensure_positive("enemy.max_life", e.max_life)?;
        ensure_positive("enemy.walk_speed", e.walk_speed)?;
        ensure_positive("enemy.run_speed", e.run_speed)?;
        ensure_positive("enemy.combat_range", e.combat_range)?;
        if e.ultimate_attack_probability > 100 {
            return Err(ConfigError::ProbabilityOutOfRange(e.ultimate_attack_probability));
        }
        ensure_non_negative("enemy.base_damage", e.base_damage)?;
        ensure_non_negative("enemy.splash_damage", e.splash_damage)?;
        ensure_non_negative("enemy.base_attack_secs", e.base_attack_secs)?;
        ensure_non_negative("enemy.ultimate_attack_secs", e.ultimate_attack_secs)?;
        ensure_non_negative("enemy.attack_cooldown_secs", e.attack_cooldown_secs)?;

        let p = &self.perception;
        if p.ray_count < 2 {
            return Err(ConfigError::TooFewRays(p.ray_count));
        }
        ensure_non_negative("perception.cone_angle_deg", p.cone_angle_deg)?;
        ensure_positive("perception.range", p.range)?;
        ensure_non_negative("perception.eye_offset", p.eye_offset)?;

        let pl = &self.player;
        ensure_positive("player.max_life", pl.max_life)?;
        ensure_positive("player.walk_speed", pl.walk_speed)?;
        ensure_positive("player.sprint_speed", pl.sprint_speed)?;
        ensure_non_negative("player.fov_blend_secs", pl.fov_blend_secs)?;

        let s = &self.spell;
        if s.pool_size == 0 {
            return Err(ConfigError::EmptySpellPool);
        }
        ensure_non_negative("spell.damage", s.damage)?;
        ensure_non_negative("spell.fire_rate", s.fire_rate)?;
        ensure_positive("spell.speed", s.speed)?;
        ensure_positive("spell.range", s.range)?;
        ensure_positive("spell.flight_secs", s.flight_secs)?;

        ensure_non_negative("hazard.fire_dps", self.hazard.fire_dps)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(Tunables::default().validate(), Ok(()));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let t = Tunables::from_json_str(r#"{ "rng_seed": 9, "spell": { "pool_size": 2 } }"#).unwrap();
        assert_eq!(t.rng_seed, 9);
        assert_eq!(t.spell.pool_size, 2);
        assert_eq!(t.spell.fire_rate, SpellTunables::default().fire_rate);
        assert_eq!(t.enemy, EnemyTunables::default());
    }

    #[test]
    fn json_values_are_validated() {
        assert_eq!(
            Tunables::from_json_str(r#"{ "spell": { "pool_size": 0 } }"#),
            Err(ConfigError::EmptySpellPool)
        );
        assert_eq!(
            Tunables::from_json_str(r#"{ "enemy": { "ultimate_attack_probability": 101 } }"#),
            Err(ConfigError::ProbabilityOutOfRange(101))
        );
        assert!(matches!(
            Tunables::from_json_str(r#"{ "perception": { "range": -1.0 } }"#),
            Err(ConfigError::NotPositive { field: "perception.range", .. })
        ));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(matches!(Tunables::from_json_str("{ nope"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn missing_tunables_file_is_an_io_error() {
        assert!(matches!(
            Tunables::from_json_file("/nonexistent/arena-duel/tunables.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
