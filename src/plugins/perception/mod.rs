//! Enemy perception: a fan of rays cast from the eye point.
//!
//! Once an enemy has seen the player it stays provoked for the rest of the round; the fan is
//! not cast again after that. Rays only test the player layer, so walls never hide the player.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::error::{ensure_non_negative, ensure_positive, ConfigError};
use crate::common::layers::Layer;
use crate::common::spatial::SpatialProbe;
use crate::common::state::{GameState, TickSet};
use crate::common::tunables::{PerceptionTunables, Tunables};
use crate::plugins::damage::Health;
use crate::plugins::player::Player;
use crate::plugins::session::Suspended;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerceptionConfig {
    ray_count: u32,
    cone_angle_deg: f32,
    range: f32,
    eye_offset: f32,
}

impl PerceptionConfig {
    pub fn new(ray_count: u32, cone_angle_deg: f32, range: f32, eye_offset: f32) -> Result<Self, ConfigError> {
        if ray_count < 2 {
            return Err(ConfigError::TooFewRays(ray_count));
        }
        Ok(Self {
            ray_count,
            cone_angle_deg: ensure_non_negative("perception.cone_angle_deg", cone_angle_deg)?,
            range: ensure_positive("perception.range", range)?,
            eye_offset: ensure_non_negative("perception.eye_offset", eye_offset)?,
        })
    }

    pub fn from_tunables(t: &PerceptionTunables) -> Result<Self, ConfigError> {
        Self::new(t.ray_count, t.cone_angle_deg, t.range, t.eye_offset)
    }

    #[inline]
    pub fn ray_count(&self) -> u32 {
        self.ray_count
    }

    #[inline]
    pub fn range(&self) -> f32 {
        self.range
    }

    /// Unit directions of the fan, left edge to right edge, evenly spaced across the cone.
    pub fn ray_directions(&self, facing: Vec2) -> impl Iterator<Item = Vec2> + use<> {
        let facing = facing.try_normalize().unwrap_or(Vec2::Y);
        let half = self.cone_angle_deg * 0.5;
        let step = self.cone_angle_deg / (self.ray_count - 1) as f32;

        (0..self.ray_count).map(move |i| {
            let angle = (-half + step * i as f32).to_radians();
            Vec2::from_angle(angle).rotate(facing)
        })
    }

    /// Eye point: `eye_offset` in front of the agent.
    pub fn origin(&self, position: Vec2, facing: Vec2) -> Vec2 {
        position + facing.normalize_or_zero() * self.eye_offset
    }
}

/// Cast the fan and report whether any ray hit an accepted entity.
/// Stops casting at the first accepted hit.
pub fn scan_with(
    probe: &impl SpatialProbe,
    origin: Vec2,
    facing: Vec2,
    config: &PerceptionConfig,
    mask: LayerMask,
    accept: impl Fn(Entity) -> bool,
) -> bool {
    config
        .ray_directions(facing)
        .any(|dir| probe.raycast(origin, dir, config.range, mask).is_some_and(|hit| accept(hit.entity)))
}

/// Any hit within the mask counts.
pub fn scan(probe: &impl SpatialProbe, origin: Vec2, facing: Vec2, config: &PerceptionConfig, mask: LayerMask) -> bool {
    scan_with(probe, origin, facing, config, mask, |_| true)
}

/// Sight state of one agent.
#[derive(Component, Debug, Clone)]
pub struct Perception {
    pub config: PerceptionConfig,
    provoked: bool,
}

impl Perception {
    pub fn new(config: PerceptionConfig) -> Self {
        Self { config, provoked: false }
    }

    #[inline]
    pub fn is_provoked(&self) -> bool {
        self.provoked
    }

    /// Scan only while not yet provoked. Returns the (latched) provoked flag.
    pub fn observe(
        &mut self,
        probe: &impl SpatialProbe,
        position: Vec2,
        facing: Vec2,
        mask: LayerMask,
        accept: impl Fn(Entity) -> bool,
    ) -> bool {
        if !self.provoked {
            let origin = self.config.origin(position, facing);
            self.provoked = scan_with(probe, origin, facing, &self.config, mask, accept);
        }
        self.provoked
    }

    pub fn reset(&mut self) {
        self.provoked = false;
    }
}

/// What the enemy brain knows about the player this tick.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct EnemySenses {
    pub provoked: bool,
    pub player_in_combat_range: bool,
    pub player: Option<Entity>,
    pub player_position: Option<Vec2>,
    pub player_alive: bool,
}

/// Snapshot of the player handed to [`EnemySenses::refresh`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSighting {
    pub entity: Entity,
    pub position: Vec2,
    pub alive: bool,
}

pub fn player_mask() -> LayerMask {
    LayerMask::from(Layer::Player)
}

impl EnemySenses {
    /// Refresh from the world. Without a player nothing is sensed, but provocation persists.
    pub fn refresh(
        &mut self,
        perception: &mut Perception,
        probe: &impl SpatialProbe,
        position: Vec2,
        facing: Vec2,
        combat_range: f32,
        player: Option<PlayerSighting>,
    ) {
        let Some(player) = player else {
            *self = Self { provoked: perception.is_provoked(), ..default() };
            return;
        };

        self.provoked = perception.observe(probe, position, facing, player_mask(), |hit| hit == player.entity);

        let eye = perception.config.origin(position, facing);
        self.player_in_combat_range = probe.overlap_circle(eye, combat_range, player_mask());
        self.player = Some(player.entity);
        self.player_position = Some(player.position);
        self.player_alive = player.alive;
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(
        FixedUpdate,
        sense_player
            .in_set(TickSet::Perception)
            .run_if(in_state(GameState::InGame)),
    );
}

/// Build the perception component from tunables. Invalid values are a startup bug.
pub fn perception_from_tunables(tunables: &Tunables) -> Perception {
    let config = PerceptionConfig::from_tunables(&tunables.perception)
        .unwrap_or_else(|err| panic!("invalid perception tunables: {err}"));
    Perception::new(config)
}

pub fn sense_player(
    spatial: SpatialQuery,
    tunables: Res<Tunables>,
    player: Option<Single<(Entity, &Transform, &Health), With<Player>>>,
    mut q: Query<(&Transform, &mut Perception, &mut EnemySenses), (Without<Player>, Without<Suspended>)>,
) {
    let sighting = player.map(|p| {
        let (entity, tf, health) = p.into_inner();
        PlayerSighting {
            entity,
            position: tf.translation.truncate(),
            alive: !health.is_depleted(),
        }
    });

    for (tf, mut perception, mut senses) in &mut q {
        let was_provoked = perception.is_provoked();
        let facing = (tf.rotation * Vec3::Y).truncate();

        senses.refresh(
            &mut perception,
            &spatial,
            tf.translation.truncate(),
            facing,
            tunables.enemy.combat_range,
            sighting,
        );

        if !was_provoked && senses.provoked {
            debug!("Enemy provoked: player spotted");
        }
    }
}

#[cfg(test)]
mod tests;
