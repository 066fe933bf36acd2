//! Damage coordinator: the one place life is depleted.
//!
//! Producers (enemy combat routine, spell collisions, fire hazards) only write
//! [`DamageRequest`] messages. `apply_damage_requests` is the single writer of [`Health`]:
//!
//! ```text
//!   DamageRequest ──► apply_damage_requests ──► Health (clamped to [0, max])
//!                               │
//!                               ├─► HealthChanged      (UI sink)
//!                               ├─► DamageFlash.trigger (player, non-fatal hits)
//!                               └─► GameEnded           (first depletion of the round only)
//! ```
//!
//! Death *state* (enemy brain → Dead, player → Dead) is derived from `Health` by the
//! owning feature's death trigger, the same way the enemy lifecycle reads health.

use bevy::prelude::*;

use crate::common::state::{GameState, TickSet};
use crate::common::tunables::Tunables;
use crate::plugins::session::Suspended;

pub mod flash;
pub mod health;

pub use flash::{DamageFlash, Vignette};
pub use health::{Health, HealthChange};

/// Which side an entity fights for. Decides the end-of-round outcome.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Player,
    Enemy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageSource {
    BaseAttack,
    UltimateSplash,
    Spell,
    Fire,
}

#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct DamageRequest {
    pub target: Entity,
    pub amount: f32,
    pub source: DamageSource,
}

#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct HealthChanged {
    pub entity: Entity,
    pub agent: AgentKind,
    pub current: f32,
    pub max: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    /// The enemy fell.
    Won,
    /// The player fell.
    Lost,
}

impl GameOutcome {
    pub fn when_fallen(agent: AgentKind) -> Self {
        match agent {
            AgentKind::Enemy => Self::Won,
            AgentKind::Player => Self::Lost,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Won => "WON!",
            Self::Lost => "Game Over",
        }
    }
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameEnded {
    pub outcome: GameOutcome,
}

/// Latch for the round result. Settles once; later depletions are ignored.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RoundOutcome(Option<GameOutcome>);

impl RoundOutcome {
    pub fn get(&self) -> Option<GameOutcome> {
        self.0
    }

    /// Returns the outcome only the first time the round settles.
    pub fn settle(&mut self, outcome: GameOutcome) -> Option<GameOutcome> {
        if self.0.is_some() {
            return None;
        }
        self.0 = Some(outcome);
        self.0
    }
}

/// Area that burns the player while they stand in it.
#[derive(Component, Debug, Clone, Copy)]
pub struct FireZone {
    pub radius: f32,
}

pub fn plugin(app: &mut App) {
    app.add_message::<DamageRequest>()
        .add_message::<HealthChanged>()
        .add_message::<GameEnded>()
        .init_resource::<RoundOutcome>()
        .init_resource::<Vignette>()
        .add_systems(OnEnter(GameState::InGame), reset_round)
        .add_systems(
            FixedUpdate,
            (burn_players_in_fire, apply_damage_requests, advance_damage_flash)
                .chain()
                .in_set(TickSet::Damage)
                .run_if(in_state(GameState::InGame)),
        );
}

fn reset_round(mut outcome: ResMut<RoundOutcome>, mut vignette: ResMut<Vignette>) {
    *outcome = RoundOutcome::default();
    *vignette = Vignette::default();
}

/// Apply every queued request in arrival order.
pub fn apply_damage_requests(
    mut requests: MessageReader<DamageRequest>,
    mut q: Query<(&AgentKind, &mut Health, Option<&mut DamageFlash>)>,
    mut outcome: ResMut<RoundOutcome>,
    mut health_changed: MessageWriter<HealthChanged>,
    mut ended: MessageWriter<GameEnded>,
) {
    for req in requests.read() {
        let Ok((agent, mut health, flash)) = q.get_mut(req.target) else {
            debug!("Damage request for {:?} without Health; dropped", req.target);
            continue;
        };

        let change = health.deplete(req.amount);
        health_changed.write(HealthChanged {
            entity: req.target,
            agent: *agent,
            current: change.current,
            max: health.max(),
        });

        if *agent == AgentKind::Player && req.amount > 0.0 && change.current > 0.0 {
            if let Some(mut flash) = flash {
                flash.trigger();
            }
        }

        if change.depleted_now {
            debug!("{agent:?} {:?} depleted by {:?}", req.target, req.source);
            if let Some(result) = outcome.settle(GameOutcome::when_fallen(*agent)) {
                info!("Round over: {}", result.message());
                ended.write(GameEnded { outcome: result });
            }
        }
    }
}

/// Walk running flash sequences and push intensity changes to the vignette sink.
pub fn advance_damage_flash(
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut vignette: ResMut<Vignette>,
    mut q: Query<&mut DamageFlash>,
) {
    let dt = time.delta_secs();
    for mut flash in &mut q {
        if !flash.is_running() {
            continue;
        }
        if let Some(intensity) = flash.advance(dt, tunables.player.flash_peak) {
            vignette.intensity = intensity;
        }
    }
}

/// Continuous damage while a player stands inside a fire zone.
pub fn burn_players_in_fire(
    time: Res<Time>,
    tunables: Res<Tunables>,
    zones: Query<(&Transform, &FireZone)>,
    victims: Query<(Entity, &Transform, &AgentKind), Without<Suspended>>,
    mut writer: MessageWriter<DamageRequest>,
) {
    let amount = tunables.hazard.fire_dps * time.delta_secs();
    if amount <= 0.0 {
        return;
    }

    for (entity, tf, agent) in &victims {
        if *agent != AgentKind::Player {
            continue;
        }
        let pos = tf.translation.truncate();
        let burning = zones
            .iter()
            .any(|(zone_tf, zone)| zone_tf.translation.truncate().distance(pos) <= zone.radius);

        if burning {
            writer.write(DamageRequest { target: entity, amount, source: DamageSource::Fire });
        }
    }
}

#[cfg(test)]
mod tests;
