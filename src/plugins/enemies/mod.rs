//! Enemies plugin: the patrolling caster the player duels.
//!
//! ---------------------------
//! HOW THIS IS DESIGNED (ECS)
//! ---------------------------
//! The decision logic lives in [`brain`] as plain Rust. This module is the adapter:
//!
//! 1) FACTS live in components:
//!    - `EnemySenses` (written by perception), `Health` (written by the damage coordinator),
//!      `NavAgent` (read by steering).
//!
//! 2) RULES run in fixed ticks, in order:
//!    - `evaluate_transitions` (Decision): choose patrol / chase / combat.
//!    - `resume_routines` (Routines): step the running routine once.
//!    - `enemy_death_trigger` (Lifecycle): Health at 0 → brain enters `Dead`.
//!
//! 3) PRESENTATION is derived from facts:
//!    - `EnemyAnimator` flags and the sprite tint follow the brain's state.
//!
//! Attacks never touch the player's health directly; they write `DamageRequest`s.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::Occluder2d;

use crate::common::layers::Layer;
use crate::common::rng::GameRng;
use crate::common::state::{GameState, TickSet};
use crate::common::tunables::Tunables;
use crate::plugins::damage::{AgentKind, DamageRequest, DamageSource, Health};
use crate::plugins::navigation::NavAgent;
use crate::plugins::perception::{perception_from_tunables, EnemySenses};
use crate::plugins::session::Suspended;
use crate::plugins::ui::EnemyHealthRevealed;

pub mod brain;

pub use brain::{
    AttackKind, CombatParams, EnemyAnimator, EnemyBrain, EnemyState, PatrolRoute, Routine, RoutineCtx, Strike,
};

#[derive(Component, Debug)]
pub struct Enemy;

/// Patrol target marker. Routes hold these entities, not positions.
#[derive(Component, Debug)]
pub struct Waypoint;

pub const ENEMY_RADIUS: f32 = 16.0;
pub const ENEMY_SPAWN: Vec2 = Vec2::new(0.0, 240.0);

pub const PATROL_POINTS: [Vec2; 4] = [
    Vec2::new(-380.0, 220.0),
    Vec2::new(380.0, 220.0),
    Vec2::new(380.0, -60.0),
    Vec2::new(-380.0, -60.0),
];

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_enemy);

    app.add_systems(
        FixedUpdate,
        (
            evaluate_transitions.in_set(TickSet::Decision),
            resume_routines.in_set(TickSet::Routines),
            enemy_death_trigger.in_set(TickSet::Lifecycle),
        )
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(Update, tint_enemy_by_state);
}

// -----------------------------------------------------------------------------
// Spawn
// -----------------------------------------------------------------------------

#[inline]
pub fn enemy_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Enemy, [Layer::World, Layer::Player, Layer::Spell])
}

/// Membership stays "Enemy" but nothing interacts with it any more.
#[inline]
pub fn non_interacting_enemy_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Enemy, [] as [Layer; 0])
}

/// Spawn the patrol waypoints and the enemy for a new round.
///
/// Tunables were validated when the core plugin installed them, so a failure here is a bug.
pub fn spawn_enemy(mut commands: Commands, tunables: Res<Tunables>) {
    let waypoints: Vec<Entity> = PATROL_POINTS
        .iter()
        .enumerate()
        .map(|(i, p)| {
            commands
                .spawn((
                    Name::new(format!("Waypoint{i}")),
                    Waypoint,
                    Transform::from_translation(p.extend(0.0)),
                    DespawnOnExit(GameState::GameOver),
                ))
                .id()
        })
        .collect();

    let route = PatrolRoute::new(waypoints).expect("patrol layout has waypoints");
    let params = CombatParams::from_tunables(&tunables.enemy).expect("enemy tunables are validated at startup");

    commands.spawn((
        Name::new("Enemy"),
        Enemy,
        AgentKind::Enemy,
        Health::full(tunables.enemy.max_life),
        EnemyBrain::new(params),
        route,
        perception_from_tunables(&tunables),
        EnemySenses::default(),
        NavAgent::default(),
        EnemyAnimator::default(),
        Sprite {
            color: state_tint(EnemyState::Patrol),
            custom_size: Some(Vec2::splat(ENEMY_RADIUS * 2.0)),
            ..default()
        },
        Transform::from_translation(ENEMY_SPAWN.extend(1.0)),
        (
            RigidBody::Kinematic,
            Collider::circle(ENEMY_RADIUS),
            enemy_layers(),
            LinearVelocity::ZERO,
            Occluder2d::circle(ENEMY_RADIUS),
        ),
        DespawnOnExit(GameState::GameOver),
    ));
}

// -----------------------------------------------------------------------------
// Rules: decision + routines
// -----------------------------------------------------------------------------

fn face(tf: &mut Transform, target: Vec2) {
    if let Ok(dir) = Dir2::new(target - tf.translation.truncate()) {
        tf.rotation = Quat::from_rotation_arc_2d(Vec2::Y, *dir);
    }
}

pub fn evaluate_transitions(
    mut q: Query<
        (
            Entity,
            &mut EnemyBrain,
            &EnemySenses,
            &mut NavAgent,
            &mut EnemyAnimator,
            &mut Transform,
        ),
        (With<Enemy>, Without<Suspended>),
    >,
    mut revealed: MessageWriter<EnemyHealthRevealed>,
) {
    for (e, mut brain, senses, mut nav, mut animator, mut tf) in &mut q {
        let eval = brain.evaluate(senses, &mut *nav, &mut *animator);

        if eval.reveal_health_bar {
            revealed.write(EnemyHealthRevealed { enemy: e });
        }
        if let Some(target) = eval.face_toward {
            face(&mut tf, target);
        }
    }
}

pub fn resume_routines(
    time: Res<Time>,
    mut rng: ResMut<GameRng>,
    waypoints: Query<&Transform, With<Waypoint>>,
    mut q: Query<
        (&mut EnemyBrain, &EnemySenses, &PatrolRoute, &mut NavAgent, &mut EnemyAnimator),
        (With<Enemy>, Without<Suspended>),
    >,
    mut damage: MessageWriter<DamageRequest>,
) {
    let dt = time.delta_secs();
    let waypoint_position = |e: Entity| waypoints.get(e).ok().map(|tf| tf.translation.truncate());

    for (mut brain, senses, route, mut nav, mut animator) in &mut q {
        let strike = brain.resume(RoutineCtx {
            dt,
            senses,
            route,
            waypoint_position: &waypoint_position,
            nav: &mut *nav,
            rng: &mut *rng,
            animator: &mut *animator,
        });

        let Some(strike) = strike else {
            continue;
        };
        let Some(player) = senses.player else {
            debug!("Enemy attack landed with no player present");
            continue;
        };

        let source = match strike.kind {
            AttackKind::Base => DamageSource::BaseAttack,
            AttackKind::Ultimate => DamageSource::UltimateSplash,
        };
        damage.write(DamageRequest { target: player, amount: strike.damage, source });
    }
}

// -----------------------------------------------------------------------------
// Rules: death
// -----------------------------------------------------------------------------

/// Health at 0 → `Dead`: routine dropped, body stopped, collisions off.
pub fn enemy_death_trigger(
    mut q: Query<
        (
            &Health,
            &mut EnemyBrain,
            &mut NavAgent,
            &mut EnemyAnimator,
            &mut LinearVelocity,
            &mut CollisionLayers,
        ),
        With<Enemy>,
    >,
) {
    for (health, mut brain, mut nav, mut animator, mut vel, mut layers) in &mut q {
        if brain.is_dead() || !health.is_depleted() {
            continue;
        }

        brain.kill(&mut *nav, &mut *animator);
        vel.0 = Vec2::ZERO;
        *layers = non_interacting_enemy_layers();
        info!("Enemy defeated");
    }
}

// -----------------------------------------------------------------------------
// Presentation
// -----------------------------------------------------------------------------

fn state_tint(state: EnemyState) -> Color {
    match state {
        EnemyState::Patrol => Color::srgb(0.75, 0.3, 0.3),
        EnemyState::Chase => Color::srgb(0.95, 0.55, 0.2),
        EnemyState::BaseAttack => Color::srgb(0.95, 0.2, 0.2),
        EnemyState::UltimateAttack => Color::srgb(0.85, 0.25, 0.9),
        EnemyState::Dead => Color::srgba(0.5, 0.5, 0.5, 0.6),
    }
}

fn tint_enemy_by_state(mut q: Query<(&EnemyBrain, &mut Sprite), (With<Enemy>, Changed<EnemyBrain>)>) {
    for (brain, mut sprite) in &mut q {
        sprite.color = state_tint(brain.state());
    }
}
