//! Player plugin.
//!
//! Pipeline:
//! - Update: sample input, write PlayerInput resource; blend the field of view
//! - FixedUpdate (Input): turn + move the kinematic body, derive the movement state
//! - FixedUpdate (Lifecycle): Health at 0 → `Dead`
//!
//! API note (Bevy >= 0.18):
//! - Prefer the `Single` SystemParam (and `Option<Single<...>>`) for single-entity access.
//!   `Single` fails validation if 0 or >1 entities match, and `Option<Single>` lets you
//!   explicitly handle the "missing" case without panics.

use avian2d::prelude::*;
use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::Layer;
use crate::common::state::{GameState, TickSet};
use crate::common::tunables::{PlayerTunables, Tunables};
use crate::plugins::damage::{AgentKind, DamageFlash, Health};

pub mod fov;

pub use fov::{FieldOfView, FovTween};

/// Input below this magnitude counts as standing still.
pub const MOVE_DEADZONE: f32 = 0.1;
pub const PLAYER_RADIUS: f32 = 13.0;
pub const PLAYER_SPAWN: Vec2 = Vec2::new(0.0, -220.0);

#[derive(Component, Debug)]
pub struct Player;

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PlayerState {
    #[default]
    Idle,
    Walking,
    Running,
    /// Declared for completeness; nothing enters it.
    Jumping,
    Dead,
}

/// Whether input drives the player. Cleared when the round ends.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controllable(pub bool);

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerAnimator {
    pub walk: bool,
    pub run: bool,
    pub attack: bool,
}

#[derive(Resource, Default, Debug, Clone, Copy, PartialEq)]
pub struct PlayerInput {
    /// Raw axis: x = strafe (D positive), y = forward (W positive).
    pub move_axis: Vec2,
    pub sprint: bool,
    /// Yaw in degrees accumulated since the last fixed tick. Positive turns right.
    pub turn_deg: f32,
    pub cast_held: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementPlan {
    pub state: PlayerState,
    pub velocity: Vec2,
}

/// Map local input to a world-space velocity and the matching state.
pub fn plan_movement(axis: Vec2, sprint: bool, rotation: Quat, t: &PlayerTunables) -> MovementPlan {
    let world = (rotation * axis.extend(0.0)).truncate();

    if world.length() < MOVE_DEADZONE {
        return MovementPlan { state: PlayerState::Idle, velocity: Vec2::ZERO };
    }

    let (state, speed) = if sprint {
        (PlayerState::Running, t.sprint_speed)
    } else {
        (PlayerState::Walking, t.walk_speed)
    };
    MovementPlan { state, velocity: world.normalize() * speed }
}

/// Field of view each movement state settles on.
pub fn target_fov(state: PlayerState, t: &PlayerTunables) -> Option<f32> {
    match state {
        PlayerState::Idle => Some(t.idle_fov),
        PlayerState::Walking => Some(t.walk_fov),
        PlayerState::Running => Some(t.run_fov),
        PlayerState::Jumping | PlayerState::Dead => None,
    }
}

impl PlayerAnimator {
    fn show(&mut self, state: PlayerState) {
        self.walk = state == PlayerState::Walking;
        self.run = state == PlayerState::Running;
    }
}

pub fn plugin(app: &mut App) {
    app.insert_resource(PlayerInput::default())
        .init_resource::<FieldOfView>()
        .add_systems(OnEnter(GameState::InGame), (spawn, reset_round))
        .add_systems(Update, (gather_input, fov::advance_fov))
        .add_systems(
            FixedUpdate,
            (
                apply_movement.in_set(TickSet::Input),
                player_death_trigger.in_set(TickSet::Lifecycle),
            )
                .run_if(in_state(GameState::InGame)),
        );
}

pub fn player_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Player, [Layer::World, Layer::Enemy])
}

fn spawn(mut commands: Commands, tunables: Res<Tunables>) {
    commands.spawn((
        Name::new("Player"),
        Player,
        AgentKind::Player,
        Health::full(tunables.player.max_life),
        PlayerState::Idle,
        Controllable(true),
        PlayerAnimator::default(),
        DamageFlash::default(),
        Sprite {
            color: Color::srgb(0.2, 0.75, 0.9),
            custom_size: Some(Vec2::splat(PLAYER_RADIUS * 2.0)),
            ..default()
        },
        Transform::from_translation(PLAYER_SPAWN.extend(1.0)),
        RigidBody::Kinematic,
        Collider::circle(PLAYER_RADIUS),
        player_layers(),
        LinearVelocity::ZERO,
        DespawnOnExit(GameState::GameOver),
    ));
}

fn reset_round(tunables: Res<Tunables>, mut input: ResMut<PlayerInput>, mut fov: ResMut<FieldOfView>) {
    *input = PlayerInput::default();
    *fov = FieldOfView::new(tunables.player.idle_fov);
}

fn gather_input(
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    motion: Res<AccumulatedMouseMotion>,
    tunables: Res<Tunables>,
    mut input: ResMut<PlayerInput>,
) {
    let mut axis = Vec2::ZERO;

    if keys.pressed(KeyCode::KeyW) {
        axis.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) {
        axis.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyA) {
        axis.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) {
        axis.x += 1.0;
    }

    input.move_axis = axis;
    input.sprint = keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    input.cast_held = mouse.pressed(MouseButton::Left);
    input.turn_deg += motion.delta.x * tunables.player.look_sensitivity;
}

pub fn apply_movement(
    tunables: Res<Tunables>,
    mut input: ResMut<PlayerInput>,
    mut fov: ResMut<FieldOfView>,
    mut q_player: Query<
        (
            &mut Transform,
            &mut LinearVelocity,
            &mut PlayerState,
            &mut PlayerAnimator,
            &Controllable,
        ),
        With<Player>,
    >,
) {
    let turn = std::mem::take(&mut input.turn_deg);

    let Ok((mut tf, mut vel, mut state, mut animator, controllable)) = q_player.single_mut() else {
        return;
    };
    if !controllable.0 || *state == PlayerState::Dead {
        return;
    }

    if turn != 0.0 {
        tf.rotate_z(-turn.to_radians());
    }

    let plan = plan_movement(input.move_axis, input.sprint, tf.rotation, &tunables.player);
    vel.0 = plan.velocity;

    if *state != plan.state {
        debug!("Player {:?} -> {:?}", *state, plan.state);
        *state = plan.state;
        animator.show(plan.state);
        if let Some(target) = target_fov(plan.state, &tunables.player) {
            fov.retarget(target, tunables.player.fov_blend_secs);
        }
    }
}

/// Health at 0 → `Dead`. Terminal: the body stops and input is ignored from then on.
pub fn player_death_trigger(
    mut q: Query<(&Health, &mut PlayerState, &mut PlayerAnimator, &mut LinearVelocity), With<Player>>,
) {
    for (health, mut state, mut animator, mut vel) in &mut q {
        if *state == PlayerState::Dead || !health.is_depleted() {
            continue;
        }
        *state = PlayerState::Dead;
        *animator = PlayerAnimator::default();
        vel.0 = Vec2::ZERO;
        info!("Player defeated");
    }
}
