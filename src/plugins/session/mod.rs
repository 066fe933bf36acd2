//! Round lifecycle: freeze on game end, restart from the end screen.
//!
//! ```text
//!   InGame ──GameEnded──► suspend agents ──► GameOver ──RestartRequested──► InGame
//!                                              (round entities despawn on exit,
//!                                               OnEnter(InGame) respawns them)
//! ```

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::state::{GameState, TickSet};
use crate::plugins::damage::{AgentKind, GameEnded};
use crate::plugins::player::Controllable;


/// Agent taken out of the simulation: no perception, decisions, routines, steering or hazards.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Suspended;

#[derive(Message, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RestartRequested;

pub fn plugin(app: &mut App) {
    app.add_message::<RestartRequested>()
        .add_systems(
            FixedUpdate,
            suspend_on_game_end
                .in_set(TickSet::Lifecycle)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            Update,
            (request_restart_from_keys, restart_round)
                .chain()
                .run_if(in_state(GameState::GameOver)),
        );
}

pub fn suspend_on_game_end(
    mut commands: Commands,
    mut ended: MessageReader<GameEnded>,
    mut agents: Query<(Entity, &mut LinearVelocity, Option<&mut Controllable>), With<AgentKind>>,
    mut next: ResMut<NextState<GameState>>,
) {
    let Some(ev) = ended.read().last() else {
        return;
    };

    for (e, mut vel, controllable) in &mut agents {
        vel.0 = Vec2::ZERO;
        if let Some(mut c) = controllable {
            c.0 = false;
        }
        commands.entity(e).insert(Suspended);
    }

    info!("Round over: {}", ev.outcome.message());
    next.set(GameState::GameOver);
}

pub fn request_restart_from_keys(keys: Res<ButtonInput<KeyCode>>, mut writer: MessageWriter<RestartRequested>) {
    if keys.any_just_pressed([KeyCode::KeyR, KeyCode::Enter]) {
        writer.write(RestartRequested);
    }
}

pub fn restart_round(mut requests: MessageReader<RestartRequested>, mut next: ResMut<NextState<GameState>>) {
    if requests.read().last().is_none() {
        return;
    }
    info!("Restarting round");
    next.set(GameState::InGame);
}
