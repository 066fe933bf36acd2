//! Global state machine and fixed-tick ordering.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    InGame,
    /// End screen is up; agents are suspended until a restart.
    GameOver,
}

/// Per-tick ordering inside `FixedUpdate`.
///
/// Perception runs before transition evaluation, which runs before routine resumption.
/// The sets are chained once in the core plugin; features only pick a set.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickSet {
    Input,
    Perception,
    Decision,
    Routines,
    Movement,
    Casting,
    Damage,
    Lifecycle,
}
