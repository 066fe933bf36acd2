//! Collision layers.
//!
//! World blocks movement and spells. Perception casts against `Player` only (walls do not
//! hide the player), spell aiming against `Enemy` only.

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    #[default]
    Default,
    World,
    Player,
    Enemy,
    Spell,
}
