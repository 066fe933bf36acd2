//! Buffered cast requests.
//!
//! The cast loop only produces intent; the dispatcher is the single writer of the pool.

use bevy::prelude::*;

#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct CastRequest {
    /// Where the spell appears.
    pub fire_origin: Vec2,
    /// Where the aim ray starts (the player's centre).
    pub aim_origin: Vec2,
    pub aim_direction: Vec2,
}
