use bevy::prelude::*;
use bevy::ecs::message::MessageWriter;

use crate::common::tunables::Tunables;
use crate::plugins::player::{Controllable, Player, PlayerAnimator, PlayerInput, PlayerState};

use super::messages::CastRequest;

/// Rate gate for held-down casting.
///
/// The gate is lazy: the next allowed time is only set when a shot goes out, so after a pause
/// the first poll fires immediately.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct CastLoop {
    casting: bool,
    next_fire_time: f32,
}

impl CastLoop {
    #[inline]
    pub fn is_casting(&self) -> bool {
        self.casting
    }

    #[inline]
    pub fn next_fire_time(&self) -> f32 {
        self.next_fire_time
    }

    /// Returns whether a shot goes out at `now`.
    pub fn poll(&mut self, held: bool, now: f32, fire_rate: f32) -> bool {
        self.casting = held;
        if !held || now <= self.next_fire_time {
            return false;
        }
        self.next_fire_time = now + fire_rate;
        true
    }
}

/// Producer: turn held input into `CastRequest`s. Never touches the pool.
pub fn request_casts(
    time: Res<Time>,
    tunables: Res<Tunables>,
    input: Res<PlayerInput>,
    mut cast: ResMut<CastLoop>,
    player: Option<Single<(&Transform, &PlayerState, &Controllable, &mut PlayerAnimator), With<Player>>>,
    mut writer: MessageWriter<CastRequest>,
) {
    let Some(player) = player else {
        cast.poll(false, time.elapsed_secs(), tunables.spell.fire_rate);
        return;
    };
    let (tf, state, controllable, mut animator) = player.into_inner();

    let able = controllable.0 && *state != PlayerState::Dead;
    let fire = cast.poll(input.cast_held && able, time.elapsed_secs(), tunables.spell.fire_rate);
    animator.attack = cast.is_casting();

    if !fire {
        return;
    }

    let origin = tf.translation.truncate();
    let facing = (tf.rotation * Vec3::Y).truncate().normalize_or(Vec2::Y);

    writer.write(CastRequest {
        fire_origin: origin + facing * tunables.spell.muzzle_offset,
        aim_origin: origin,
        aim_direction: facing,
    });
}
