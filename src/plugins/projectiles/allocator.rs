use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::ecs::message::MessageReader;

use crate::common::layers::Layer;
use crate::common::spatial::SpatialProbe;
use crate::common::tunables::{SpellTunables, Tunables};

use super::components::{FlightTimer, PooledSpell, Spell, SpellEntity, SpellState};
use super::messages::CastRequest;
use super::pool::{SPELL_Z, SpellPool, active_spell_layers, make_idle};

pub type SpellSlots<'w, 's> = Query<
    'w,
    's,
    (
        &'static mut SpellState,
        &'static mut Spell,
        &'static mut Transform,
        &'static mut LinearVelocity,
        &'static mut Visibility,
        &'static mut CollisionLayers,
        &'static mut FlightTimer,
    ),
    With<PooledSpell>,
>;

/// What a cast turns into once the aim ray has been resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Dispatch {
    Launched { velocity: Vec2 },
    /// Aim ray found no enemy; the slot goes straight back.
    Fizzled,
}

/// Aim along the player's facing; on an enemy hit, fly from the muzzle towards the hit point.
pub fn resolve_dispatch(probe: &impl SpatialProbe, req: &CastRequest, range: f32, speed: f32) -> Dispatch {
    let Some(hit) = probe.raycast(req.aim_origin, req.aim_direction, range, LayerMask::from(Layer::Enemy)) else {
        return Dispatch::Fizzled;
    };

    let dir = (hit.point - req.fire_origin).normalize_or(req.aim_direction);
    Dispatch::Launched { velocity: dir * speed }
}

/// Take one slot and apply the resolved dispatch to it.
///
/// Returns the slot used, or `None` when the pool is empty and the cast is dropped.
pub fn apply_dispatch(
    pool: &mut SpellPool,
    slots: &mut SpellSlots,
    req: &CastRequest,
    dispatch: Dispatch,
    tunables: &SpellTunables,
) -> Option<SpellEntity> {
    let Some(slot) = pool.acquire() else {
        debug!("Spell pool exhausted, cast dropped");
        return None;
    };

    let (mut state, mut spell, mut tf, mut vel, mut vis, mut layers, mut timer) = slots
        .get_mut(slot.0)
        .expect("SpellPool contained an entity missing pooled spell components");

    debug_assert_eq!(*state, SpellState::Idle, "acquired a slot that was not idle");

    tf.translation = req.fire_origin.extend(SPELL_Z);

    match dispatch {
        Dispatch::Launched { velocity } => {
            *state = SpellState::InFlight;
            spell.damage = tunables.damage;
            vel.0 = velocity;
            *vis = Visibility::Visible;
            *layers = active_spell_layers();
            *timer = FlightTimer::arm(tunables.flight_secs);
        }
        Dispatch::Fizzled => {
            make_idle(&mut state, &mut vis, &mut vel, &mut layers, &mut timer);
            pool.release(slot);
        }
    }

    Some(slot)
}

/// Single writer of the pool on the way out.
pub fn dispatch_spells(
    spatial: SpatialQuery,
    tunables: Res<Tunables>,
    mut pool: ResMut<SpellPool>,
    mut reader: MessageReader<CastRequest>,
    mut slots: SpellSlots,
) {
    let t = &tunables.spell;
    for req in reader.read() {
        let dispatch = resolve_dispatch(&spatial, req, t.range, t.speed);
        apply_dispatch(&mut pool, &mut slots, req, dispatch, t);
    }
}
