use avian2d::prelude::*;
use bevy::prelude::*;

use super::components::{FlightTimer, PooledSpell, SpellEntity, SpellState};
use super::pool::{SpellPool, make_idle};

/// Every dispatched slot comes back when its timer ends, hit or not.
pub fn expire_flights(time: Res<Time>, mut q: Query<(&mut FlightTimer, &mut SpellState), With<PooledSpell>>) {
    let dt = time.delta();
    for (mut timer, mut state) in &mut q {
        let Some(t) = timer.0.as_mut() else {
            continue;
        };
        if t.tick(dt).is_finished() {
            timer.0 = None;
            if matches!(*state, SpellState::InFlight | SpellState::Spent) {
                *state = SpellState::PendingReturn;
            }
        }
    }
}

/// Single writer of the pool on the way back: `PendingReturn -> Idle`.
///
/// Owns the Idle invariants for returning slots (hidden, stopped, non-colliding).
pub fn return_to_pool_commit(
    mut pool: ResMut<SpellPool>,
    mut q: Query<
        (
            Entity,
            &mut SpellState,
            &mut Visibility,
            &mut LinearVelocity,
            &mut CollisionLayers,
            &mut FlightTimer,
        ),
        With<PooledSpell>,
    >,
) {
    for (e, mut state, mut vis, mut vel, mut layers, mut timer) in &mut q {
        if *state != SpellState::PendingReturn {
            continue;
        }
        make_idle(&mut state, &mut vis, &mut vel, &mut layers, &mut timer);
        pool.release(SpellEntity(e));
    }
}
