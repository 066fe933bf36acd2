//! Core plugin: tunables, shared resources, global settings and fixed-tick ordering.

use bevy::prelude::*;

use crate::common::rng::GameRng;
use crate::common::state::TickSet;
use crate::common::tunables::Tunables;

/// Installs tunables (defaults unless the host inserted its own first) and validates them.
///
/// Invalid tunables are a startup bug: this panics with the validation error.
pub fn plugin(app: &mut App) {
    if !app.world().contains_resource::<Tunables>() {
        app.insert_resource(Tunables::default());
    }

    let tunables = app.world().resource::<Tunables>();
    if let Err(e) = tunables.validate() {
        panic!("invalid tunables: {e}");
    }
    let seed = tunables.rng_seed;

    app.insert_resource(GameRng::new(seed));
    app.insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.07)));

    app.configure_sets(
        FixedUpdate,
        (
            TickSet::Input,
            TickSet::Perception,
            TickSet::Decision,
            TickSet::Routines,
            TickSet::Movement,
            TickSet::Casting,
            TickSet::Damage,
            TickSet::Lifecycle,
        )
            .chain(),
    );
}
