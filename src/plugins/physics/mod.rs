//! Physics plugin: avian2d for a top-down arena.
//!
//! Everything moves kinematically or as a sensor, so there is no gravity. The length unit
//! comes from tunables so avian's tolerances scale with sprite pixels.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::tunables::Tunables;

/// Requires `Tunables` to be installed first (core plugin).
pub fn plugin(app: &mut App) {
    let ppm = app
        .world()
        .get_resource::<Tunables>()
        .map(|t| t.pixels_per_meter)
        .expect("core plugin installs Tunables before physics");

    app.add_plugins(PhysicsPlugins::default().with_length_unit(ppm))
        .insert_resource(Gravity(Vec2::ZERO));
}
