//! Feature plugins.

use bevy::prelude::*;

use crate::plugins::projectiles::ProjectilesPlugin;

pub mod core;
pub mod damage;
pub mod enemies;
pub mod navigation;
pub mod perception;
pub mod physics;
pub mod player;
pub mod projectiles;
pub mod session;
pub mod ui;
pub mod world;

// Render-only
pub mod camera;
pub mod lighting;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    world::plugin(app);
    damage::plugin(app);
    navigation::plugin(app);
    perception::plugin(app);
    player::plugin(app);
    enemies::plugin(app);
    ui::plugin(app);
    session::plugin(app);
    app.add_plugins(ProjectilesPlugin);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    lighting::plugin(app);
    camera::plugin(app);
    ui::view::plugin(app);
}
