//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - `InputPlugin` backs the keyboard/mouse resources the input systems read.
//! - we then call `arena_duel::game::configure_headless` to install gameplay plugins.
//!
//! Time is stepped manually so every `app.update()` runs exactly one fixed tick.

#![allow(dead_code)]

use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::input::InputPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use arena_duel::common::tunables::Tunables;

pub const TICK: Duration = Duration::from_micros(15_625); // 64 Hz, the FixedUpdate default

pub fn app_headless() -> App {
    app_headless_with(Tunables::default())
}

/// Headless app running on the given tunables instead of the defaults.
pub fn app_headless_with(tunables: Tunables) -> App {
    let mut app = App::new();

    // Add AssetPlugin + ScenePlugin so SceneSpawner exists.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        InputPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(TICK));
    app.insert_resource(tunables);

    arena_duel::game::configure_headless(&mut app);
    app
}

pub fn step(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

pub fn count<F: bevy::ecs::query::QueryFilter>(app: &mut App) -> usize {
    app.world_mut().query_filtered::<Entity, F>().iter(app.world()).count()
}
