//! Lighting plugin (Firefly) (render-only).
//!
//! A light rides on the player and reddens with the damage vignette; the fire zone glows.

use bevy::color::Mix;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::state::GameState;
use crate::plugins::damage::{FireZone, Vignette};
use crate::plugins::player::Player;

const PLAYER_LIGHT: Color = Color::srgb(1.0, 0.9, 0.75);
const HURT_LIGHT: Color = Color::srgb(1.0, 0.15, 0.1);

#[derive(Component)]
pub struct PlayerLight;

pub fn plugin(app: &mut App) {
    if !app.is_plugin_added::<FireflyPlugin>() {
        app.add_plugins(FireflyPlugin);
    }

    app.add_systems(OnEnter(GameState::InGame), setup)
        .add_systems(Update, (follow_player_light, tint_with_vignette, light_fire_zones));
}

fn setup(mut commands: Commands) {
    commands.spawn((
        Name::new("PlayerLight"),
        PlayerLight,
        PointLight2d {
            color: PLAYER_LIGHT,
            radius: 450.0,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 10.0),
        DespawnOnExit(GameState::GameOver),
    ));
}

fn follow_player_light(
    q_player: Query<&Transform, (With<Player>, Without<PlayerLight>)>,
    mut q_light: Query<&mut Transform, (With<PlayerLight>, Without<Player>)>,
) {
    let Ok(tf_player) = q_player.single() else {
        return;
    };
    let Ok(mut tf_light) = q_light.single_mut() else {
        return;
    };

    tf_light.translation.x = tf_player.translation.x;
    tf_light.translation.y = tf_player.translation.y;
}

fn tint_with_vignette(vignette: Res<Vignette>, mut q_light: Query<&mut PointLight2d, With<PlayerLight>>) {
    if !vignette.is_changed() {
        return;
    }
    for mut light in &mut q_light {
        light.color = PLAYER_LIGHT.mix(&HURT_LIGHT, vignette.intensity.clamp(0.0, 1.0));
    }
}

/// Give each newly spawned fire zone its own glow.
fn light_fire_zones(mut commands: Commands, q_zones: Query<(Entity, &FireZone), Added<FireZone>>) {
    for (e, zone) in &q_zones {
        commands.entity(e).insert(PointLight2d {
            color: Color::srgb(1.0, 0.5, 0.15),
            radius: zone.radius * 2.5,
            ..default()
        });
    }
}
