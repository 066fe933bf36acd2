//! Camera plugin (render-only).
//!
//! The camera lives for the whole app so the end screen stays visible between rounds.
//! It eases toward the player and turns the player's field of view into orthographic zoom.
//!
//! B0001 note: the player `Transform` and the camera `Transform` are read/written in one
//! system, so the queries are made disjoint with `Without<...>` filters.

use bevy::prelude::*;
use bevy_firefly::prelude::*;

use crate::plugins::player::{FieldOfView, Player};

/// The field of view that maps to an orthographic scale of 1.
pub const BASE_FOV_DEG: f32 = 75.0;

#[derive(Component)]
pub struct MainCamera {
    pub responsiveness: f32,
}

pub fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_camera).add_systems(
        PostUpdate,
        (follow_player, apply_field_of_view).before(TransformSystems::Propagate),
    );
}

/// Orthographic stand-in for a perspective FOV: same framing ratio as `tan(fov / 2)`.
pub fn zoom_for_fov(fov_deg: f32) -> f32 {
    (fov_deg.to_radians() * 0.5).tan() / (BASE_FOV_DEG.to_radians() * 0.5).tan()
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("MainCamera"),
        Camera2d,
        MainCamera { responsiveness: 5.0 },
        FireflyConfig::default(),
        Transform::from_xyz(0.0, 0.0, 999.0),
    ));
}

fn follow_player(
    time: Res<Time>,
    player: Option<Single<&Transform, (With<Player>, Without<MainCamera>)>>,
    camera: Single<(&mut Transform, &MainCamera), Without<Player>>,
) {
    let Some(player) = player else {
        return;
    };
    let (mut tf_cam, main_cam) = camera.into_inner();

    let dt = time.delta_secs();
    let alpha = 1.0 - (-main_cam.responsiveness * dt).exp();

    let target = player.translation.truncate();
    let current = tf_cam.translation.truncate();
    let next = current + (target - current) * alpha;
    tf_cam.translation.x = next.x;
    tf_cam.translation.y = next.y;
}

fn apply_field_of_view(fov: Res<FieldOfView>, camera: Single<&mut Projection, With<MainCamera>>) {
    if !fov.is_changed() {
        return;
    }
    if let Projection::Orthographic(ortho) = camera.into_inner().into_inner() {
        ortho.scale = zoom_for_fov(fov.value());
    }
}
