//! World plugin: arena walls, cover pillars, the fire hazard and the floor.
//!
//! Everything here is round-scoped and rebuilt on restart.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::Layer;
use crate::common::state::GameState;
use crate::plugins::damage::FireZone;

const TILE: i32 = 64;
const HALF_W: i32 = TILE * 16;
const HALF_H: i32 = TILE * 9;

pub const PILLARS: [Vec2; 2] = [Vec2::new(-200.0, 60.0), Vec2::new(200.0, 60.0)];
pub const PILLAR_SIZE: f32 = 60.0;

pub const FIRE_ZONE_CENTER: Vec2 = Vec2::new(-520.0, -300.0);
pub const FIRE_ZONE_RADIUS: f32 = 70.0;

pub fn plugin(app: &mut App) {
    app.add_systems(
        OnEnter(GameState::InGame),
        (spawn_arena, spawn_fire_zone, spawn_floor),
    );
}

/// Walls block movement, spells and line of sight.
pub fn wall_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::World, [Layer::Player, Layer::Enemy, Layer::Spell])
}

fn spawn_arena(mut commands: Commands) {
    let wall_color = Color::srgb(0.25, 0.27, 0.33);
    let thickness = 30.0;

    let mut spawn_wall = |name: String, pos: Vec3, size: Vec2| {
        commands.spawn((
            Name::new(name),
            Sprite {
                color: wall_color,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(pos),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            wall_layers(),
            DespawnOnExit(GameState::GameOver),
        ));
    };

    spawn_wall(
        "WallTop".into(),
        Vec3::new(0.0, HALF_H as f32 + thickness * 0.5, 0.0),
        Vec2::new(HALF_W as f32 * 2.0 + thickness * 2.0, thickness),
    );
    spawn_wall(
        "WallBottom".into(),
        Vec3::new(0.0, -HALF_H as f32 - thickness * 0.5, 0.0),
        Vec2::new(HALF_W as f32 * 2.0 + thickness * 2.0, thickness),
    );
    spawn_wall(
        "WallLeft".into(),
        Vec3::new(-HALF_W as f32 - thickness * 0.5, 0.0, 0.0),
        Vec2::new(thickness, HALF_H as f32 * 2.0),
    );
    spawn_wall(
        "WallRight".into(),
        Vec3::new(HALF_W as f32 + thickness * 0.5, 0.0, 0.0),
        Vec2::new(thickness, HALF_H as f32 * 2.0),
    );

    for (i, p) in PILLARS.iter().enumerate() {
        spawn_wall(format!("Pillar{i}"), p.extend(0.5), Vec2::splat(PILLAR_SIZE));
    }
}

fn spawn_fire_zone(mut commands: Commands) {
    commands.spawn((
        Name::new("FireZone"),
        FireZone { radius: FIRE_ZONE_RADIUS },
        Sprite {
            color: Color::srgba(1.0, 0.45, 0.1, 0.35),
            custom_size: Some(Vec2::splat(FIRE_ZONE_RADIUS * 2.0)),
            ..default()
        },
        Transform::from_translation(FIRE_ZONE_CENTER.extend(0.2)),
        DespawnOnExit(GameState::GameOver),
    ));
}

/// Solid-color checkerboard, no assets.
fn spawn_floor(mut commands: Commands) {
    (-(HALF_H / TILE)..=HALF_H / TILE)
        .flat_map(|y| (-(HALF_W / TILE)..=HALF_W / TILE).map(move |x| (x, y)))
        .for_each(|(x, y)| {
            let world_pos = Vec3::new(x as f32 * TILE as f32, y as f32 * TILE as f32, 0.0);
            let color = if (x + y) % 2 == 0 {
                Color::srgb(0.14, 0.14, 0.16)
            } else {
                Color::srgb(0.12, 0.12, 0.14)
            };

            commands.spawn((
                Sprite::from_color(color, Vec2::splat(TILE as f32)),
                Transform::from_translation(world_pos),
                DespawnOnExit(GameState::GameOver),
            ));
        });
}
