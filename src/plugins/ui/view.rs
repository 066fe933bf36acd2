//! Render-only HUD: draws [`HudModel`] with sprites and 2D text pinned to the camera.

use bevy::prelude::*;

use super::HudModel;

const HUD_Z: f32 = 500.0;
const BAR_WIDTH: f32 = 240.0;
const BAR_HEIGHT: f32 = 10.0;

#[derive(Component)]
pub struct HudRoot;

#[derive(Component)]
struct EnemyBar;

#[derive(Component)]
struct EnemyBarFill;

#[derive(Component)]
struct PlayerLifeText;

#[derive(Component)]
struct EndMessageText;

pub fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_hud).add_systems(
        PostUpdate,
        (follow_camera, draw_hud).before(TransformSystems::Propagate),
    );
}

fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            Name::new("Hud"),
            HudRoot,
            Transform::from_xyz(0.0, 0.0, HUD_Z),
            Visibility::default(),
        ))
        .with_children(|hud| {
            hud.spawn((
                EnemyBar,
                Sprite {
                    color: Color::srgb(0.1, 0.1, 0.12),
                    custom_size: Some(Vec2::new(BAR_WIDTH + 4.0, BAR_HEIGHT + 4.0)),
                    ..default()
                },
                Transform::from_xyz(0.0, 320.0, 0.0),
                Visibility::Hidden,
            ))
            .with_children(|bar| {
                bar.spawn((
                    EnemyBarFill,
                    Sprite {
                        color: Color::srgb(0.85, 0.15, 0.15),
                        custom_size: Some(Vec2::new(BAR_WIDTH, BAR_HEIGHT)),
                        ..default()
                    },
                    Transform::from_xyz(0.0, 0.0, 0.1),
                ));
            });

            hud.spawn((
                PlayerLifeText,
                Text2d::new(""),
                Transform::from_xyz(-560.0, -320.0, 0.0).with_scale(Vec3::splat(1.5)),
                Visibility::Inherited,
            ));

            hud.spawn((
                EndMessageText,
                Text2d::new(""),
                Transform::from_xyz(0.0, 40.0, 0.0).with_scale(Vec3::splat(3.0)),
                Visibility::Hidden,
            ))
            .with_children(|end| {
                end.spawn((
                    Text2d::new("Press R to restart"),
                    Transform::from_xyz(0.0, -24.0, 0.0).with_scale(Vec3::splat(1.0 / 3.0)),
                ));
            });
        });
}

/// Keep the HUD in screen space: follow the camera and undo its zoom.
fn follow_camera(
    camera: Option<Single<(&Transform, &Projection), (With<Camera2d>, Without<HudRoot>)>>,
    root: Option<Single<&mut Transform, With<HudRoot>>>,
) {
    let (Some(camera), Some(root)) = (camera, root) else {
        return;
    };
    let (cam_tf, projection) = camera.into_inner();
    let mut root_tf = root.into_inner();

    root_tf.translation = cam_tf.translation.truncate().extend(HUD_Z);
    if let Projection::Orthographic(ortho) = projection {
        root_tf.scale = Vec3::splat(ortho.scale);
    }
}

fn draw_hud(
    hud: Res<HudModel>,
    mut q_bar: Query<&mut Visibility, (With<EnemyBar>, Without<PlayerLifeText>, Without<EndMessageText>)>,
    mut q_fill: Query<&mut Transform, With<EnemyBarFill>>,
    mut q_life: Query<(&mut Text2d, &mut Visibility), (With<PlayerLifeText>, Without<EnemyBar>, Without<EndMessageText>)>,
    mut q_end: Query<(&mut Text2d, &mut Visibility), (With<EndMessageText>, Without<EnemyBar>, Without<PlayerLifeText>)>,
) {
    if !hud.is_changed() {
        return;
    }

    let shown = |on: bool| if on { Visibility::Inherited } else { Visibility::Hidden };

    for mut vis in &mut q_bar {
        *vis = shown(hud.hud_visible && hud.enemy_bar_visible);
    }
    for mut tf in &mut q_fill {
        tf.scale.x = hud.enemy_fill;
        tf.translation.x = -BAR_WIDTH * (1.0 - hud.enemy_fill) * 0.5;
    }
    for (mut text, mut vis) in &mut q_life {
        text.0.clone_from(&hud.player_health_label);
        *vis = shown(hud.hud_visible);
    }
    for (mut text, mut vis) in &mut q_end {
        text.0 = hud.end_message.unwrap_or_default().to_string();
        *vis = shown(hud.end_message.is_some());
    }
}
