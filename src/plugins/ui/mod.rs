//! HUD model: what the screen should show, kept as plain data.
//!
//! Gameplay writes messages; [`HudModel`] folds them. The render-only [`view`] draws the model
//! and is the only part that needs a window.

pub mod view;


use bevy::prelude::*;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::damage::{AgentKind, GameEnded, HealthChanged};

/// The enemy health bar should appear. Sent on chase, combat entry and spell hits;
/// repeats are harmless.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyHealthRevealed {
    pub enemy: Entity,
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct HudModel {
    pub hud_visible: bool,
    pub enemy_bar_visible: bool,
    /// 0..=1
    pub enemy_fill: f32,
    pub player_health_label: String,
    pub end_message: Option<&'static str>,
}

impl HudModel {
    pub fn fresh(player_max_life: f32) -> Self {
        Self {
            hud_visible: true,
            enemy_bar_visible: false,
            enemy_fill: 1.0,
            player_health_label: health_label(player_max_life),
            end_message: None,
        }
    }
}

impl Default for HudModel {
    fn default() -> Self {
        Self::fresh(Tunables::default().player.max_life)
    }
}

/// Whole points, truncated.
pub fn health_label(amount: f32) -> String {
    (amount as i32).to_string()
}

pub fn plugin(app: &mut App) {
    app.add_message::<EnemyHealthRevealed>()
        .init_resource::<HudModel>()
        .add_systems(OnEnter(GameState::InGame), reset_hud)
        .add_systems(Update, (reveal_enemy_bar, show_health, show_end_screen).chain());
}

fn reset_hud(tunables: Res<Tunables>, mut hud: ResMut<HudModel>) {
    *hud = HudModel::fresh(tunables.player.max_life);
}

pub fn reveal_enemy_bar(mut reader: MessageReader<EnemyHealthRevealed>, mut hud: ResMut<HudModel>) {
    if reader.read().last().is_some() && !hud.enemy_bar_visible {
        hud.enemy_bar_visible = true;
    }
}

pub fn show_health(mut reader: MessageReader<HealthChanged>, mut hud: ResMut<HudModel>) {
    for ev in reader.read() {
        match ev.agent {
            AgentKind::Enemy => {
                hud.enemy_fill = if ev.max > 0.0 { (ev.current / ev.max).clamp(0.0, 1.0) } else { 0.0 };
            }
            AgentKind::Player => hud.player_health_label = health_label(ev.current),
        }
    }
}

pub fn show_end_screen(mut reader: MessageReader<GameEnded>, mut hud: ResMut<HudModel>) {
    if let Some(ev) = reader.read().last() {
        hud.end_message = Some(ev.outcome.message());
        hud.hud_visible = false;
    }
}
