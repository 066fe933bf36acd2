use std::collections::HashSet;

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};

use crate::common::layers::Layer;
use crate::plugins::damage::{DamageRequest, DamageSource};
use crate::plugins::ui::EnemyHealthRevealed;

use super::components::{PooledSpell, Spell, SpellState};
use super::pool::inactive_spell_layers;

#[inline]
fn is_in_layer(layers: &CollisionLayers, layer: Layer) -> bool {
    layers.memberships.has_all(layer)
}

/// Consume `CollisionStart` for in-flight spells.
///
/// - Enemy hit: one `DamageRequest` plus a health-bar reveal, then the spell is spent.
/// - World hit: spent, no damage.
///
/// A spent spell is hidden and inert but keeps its flight timer; the commit stage returns it.
pub fn process_spell_collisions(
    mut started: MessageReader<CollisionStart>,
    q_is_spell: Query<(), With<PooledSpell>>,
    mut q_spells: Query<
        (&Spell, &mut SpellState, &mut Visibility, &mut LinearVelocity, &mut CollisionLayers),
        With<PooledSpell>,
    >,
    q_layers: Query<&CollisionLayers, Without<PooledSpell>>,
    mut damage: MessageWriter<DamageRequest>,
    mut revealed: MessageWriter<EnemyHealthRevealed>,
    mut seen: Local<HashSet<Entity>>,
) {
    seen.clear();

    for ev in started.read() {
        let (spell_e, other_collider, other_body) = if q_is_spell.contains(ev.collider1) {
            (ev.collider1, ev.collider2, ev.body2)
        } else if q_is_spell.contains(ev.collider2) {
            (ev.collider2, ev.collider1, ev.body1)
        } else {
            continue;
        };

        // One outcome per spell per tick, even if it touched several colliders.
        if !seen.insert(spell_e) {
            continue;
        }

        let Ok((spell, mut state, mut vis, mut vel, mut layers)) = q_spells.get_mut(spell_e) else {
            continue;
        };
        if *state != SpellState::InFlight {
            continue;
        }

        let Ok(other_layers) = q_layers.get(other_collider) else {
            continue;
        };

        if is_in_layer(other_layers, Layer::Enemy) {
            let target = other_body.unwrap_or(other_collider);
            damage.write(DamageRequest {
                target,
                amount: spell.damage,
                source: DamageSource::Spell,
            });
            revealed.write(EnemyHealthRevealed { enemy: target });
        } else if !is_in_layer(other_layers, Layer::World) {
            continue;
        }

        *state = SpellState::Spent;
        *vis = Visibility::Hidden;
        vel.0 = Vec2::ZERO;
        *layers = inactive_spell_layers();
    }
}
