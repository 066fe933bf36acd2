use std::collections::VecDeque;

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::Layer;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;

use super::components::{FlightTimer, PooledSpell, Spell, SpellEntity, SpellState};

pub const SPELL_RADIUS: f32 = 5.0;
pub const SPELL_Z: f32 = 2.0;

/// Idle spell slots, first in first out.
///
/// A slot is either in `free` or owned by exactly one in-flight spell, never both.
#[derive(Resource, Debug, Default)]
pub struct SpellPool {
    free: VecDeque<SpellEntity>,
    capacity: usize,
}

impl SpellPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            free: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Slots currently out of the pool.
    #[inline]
    pub fn in_use(&self) -> usize {
        self.capacity - self.free.len()
    }

    #[inline]
    pub fn acquire(&mut self) -> Option<SpellEntity> {
        self.free.pop_front()
    }

    #[inline]
    pub fn release(&mut self, slot: SpellEntity) {
        debug_assert!(self.free.len() < self.capacity, "spell pool over-released");
        debug_assert!(!self.free.contains(&slot), "spell slot released twice");
        self.free.push_back(slot);
    }
}

#[inline]
pub fn active_spell_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Spell, [Layer::World, Layer::Enemy])
}

/// "Disabled" without structural changes: empty filters means we collide with nothing.
#[inline]
pub fn inactive_spell_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Spell, [] as [Layer; 0])
}

/// The one place that writes the Idle invariants: hidden, stopped, colliding with nothing,
/// no flight timer.
pub fn make_idle(
    state: &mut SpellState,
    vis: &mut Visibility,
    vel: &mut LinearVelocity,
    layers: &mut CollisionLayers,
    timer: &mut FlightTimer,
) {
    *state = SpellState::Idle;
    *vis = Visibility::Hidden;
    vel.0 = Vec2::ZERO;
    *layers = inactive_spell_layers();
    timer.0 = None;
}

/// Pre-spawn the round's slots, all idle.
///
/// Slots stay physically present; idle ones never collide (and so never emit events).
pub fn init_spell_pool(mut commands: Commands, tunables: Res<Tunables>, mut pool: ResMut<SpellPool>) {
    *pool = SpellPool::new(tunables.spell.pool_size);

    for i in 0..pool.capacity {
        let e = commands
            .spawn((
                Name::new(format!("Spell{i}(Pooled)")),
                PooledSpell,
                SpellState::Idle,
                Spell { damage: tunables.spell.damage },
                FlightTimer::default(),
                Sprite {
                    color: Color::srgb(0.55, 0.8, 1.0),
                    custom_size: Some(Vec2::splat(SPELL_RADIUS * 2.0)),
                    ..default()
                },
                Transform::from_xyz(0.0, 0.0, SPELL_Z),
                Visibility::Hidden,
                (
                    RigidBody::Dynamic,
                    Collider::circle(SPELL_RADIUS),
                    Sensor,
                    inactive_spell_layers(),
                    LinearVelocity(Vec2::ZERO),
                    CollisionEventsEnabled,
                ),
                DespawnOnExit(GameState::GameOver),
            ))
            .id();

        pool.release(SpellEntity(e));
    }
}
