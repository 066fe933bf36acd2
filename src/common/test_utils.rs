//! Test helpers.
//!
//! Bevy provides `World::run_system_once` (via the `RunSystemOnce` trait) for quickly
//! executing a system in tests without building a full schedule.
//!
//! Systems that use `Commands` enqueue structural changes; applying them is normally handled by
//! `ApplyDeferred` / schedule boundaries. We call `world.flush()` after running so queued commands
//! are applied before assertions.

use std::collections::VecDeque;
use std::time::Duration;

use avian2d::prelude::*;
use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;

use super::layers::Layer;
use super::rng::RandomSource;
use super::spatial::{ProbeHit, SpatialProbe};

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// Default clock advanced by `dt` seconds (what `Res<Time>` reads inside FixedUpdate).
pub fn time_with_delta(dt: f32) -> Time {
    let mut t = Time::<()>::default();
    t.advance_by(Duration::from_secs_f32(dt));
    t
}

/// Advance the default clock already stored in `world`.
pub fn advance_time(world: &mut World, dt: f32) {
    world.resource_mut::<Time>().advance_by(Duration::from_secs_f32(dt));
}

/// A circle collider known to [`CircleProbe`].
#[derive(Clone, Copy, Debug)]
pub struct CircleTarget {
    pub entity: Entity,
    pub center: Vec2,
    pub radius: f32,
    pub layer: Layer,
}

/// Spatial probe with exact ray/circle geometry, no physics world required.
#[derive(Default, Debug)]
pub struct CircleProbe {
    pub targets: Vec<CircleTarget>,
}

impl CircleProbe {
    pub fn with(mut self, entity: Entity, center: Vec2, radius: f32, layer: Layer) -> Self {
        self.targets.push(CircleTarget { entity, center, radius, layer });
        self
    }
}

impl SpatialProbe for CircleProbe {
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32, mask: LayerMask) -> Option<ProbeHit> {
        let dir = direction.try_normalize()?;

        self.targets
            .iter()
            .filter(|t| mask.has_all(t.layer))
            .filter_map(|t| {
                let m = origin - t.center;
                let b = m.dot(dir);
                let c = m.length_squared() - t.radius * t.radius;
                if c > 0.0 && b > 0.0 {
                    return None;
                }
                let disc = b * b - c;
                if disc < 0.0 {
                    return None;
                }
                let distance = (-b - disc.sqrt()).max(0.0);
                (distance <= max_distance).then(|| ProbeHit {
                    entity: t.entity,
                    point: origin + dir * distance,
                    distance,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn overlap_circle(&self, center: Vec2, radius: f32, mask: LayerMask) -> bool {
        self.targets
            .iter()
            .filter(|t| mask.has_all(t.layer))
            .any(|t| t.center.distance(center) <= t.radius + radius)
    }
}

/// Random source that replays scripted values, then falls back to zero.
#[derive(Default, Debug)]
pub struct ScriptedRandom {
    pub indices: VecDeque<usize>,
    pub percents: VecDeque<u32>,
}

impl ScriptedRandom {
    pub fn percents(values: impl IntoIterator<Item = u32>) -> Self {
        Self { percents: values.into_iter().collect(), ..default() }
    }

    pub fn indices(values: impl IntoIterator<Item = usize>) -> Self {
        Self { indices: values.into_iter().collect(), ..default() }
    }
}

impl RandomSource for ScriptedRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        self.indices.pop_front().unwrap_or(0) % len
    }

    fn roll_percent(&mut self) -> u32 {
        self.percents.pop_front().unwrap_or(0)
    }
}

/// A few entity handles for pure (non-ECS) tests.
pub fn entities(n: usize) -> Vec<Entity> {
    let mut world = World::new();
    (0..n).map(|_| world.spawn_empty().id()).collect()
}
