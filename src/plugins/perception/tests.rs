//! Perception tests against the exact-geometry probe stub.

#![cfg(test)]

use super::*;

use std::cell::Cell;

use crate::common::spatial::ProbeHit;
use crate::common::test_utils::{entities, CircleProbe};

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

/// Five rays, 60 degree cone, range 10, eye at the agent centre.
fn small_fan() -> PerceptionConfig {
    PerceptionConfig::new(5, 60.0, 10.0, 0.0).unwrap()
}

fn degrees_from_up(dir: Vec2) -> f32 {
    // Positive to the left of +Y.
    Vec2::Y.angle_to(dir).to_degrees()
}

/// Counts casts while forwarding to an inner probe.
struct CountingProbe<'a> {
    inner: &'a CircleProbe,
    casts: Cell<u32>,
}

impl SpatialProbe for CountingProbe<'_> {
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32, mask: LayerMask) -> Option<ProbeHit> {
        self.casts.set(self.casts.get() + 1);
        self.inner.raycast(origin, direction, max_distance, mask)
    }

    fn overlap_circle(&self, center: Vec2, radius: f32, mask: LayerMask) -> bool {
        self.inner.overlap_circle(center, radius, mask)
    }
}

// -----------------------------------------------------------------------------
// Config
// -----------------------------------------------------------------------------

#[test]
fn fewer_than_two_rays_is_rejected() {
    assert_eq!(PerceptionConfig::new(1, 60.0, 10.0, 0.0), Err(ConfigError::TooFewRays(1)));
    assert_eq!(PerceptionConfig::new(0, 60.0, 10.0, 0.0), Err(ConfigError::TooFewRays(0)));
    assert!(PerceptionConfig::new(2, 60.0, 10.0, 0.0).is_ok());
}

#[test]
fn non_positive_range_is_rejected() {
    assert!(matches!(
        PerceptionConfig::new(5, 60.0, 0.0, 0.0),
        Err(ConfigError::NotPositive { field: "perception.range", .. })
    ));
}

#[test]
fn fan_is_evenly_spread_across_the_cone() {
    let angles: Vec<f32> = small_fan().ray_directions(Vec2::Y).map(degrees_from_up).collect();
    let expected = [-30.0, -15.0, 0.0, 15.0, 30.0];

    assert_eq!(angles.len(), expected.len());
    for (got, want) in angles.iter().zip(expected) {
        assert!((got - want).abs() < 1e-3, "got {got}, want {want}");
    }
}

#[test]
fn fan_follows_the_facing_direction() {
    let dirs: Vec<Vec2> = small_fan().ray_directions(Vec2::X).collect();
    assert!((dirs[2] - Vec2::X).length() < 1e-5);
    for d in dirs {
        assert!((d.length() - 1.0).abs() < 1e-5);
        assert!(Vec2::X.angle_to(d).to_degrees().abs() <= 30.0 + 1e-3);
    }
}

#[test]
fn eye_point_sits_in_front_of_the_agent() {
    let cfg = PerceptionConfig::new(3, 90.0, 50.0, 4.0).unwrap();
    assert_eq!(cfg.origin(Vec2::new(1.0, 1.0), Vec2::new(0.0, 2.0)), Vec2::new(1.0, 5.0));
}

// -----------------------------------------------------------------------------
// Scan
// -----------------------------------------------------------------------------

#[test]
fn empty_world_is_not_detected() {
    let probe = CircleProbe::default();
    assert!(!scan(&probe, Vec2::ZERO, Vec2::Y, &small_fan(), player_mask()));
}

#[test]
fn target_on_the_cone_boundary_within_range_is_detected() {
    let player = entities(1)[0];
    let edge = Vec2::from_angle((-30.0f32).to_radians()).rotate(Vec2::Y);
    let probe = CircleProbe::default().with(player, edge * 9.0, 0.5, Layer::Player);

    assert!(scan(&probe, Vec2::ZERO, Vec2::Y, &small_fan(), player_mask()));
}

#[test]
fn target_beyond_range_or_outside_cone_is_missed() {
    let ids = entities(2);
    let edge = Vec2::from_angle(30.0f32.to_radians()).rotate(Vec2::Y);
    let outside = Vec2::from_angle(60.0f32.to_radians()).rotate(Vec2::Y);

    let far = CircleProbe::default().with(ids[0], edge * 10.6, 0.5, Layer::Player);
    assert!(!scan(&far, Vec2::ZERO, Vec2::Y, &small_fan(), player_mask()));

    let wide = CircleProbe::default().with(ids[1], outside * 5.0, 0.5, Layer::Player);
    assert!(!scan(&wide, Vec2::ZERO, Vec2::Y, &small_fan(), player_mask()));
}

#[test]
fn scan_stops_at_the_first_hit() {
    let player = entities(1)[0];
    let first_ray = small_fan().ray_directions(Vec2::Y).next().unwrap();
    let inner = CircleProbe::default().with(player, first_ray * 5.0, 0.5, Layer::Player);
    let probe = CountingProbe { inner: &inner, casts: Cell::new(0) };

    assert!(scan(&probe, Vec2::ZERO, Vec2::Y, &small_fan(), player_mask()));
    assert_eq!(probe.casts.get(), 1);
}

#[test]
fn player_behind_a_wall_is_still_seen() {
    let ids = entities(2);
    let (player, wall) = (ids[0], ids[1]);
    let probe = CircleProbe::default()
        .with(wall, Vec2::new(0.0, 3.0), 1.0, Layer::World)
        .with(player, Vec2::new(0.0, 8.0), 0.5, Layer::Player);

    let mut perception = Perception::new(small_fan());
    let mut senses = EnemySenses::default();
    let sighting = PlayerSighting { entity: player, position: Vec2::new(0.0, 8.0), alive: true };
    senses.refresh(&mut perception, &probe, Vec2::ZERO, Vec2::Y, 3.0, Some(sighting));

    assert!(senses.provoked);
}

// -----------------------------------------------------------------------------
// Provocation latch
// -----------------------------------------------------------------------------

#[test]
fn provocation_latches_and_stops_scanning() {
    let player = entities(1)[0];
    let inner = CircleProbe::default().with(player, Vec2::new(0.0, 5.0), 0.5, Layer::Player);
    let probe = CountingProbe { inner: &inner, casts: Cell::new(0) };

    let mut perception = Perception::new(small_fan());
    assert!(perception.observe(&probe, Vec2::ZERO, Vec2::Y, player_mask(), |_| true));
    let casts = probe.casts.get();

    // Player gone from view: still provoked, and nothing is cast.
    let empty = CircleProbe::default();
    assert!(perception.observe(&empty, Vec2::ZERO, Vec2::Y, player_mask(), |_| true));
    assert!(perception.observe(&probe, Vec2::ZERO, Vec2::NEG_Y, player_mask(), |_| true));
    assert_eq!(probe.casts.get(), casts);

    perception.reset();
    assert!(!perception.observe(&empty, Vec2::ZERO, Vec2::Y, player_mask(), |_| true));
}

#[test]
fn senses_report_combat_range_from_the_eye_point() {
    let player = entities(1)[0];
    let probe = CircleProbe::default().with(player, Vec2::new(0.0, 6.0), 0.5, Layer::Player);
    let mut perception = Perception::new(small_fan());
    let mut senses = EnemySenses::default();

    let sighting = PlayerSighting { entity: player, position: Vec2::new(0.0, 6.0), alive: true };
    senses.refresh(&mut perception, &probe, Vec2::ZERO, Vec2::Y, 3.0, Some(sighting));

    assert!(senses.provoked);
    assert!(!senses.player_in_combat_range);
    assert_eq!(senses.player_position, Some(Vec2::new(0.0, 6.0)));

    senses.refresh(&mut perception, &probe, Vec2::ZERO, Vec2::Y, 6.0, Some(sighting));
    assert!(senses.player_in_combat_range);
    assert!(senses.player_alive);

    // Player despawned: nothing sensed, provocation kept.
    senses.refresh(&mut perception, &probe, Vec2::ZERO, Vec2::Y, 6.0, None);
    assert!(senses.provoked);
    assert!(!senses.player_in_combat_range);
    assert_eq!(senses.player, None);
}
