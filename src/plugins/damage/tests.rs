//! Damage coordinator tests.
//!
//! Requests are injected straight into `Messages<DamageRequest>` and the coordinator is run
//! once per batch. `run_system_once` builds a fresh reader each call, so batches are cleared
//! between runs to avoid re-applying old requests.

#![cfg(test)]

use super::*;

use bevy::ecs::message::Messages;

use crate::common::test_utils::{run_system_once, time_with_delta};
use crate::plugins::session::Suspended;

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

fn damage_world() -> World {
    let mut world = World::new();
    world.init_resource::<Messages<DamageRequest>>();
    world.init_resource::<Messages<HealthChanged>>();
    world.init_resource::<Messages<GameEnded>>();
    world.init_resource::<RoundOutcome>();
    world
}

fn hit(world: &mut World, target: Entity, amount: f32, source: DamageSource) {
    world.write_message(DamageRequest { target, amount, source });
}

/// Apply the queued batch, then drop it.
fn apply_batch(world: &mut World) {
    run_system_once(world, apply_damage_requests);
    world.resource_mut::<Messages<DamageRequest>>().clear();
}

fn ended(world: &mut World) -> Vec<GameEnded> {
    run_system_once(world, |mut r: MessageReader<GameEnded>| r.read().copied().collect::<Vec<_>>())
}

fn health_changes(world: &mut World) -> Vec<HealthChanged> {
    run_system_once(world, |mut r: MessageReader<HealthChanged>| {
        r.read().copied().collect::<Vec<_>>()
    })
}

fn requests(world: &mut World) -> Vec<DamageRequest> {
    run_system_once(world, |mut r: MessageReader<DamageRequest>| {
        r.read().copied().collect::<Vec<_>>()
    })
}

// -----------------------------------------------------------------------------
// Health
// -----------------------------------------------------------------------------

#[test]
fn health_stays_within_bounds_under_repeated_damage() {
    let mut h = Health::full(100.0);

    for amount in [30.0, 45.5, 0.0, 80.0, 1000.0, 5.0] {
        h.deplete(amount);
        assert!((0.0..=h.max()).contains(&h.current()));
    }
    assert_eq!(h.current(), 0.0);

    // Negative damage never overheals past max.
    let mut healed = Health::full(100.0);
    healed.deplete(-50.0);
    assert_eq!(healed.current(), 100.0);
}

#[test]
fn health_reports_depletion_only_on_the_crossing_hit() {
    let mut h = Health::full(20.0);

    assert!(!h.deplete(10.0).depleted_now);
    let crossing = h.deplete(15.0);
    assert!(crossing.depleted_now);
    assert_eq!(crossing.previous, 10.0);
    assert_eq!(crossing.current, 0.0);

    assert!(!h.deplete(15.0).depleted_now);
    assert!(h.is_depleted());
}

#[test]
fn health_ignores_non_finite_amounts() {
    let mut h = Health::full(50.0);
    h.deplete(f32::NAN);
    h.deplete(f32::INFINITY);
    assert_eq!(h.current(), 50.0);
    assert!((h.fraction() - 1.0).abs() < 1e-6);
}

// -----------------------------------------------------------------------------
// Coordinator
// -----------------------------------------------------------------------------

#[test]
fn enemy_hit_three_times_survives_and_fourth_hit_wins_once() {
    let mut world = damage_world();
    let enemy = world.spawn((AgentKind::Enemy, Health::full(100.0))).id();

    for _ in 0..3 {
        hit(&mut world, enemy, 30.0, DamageSource::Spell);
    }
    apply_batch(&mut world);

    assert_eq!(world.get::<Health>(enemy).unwrap().current(), 10.0);
    assert!(ended(&mut world).is_empty());
    assert_eq!(world.resource::<RoundOutcome>().get(), None);

    hit(&mut world, enemy, 30.0, DamageSource::Spell);
    apply_batch(&mut world);

    assert_eq!(world.get::<Health>(enemy).unwrap().current(), 0.0);
    let end = ended(&mut world);
    assert_eq!(end, vec![GameEnded { outcome: GameOutcome::Won }]);
    assert_eq!(end[0].outcome.message(), "WON!");

    // Damage after death stays clamped and never re-fires the end event.
    hit(&mut world, enemy, 30.0, DamageSource::Spell);
    apply_batch(&mut world);

    assert_eq!(world.get::<Health>(enemy).unwrap().current(), 0.0);
    assert_eq!(ended(&mut world).len(), 1);
}

#[test]
fn player_depletion_loses_with_game_over_message() {
    let mut world = damage_world();
    let player = world
        .spawn((AgentKind::Player, Health::full(25.0), DamageFlash::default()))
        .id();

    hit(&mut world, player, 25.0, DamageSource::UltimateSplash);
    apply_batch(&mut world);

    let end = ended(&mut world);
    assert_eq!(end.len(), 1);
    assert_eq!(end[0].outcome, GameOutcome::Lost);
    assert_eq!(end[0].outcome.message(), "Game Over");
}

#[test]
fn only_the_first_fallen_agent_decides_the_round() {
    let mut world = damage_world();
    let player = world.spawn((AgentKind::Player, Health::full(10.0))).id();
    let enemy = world.spawn((AgentKind::Enemy, Health::full(10.0))).id();

    hit(&mut world, enemy, 10.0, DamageSource::Spell);
    hit(&mut world, player, 10.0, DamageSource::BaseAttack);
    apply_batch(&mut world);

    assert_eq!(ended(&mut world), vec![GameEnded { outcome: GameOutcome::Won }]);
    assert_eq!(world.resource::<RoundOutcome>().get(), Some(GameOutcome::Won));
}

#[test]
fn every_applied_request_reports_health_to_the_ui() {
    let mut world = damage_world();
    let player = world.spawn((AgentKind::Player, Health::full(100.0))).id();

    hit(&mut world, player, 10.0, DamageSource::BaseAttack);
    hit(&mut world, player, 25.0, DamageSource::UltimateSplash);
    apply_batch(&mut world);

    let changes = health_changes(&mut world);
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[1].agent, AgentKind::Player);
    assert_eq!(changes[1].current, 65.0);
    assert_eq!(changes[1].max, 100.0);
}

#[test]
fn requests_for_entities_without_health_are_dropped() {
    let mut world = damage_world();
    let wall = world.spawn(Transform::default()).id();

    hit(&mut world, wall, 10.0, DamageSource::Spell);
    apply_batch(&mut world);

    assert!(health_changes(&mut world).is_empty());
    assert!(ended(&mut world).is_empty());
}

#[test]
fn non_fatal_player_hit_starts_flash_but_fatal_hit_does_not() {
    let mut world = damage_world();
    let survivor = world
        .spawn((AgentKind::Player, Health::full(100.0), DamageFlash::default()))
        .id();
    let victim = world
        .spawn((AgentKind::Player, Health::full(5.0), DamageFlash::default()))
        .id();

    hit(&mut world, survivor, 10.0, DamageSource::BaseAttack);
    hit(&mut world, victim, 10.0, DamageSource::BaseAttack);
    apply_batch(&mut world);

    assert!(world.get::<DamageFlash>(survivor).unwrap().is_running());
    assert!(!world.get::<DamageFlash>(victim).unwrap().is_running());
}

// -----------------------------------------------------------------------------
// Flash timing
// -----------------------------------------------------------------------------

#[test]
fn flash_writes_off_peak_off_at_half_second_marks() {
    let mut flash = DamageFlash::default();
    assert!(flash.trigger());

    // 0.25 s steps: +0 → off, +0.5 → peak, +1.0 → off.
    let writes: Vec<Option<f32>> = (0..5).map(|_| flash.advance(0.25, 0.45)).collect();
    assert_eq!(writes, vec![Some(0.0), None, Some(0.45), None, Some(0.0)]);
    assert!(!flash.is_running());
    assert_eq!(flash.advance(0.25, 0.45), None);
}

#[test]
fn flash_is_not_restarted_mid_sequence() {
    let mut flash = DamageFlash::default();
    flash.trigger();
    flash.advance(0.5, 1.0);

    assert!(!flash.trigger());
    assert_eq!(flash.advance(0.5, 1.0), Some(1.0));
}

#[test]
fn advance_damage_flash_pushes_intensity_to_vignette() {
    let mut world = World::new();
    world.insert_resource(time_with_delta(0.5));
    world.insert_resource(Tunables::default());
    world.insert_resource(Vignette { intensity: 0.7 });

    let mut flash = DamageFlash::default();
    flash.trigger();
    world.spawn(flash);

    run_system_once(&mut world, advance_damage_flash);
    assert_eq!(world.resource::<Vignette>().intensity, 0.0);

    run_system_once(&mut world, advance_damage_flash);
    let peak = world.resource::<Tunables>().player.flash_peak;
    assert_eq!(world.resource::<Vignette>().intensity, peak);

    run_system_once(&mut world, advance_damage_flash);
    assert_eq!(world.resource::<Vignette>().intensity, 0.0);
}

// -----------------------------------------------------------------------------
// Fire hazard
// -----------------------------------------------------------------------------

#[test]
fn fire_zone_burns_only_players_standing_inside() {
    let mut world = damage_world();
    world.insert_resource(time_with_delta(0.5));
    world.insert_resource(Tunables::default());

    world.spawn((Transform::from_xyz(5.0, 0.0, 0.0), FireZone { radius: 10.0 }));
    let inside = world.spawn((AgentKind::Player, Transform::default())).id();
    world.spawn((AgentKind::Player, Transform::from_xyz(100.0, 0.0, 0.0)));
    world.spawn((AgentKind::Enemy, Transform::default()));
    world.spawn((AgentKind::Player, Transform::default(), Suspended));

    run_system_once(&mut world, burn_players_in_fire);

    let burns = requests(&mut world);
    assert_eq!(burns.len(), 1);
    assert_eq!(burns[0].target, inside);
    assert_eq!(burns[0].source, DamageSource::Fire);

    let expected = world.resource::<Tunables>().hazard.fire_dps * 0.5;
    assert!((burns[0].amount - expected).abs() < 1e-5);
}
