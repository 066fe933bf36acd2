//! Enemy decision making, free of ECS.
//!
//! The brain holds at most one running [`Routine`]. Starting a routine overwrites the slot,
//! which is the only cancellation mechanism: a dropped routine never runs again.
//!
//! ```text
//!   evaluate (once per tick)               resume (once per tick, after evaluate)
//!   ─────────────────────────              ──────────────────────────────────────
//!   provoked ∧ ¬in_range → enter_chase     Patrol: yield → pick waypoint → walk → …
//!   provoked ∧  in_range → enter_combat    Chase : walk toward player → done
//!   otherwise            → keep patrolling Combat: check range → roll → attack → cooldown → …
//! ```

use bevy::prelude::*;

use crate::common::error::{ensure_non_negative, ensure_positive, ConfigError};
use crate::common::rng::RandomSource;
use crate::common::tunables::EnemyTunables;
use crate::plugins::navigation::Navigator;
use crate::plugins::perception::EnemySenses;

/// A chase destination closer than this to the player is left alone.
pub const CHASE_RETARGET_SLACK: f32 = 1.0;

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EnemyState {
    #[default]
    Patrol,
    Chase,
    BaseAttack,
    UltimateAttack,
    Dead,
}

/// Presentation flags for the enemy's animation and particle effects.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnemyAnimator {
    pub run: bool,
    pub base: bool,
    pub ultimate: bool,
    pub base_particles: bool,
    pub ultimate_particles: bool,
}

impl EnemyAnimator {
    fn show(&mut self, state: EnemyState) {
        *self = match state {
            EnemyState::Chase => Self { run: true, ..default() },
            EnemyState::BaseAttack => Self { base: true, base_particles: true, ..default() },
            EnemyState::UltimateAttack => Self { ultimate: true, ultimate_particles: true, ..default() },
            EnemyState::Patrol | EnemyState::Dead => Self::default(),
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackKind {
    Base,
    Ultimate,
}

impl AttackKind {
    pub fn state(self) -> EnemyState {
        match self {
            Self::Base => EnemyState::BaseAttack,
            Self::Ultimate => EnemyState::UltimateAttack,
        }
    }
}

/// Movement and combat numbers, validated once at spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatParams {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub combat_range: f32,
    pub ultimate_probability: u32,
    pub base_damage: f32,
    pub splash_damage: f32,
    pub base_attack_secs: f32,
    pub ultimate_attack_secs: f32,
    pub cooldown_secs: f32,
}

impl CombatParams {
    pub fn from_tunables(t: &EnemyTunables) -> Result<Self, ConfigError> {
        if t.ultimate_attack_probability > 100 {
            return Err(ConfigError::ProbabilityOutOfRange(t.ultimate_attack_probability));
        }
        Ok(Self {
            walk_speed: ensure_positive("enemy.walk_speed", t.walk_speed)?,
            run_speed: ensure_positive("enemy.run_speed", t.run_speed)?,
            combat_range: ensure_positive("enemy.combat_range", t.combat_range)?,
            ultimate_probability: t.ultimate_attack_probability,
            base_damage: ensure_non_negative("enemy.base_damage", t.base_damage)?,
            splash_damage: ensure_non_negative("enemy.splash_damage", t.splash_damage)?,
            base_attack_secs: ensure_non_negative("enemy.base_attack_secs", t.base_attack_secs)?,
            ultimate_attack_secs: ensure_non_negative("enemy.ultimate_attack_secs", t.ultimate_attack_secs)?,
            cooldown_secs: ensure_non_negative("enemy.attack_cooldown_secs", t.attack_cooldown_secs)?,
        })
    }

    fn attack_secs(&self, kind: AttackKind) -> f32 {
        match kind {
            AttackKind::Base => self.base_attack_secs,
            AttackKind::Ultimate => self.ultimate_attack_secs,
        }
    }

    fn damage(&self, kind: AttackKind) -> f32 {
        match kind {
            AttackKind::Base => self.base_damage,
            AttackKind::Ultimate => self.splash_damage,
        }
    }
}

/// Waypoint handles the enemy patrols between. Never empty.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PatrolRoute {
    waypoints: Vec<Entity>,
}

impl PatrolRoute {
    pub fn new(waypoints: Vec<Entity>) -> Result<Self, ConfigError> {
        if waypoints.is_empty() {
            return Err(ConfigError::EmptyPatrolRoute);
        }
        Ok(Self { waypoints })
    }

    pub fn waypoints(&self) -> &[Entity] {
        &self.waypoints
    }

    fn pick(&self, rng: &mut dyn RandomSource) -> Entity {
        self.waypoints[rng.pick_index(self.waypoints.len())]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatrolStep {
    Yield,
    Pick,
    Walking,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CombatStep {
    CheckRange,
    Rolling,
    Attacking { kind: AttackKind, remaining: f32 },
    Cooldown { remaining: f32 },
}

/// The single in-flight routine of an enemy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Routine {
    Patrol(PatrolStep),
    Chase,
    Combat(CombatStep),
}

/// Side effects of one transition evaluation, applied by the ECS adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Evaluation {
    pub reveal_health_bar: bool,
    pub face_toward: Option<Vec2>,
}

/// A landed attack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    pub kind: AttackKind,
    pub damage: f32,
}

/// Everything one routine step may touch.
pub struct RoutineCtx<'a> {
    pub dt: f32,
    pub senses: &'a EnemySenses,
    pub route: &'a PatrolRoute,
    pub waypoint_position: &'a dyn Fn(Entity) -> Option<Vec2>,
    pub nav: &'a mut dyn Navigator,
    pub rng: &'a mut dyn RandomSource,
    pub animator: &'a mut EnemyAnimator,
}

#[derive(Component, Debug, Clone)]
pub struct EnemyBrain {
    state: EnemyState,
    routine: Option<Routine>,
    params: CombatParams,
    health_revealed: bool,
}

impl EnemyBrain {
    pub fn new(params: CombatParams) -> Self {
        Self {
            state: EnemyState::Patrol,
            routine: None,
            params,
            health_revealed: false,
        }
    }

    #[inline]
    pub fn state(&self) -> EnemyState {
        self.state
    }

    #[inline]
    pub fn routine(&self) -> Option<Routine> {
        self.routine
    }

    #[inline]
    pub fn params(&self) -> &CombatParams {
        &self.params
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.state == EnemyState::Dead
    }

    fn set_state(&mut self, state: EnemyState, animator: &mut EnemyAnimator) {
        if self.state != state {
            debug!("Enemy {:?} -> {:?}", self.state, state);
        }
        self.state = state;
        animator.show(state);
    }

    fn reveal_once(&mut self) -> bool {
        !std::mem::replace(&mut self.health_revealed, true)
    }

    /// Decide which routine should run this tick.
    pub fn evaluate(
        &mut self,
        senses: &EnemySenses,
        nav: &mut dyn Navigator,
        animator: &mut EnemyAnimator,
    ) -> Evaluation {
        if self.is_dead() {
            return Evaluation::default();
        }

        match (senses.provoked, senses.player_in_combat_range) {
            (true, false) => match senses.player_position {
                Some(target) => self.enter_chase(target, nav, animator),
                None => Evaluation::default(),
            },
            (true, true) => self.enter_combat(senses, nav),
            (false, _) => {
                if self.routine.is_none() {
                    self.start_patrol(animator);
                }
                Evaluation::default()
            }
        }
    }

    pub fn start_patrol(&mut self, animator: &mut EnemyAnimator) {
        if self.is_dead() {
            return;
        }
        self.routine = Some(Routine::Patrol(PatrolStep::Yield));
        self.set_state(EnemyState::Patrol, animator);
    }

    /// Run toward `target`. A chase already in flight is only retargeted.
    pub fn enter_chase(&mut self, target: Vec2, nav: &mut dyn Navigator, animator: &mut EnemyAnimator) -> Evaluation {
        if self.is_dead() {
            return Evaluation::default();
        }

        if self.routine != Some(Routine::Chase) {
            self.routine = Some(Routine::Chase);
            self.set_state(EnemyState::Chase, animator);
            nav.set_speed(self.params.run_speed);
            nav.set_stopping_distance(self.params.combat_range);
        }

        let on_target = nav
            .destination()
            .is_some_and(|d| d.distance(target) <= CHASE_RETARGET_SLACK);
        if !on_target {
            nav.set_destination(target);
        }

        Evaluation {
            reveal_health_bar: self.reveal_once(),
            face_toward: None,
        }
    }

    /// Fight the player. Other routines are cancelled even when the fight does not start.
    pub fn enter_combat(&mut self, senses: &EnemySenses, nav: &mut dyn Navigator) -> Evaluation {
        if self.is_dead() {
            return Evaluation::default();
        }

        if matches!(self.routine, Some(Routine::Patrol(_) | Routine::Chase)) {
            self.routine = None;
            nav.stop();
        }

        if !senses.player_alive {
            return Evaluation::default();
        }

        let eval = Evaluation {
            reveal_health_bar: self.reveal_once(),
            face_toward: senses.player_position,
        };

        if !matches!(self.routine, Some(Routine::Combat(_))) {
            self.routine = Some(Routine::Combat(CombatStep::CheckRange));
        }
        eval
    }

    /// Advance the running routine by one tick.
    pub fn resume(&mut self, ctx: RoutineCtx<'_>) -> Option<Strike> {
        if self.is_dead() {
            return None;
        }

        match self.routine? {
            Routine::Patrol(step) => {
                self.step_patrol(step, ctx);
                None
            }
            Routine::Chase => {
                if ctx.nav.has_arrived() {
                    self.routine = None;
                }
                None
            }
            Routine::Combat(step) => self.step_combat(step, ctx),
        }
    }

    fn step_patrol(&mut self, step: PatrolStep, ctx: RoutineCtx<'_>) {
        let next = match step {
            PatrolStep::Yield => PatrolStep::Pick,
            PatrolStep::Pick => {
                let waypoint = ctx.route.pick(ctx.rng);
                match (ctx.waypoint_position)(waypoint) {
                    Some(pos) => {
                        ctx.nav.set_speed(self.params.walk_speed);
                        ctx.nav.set_stopping_distance(0.0);
                        ctx.nav.set_destination(pos);
                        PatrolStep::Walking
                    }
                    None => {
                        debug!("Patrol waypoint {waypoint:?} is gone; picking again");
                        PatrolStep::Yield
                    }
                }
            }
            PatrolStep::Walking if ctx.nav.has_arrived() => PatrolStep::Yield,
            PatrolStep::Walking => PatrolStep::Walking,
        };
        self.routine = Some(Routine::Patrol(next));
    }

    fn step_combat(&mut self, mut step: CombatStep, ctx: RoutineCtx<'_>) -> Option<Strike> {
        let mut strike = None;

        // Loops only to fall through from a finished cooldown into the range check.
        loop {
            match step {
                CombatStep::CheckRange => {
                    if !ctx.senses.player_in_combat_range {
                        self.routine = None;
                        return strike;
                    }
                    step = CombatStep::Rolling;
                    break;
                }
                CombatStep::Rolling => {
                    let kind = if ctx.rng.roll_percent() <= self.params.ultimate_probability {
                        AttackKind::Ultimate
                    } else {
                        AttackKind::Base
                    };
                    self.set_state(kind.state(), ctx.animator);
                    step = CombatStep::Attacking { kind, remaining: self.params.attack_secs(kind) };
                    break;
                }
                CombatStep::Attacking { kind, remaining } => {
                    let remaining = remaining - ctx.dt;
                    if remaining > 0.0 {
                        step = CombatStep::Attacking { kind, remaining };
                        break;
                    }
                    strike = Some(Strike { kind, damage: self.params.damage(kind) });
                    step = CombatStep::Cooldown { remaining: self.params.cooldown_secs };
                    break;
                }
                CombatStep::Cooldown { remaining } => {
                    let remaining = remaining - ctx.dt;
                    if remaining > 0.0 {
                        step = CombatStep::Cooldown { remaining };
                        break;
                    }
                    step = CombatStep::CheckRange;
                }
            }
        }

        self.routine = Some(Routine::Combat(step));
        strike
    }

    /// Terminal. Every later call is a no-op.
    pub fn kill(&mut self, nav: &mut dyn Navigator, animator: &mut EnemyAnimator) {
        if self.is_dead() {
            return;
        }
        self.routine = None;
        nav.stop();
        self.set_state(EnemyState::Dead, animator);
    }
}
