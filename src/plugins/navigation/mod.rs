//! Navigation: point-to-point steering for kinematic agents.
//!
//! Routines only talk to the [`Navigator`] trait. The arena is open ground, so a "path" is a
//! straight line; a new destination stays pending until the next steering pass measures it.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::state::{GameState, TickSet};
use crate::plugins::session::Suspended;

/// Slack added to the stopping distance when deciding arrival.
pub const ARRIVAL_TOLERANCE: f32 = 0.5;

pub trait Navigator {
    fn set_destination(&mut self, target: Vec2);
    fn destination(&self) -> Option<Vec2>;
    fn remaining_distance(&self) -> f32;
    fn path_pending(&self) -> bool;
    fn set_speed(&mut self, speed: f32);
    fn set_stopping_distance(&mut self, distance: f32);
    fn stopping_distance(&self) -> f32;

    /// Drop the destination; the agent halts on the next steering pass.
    fn stop(&mut self);

    fn has_arrived(&self) -> bool {
        !self.path_pending() && self.remaining_distance() <= self.stopping_distance() + ARRIVAL_TOLERANCE
    }
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct NavAgent {
    destination: Option<Vec2>,
    remaining: f32,
    pending: bool,
    speed: f32,
    stopping_distance: f32,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self {
            destination: None,
            remaining: 0.0,
            pending: false,
            speed: 0.0,
            stopping_distance: 0.0,
        }
    }
}

impl Navigator for NavAgent {
    fn set_destination(&mut self, target: Vec2) {
        self.destination = Some(target);
        self.remaining = f32::INFINITY;
        self.pending = true;
    }

    fn destination(&self) -> Option<Vec2> {
        self.destination
    }

    fn remaining_distance(&self) -> f32 {
        self.remaining
    }

    fn path_pending(&self) -> bool {
        self.pending
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    fn set_stopping_distance(&mut self, distance: f32) {
        self.stopping_distance = distance.max(0.0);
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }

    fn stop(&mut self) {
        self.destination = None;
        self.remaining = 0.0;
        self.pending = false;
    }
}

impl NavAgent {
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Measure the distance from `position` and return the velocity for this step.
    /// The step never overshoots the stopping point.
    pub fn steer(&mut self, position: Vec2, dt: f32) -> Vec2 {
        self.pending = false;

        let Some(target) = self.destination else {
            self.remaining = 0.0;
            return Vec2::ZERO;
        };

        let offset = target - position;
        self.remaining = offset.length();

        let travel = self.remaining - self.stopping_distance;
        if travel <= 0.0 || self.speed <= 0.0 {
            return Vec2::ZERO;
        }

        let speed = if dt > 0.0 { self.speed.min(travel / dt) } else { self.speed };
        offset / self.remaining * speed
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(
        FixedUpdate,
        steer_agents
            .in_set(TickSet::Movement)
            .run_if(in_state(GameState::InGame)),
    );
}

/// Drive `LinearVelocity` toward each agent's destination and face the direction of travel.
pub fn steer_agents(
    time: Res<Time>,
    mut q: Query<(&mut NavAgent, &mut Transform, &mut LinearVelocity, Has<Suspended>)>,
) {
    let dt = time.delta_secs();

    for (mut agent, mut tf, mut vel, suspended) in &mut q {
        if suspended {
            vel.0 = Vec2::ZERO;
            continue;
        }

        let v = agent.steer(tf.translation.truncate(), dt);
        vel.0 = v;

        if let Ok(dir) = Dir2::new(v) {
            tf.rotation = Quat::from_rotation_arc_2d(Vec2::Y, *dir);
        }
    }
}
