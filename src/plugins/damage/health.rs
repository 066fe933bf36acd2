//! Life pool shared by both agents.

use bevy::prelude::*;

/// Current and maximum life. `current` always stays within `[0, max]`.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Health {
    current: f32,
    max: f32,
}

/// Result of one depletion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthChange {
    pub previous: f32,
    pub current: f32,
    /// Crossed from alive to zero on this call.
    pub depleted_now: bool,
}

impl Health {
    pub fn full(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    #[inline]
    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// `current / max`, 0 when `max` is 0.
    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 { self.current / self.max } else { 0.0 }
    }

    /// Subtract `amount` and clamp to `[0, max]`. Non-finite amounts are ignored.
    pub fn deplete(&mut self, amount: f32) -> HealthChange {
        let previous = self.current;
        if amount.is_finite() {
            self.current = (self.current - amount).clamp(0.0, self.max);
        }
        HealthChange {
            previous,
            current: self.current,
            depleted_now: previous > 0.0 && self.current <= 0.0,
        }
    }
}
