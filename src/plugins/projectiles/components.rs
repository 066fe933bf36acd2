use bevy::prelude::*;

/// Marks an entity owned by the [`SpellPool`](super::pool::SpellPool).
#[derive(Component, Debug)]
pub struct PooledSpell;

/// Lifecycle of one pooled slot.
///
/// ```text
///   Idle ──dispatch(hit)──► InFlight ──collision──► Spent ──timer──► PendingReturn ──commit──► Idle
///     │                        └──────────────────timer──────────────────┘
///     └──dispatch(miss)──► Idle (returned on the spot)
/// ```
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpellState {
    #[default]
    Idle,
    InFlight,
    /// Hit something. Hidden and inert, but not back in the pool until its timer ends.
    Spent,
    PendingReturn,
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Spell {
    pub damage: f32,
}

/// Pool handle. Only the pool, the dispatcher and the return commit pass these around.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpellEntity(pub Entity);

/// Armed on dispatch; the slot returns when it finishes.
#[derive(Component, Debug, Clone, Default)]
pub struct FlightTimer(pub Option<Timer>);

impl FlightTimer {
    pub fn arm(secs: f32) -> Self {
        Self(Some(Timer::from_seconds(secs, TimerMode::Once)))
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.0.is_some()
    }
}
