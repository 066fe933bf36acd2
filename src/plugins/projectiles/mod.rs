//! Spell casting: **message-based producer → allocator** over a fixed pool of spell slots.
//!
//! # Invariants first
//! Pool correctness is pushed to two boundaries: the allocator (the only code that pops the
//! pool) and the return commit (the only code that pushes it back). Everything in between is
//! a plain state machine on [`SpellState`](components::SpellState); a pooled entity missing
//! its components is a bug and fails fast.
//!
//! # Data flow
//! ```text
//!   FixedUpdate, TickSet::Casting (chained)
//!┌────────────────────────────────────────────────────────────────────────────┐
//!│  (A) expire_flights                                                        │
//!│      - ticks FlightTimer; InFlight / Spent -> PendingReturn when done      │
//!│                                                                            │
//!│  (B) return_to_pool_commit                                                 │
//!│      - writes Idle invariants, pushes SpellEntity to the back of the pool  │
//!│                                                                            │
//!│  (C) Producer: request_casts                                               │
//!│      - reads: PlayerInput.cast_held, Time, player Transform                │
//!│      - CastLoop gate: at most one shot per fire_rate                       │
//!│      - writes: CastRequest message                                         │
//!│                                                                            │
//!│  (D) Allocator: dispatch_spells                                            │
//!│      - pops the front slot (empty pool -> request dropped)                 │
//!│      - aim ray vs Enemy layer: hit -> InFlight, miss -> straight back      │
//!└────────────────────────────────────────────────────────────────────────────┘
//!                │
//!                v
//!   FixedPostUpdate
//!┌────────────────────────────────────────────────────────────────────────────┐
//!│  (E) Physics emits CollisionStart (avian)                                  │
//!│                                                                            │
//!│  (F) process_spell_collisions                                              │
//!│      - enemy: DamageRequest + EnemyHealthRevealed                          │
//!│      - enemy or world: InFlight -> Spent (hidden, inert, timer keeps going)│
//!└────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pool capacity bounds concurrency: with every slot out, further casts are dropped rather
//! than queued.

pub mod components;
pub mod pool;
pub mod collision;

pub mod messages;
pub mod request;
pub mod allocator;
pub mod commit;


use avian2d::collision::narrow_phase::CollisionEventSystems;
use bevy::prelude::*;

use crate::common::state::{GameState, TickSet};

pub use components::{FlightTimer, PooledSpell, Spell, SpellEntity, SpellState};
pub use messages::CastRequest;
pub use pool::SpellPool;
pub use request::CastLoop;

pub struct ProjectilesPlugin;

fn reset_cast_loop(mut cast: ResMut<CastLoop>) {
    *cast = CastLoop::default();
}

impl Plugin for ProjectilesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpellPool>()
            .init_resource::<CastLoop>()
            .add_message::<CastRequest>()
            .add_systems(OnEnter(GameState::InGame), (pool::init_spell_pool, reset_cast_loop));

        app.add_systems(
            FixedUpdate,
            (
                commit::expire_flights,
                commit::return_to_pool_commit,
                request::request_casts,
                allocator::dispatch_spells,
            )
                .chain()
                .in_set(TickSet::Casting)
                .run_if(in_state(GameState::InGame)),
        );

        app.add_systems(
            FixedPostUpdate,
            collision::process_spell_collisions
                .after(CollisionEventSystems)
                .run_if(in_state(GameState::InGame)),
        );
    }
}
