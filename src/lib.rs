//! Arena Duel: enemy AI and combat-state core on Bevy + avian2d.
//!
//! `game` composes the app, `common` holds shared types, and `plugins` holds one module per
//! feature. Integration tests in `tests/` drive the headless configuration through this API.

pub mod common;
pub mod game;
pub mod plugins;
