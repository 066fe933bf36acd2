//! Timed vignette feedback for player hits.
//!
//! Only the timing lives here: three intensity changes at +0, +0.5 and +1.0 seconds.
//! Whatever renders the vignette reads the [`Vignette`] resource.

use bevy::prelude::*;

/// Vignette intensity sink.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct Vignette {
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug)]
enum FlashLevel {
    Off,
    Peak,
}

const FLASH_STEPS: [(f32, FlashLevel); 3] = [
    (0.0, FlashLevel::Off),
    (0.5, FlashLevel::Peak),
    (1.0, FlashLevel::Off),
];

/// Flash sequence state carried by the player.
#[derive(Component, Debug, Default, Clone)]
pub struct DamageFlash {
    elapsed: Option<f32>,
    next_step: usize,
}

impl DamageFlash {
    #[inline]
    pub fn is_running(&self) -> bool {
        self.elapsed.is_some()
    }

    /// Start the sequence. A hit landing mid-sequence does not restart it.
    pub fn trigger(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.elapsed = Some(0.0);
        self.next_step = 0;
        true
    }

    pub fn cancel(&mut self) {
        self.elapsed = None;
        self.next_step = 0;
    }

    /// Fire every step that is due, then advance by `dt`.
    /// Returns the last intensity written this call.
    pub fn advance(&mut self, dt: f32, peak: f32) -> Option<f32> {
        let elapsed = self.elapsed?;
        let mut written = None;

        while let Some(&(at, level)) = FLASH_STEPS.get(self.next_step) {
            if at > elapsed + 1e-4 {
                break;
            }
            written = Some(match level {
                FlashLevel::Off => 0.0,
                FlashLevel::Peak => peak,
            });
            self.next_step += 1;
        }

        if self.next_step >= FLASH_STEPS.len() {
            self.cancel();
        } else {
            self.elapsed = Some(elapsed + dt.max(0.0));
        }
        written
    }
}
