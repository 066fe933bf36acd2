//! Field-of-view blending.
//!
//! The value is a camera-agnostic "degrees" number; the camera plugin maps it onto its
//! projection. Blends are linear from the value at the time of the request and snap to the
//! target at the end.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FovTween {
    pub from: f32,
    pub to: f32,
    pub elapsed: f32,
    pub duration: f32,
}

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct FieldOfView {
    value: f32,
    tween: Option<FovTween>,
}

impl Default for FieldOfView {
    fn default() -> Self {
        Self::new(75.0)
    }
}

impl FieldOfView {
    pub fn new(value: f32) -> Self {
        Self { value, tween: None }
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn tween(&self) -> Option<FovTween> {
        self.tween
    }

    /// Start blending toward `target`. No-op when already there or already heading there.
    pub fn retarget(&mut self, target: f32, duration: f32) -> bool {
        let heading = self.tween.map_or(self.value, |t| t.to);
        if heading == target {
            return false;
        }
        self.tween = Some(FovTween {
            from: self.value,
            to: target,
            elapsed: 0.0,
            duration: duration.max(0.0),
        });
        true
    }

    pub fn advance(&mut self, dt: f32) {
        let Some(mut tween) = self.tween else {
            return;
        };

        if tween.elapsed < tween.duration {
            self.value = tween.from + (tween.to - tween.from) * (tween.elapsed / tween.duration);
            tween.elapsed += dt.max(0.0);
            self.tween = Some(tween);
        } else {
            self.value = tween.to;
            self.tween = None;
        }
    }
}

pub fn advance_fov(time: Res<Time>, mut fov: ResMut<FieldOfView>) {
    fov.advance(time.delta_secs());
}
