//! Spatial query service used by perception, combat range checks and spell aiming.
//!
//! Gameplay code only talks to [`SpatialProbe`]. Systems hand it avian's `SpatialQuery`;
//! unit tests hand it a stub with exact circle geometry.

use avian2d::prelude::*;
use bevy::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbeHit {
    pub entity: Entity,
    pub point: Vec2,
    pub distance: f32,
}

pub trait SpatialProbe {
    /// First hit along `direction` within `max_distance`, filtered by `mask`.
    /// A zero-length direction never hits.
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32, mask: LayerMask) -> Option<ProbeHit>;

    /// Whether any collider in `mask` overlaps the circle.
    fn overlap_circle(&self, center: Vec2, radius: f32, mask: LayerMask) -> bool;
}

impl SpatialProbe for SpatialQuery<'_, '_> {
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32, mask: LayerMask) -> Option<ProbeHit> {
        let dir = Dir2::new(direction).ok()?;
        let filter = SpatialQueryFilter::from_mask(mask);

        self.cast_ray(origin, dir, max_distance, true, &filter)
            .map(|hit| ProbeHit {
                entity: hit.entity,
                point: origin + *dir * hit.distance,
                distance: hit.distance,
            })
    }

    fn overlap_circle(&self, center: Vec2, radius: f32, mask: LayerMask) -> bool {
        if radius <= 0.0 {
            return false;
        }
        let filter = SpatialQueryFilter::from_mask(mask);
        !self
            .shape_intersections(&Collider::circle(radius), center, 0.0, &filter)
            .is_empty()
    }
}
