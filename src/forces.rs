use crate::grid::{unfold, SpatialGrid};
use crate::interaction::InteractionModel;
use crate::simulation::Particle;
use glam::Vec2;
use std::f32::consts::PI;

/// Scales of the two branches of the force curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceScales {
    pub repulsion: f32,
    pub attraction: f32,
}

impl Default for ForceScales {
    fn default() -> Self {
        Self {
            repulsion: 256.0,
            attraction: 1024.0,
        }
    }
}

/// Signed force magnitude at distance `d` (positive pulls toward the neighbor).
///
/// Inside the inner radius every pair repels regardless of `coef`. Between the
/// radii a half-sine lobe scaled by `coef` applies, reaching zero at the outer radius.
#[inline]
pub fn magnitude(d: f32, coef: f32, inner: f32, outer: f32, scales: ForceScales) -> f32 {
    if d < inner {
        return -(1.0 - d / inner) * scales.repulsion;
    }
    let blend = ((d - inner) / (outer - inner)).clamp(0.0, 1.0);
    if blend >= 1.0 {
        // sin(PI) is not exactly zero in f32
        return 0.0;
    }
    (blend * PI).sin() * scales.attraction * coef
}

/// Force exerted on `particle` by a single neighbor already in its frame
#[inline]
pub fn pair_force(
    particle: &Particle,
    other_position: Vec2,
    other_kind: usize,
    model: &InteractionModel,
    scales: ForceScales,
) -> Vec2 {
    let delta = other_position - particle.position;
    let d = delta.length();
    if d <= 0.0 {
        return Vec2::ZERO;
    }
    let dir = delta / d;
    let coef = model.get(particle.kind, other_kind);
    dir * magnitude(d, coef, model.inner_radius(), model.outer_radius(), scales)
}

/// Summed force on `particles[index]` from every particle in its 3x3 bucket neighborhood
pub fn evaluate(
    index: usize,
    particles: &[Particle],
    grid: &SpatialGrid,
    model: &InteractionModel,
    scales: ForceScales,
) -> Vec2 {
    let particle = &particles[index];
    let domain = grid.domain();
    let mut force = Vec2::ZERO;

    for bucket in grid.neighborhood_of(particle.position) {
        for &other_idx in bucket.indices {
            if other_idx == index {
                continue;
            }
            let other = &particles[other_idx];
            let other_position = unfold(other.position, bucket.fold, domain);
            force += pair_force(particle, other_position, other.kind, model, scales);
        }
    }

    force
}
