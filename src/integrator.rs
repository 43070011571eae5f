use crate::simulation::Particle;
use glam::Vec2;

/// Reset a coordinate that left [epsilon, dim - epsilon] to the opposite boundary
#[inline]
pub fn wrap_coordinate(value: f32, dim: f32, epsilon: f32) -> f32 {
    if value > dim - epsilon {
        epsilon
    } else if value < epsilon {
        dim - epsilon
    } else {
        value
    }
}

#[inline]
pub fn wrap_position(position: Vec2, domain: Vec2, epsilon: f32) -> Vec2 {
    Vec2::new(
        wrap_coordinate(position.x, domain.x, epsilon),
        wrap_coordinate(position.y, domain.y, epsilon),
    )
}

/// Advance one particle by `dt` given the neighbor force sum.
///
/// Position moves with the pre-step velocity; velocity then picks up
/// `(force - velocity * damping) * dt`.
pub fn step(particle: &mut Particle, force: Vec2, damping: f32, dt: f32, domain: Vec2, epsilon: f32) {
    particle.position = wrap_position(particle.position + particle.velocity * dt, domain, epsilon);
    let net = force - particle.velocity * damping;
    particle.velocity += net * dt;
}

/// Clamp a raw frame time and apply the user time scale
#[inline]
pub fn scaled_dt(frame_time: f32, max_dt: f32, time_scale: f32) -> f32 {
    frame_time.clamp(0.0, max_dt) * time_scale
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOMAIN: Vec2 = Vec2::new(1920.0, 1080.0);
    const EPS: f32 = 0.1;

    fn moving(x: f32, y: f32, vx: f32, vy: f32) -> Particle {
        Particle {
            position: Vec2::new(x, y),
            velocity: Vec2::new(vx, vy),
            kind: 0,
        }
    }

    #[test]
    fn test_damping_decay() {
        let mut p = moving(500.0, 500.0, 40.0, -20.0);
        let (c, dt) = (8.0, 0.01);
        step(&mut p, Vec2::ZERO, c, dt, DOMAIN, EPS);

        let expected = Vec2::new(40.0, -20.0) - Vec2::new(40.0, -20.0) * c * dt;
        assert!((p.velocity - expected).length() < 1e-5);
        assert!((p.position - Vec2::new(500.4, 499.8)).length() < 1e-3);
    }

    #[test]
    fn test_force_accelerates() {
        let mut p = moving(500.0, 500.0, 0.0, 0.0);
        step(&mut p, Vec2::new(100.0, 0.0), 8.0, 0.05, DOMAIN, EPS);
        assert_eq!(p.position, Vec2::new(500.0, 500.0));
        assert!((p.velocity.x - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_wraps_past_high_edge() {
        let mut p = moving(1919.95, 1079.95, 10.0, 10.0);
        step(&mut p, Vec2::ZERO, 0.0, 0.01, DOMAIN, EPS);
        assert_eq!(p.position, Vec2::new(EPS, EPS));
    }

    #[test]
    fn test_wraps_past_low_edge() {
        let mut p = moving(0.15, 0.15, -10.0, -10.0);
        step(&mut p, Vec2::ZERO, 0.0, 0.01, DOMAIN, EPS);
        assert_eq!(p.position, Vec2::new(1920.0 - EPS, 1080.0 - EPS));
    }

    #[test]
    fn test_interior_untouched_by_wrap() {
        assert_eq!(wrap_coordinate(42.0, 100.0, 0.1), 42.0);
        assert_eq!(wrap_coordinate(0.1, 100.0, 0.1), 0.1);
        assert_eq!(wrap_coordinate(99.5, 100.0, 0.1), 99.5);
        assert_eq!(wrap_coordinate(100.0, 100.0, 0.1), 0.1);
    }

    #[test]
    fn test_scaled_dt_clamps_hitches() {
        assert_eq!(scaled_dt(1.0, 1.0 / 15.0, 1.0), 1.0 / 15.0);
        assert_eq!(scaled_dt(0.01, 1.0 / 15.0, 0.0), 0.0);
        assert!((scaled_dt(0.01, 1.0 / 15.0, 2.0) - 0.02).abs() < 1e-7);
    }
}
