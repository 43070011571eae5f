use crate::forces::{self, ForceScales};
use crate::grid::SpatialGrid;
use crate::integrator;
use crate::interaction::InteractionModel;
use crate::settings::SimulationSettings;
use glam::Vec2;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A typed point particle on the toroidal plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub kind: usize,
}

/// Simulation context: particles, grid, interaction model and scratch buffers.
///
/// The particle buffer is allocated once with `max_particles` capacity and
/// never grows past it.
pub struct Simulation {
    pub settings: SimulationSettings,
    pub model: InteractionModel,
    particles: Vec<Particle>,
    grid: SpatialGrid,
    forces: Vec<Vec2>,
    pub paused: bool,
    rng: StdRng,
}

impl Simulation {
    pub fn new(settings: SimulationSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    pub fn with_rng(settings: SimulationSettings, rng: StdRng) -> Self {
        let settings = settings.sanitized();
        let domain = Vec2::new(settings.domain_width, settings.domain_height);
        let mut sim = Self {
            grid: SpatialGrid::new(settings.grid_width, settings.grid_height, domain),
            model: InteractionModel::new(settings.kinds),
            particles: Vec::with_capacity(settings.max_particles),
            forces: Vec::with_capacity(settings.max_particles),
            paused: false,
            settings,
            rng,
        };
        sim.respawn_particles();
        sim.check_interaction_range();
        sim
    }

    pub fn domain(&self) -> Vec2 {
        self.grid.domain()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn capacity(&self) -> usize {
        self.particles.capacity()
    }

    /// Replace the particle set (truncated to the buffer capacity)
    pub fn set_particles<I: IntoIterator<Item = Particle>>(&mut self, particles: I) {
        let max = self.settings.max_particles;
        self.particles.clear();
        self.particles.extend(particles.into_iter().take(max));
        self.settings.num_particles = self.particles.len();
    }

    fn random_particle(&mut self) -> Particle {
        Particle {
            position: Vec2::new(
                self.rng.gen_range(0.0..self.settings.domain_width),
                self.rng.gen_range(0.0..self.settings.domain_height),
            ),
            velocity: Vec2::ZERO,
            kind: self.rng.gen_range(0..self.model.kinds()),
        }
    }

    /// Re-randomize positions and kinds of `num_particles` particles, at rest
    pub fn respawn_particles(&mut self) {
        self.particles.clear();
        for _ in 0..self.settings.num_particles {
            let particle = self.random_particle();
            self.particles.push(particle);
        }
        info!("Spawned {} particles", self.particles.len());
    }

    /// Grow or shrink the active population without reallocating
    pub fn adjust_particles(&mut self, delta: i32) {
        let target = (self.particles.len() as i64 + delta as i64)
            .clamp(1, self.settings.max_particles as i64) as usize;
        if target < self.particles.len() {
            self.particles.truncate(target);
        } else {
            while self.particles.len() < target {
                let particle = self.random_particle();
                self.particles.push(particle);
            }
        }
        self.settings.num_particles = self.particles.len();
    }

    /// Give roughly a quarter of the particles (picked with replacement) a random kind
    pub fn reshuffle_kinds(&mut self) {
        let count = self.particles.len().div_ceil(4);
        let kinds = self.model.kinds();
        for _ in 0..count {
            let idx = self.rng.gen_range(0..self.particles.len());
            self.particles[idx].kind = self.rng.gen_range(0..kinds);
        }
        info!("Reshuffled kinds of {} particles", count);
    }

    pub fn randomize_matrix(&mut self) {
        self.model.randomize(&mut self.rng);
        info!("Randomized interaction matrix");
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Time scale currently applied to frame time (0 while paused)
    pub fn effective_time_scale(&self) -> f32 {
        if self.paused {
            0.0
        } else {
            self.settings.time_scale
        }
    }

    pub fn adjust_inner_radius(&mut self, delta: f32) {
        self.model.adjust_inner_radius(delta);
    }

    pub fn adjust_outer_radius(&mut self, delta: f32) {
        let cap = self.settings.max_interaction_radius();
        self.model.adjust_outer_radius(delta, cap);
    }

    /// Warn when the outer radius exceeds what a 3x3 neighborhood can see
    pub fn check_interaction_range(&self) {
        let cap = self.settings.max_interaction_radius();
        if self.model.outer_radius() > cap {
            warn!(
                "Outer radius {} exceeds grid cell size {}; neighbors beyond one cell are not seen",
                self.model.outer_radius(),
                cap
            );
        }
    }

    /// Advance by one rendered frame. Returns the dt actually simulated.
    pub fn tick(&mut self, frame_time: f32) -> f32 {
        let dt = integrator::scaled_dt(frame_time, self.settings.max_dt, self.effective_time_scale());
        if dt > 0.0 {
            self.step(dt);
        }
        dt
    }

    /// Rebuild the grid, evaluate every force against the unmodified positions,
    /// then integrate every particle.
    pub fn step(&mut self, dt: f32) {
        self.grid.rebuild(&self.particles);

        let scales = ForceScales {
            repulsion: self.settings.repulsion_scale,
            attraction: self.settings.attraction_scale,
        };
        self.forces.clear();
        for i in 0..self.particles.len() {
            let force = forces::evaluate(i, &self.particles, &self.grid, &self.model, scales);
            self.forces.push(force);
        }

        let domain = self.domain();
        let damping = self.settings.damping;
        let epsilon = self.settings.wrap_epsilon;
        for (particle, &force) in self.particles.iter_mut().zip(&self.forces) {
            integrator::step(particle, force, damping, dt, domain, epsilon);
        }
        debug!("Stepped {} particles by {:.4}s", self.particles.len(), dt);
    }
}
