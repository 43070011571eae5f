use serde::{Deserialize, Serialize};

/// Smallest grid dimension for which a 3x3 neighborhood visits 9 distinct buckets
pub const MIN_GRID_DIM: usize = 3;

/// Number of distinct particle colors available to the renderer
pub const MAX_KINDS: usize = 8;

/// All simulation settings consolidated into one struct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    // === Domain ===
    /// Width of the toroidal domain in world units
    pub domain_width: f32,
    /// Height of the toroidal domain in world units
    pub domain_height: f32,
    /// Number of grid buckets along x (>= 3)
    pub grid_width: usize,
    /// Number of grid buckets along y (>= 3)
    pub grid_height: usize,
    /// Margin used when wrapping positions back into the domain
    pub wrap_epsilon: f32,

    // === Population ===
    /// Active particle count (<= max_particles)
    pub num_particles: usize,
    /// Capacity of the particle buffer, allocated once
    pub max_particles: usize,
    /// Number of particle kinds (K)
    pub kinds: usize,

    // === Dynamics ===
    /// Velocity drag coefficient
    pub damping: f32,
    /// Upper bound on a single frame's dt in seconds
    pub max_dt: f32,
    /// Multiplier applied to the clamped dt while running
    pub time_scale: f32,
    /// Peak magnitude of the short-range repulsion ramp
    pub repulsion_scale: f32,
    /// Peak magnitude of the attraction/repulsion lobe
    pub attraction_scale: f32,

    // === Editing / Visual ===
    /// Step applied to a matrix cell per adjust command
    pub matrix_step: f32,
    /// Frames a trail dot stays visible
    pub trail_length: u8,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            domain_width: 1920.0,
            domain_height: 1080.0,
            grid_width: 15,
            grid_height: 8,
            wrap_epsilon: 0.1,

            num_particles: 1024,
            max_particles: 4096,
            kinds: 6,

            damping: 8.0,
            max_dt: 1.0 / 15.0,
            time_scale: 1.0,
            repulsion_scale: 256.0,
            attraction_scale: 1024.0,

            matrix_step: 0.25,
            trail_length: 12,
        }
    }
}

impl SimulationSettings {
    /// Clamp every field into the range the simulation can work with
    pub fn sanitized(mut self) -> Self {
        self.domain_width = self.domain_width.max(1.0);
        self.domain_height = self.domain_height.max(1.0);
        self.grid_width = self.grid_width.max(MIN_GRID_DIM);
        self.grid_height = self.grid_height.max(MIN_GRID_DIM);
        self.wrap_epsilon = self
            .wrap_epsilon
            .clamp(0.0, self.domain_width.min(self.domain_height) * 0.25);
        self.max_particles = self.max_particles.max(1);
        self.num_particles = self.num_particles.min(self.max_particles);
        self.kinds = self.kinds.clamp(1, MAX_KINDS);
        self.damping = self.damping.max(0.0);
        self.max_dt = self.max_dt.clamp(0.001, 1.0);
        self.time_scale = self.time_scale.clamp(0.0, 4.0);
        self.matrix_step = self.matrix_step.clamp(0.01, 1.0);
        self
    }

    /// Width and height of a single grid bucket
    pub fn cell_size(&self) -> (f32, f32) {
        (
            self.domain_width / self.grid_width as f32,
            self.domain_height / self.grid_height as f32,
        )
    }

    /// Largest outer radius still covered by a 3x3 bucket neighborhood
    pub fn max_interaction_radius(&self) -> f32 {
        let (cw, ch) = self.cell_size();
        cw.min(ch)
    }

    /// Adjust damping within bounds
    pub fn adjust_damping(&mut self, delta: f32) {
        self.damping = (self.damping + delta).clamp(0.0, 50.0);
    }

    /// Adjust time scale within bounds
    pub fn adjust_time_scale(&mut self, delta: f32) {
        self.time_scale = (self.time_scale + delta).clamp(0.25, 4.0);
    }

    /// Adjust trail length within bounds
    pub fn adjust_trail_length(&mut self, delta: i32) {
        self.trail_length = (self.trail_length as i32 + delta).clamp(1, 60) as u8;
    }
}
