use crate::settings::MIN_GRID_DIM;
use crate::simulation::Particle;
use glam::Vec2;

/// Per-axis record of a neighborhood lookup crossing the domain edge.
///
/// `-1` means the lookup ran past the high edge and wrapped to the low side,
/// `+1` means it ran past the low edge and wrapped to the high side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fold {
    pub x: i32,
    pub y: i32,
}

/// One bucket of a neighborhood query
#[derive(Debug, Clone, Copy)]
pub struct NeighborBucket<'a> {
    pub indices: &'a [usize],
    pub fold: Fold,
}

/// Uniform bucket grid over the toroidal domain, rebuilt every frame.
///
/// Neighborhood queries return the 3x3 block of buckets around a cell, tagging
/// wrapped buckets with a fold that [`unfold`] undoes.
pub struct SpatialGrid {
    width: usize,
    height: usize,
    domain: Vec2,
    buckets: Vec<Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(width: usize, height: usize, domain: Vec2) -> Self {
        let width = width.max(MIN_GRID_DIM);
        let height = height.max(MIN_GRID_DIM);
        Self {
            width,
            height,
            domain,
            buckets: vec![Vec::new(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn domain(&self) -> Vec2 {
        self.domain
    }

    /// Bucket coordinates containing `position`, wrapped into the grid
    #[inline]
    pub fn bucket_coords(&self, position: Vec2) -> (usize, usize) {
        let gx = (position.x / self.domain.x * self.width as f32).floor() as isize;
        let gy = (position.y / self.domain.y * self.height as f32).floor() as isize;
        (
            gx.rem_euclid(self.width as isize) as usize,
            gy.rem_euclid(self.height as isize) as usize,
        )
    }

    #[inline]
    fn bucket_index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Particle indices currently in bucket (x, y)
    pub fn bucket(&self, x: usize, y: usize) -> &[usize] {
        &self.buckets[self.bucket_index(x, y)]
    }

    /// Clear every bucket, keeping allocated capacity
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }

    /// Clear and refill from the authoritative particle positions
    pub fn rebuild(&mut self, particles: &[Particle]) {
        self.clear();
        for (i, particle) in particles.iter().enumerate() {
            let (x, y) = self.bucket_coords(particle.position);
            let idx = self.bucket_index(x, y);
            self.buckets[idx].push(i);
        }
    }

    /// The 9 buckets of the 3x3 block centered on bucket (x, y), wrapped toroidally
    pub fn neighborhood(&self, x: isize, y: isize) -> [NeighborBucket<'_>; 9] {
        std::array::from_fn(|i| {
            let (bx, fold_x) = wrap_axis(x + (i % 3) as isize - 1, self.width);
            let (by, fold_y) = wrap_axis(y + (i / 3) as isize - 1, self.height);
            NeighborBucket {
                indices: self.bucket(bx, by),
                fold: Fold {
                    x: fold_x,
                    y: fold_y,
                },
            }
        })
    }

    /// Neighborhood around the bucket containing `position`
    pub fn neighborhood_of(&self, position: Vec2) -> [NeighborBucket<'_>; 9] {
        let (x, y) = self.bucket_coords(position);
        self.neighborhood(x as isize, y as isize)
    }

    /// Total number of indices stored across all buckets
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}

/// Wrap a coordinate one step past either edge back into [0, dim)
#[inline]
fn wrap_axis(coord: isize, dim: usize) -> (usize, i32) {
    let dim = dim as isize;
    if coord >= dim {
        ((coord - dim) as usize, -1)
    } else if coord < 0 {
        ((coord + dim) as usize, 1)
    } else {
        (coord as usize, 0)
    }
}

/// Express a neighbor found through a folded bucket in the querying particle's frame
#[inline]
pub fn unfold(position: Vec2, fold: Fold, domain: Vec2) -> Vec2 {
    Vec2::new(
        position.x - fold.x as f32 * domain.x,
        position.y - fold.y as f32 * domain.y,
    )
}
