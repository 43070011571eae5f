use crate::error::MatrixError;
use log::{info, warn};
use rand::Rng;
use std::fs;
use std::path::Path;

/// Field separator of the matrix file format
const SEPARATOR: char = ';';

const DEFAULT_INNER_RADIUS: f32 = 24.0;
const DEFAULT_OUTER_RADIUS: f32 = 96.0;

/// Type-by-type interaction coefficients plus the two radii shaping the force curve.
///
/// Coefficient `(kind_a, kind_b)` is stored at `kind_a + kind_b * K`, the same
/// order as the matrix file: each row of K fields lists how every kind reacts to
/// one other kind. The matrix need not be symmetric.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionModel {
    kinds: usize,
    coefficients: Vec<f32>,
    inner_radius: f32,
    outer_radius: f32,
}

impl InteractionModel {
    /// Neutral matrix (all zeros) with the default radii
    pub fn new(kinds: usize) -> Self {
        let kinds = kinds.max(1);
        Self {
            kinds,
            coefficients: vec![0.0; kinds * kinds],
            inner_radius: DEFAULT_INNER_RADIUS,
            outer_radius: DEFAULT_OUTER_RADIUS,
        }
    }

    pub fn kinds(&self) -> usize {
        self.kinds
    }

    pub fn inner_radius(&self) -> f32 {
        self.inner_radius
    }

    pub fn outer_radius(&self) -> f32 {
        self.outer_radius
    }

    /// Number of fields in the persisted form (K*K coefficients + 2 radii)
    pub fn field_count(&self) -> usize {
        self.kinds * self.kinds + 2
    }

    #[inline]
    fn index(&self, kind_a: usize, kind_b: usize) -> usize {
        kind_a + kind_b * self.kinds
    }

    /// Coefficient describing how `kind_a` reacts to `kind_b`
    #[inline]
    pub fn get(&self, kind_a: usize, kind_b: usize) -> f32 {
        self.coefficients[self.index(kind_a, kind_b)]
    }

    /// Set one coefficient, clamped to [-1, 1]
    pub fn set(&mut self, kind_a: usize, kind_b: usize, coef: f32) {
        let idx = self.index(kind_a, kind_b);
        self.coefficients[idx] = clamp_coefficient(coef);
    }

    /// Nudge one coefficient by `delta`, clamped to [-1, 1]
    pub fn adjust(&mut self, kind_a: usize, kind_b: usize, delta: f32) {
        let current = self.get(kind_a, kind_b);
        self.set(kind_a, kind_b, current + delta);
    }

    /// Replace the radii. Fails (leaving them unchanged) unless 0 < inner < outer.
    pub fn set_radii(&mut self, inner: f32, outer: f32) -> Result<(), MatrixError> {
        if !radii_valid(inner, outer) {
            return Err(MatrixError::InvalidRadii { inner, outer });
        }
        self.inner_radius = inner;
        self.outer_radius = outer;
        Ok(())
    }

    /// Move the inner radius, keeping it in [1, outer - 1]
    pub fn adjust_inner_radius(&mut self, delta: f32) {
        let upper = (self.outer_radius - 1.0).max(f32::MIN_POSITIVE);
        self.inner_radius = (self.inner_radius + delta).clamp(1.0_f32.min(upper), upper);
    }

    /// Move the outer radius, keeping it above inner + 1. Growing stops at
    /// `max_outer`; a radius already past it (from a file) is never pulled down.
    pub fn adjust_outer_radius(&mut self, delta: f32, max_outer: f32) {
        let lower = self.inner_radius + 1.0;
        let upper = max_outer.max(self.outer_radius).max(lower);
        self.outer_radius = (self.outer_radius + delta).clamp(lower, upper);
    }

    /// Fill every cell with a value from the 100-step set {-1.00, -0.98, ..., 0.98}
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        for coef in &mut self.coefficients {
            *coef = rng.gen_range(0..100) as f32 / 50.0 - 1.0;
        }
    }

    /// Serialize coefficients and radii as `v;v;...;inner;outer;`
    pub fn to_line(&self) -> String {
        let mut line = String::new();
        for value in self
            .coefficients
            .iter()
            .chain([self.inner_radius, self.outer_radius].iter())
        {
            line.push_str(&value.to_string());
            line.push(SEPARATOR);
        }
        line
    }

    /// Apply parsed fields in order. Missing trailing fields keep their current values.
    pub fn apply_fields(&mut self, fields: &[f32]) {
        let cells = self.kinds * self.kinds;
        for (coef, value) in self.coefficients.iter_mut().zip(fields) {
            *coef = clamp_coefficient(*value);
        }

        if fields.len() > cells {
            let inner = fields[cells];
            let outer = fields.get(cells + 1).copied().unwrap_or(self.outer_radius);
            if let Err(err) = self.set_radii(inner, outer) {
                warn!("Keeping radii {}/{}: {}", self.inner_radius, self.outer_radius, err);
            }
        }
    }

    /// Load from a matrix file. On error the model is left unchanged.
    pub fn load(&mut self, path: &Path) -> Result<(), MatrixError> {
        let content = fs::read_to_string(path).map_err(|e| MatrixError::from_io(path, e))?;
        let fields = parse_fields(&content, self.field_count());
        self.apply_fields(&fields);
        info!("Loaded {} matrix fields from {}", fields.len(), path.display());
        Ok(())
    }

    /// Write the matrix file, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), MatrixError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| MatrixError::from_io(parent, e))?;
        }
        fs::write(path, self.to_line()).map_err(|e| MatrixError::from_io(path, e))?;
        info!("Saved matrix to {}", path.display());
        Ok(())
    }
}

impl Default for InteractionModel {
    fn default() -> Self {
        Self::new(6)
    }
}

#[inline]
fn clamp_coefficient(coef: f32) -> f32 {
    if coef.is_nan() {
        0.0
    } else {
        coef.clamp(-1.0, 1.0)
    }
}

fn radii_valid(inner: f32, outer: f32) -> bool {
    inner.is_finite() && outer.is_finite() && inner > 0.0 && inner < outer
}

/// Split a matrix file into at most `max_fields` values.
///
/// Each `;`-terminated field is one value; a trailing unterminated field counts too.
/// Empty or unparseable fields become 0 rather than aborting the load.
pub fn parse_fields(content: &str, max_fields: usize) -> Vec<f32> {
    let mut raw: Vec<&str> = content.split(SEPARATOR).collect();
    if raw.last().is_some_and(|last| last.trim().is_empty()) {
        raw.pop();
    }

    raw.into_iter()
        .take(max_fields)
        .map(|field| {
            let cleaned: String = field.chars().filter(|c| !c.is_whitespace()).collect();
            cleaned
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .unwrap_or(0.0)
        })
        .collect()
}
