//! Sum-of-sines scalar field and local-maximum point extraction
//!
//! The field is a superposition of plane waves whose directions are evenly
//! spread around the circle. With five waves this gives a quasi-periodic
//! pattern; its local maxima become the points of the lattice demo.
//!
//! Uses Rayon to sample grid rows in parallel.

use crate::{Error, Result};
use glam::Vec2;
use rayon::prelude::*;
use std::f64::consts::TAU;

/// Largest accepted grid side; the sampled field holds `N²` values
pub const MAX_GRID_SIZE: usize = 4096;

/// Parameters of the sampled field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldConfig {
    /// Number of samples along each axis (N)
    pub grid_size: usize,
    /// Number of superimposed plane waves (S)
    pub waves: usize,
    /// Distance between neighbouring samples in field units
    pub spacing: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            grid_size: 512,
            waves: 5,
            spacing: 0.4,
        }
    }
}

impl FieldConfig {
    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn with_waves(mut self, waves: usize) -> Self {
        self.waves = waves;
        self
    }

    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Grid index of the cell that is always kept.
    ///
    /// Only an even grid has a cell at the field origin; odd grids force none.
    pub fn center(&self) -> Option<usize> {
        (self.grid_size % 2 == 0).then_some(self.grid_size / 2)
    }

    pub fn validate(&self) -> Result<()> {
        if !(3..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(Error::InvalidParameter(format!(
                "grid size must be between 3 and {MAX_GRID_SIZE}, got {}",
                self.grid_size
            )));
        }
        if self.waves == 0 {
            return Err(Error::InvalidParameter(
                "field needs at least one wave".to_string(),
            ));
        }
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "spacing must be positive and finite, got {}",
                self.spacing
            )));
        }
        Ok(())
    }

    /// Unit direction of every wave
    fn directions(&self) -> Vec<(f64, f64)> {
        (0..self.waves)
            .map(|s| {
                let theta = TAU * s as f64 / self.waves as f64;
                (theta.cos(), theta.sin())
            })
            .collect()
    }
}

/// Evaluate the field at grid cell `(i, j)`
pub fn field_value(config: &FieldConfig, i: usize, j: usize) -> f64 {
    let half = config.grid_size as f64 / 2.0;
    let x = config.spacing * (i as f64 - half);
    let y = config.spacing * (j as f64 - half);
    config
        .directions()
        .iter()
        .map(|(c, s)| (x * c + y * s).sin())
        .sum()
}

/// The field sampled on a square grid, stored row-major by `i`
#[derive(Debug, Clone)]
pub struct ScalarField {
    size: usize,
    values: Vec<f64>,
}

impl ScalarField {
    /// Sample the field described by `config`
    pub fn sample(config: &FieldConfig) -> Result<Self> {
        config.validate()?;

        let n = config.grid_size;
        let half = n as f64 / 2.0;
        let directions = config.directions();
        let mut values = vec![0.0; n * n];

        values.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
            let x = config.spacing * (i as f64 - half);
            for (j, value) in row.iter_mut().enumerate() {
                let y = config.spacing * (j as f64 - half);
                *value = directions.iter().map(|(c, s)| (x * c + y * s).sin()).sum();
            }
        });

        Ok(Self { size: n, values })
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    /// Whether interior cell `(i, j)` is at least as large as all 8 neighbours.
    ///
    /// Ties count as maxima, so a plateau yields every cell on it.
    pub fn is_local_max(&self, i: usize, j: usize) -> bool {
        let v = self.get(i, j);
        let mut m = v;
        for ni in i - 1..=i + 1 {
            for nj in j - 1..=j + 1 {
                m = m.max(self.get(ni, nj));
            }
        }
        v >= m
    }

    /// Grid-local coordinates of every kept cell.
    ///
    /// Border cells are never considered. The `center` cell, if any, is
    /// always kept.
    pub fn local_maxima(&self, center: Option<usize>) -> Vec<Vec2> {
        let n = self.size;
        let mut points = Vec::new();
        for i in 1..n - 1 {
            for j in 1..n - 1 {
                if self.is_local_max(i, j) || center.is_some_and(|c| i == c && j == c) {
                    points.push(grid_to_local(i, j, n));
                }
            }
        }
        points
    }
}

/// Map a grid index to `[-0.5, 0.5)²`
pub fn grid_to_local(i: usize, j: usize, n: usize) -> Vec2 {
    Vec2::new(
        (i as f64 / n as f64 - 0.5) as f32,
        (j as f64 / n as f64 - 0.5) as f32,
    )
}

/// Sample the field and return its local maxima
pub fn extract_points(config: &FieldConfig) -> Result<Vec<Vec2>> {
    let field = ScalarField::sample(config)?;
    Ok(field.local_maxima(config.center()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn small() -> FieldConfig {
        FieldConfig::default().with_grid_size(64)
    }

    #[test]
    fn test_sample_matches_field_value() {
        let config = small();
        let field = ScalarField::sample(&config).unwrap();
        for (i, j) in [(0, 0), (5, 17), (32, 32), (63, 1)] {
            assert_relative_eq!(field.get(i, j), field_value(&config, i, j), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_center_value_is_zero() {
        // Every wave is sin(0) at the origin
        let config = small();
        assert_relative_eq!(field_value(&config, 32, 32), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let config = small();
        let a = extract_points(&config).unwrap();
        let b = extract_points(&config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_center_always_kept() {
        let config = small();
        let points = extract_points(&config).unwrap();
        let center = grid_to_local(32, 32, 64);
        assert!(points.contains(&center));
        assert_eq!(center, Vec2::ZERO);
    }

    #[test]
    fn test_kept_points_are_local_maxima() {
        let config = small();
        let n = config.grid_size;
        let mut expected = Vec::new();
        for i in 1..n - 1 {
            for j in 1..n - 1 {
                let v = field_value(&config, i, j);
                let is_max = (i - 1..=i + 1)
                    .flat_map(|ni| (j - 1..=j + 1).map(move |nj| (ni, nj)))
                    .all(|(ni, nj)| v >= field_value(&config, ni, nj));
                if is_max || (i == 32 && j == 32) {
                    expected.push(grid_to_local(i, j, n));
                }
            }
        }
        assert_eq!(extract_points(&config).unwrap(), expected);
    }

    #[test]
    fn test_points_inside_unit_square() {
        let points = extract_points(&small()).unwrap();
        assert!(points.len() > 1);
        for p in points {
            assert!(p.x > -0.5 && p.x < 0.5);
            assert!(p.y > -0.5 && p.y < 0.5);
        }
    }

    #[test]
    fn test_plateau_keeps_every_interior_cell() {
        let field = ScalarField {
            size: 4,
            values: vec![1.0; 16],
        };
        assert_eq!(field.local_maxima(None).len(), 4);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(extract_points(&FieldConfig::default().with_grid_size(2)).is_err());
        assert!(
            extract_points(&FieldConfig::default().with_grid_size(MAX_GRID_SIZE + 1)).is_err()
        );
        assert!(extract_points(&FieldConfig::default().with_waves(0)).is_err());
        assert!(extract_points(&FieldConfig::default().with_spacing(0.0)).is_err());
        assert!(extract_points(&FieldConfig::default().with_spacing(f64::NAN)).is_err());
    }

    #[test]
    fn test_odd_grid_forces_no_center() {
        let config = FieldConfig::default().with_grid_size(65);
        assert_eq!(config.center(), None);
        assert_eq!(small().center(), Some(32));

        // (32, 32) sits off the field origin and is not a maximum there
        let field = ScalarField::sample(&config).unwrap();
        assert!(!field.is_local_max(32, 32));
        let points = extract_points(&config).unwrap();
        assert!(!points.contains(&grid_to_local(32, 32, 65)));
    }
}
