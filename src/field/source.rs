//! Versioned raw vector field

use crate::core::types::{Result, Vec3};
use crate::core::Error;
use crate::math::Grid;
use crate::sync::{ProducerId, VersionStamp, Versioned};

/// Three-component vector samples on a regular grid.
///
/// Writers either replace the samples wholesale with [`VectorField::set_samples`]
/// or edit them in place through [`VectorField::samples_mut`] and then call
/// [`VectorField::update_data`] so consumers notice the change.
#[derive(Debug)]
pub struct VectorField {
    grid: Grid,
    samples: Vec<Vec3>,
    version: u64,
    id: ProducerId,
}

impl VectorField {
    /// All-zero field
    pub fn zeros(grid: Grid) -> Self {
        Self {
            grid,
            samples: vec![Vec3::ZERO; grid.len()],
            version: 0,
            id: ProducerId::next(),
        }
    }

    /// Wrap existing samples; their count must match the grid
    pub fn from_samples(grid: Grid, samples: Vec<Vec3>) -> Result<Self> {
        check_len(&grid, samples.len())?;
        Ok(Self {
            grid,
            samples,
            version: 0,
            id: ProducerId::next(),
        })
    }

    /// Sample `f` at every cell center
    pub fn from_fn(grid: Grid, f: impl Fn(Vec3) -> Vec3) -> Self {
        let domain = grid.domain();
        let cell = domain.size() / grid.dims().as_vec3();
        let samples = (0..grid.len())
            .map(|i| {
                let c = grid.cell_coords(i).as_vec3();
                f(domain.min + (c + 0.5) * cell)
            })
            .collect();
        Self {
            grid,
            samples,
            version: 0,
            id: ProducerId::next(),
        }
    }

    /// Replace all samples and bump the version
    pub fn set_samples(&mut self, samples: Vec<Vec3>) -> Result<()> {
        check_len(&self.grid, samples.len())?;
        self.samples = samples;
        self.update_data();
        Ok(())
    }

    /// Mutable access for in-place edits; call [`VectorField::update_data`] afterwards
    pub fn samples_mut(&mut self) -> &mut [Vec3] {
        &mut self.samples
    }

    /// Mark the samples as changed
    pub fn update_data(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    pub fn samples(&self) -> &[Vec3] {
        &self.samples
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

impl Versioned for VectorField {
    fn version_stamp(&self) -> VersionStamp {
        VersionStamp { producer: self.id, version: self.version }
    }
}

fn check_len(grid: &Grid, actual: usize) -> Result<()> {
    if actual != grid.len() {
        return Err(Error::FieldSizeMismatch { expected: grid.len(), actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_samples_checks_length() {
        let grid = Grid::cube(2).unwrap();
        assert!(VectorField::from_samples(grid, vec![Vec3::X; 8]).is_ok());
        let err = VectorField::from_samples(grid, vec![Vec3::X; 7]).unwrap_err();
        assert!(matches!(err, Error::FieldSizeMismatch { expected: 8, actual: 7 }));
    }

    #[test]
    fn test_from_fn_samples_cell_centers() {
        let grid = Grid::cube(2).unwrap();
        let field = VectorField::from_fn(grid, |p| p);
        assert_eq!(field.samples()[0], Vec3::splat(0.25));
        assert_eq!(field.samples()[1], Vec3::new(0.75, 0.25, 0.25));
        assert_eq!(field.samples()[7], Vec3::splat(0.75));
    }

    #[test]
    fn test_versioning() {
        let grid = Grid::cube(2).unwrap();
        let mut field = VectorField::zeros(grid);
        assert_eq!(field.version(), 0);

        field.samples_mut()[3] = Vec3::Y;
        field.update_data();
        assert_eq!(field.version(), 1);

        field.set_samples(vec![Vec3::Z; 8]).unwrap();
        assert_eq!(field.version(), 2);

        assert!(field.set_samples(vec![Vec3::Z; 2]).is_err());
        assert_eq!(field.version(), 2);
    }
}
