//! Physics Field
//!
//! The view perturbs glyph choice with a scalar field sampled per cell. The
//! field runs at its own cadence; the view only reads the current state.

mod lattice;

pub use lattice::{LatticeParams, SpringLattice};

/// A scalar field sampled at normalized grid coordinates
pub trait PhysicsField {
    /// Displacement at `(nx, ny)`, both in `[0, 1]`
    ///
    /// Signed and unbounded, practically small.
    fn sample(&self, nx: f64, ny: f64) -> f64;

    /// Re-tile for a new pixel size and particle budget
    fn resize(&mut self, pixel_width: f64, pixel_height: f64, particles: usize);

    /// Advance one fixed time step
    fn step(&mut self);

    /// Pull the field toward a normalized point, or release it
    fn set_attractor(&mut self, position: Option<(f64, f64)>);
}

/// A field that is flat everywhere
#[derive(Clone, Copy, Debug, Default)]
pub struct StillField;

impl PhysicsField for StillField {
    fn sample(&self, _nx: f64, _ny: f64) -> f64 {
        0.0
    }

    fn resize(&mut self, _pixel_width: f64, _pixel_height: f64, _particles: usize) {}

    fn step(&mut self) {}

    fn set_attractor(&mut self, _position: Option<(f64, f64)>) {}
}
