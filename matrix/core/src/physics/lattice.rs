//! Spring Lattice
//!
//! A grid of unit masses, each tied to its four neighbours (and to a fixed
//! zero at the edges) by linearised springs. A pointer attractor pushes the
//! masses near it, and the resulting ripples are what the view samples.

use super::PhysicsField;

/// Tunables for the lattice
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatticeParams {
    /// Spring constant
    pub stiffness: f64,
    /// Rest length as a fraction of lattice spacing
    pub rest_fraction: f64,
    pub mass: f64,
    pub damping: f64,
    pub max_force: f64,
    pub attractor_force: f64,
    /// Chebyshev radius of the attractor, in lattice cells
    pub attractor_radius: f64,
    /// Seconds per step
    pub time_step: f64,
    /// Steps the attractor stays on after `initialize`
    pub initial_pulse_steps: u32,
}

impl Default for LatticeParams {
    fn default() -> Self {
        Self {
            stiffness: 1500.0,
            rest_fraction: 0.9,
            mass: 0.8,
            damping: 0.5,
            max_force: 1000.0,
            attractor_force: 100.0,
            attractor_radius: 2.0,
            time_step: 1.0 / 20.0,
            initial_pulse_steps: 6,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SpringLattice {
    params: LatticeParams,
    rows: usize,
    columns: usize,
    positions: Vec<f64>,
    velocities: Vec<f64>,
    attractor: Option<(f64, f64)>,
    pulse_remaining: u32,
}

impl SpringLattice {
    pub fn new(params: LatticeParams) -> Self {
        Self {
            params,
            rows: 0,
            columns: 0,
            positions: Vec::new(),
            velocities: Vec::new(),
            attractor: None,
            pulse_remaining: 0,
        }
    }

    /// Tile the lattice and give it a short kick from the centre
    pub fn initialize(&mut self, pixel_width: f64, pixel_height: f64, particles: usize) {
        self.resize(pixel_width, pixel_height, particles);
        self.attractor = Some((0.5, 0.5));
        self.pulse_remaining = self.params.initial_pulse_steps;
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Displacement of the mass at `(row, column)`
    pub fn position(&self, row: usize, column: usize) -> Option<f64> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.positions.get(row * self.columns + column).copied()
    }

    fn spring_force(&self, delta: f64) -> f64 {
        self.params.stiffness * delta * (1.0 - self.params.rest_fraction)
    }

    fn attractor_force(&self, row: usize, column: usize) -> f64 {
        let Some((ax, ay)) = self.attractor else {
            return 0.0;
        };
        let aj = ax * self.columns as f64;
        let ai = ay * self.rows as f64;
        let distance = (column as f64 - aj).abs().max((row as f64 - ai).abs());
        let radius = self.params.attractor_radius;
        if radius > 0.0 && distance <= radius {
            (self.params.attractor_force * (1.0 - distance / radius)).max(0.0)
        } else {
            0.0
        }
    }
}

impl Default for SpringLattice {
    fn default() -> Self {
        Self::new(LatticeParams::default())
    }
}

impl PhysicsField for SpringLattice {
    fn sample(&self, nx: f64, ny: f64) -> f64 {
        let i = (ny * self.rows as f64).floor();
        let j = (nx * self.columns as f64).floor();
        if i < 0.0 || j < 0.0 {
            return 0.0;
        }
        self.position(i as usize, j as usize).unwrap_or(0.0)
    }

    fn resize(&mut self, pixel_width: f64, pixel_height: f64, particles: usize) {
        if pixel_width <= 0.0 || pixel_height <= 0.0 || particles == 0 {
            self.rows = 0;
            self.columns = 0;
            self.positions.clear();
            self.velocities.clear();
            return;
        }
        let columns = ((particles as f64 * (pixel_width / pixel_height)).sqrt().floor() as usize).max(1);
        let rows = particles / columns;
        tracing::debug!(rows, columns, "Re-tiling spring lattice");
        self.columns = columns;
        self.rows = rows;
        self.positions = vec![0.0; rows * columns];
        self.velocities = vec![0.0; rows * columns];
    }

    fn step(&mut self) {
        let dt = self.params.time_step;
        let (rows, columns) = (self.rows, self.columns);
        let attractor_on = self.attractor.is_some();

        for i in 0..rows {
            for j in 0..columns {
                let idx = i * columns + j;
                let here = self.positions[idx];
                let neighbour = |ni: Option<usize>, nj: Option<usize>| match (ni, nj) {
                    (Some(ni), Some(nj)) if ni < rows && nj < columns => {
                        self.positions[ni * columns + nj]
                    }
                    _ => 0.0,
                };

                let mut force = self.spring_force(neighbour(i.checked_sub(1), Some(j)) - here)
                    + self.spring_force(neighbour(Some(i + 1), Some(j)) - here)
                    + self.spring_force(neighbour(Some(i), j.checked_sub(1)) - here)
                    + self.spring_force(neighbour(Some(i), Some(j + 1)) - here);

                force -= self.params.damping * self.velocities[idx];
                if attractor_on {
                    force += self.attractor_force(i, j);
                }
                force = force.clamp(-self.params.max_force, self.params.max_force);
                self.velocities[idx] += force / self.params.mass * dt;
            }
        }

        for (p, v) in self.positions.iter_mut().zip(&self.velocities) {
            *p += v * dt;
        }

        if self.pulse_remaining > 0 {
            self.pulse_remaining -= 1;
            if self.pulse_remaining == 0 {
                self.attractor = None;
            }
        }
    }

    fn set_attractor(&mut self, position: Option<(f64, f64)>) {
        self.pulse_remaining = 0;
        self.attractor = position;
    }
}
