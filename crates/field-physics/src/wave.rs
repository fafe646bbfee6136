//! Double-slit wave interference
//!
//! A point source emits circular waves toward a barrier with two slits.
//! Behind the barrier each slit acts as a new, damped source and the two
//! wavelets interfere. `IntensityMap` integrates the squared amplitude over
//! frames, building up the fringe pattern a detector screen would record.

use crate::constants::{WAVELENGTH, WAVE_DAMPING};
use crate::field::{GridError, GridSpec};
use glam::DVec2;
use std::f64::consts::TAU;

#[derive(Debug, Clone, PartialEq)]
pub struct DoubleSlit {
    pub source: DVec2,
    pub barrier_x: f64,
    /// y coordinate midway between the slits
    pub center_y: f64,
    /// Centre-to-centre slit separation
    pub slit_gap: f64,
    pub wavelength: f64,
    /// Exponential falloff of the slit wavelets per unit distance
    pub damping: f64,
    /// Phase advance per unit time
    pub wave_speed: f64,
    /// Current phase `t` in `sin(k r - t)`
    pub phase: f64,
}

impl DoubleSlit {
    /// Layout for a `width` x `height` canvas, source on the left
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            source: DVec2::new(width / 8.0, height / 2.0),
            barrier_x: 3.0 * width / 8.0,
            center_y: height / 2.0,
            slit_gap: 80.0,
            wavelength: WAVELENGTH,
            damping: WAVE_DAMPING,
            wave_speed: 1.0,
            phase: 0.0,
        }
    }

    /// Zero for a non-positive or non-finite wavelength
    pub fn wavenumber(&self) -> f64 {
        if self.wavelength.is_finite() && self.wavelength > 0.0 {
            TAU / self.wavelength
        } else {
            0.0
        }
    }

    /// Centres of the two slits
    pub fn slits(&self) -> [DVec2; 2] {
        let half = self.slit_gap / 2.0;
        [
            DVec2::new(self.barrier_x, self.center_y - half),
            DVec2::new(self.barrier_x, self.center_y + half),
        ]
    }

    pub fn advance(&mut self, dt: f64) {
        let next = self.phase + self.wave_speed * dt;
        if next.is_finite() {
            self.phase = next;
        }
    }

    /// Instantaneous amplitude, roughly in `[-2, 2]`
    pub fn amplitude_at(&self, p: DVec2) -> f64 {
        let k = self.wavenumber();
        let amplitude = if p.x < self.barrier_x {
            let r = p.distance(self.source);
            (k * r - self.phase).sin() / (r + 1.0)
        } else {
            self.slits()
                .iter()
                .map(|slit| {
                    let r = p.distance(*slit);
                    (k * r - self.phase).sin() * (-self.damping * r).exp()
                })
                .sum()
        };
        if amplitude.is_finite() {
            amplitude
        } else {
            0.0
        }
    }

    /// Amplitude per cell centre, row-major
    pub fn sample_amplitude(&self, grid: &GridSpec) -> Result<Vec<f64>, GridError> {
        grid.validate()?;
        Ok(grid.points().map(|p| self.amplitude_at(p)).collect())
    }
}

/// Time-integrated intensity over a grid
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityMap {
    grid: GridSpec,
    values: Vec<f64>,
    frames: u64,
}

impl IntensityMap {
    pub fn new(grid: GridSpec) -> Result<Self, GridError> {
        grid.validate()?;
        Ok(Self {
            values: vec![0.0; grid.len()],
            grid,
            frames: 0,
        })
    }

    /// Add the squared amplitude of the current wave state to every cell
    pub fn accumulate(&mut self, wave: &DoubleSlit) {
        for (value, p) in self.values.iter_mut().zip(self.grid.points()) {
            let amp = wave.amplitude_at(p);
            *value += amp * amp;
        }
        self.frames += 1;
    }

    pub fn clear(&mut self) {
        self.values.fill(0.0);
        self.frames = 0;
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Values scaled into `[0, 1]`; all zero before the first frame
    pub fn normalized(&self) -> Vec<f64> {
        let max = self.max();
        if max > 0.0 {
            self.values.iter().map(|v| v / max).collect()
        } else {
            vec![0.0; self.values.len()]
        }
    }

    /// Intensity profile along the column nearest `x` (a detector screen)
    pub fn column(&self, x: f64) -> Vec<f64> {
        let cols = self.grid.columns();
        if cols == 0 {
            return Vec::new();
        }
        let col = ((x - self.grid.origin_x) / self.grid.cell_size)
            .floor()
            .clamp(0.0, (cols - 1) as f64) as usize;
        (0..self.grid.rows())
            .map(|row| self.values[row * cols + col])
            .collect()
    }
}
