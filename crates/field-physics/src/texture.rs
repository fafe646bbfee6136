//! Skyrmion spin textures
//!
//! A skyrmion is a whirl in a 2D magnetization field: spins point out of the
//! plane at the core, rotate through the plane with distance, and point back
//! into the plane at the rim. The texture is evaluated on the same grids as
//! force fields so an overlay renderer can draw both with one glyph set.

use crate::constants::{SKYRMION_RADIUS, TEXTURE_CELL_SIZE};
use crate::field::{FieldSample, GridError, GridSpec};
use glam::{DVec2, DVec3};
use std::f64::consts::PI;

/// Single skyrmion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Skyrmion {
    pub center: DVec2,
    pub radius: f64,
    /// +1 core out of plane, -1 core into plane
    pub polarity: f64,
    /// In-plane rotation of the spins (0 = Néel, ±π/2 = Bloch)
    pub helicity: f64,
}

impl Skyrmion {
    pub fn new(center: DVec2) -> Self {
        Self {
            center,
            radius: SKYRMION_RADIUS,
            polarity: 1.0,
            helicity: 0.0,
        }
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_polarity(mut self, polarity: f64) -> Self {
        self.polarity = polarity;
        self
    }

    pub fn with_helicity(mut self, helicity: f64) -> Self {
        self.helicity = helicity;
        self
    }

    /// Spin contribution at `point`, `None` outside the radius
    pub fn spin_at(&self, point: DVec2) -> Option<DVec3> {
        let d = point - self.center;
        let r = d.length();
        if !(r <= self.radius) || self.radius <= 0.0 {
            return None;
        }

        let theta = d.y.atan2(d.x);
        let phase = PI * r / self.radius;
        let radial = phase.sin();

        Some(DVec3::new(
            radial * (theta + self.helicity).cos(),
            radial * (theta + self.helicity).sin(),
            self.polarity * phase.cos(),
        ))
    }
}

/// Collection of skyrmions on a uniform `+z` background, drifting together
/// under an applied current
#[derive(Debug, Clone, PartialEq)]
pub struct SpinTexture {
    pub skyrmions: Vec<Skyrmion>,
    /// Translation per unit time
    pub drift: DVec2,
    pub background: DVec3,
}

impl Default for SpinTexture {
    fn default() -> Self {
        Self {
            skyrmions: Vec::new(),
            drift: DVec2::new(0.5, 0.0),
            background: DVec3::Z,
        }
    }
}

impl SpinTexture {
    pub fn new() -> Self {
        Self::default()
    }

    /// One skyrmion at `center`
    pub fn single(center: DVec2) -> Self {
        let mut texture = Self::default();
        texture.add(Skyrmion::new(center));
        texture
    }

    /// Two same-polarity skyrmions at a third and two thirds of `width`
    pub fn pair(width: f64, height: f64) -> Self {
        let mut texture = Self::default();
        texture.add(Skyrmion::new(DVec2::new(width / 3.0, height / 2.0)));
        texture.add(Skyrmion::new(DVec2::new(2.0 * width / 3.0, height / 2.0)));
        texture
    }

    pub fn with_drift(mut self, drift: DVec2) -> Self {
        self.drift = drift;
        self
    }

    pub fn add(&mut self, skyrmion: Skyrmion) {
        self.skyrmions.push(skyrmion);
    }

    pub fn clear(&mut self) {
        self.skyrmions.clear();
    }

    pub fn len(&self) -> usize {
        self.skyrmions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skyrmions.is_empty()
    }

    /// Move every skyrmion by `drift * dt`
    pub fn advance(&mut self, dt: f64) {
        let shift = self.drift * dt;
        if !shift.is_finite() {
            return;
        }
        for s in &mut self.skyrmions {
            s.center += shift;
        }
    }

    /// Superposed spin at `point`, `None` where no skyrmion reaches
    pub fn spin_at(&self, point: DVec2) -> Option<DVec3> {
        let mut spin = self.background;
        let mut covered = false;
        for s in &self.skyrmions {
            if let Some(v) = s.spin_at(point) {
                spin += v;
                covered = true;
            }
        }
        covered.then_some(spin)
    }

    pub fn sample_field(&self, grid: &GridSpec) -> Result<Vec<FieldSample>, GridError> {
        grid.validate()?;
        Ok(grid
            .points()
            .map(|p| match self.spin_at(p) {
                Some(spin) => FieldSample::from_vector(p, spin),
                None => FieldSample::zero(p),
            })
            .collect())
    }

    /// Default overlay grid for a canvas of the given size
    pub fn default_grid(width: f64, height: f64) -> GridSpec {
        GridSpec::new(0.0, 0.0, width, height, TEXTURE_CELL_SIZE)
    }
}
