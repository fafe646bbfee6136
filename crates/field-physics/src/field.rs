//! Grid sampling for field overlays
//!
//! Samples are taken at cell centres, row by row (y outer, x inner), and are
//! recomputed from scratch each time an overlay is requested.

use crate::constants::GLYPH_PLANE_THRESHOLD;
use glam::{DVec2, DVec3};
use thiserror::Error;

/// Upper bound on samples per request, keeps a bad grid from allocating gigabytes
pub const MAX_GRID_POINTS: usize = 4_000_000;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("cell size must be finite and positive, got {0}")]
    CellSize(f64),

    #[error("grid extent must be finite and non-negative, got {width}x{height}")]
    Extent { width: f64, height: f64 },

    #[error("grid origin must be finite, got ({x}, {y})")]
    Origin { x: f64, y: f64 },

    #[error("grid has {points} points, limit is {}", MAX_GRID_POINTS)]
    TooLarge { points: usize },
}

/// Rectangular sampling region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub origin_x: f64,
    pub origin_y: f64,
    pub width: f64,
    pub height: f64,
    pub cell_size: f64,
}

impl GridSpec {
    pub fn new(origin_x: f64, origin_y: f64, width: f64, height: f64, cell_size: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            width,
            height,
            cell_size,
        }
    }

    pub fn validate(&self) -> Result<(), GridError> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(GridError::CellSize(self.cell_size));
        }
        if !self.width.is_finite() || !self.height.is_finite() || self.width < 0.0 || self.height < 0.0
        {
            return Err(GridError::Extent {
                width: self.width,
                height: self.height,
            });
        }
        if !self.origin_x.is_finite() || !self.origin_y.is_finite() {
            return Err(GridError::Origin {
                x: self.origin_x,
                y: self.origin_y,
            });
        }

        let cols = (self.width / self.cell_size).floor();
        let rows = (self.height / self.cell_size).floor();
        if cols * rows > MAX_GRID_POINTS as f64 {
            return Err(GridError::TooLarge {
                points: (cols * rows).min(usize::MAX as f64) as usize,
            });
        }
        Ok(())
    }

    /// Whole cells along x
    pub fn columns(&self) -> usize {
        (self.width / self.cell_size).floor() as usize
    }

    /// Whole cells along y
    pub fn rows(&self) -> usize {
        (self.height / self.cell_size).floor() as usize
    }

    pub fn len(&self) -> usize {
        self.columns().saturating_mul(self.rows())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Centre of cell (`col`, `row`)
    pub fn point(&self, col: usize, row: usize) -> DVec2 {
        DVec2::new(
            self.origin_x + (col as f64 + 0.5) * self.cell_size,
            self.origin_y + (row as f64 + 0.5) * self.cell_size,
        )
    }

    /// Cell centres in row-major order
    pub fn points(&self) -> impl Iterator<Item = DVec2> + '_ {
        let cols = self.columns();
        (0..self.rows()).flat_map(move |row| (0..cols).map(move |col| self.point(col, row)))
    }

    /// Index of the cell containing `p`, if any
    pub fn cell_index(&self, p: DVec2) -> Option<usize> {
        let fx = ((p.x - self.origin_x) / self.cell_size).floor();
        let fy = ((p.y - self.origin_y) / self.cell_size).floor();
        if fx < 0.0 || fy < 0.0 || !fx.is_finite() || !fy.is_finite() {
            return None;
        }
        let (col, row) = (fx as usize, fy as usize);
        if col >= self.columns() || row >= self.rows() {
            return None;
        }
        Some(row * self.columns() + col)
    }
}

/// How an overlay renderer should draw a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    /// Zero field, draw nothing
    None,
    /// Mostly in-plane, draw an arrow along `direction.xy`
    Arrow,
    /// Pointing away from the viewer (cross)
    IntoPlane,
    /// Pointing toward the viewer (dot)
    OutOfPlane,
}

impl Glyph {
    /// Classify a unit direction; `+z` points toward the viewer
    pub fn classify(direction: DVec3) -> Self {
        if direction == DVec3::ZERO {
            Glyph::None
        } else if direction.z.abs() < GLYPH_PLANE_THRESHOLD {
            Glyph::Arrow
        } else if direction.z > 0.0 {
            Glyph::OutOfPlane
        } else {
            Glyph::IntoPlane
        }
    }
}

/// One overlay sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSample {
    pub x: f64,
    pub y: f64,
    /// Unit vector, or zero when `magnitude` is zero
    pub direction: DVec3,
    pub magnitude: f64,
    pub glyph: Glyph,
}

impl FieldSample {
    pub fn from_vector(point: DVec2, v: DVec3) -> Self {
        let magnitude = v.length();
        let direction = if magnitude > 0.0 && magnitude.is_finite() {
            v / magnitude
        } else {
            DVec3::ZERO
        };
        let magnitude = if direction == DVec3::ZERO { 0.0 } else { magnitude };

        Self {
            x: point.x,
            y: point.y,
            direction,
            magnitude,
            glyph: Glyph::classify(direction),
        }
    }

    pub fn zero(point: DVec2) -> Self {
        Self::from_vector(point, DVec3::ZERO)
    }

    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}
