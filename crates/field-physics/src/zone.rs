//! Rectangular gradient-field regions
//!
//! Models the magnet gap of a Stern–Gerlach apparatus: inside the rectangle a
//! body is pushed along y in proportion to its charge and its offset from an
//! anchor line, so opposite polarities split into two beams.

use crate::body::Body;
use glam::DVec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceZone {
    pub min: DVec2,
    pub max: DVec2,
    pub anchor_y: f64,
    pub strength: f64,
}

impl ForceZone {
    pub fn new(min: DVec2, max: DVec2, anchor_y: f64, strength: f64) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
            anchor_y,
            strength,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.anchor_y.is_finite()
            && self.strength.is_finite()
    }

    /// Strictly inside, edges excluded
    pub fn contains(&self, p: DVec2) -> bool {
        p.x > self.min.x && p.x < self.max.x && p.y > self.min.y && p.y < self.max.y
    }

    /// Force on `body`, zero outside the zone
    pub fn force_on(&self, body: &Body) -> DVec2 {
        if !self.contains(body.position) {
            return DVec2::ZERO;
        }
        let fy = -self.strength * body.charge * (body.position.y - self.anchor_y);
        if fy.is_finite() {
            DVec2::new(0.0, fy)
        } else {
            DVec2::ZERO
        }
    }
}
