//! Body types for pairwise field simulation

use bytemuck::{Pod, Zeroable};
use glam::DVec2;
use std::fmt;

/// Opaque body identifier, unique within one simulator instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub u64);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A point charge/mass taking part in the pairwise force sum
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub id: BodyId,
    pub position: DVec2,
    pub velocity: DVec2,
    /// Signed strength. Meaning depends on the active law: electric or
    /// magnetic polarity, or gravitational mass.
    pub charge: f64,
    /// Used for contact clamping and rendering only
    pub radius: f64,
    /// Immobile bodies still act on others but are never integrated
    pub mobile: bool,
}

impl Body {
    pub fn new(
        id: BodyId,
        position: DVec2,
        velocity: DVec2,
        charge: f64,
        radius: f64,
        mobile: bool,
    ) -> Self {
        Self {
            id,
            position,
            velocity,
            charge,
            radius,
            mobile,
        }
    }

    /// True when every real-valued field is finite
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.velocity.is_finite()
            && self.charge.is_finite()
            && self.radius.is_finite()
    }

    pub fn snapshot(&self) -> BodySnapshot {
        BodySnapshot {
            id: self.id.0,
            position: self.position.to_array(),
            velocity: self.velocity.to_array(),
        }
    }
}

/// Per-frame render record handed back to the driver
/// Plain-old-data so it can be uploaded to a vertex/storage buffer as is
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct BodySnapshot {
    pub id: u64,
    pub position: [f64; 2],
    pub velocity: [f64; 2],
}

impl BodySnapshot {
    pub fn id(&self) -> BodyId {
        BodyId(self.id)
    }

    pub fn position(&self) -> DVec2 {
        DVec2::from_array(self.position)
    }

    pub fn velocity(&self) -> DVec2 {
        DVec2::from_array(self.velocity)
    }
}
