//! Pairwise interaction laws
//!
//! Every law is evaluated once per unordered pair. The caller applies the
//! returned force to the first body and its negation to the second, so equal
//! and opposite forces hold by construction.

use crate::body::Body;
use glam::DVec2;

/// Pairwise force rule shared by all bodies in one simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionLaw {
    /// F = k * qa * qb / r², like charges repel and opposite charges attract
    #[default]
    InverseSquare,
    /// F = k * |ma| * |mb| / r², always attractive (gravity)
    Attractive,
    /// No pairwise force, bodies only feel global acceleration and zones
    None,
}

impl InteractionLaw {
    /// Whether `charge` doubles as inertial mass under this law
    pub fn models_mass(&self) -> bool {
        matches!(self, InteractionLaw::Attractive)
    }

    /// Inertia used when turning net force into acceleration
    pub fn effective_mass(&self, charge: f64) -> f64 {
        if self.models_mass() {
            charge.abs()
        } else {
            1.0
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            InteractionLaw::InverseSquare => "inverse-square",
            InteractionLaw::Attractive => "attractive",
            InteractionLaw::None => "none",
        }
    }
}

/// Clamp a signed magnitude to `[-max, max]`, mapping NaN (e.g. `inf * 0`) to zero
fn capped(magnitude: f64, max: f64) -> f64 {
    if magnitude.is_nan() {
        0.0
    } else {
        magnitude.clamp(-max, max)
    }
}

/// Force on `a` due to `b`
///
/// Returns `None` when the pair is skipped: separation below `epsilon`, a
/// non-finite separation, or a law with no pairwise term. The magnitude is
/// capped at `max_force`.
pub fn pair_force(
    law: InteractionLaw,
    k: f64,
    a: &Body,
    b: &Body,
    epsilon: f64,
    max_force: f64,
) -> Option<DVec2> {
    // Signed magnitude along the unit vector from a to b (positive = attract)
    let coupling = match law {
        InteractionLaw::InverseSquare => -k * a.charge * b.charge,
        InteractionLaw::Attractive => k * a.charge.abs() * b.charge.abs(),
        InteractionLaw::None => return None,
    };

    let d = b.position - a.position;
    let r2 = d.length_squared();
    if !r2.is_finite() {
        return None;
    }
    let r = r2.sqrt();
    // Singularity guard
    if r < epsilon || r == 0.0 {
        return None;
    }

    let magnitude = capped(coupling / r2, max_force);
    Some(d * (magnitude / r))
}

/// Superposed field at `point`: the force a unit test charge (or unit test
/// mass) would feel there
///
/// Bodies closer than `epsilon` to the point are skipped. Each contribution is
/// capped at `max_field`.
pub fn field_at<'a, I>(
    law: InteractionLaw,
    k: f64,
    point: DVec2,
    bodies: I,
    epsilon: f64,
    max_field: f64,
) -> DVec2
where
    I: IntoIterator<Item = &'a Body>,
{
    if law == InteractionLaw::None {
        return DVec2::ZERO;
    }

    let mut field = DVec2::ZERO;
    for body in bodies {
        // Positive toward the body
        let coupling = match law {
            InteractionLaw::InverseSquare => -k * body.charge,
            InteractionLaw::Attractive => k * body.charge.abs(),
            InteractionLaw::None => 0.0,
        };

        let d = body.position - point;
        let r2 = d.length_squared();
        if !r2.is_finite() {
            continue;
        }
        let r = r2.sqrt();
        if r < epsilon || r == 0.0 {
            continue;
        }

        let magnitude = capped(coupling / r2, max_field);
        field += d * (magnitude / r);
    }
    field
}

/// Tangential velocity that puts a body at `offset` from a central mass on a
/// circular orbit
///
/// `offset` is the orbiting body's position minus the centre's. The result is
/// scaled by `speed_multiplier`; values above 1 give escaping, elongated paths.
pub fn circular_orbit_velocity(
    k: f64,
    central_mass: f64,
    offset: DVec2,
    speed_multiplier: f64,
) -> DVec2 {
    let distance = offset.length();
    if distance == 0.0 || !distance.is_finite() {
        return DVec2::ZERO;
    }

    // Perpendicular to the direction back toward the centre
    let dir = (-offset / distance).perp();
    let speed = (k * central_mass.abs() / distance).sqrt() * speed_multiplier;
    if speed.is_finite() {
        dir * speed
    } else {
        DVec2::ZERO
    }
}
