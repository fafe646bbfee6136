//! Simulation parameters for runtime tuning

use crate::error::{SimulationError, SimulationResult};
use field_physics::{
    InteractionLaw, DAMPING, EPSILON, G_ORBITAL, GRAVITY_Y, K_FIELD, MAX_FORCE, TRAIL_LENGTH,
};
use glam::DVec2;

/// Longest trail a caller may request
pub const MAX_TRAIL_LENGTH: usize = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    // Force law
    pub law: InteractionLaw,
    pub law_constant: f64,
    /// Uniform acceleration applied to every mobile body (e.g. downward gravity)
    pub global_acceleration: DVec2,

    // Numerical guards
    /// Pairs closer than this are skipped
    pub epsilon: f64,
    /// Cap on a single pairwise force
    pub max_force: f64,

    // Integration
    /// Velocity multiplier per step, 1.0 = no drag
    pub damping: f64,
    /// Keep mobile bodies at least `r_a + r_b` from other bodies
    pub clamp_contacts: bool,

    // Overlay
    /// Positions kept per body, 0 disables trails
    pub trail_length: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            law: InteractionLaw::InverseSquare,
            law_constant: K_FIELD,
            global_acceleration: DVec2::ZERO,
            epsilon: EPSILON,
            max_force: MAX_FORCE,
            damping: DAMPING,
            clamp_contacts: true,
            trail_length: 0,
        }
    }
}

impl SimulationConfig {
    /// Static charges, field overlay only
    pub fn electric() -> Self {
        Self::default()
    }

    /// Mobile polarities with light air drag
    pub fn magnetic() -> Self {
        Self {
            law_constant: 500.0,
            damping: 0.99,
            ..Self::default()
        }
    }

    /// Central mass with orbiting bodies, trails on
    pub fn orbital() -> Self {
        Self {
            law: InteractionLaw::Attractive,
            law_constant: G_ORBITAL,
            trail_length: TRAIL_LENGTH,
            ..Self::default()
        }
    }

    /// No pairwise force, falling bodies
    pub fn kinematic() -> Self {
        Self {
            law: InteractionLaw::None,
            global_acceleration: DVec2::new(0.0, GRAVITY_Y),
            ..Self::default()
        }
    }

    pub fn with_law(mut self, law: InteractionLaw) -> Self {
        self.law = law;
        self
    }

    pub fn with_law_constant(mut self, k: f64) -> Self {
        self.law_constant = k;
        self
    }

    pub fn with_global_acceleration(mut self, acceleration: DVec2) -> Self {
        self.global_acceleration = acceleration;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_max_force(mut self, max_force: f64) -> Self {
        self.max_force = max_force;
        self
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_clamp_contacts(mut self, clamp: bool) -> Self {
        self.clamp_contacts = clamp;
        self
    }

    pub fn with_trail_length(mut self, length: usize) -> Self {
        self.trail_length = length;
        self
    }

    /// Check every field with the same rules as [`Parameter::validate`]
    pub fn validate(&self) -> SimulationResult<()> {
        for p in self.parameters() {
            p.validate()?;
        }
        Ok(())
    }

    /// Current values as parameters
    pub fn parameters(&self) -> [Parameter; 8] {
        [
            Parameter::Law(self.law),
            Parameter::LawConstant(self.law_constant),
            Parameter::GlobalAcceleration(self.global_acceleration),
            Parameter::Epsilon(self.epsilon),
            Parameter::MaxForce(self.max_force),
            Parameter::Damping(self.damping),
            Parameter::ClampContacts(self.clamp_contacts),
            Parameter::TrailLength(self.trail_length),
        ]
    }

    /// Validate then apply; on error the config is unchanged
    pub fn apply(&mut self, parameter: Parameter) -> SimulationResult<()> {
        parameter.validate()?;
        match parameter {
            Parameter::Law(law) => self.law = law,
            Parameter::LawConstant(k) => self.law_constant = k,
            Parameter::GlobalAcceleration(a) => self.global_acceleration = a,
            Parameter::Epsilon(e) => self.epsilon = e,
            Parameter::MaxForce(f) => self.max_force = f,
            Parameter::Damping(d) => self.damping = d,
            Parameter::ClampContacts(c) => self.clamp_contacts = c,
            Parameter::TrailLength(n) => self.trail_length = n,
        }
        Ok(())
    }
}

/// A single runtime-editable setting
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parameter {
    Law(InteractionLaw),
    /// Field strength / gravitational constant. Negative flips attract and repel.
    LawConstant(f64),
    GlobalAcceleration(DVec2),
    Epsilon(f64),
    MaxForce(f64),
    Damping(f64),
    ClampContacts(bool),
    TrailLength(usize),
}

impl Parameter {
    pub fn name(&self) -> &'static str {
        match self {
            Parameter::Law(_) => "law",
            Parameter::LawConstant(_) => "law_constant",
            Parameter::GlobalAcceleration(_) => "global_acceleration",
            Parameter::Epsilon(_) => "epsilon",
            Parameter::MaxForce(_) => "max_force",
            Parameter::Damping(_) => "damping",
            Parameter::ClampContacts(_) => "clamp_contacts",
            Parameter::TrailLength(_) => "trail_length",
        }
    }

    pub fn validate(&self) -> SimulationResult<()> {
        let name = self.name();
        match *self {
            Parameter::Law(_) | Parameter::ClampContacts(_) => Ok(()),
            Parameter::LawConstant(k) => finite(name, k),
            Parameter::GlobalAcceleration(a) => {
                finite(name, a.x)?;
                finite(name, a.y)
            }
            Parameter::Epsilon(v) | Parameter::MaxForce(v) => {
                finite(name, v)?;
                if v <= 0.0 {
                    return Err(SimulationError::invalid(name, v, "must be positive"));
                }
                Ok(())
            }
            Parameter::Damping(d) => {
                finite(name, d)?;
                if !(0.0..=1.0).contains(&d) {
                    return Err(SimulationError::invalid(name, d, "must be within [0, 1]"));
                }
                Ok(())
            }
            Parameter::TrailLength(n) => {
                if n > MAX_TRAIL_LENGTH {
                    return Err(SimulationError::invalid(
                        name,
                        n as f64,
                        "exceeds maximum trail length",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Map a slider name and value to a parameter
    ///
    /// `gravity_x`/`gravity_y` edit one component of the global acceleration
    /// and keep the other from `current`. `law` takes 0 (inverse-square),
    /// 1 (attractive) or 2 (none).
    pub fn from_name(name: &str, value: f64, current: &SimulationConfig) -> SimulationResult<Self> {
        let parameter = match name {
            "law" => {
                let law = match value {
                    v if v == 0.0 => InteractionLaw::InverseSquare,
                    v if v == 1.0 => InteractionLaw::Attractive,
                    v if v == 2.0 => InteractionLaw::None,
                    v => return Err(SimulationError::invalid("law", v, "expected 0, 1 or 2")),
                };
                Parameter::Law(law)
            }
            "law_constant" | "field_strength" | "gravity_constant" => Parameter::LawConstant(value),
            "gravity_x" => Parameter::GlobalAcceleration(DVec2::new(
                value,
                current.global_acceleration.y,
            )),
            "gravity_y" => Parameter::GlobalAcceleration(DVec2::new(
                current.global_acceleration.x,
                value,
            )),
            "epsilon" => Parameter::Epsilon(value),
            "max_force" => Parameter::MaxForce(value),
            "damping" => Parameter::Damping(value),
            "clamp_contacts" => {
                finite("clamp_contacts", value)?;
                Parameter::ClampContacts(value != 0.0)
            }
            "trail_length" => {
                finite("trail_length", value)?;
                if value < 0.0 {
                    return Err(SimulationError::invalid(
                        "trail_length",
                        value,
                        "must not be negative",
                    ));
                }
                if value > MAX_TRAIL_LENGTH as f64 {
                    return Err(SimulationError::invalid(
                        "trail_length",
                        value,
                        "exceeds maximum trail length",
                    ));
                }
                Parameter::TrailLength(value.floor() as usize)
            }
            other => return Err(SimulationError::UnknownParameter(other.to_string())),
        };
        parameter.validate()?;
        Ok(parameter)
    }
}

fn finite(name: &'static str, value: f64) -> SimulationResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimulationError::invalid(name, value, "must be finite"))
    }
}
