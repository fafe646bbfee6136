//! Default constants for the field demos
//!
//! These are tuned for an 800x600 canvas measured in pixels, not for physical
//! units. Force constants were picked so a handful of bodies visibly interact
//! within a few hundred frames.

/// Coulomb-like field strength for the inverse-square attract/repel law
pub const K_FIELD: f64 = 1000.0;

/// Gravitational constant for the always-attractive law
/// Paired with masses around 1e4 for a central body
pub const G_ORBITAL: f64 = 0.1;

/// Minimum pair distance below which no force is evaluated
pub const EPSILON: f64 = 5.0;

/// Upper bound on the magnitude of a single pairwise force
pub const MAX_FORCE: f64 = 1.0e6;

/// Per-step velocity retention (1.0 = no drag)
pub const DAMPING: f64 = 1.0;

/// Downward acceleration used by demos that toggle gravity on
pub const GRAVITY_Y: f64 = 1.0;

/// Number of past positions kept per body when trails are enabled
pub const TRAIL_LENGTH: usize = 50;

/// Below this |z| a unit field direction is drawn as an in-plane arrow
pub const GLYPH_PLANE_THRESHOLD: f64 = 0.6;

/// Smallest effective mass a mass-modelling law will divide by
pub const MIN_EFFECTIVE_MASS: f64 = 1.0e-12;

// Overlay defaults
/// Arrow grid spacing for force-field overlays
pub const FIELD_CELL_SIZE: f64 = 40.0;

/// Grid spacing for spin-texture overlays
pub const TEXTURE_CELL_SIZE: f64 = 20.0;

/// Default skyrmion radius
pub const SKYRMION_RADIUS: f64 = 80.0;

/// Default double-slit wavelength
pub const WAVELENGTH: f64 = 40.0;

/// Amplitude falloff behind the slits
pub const WAVE_DAMPING: f64 = 0.002;
