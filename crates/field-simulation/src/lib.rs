//! # Field Simulation
//!
//! CPU pairwise field simulator: owns a set of point bodies, steps them under
//! a configurable interaction law and samples the resulting field on a grid
//! for overlay rendering. Rendering and frame scheduling belong to the caller.

pub mod error;
pub mod params;
pub mod simulation;
pub mod trail;

pub use error::*;
pub use params::*;
pub use simulation::*;
pub use trail::*;
