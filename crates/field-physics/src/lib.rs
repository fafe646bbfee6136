//! # Field Physics
//!
//! Pure data types and force laws for 2D pairwise field demos: point bodies
//! carrying a signed charge, the interaction laws acting between them, and the
//! grid samplers used for field overlays (force fields, spin textures and wave
//! intensity maps).

pub mod body;
pub mod constants;
pub mod field;
pub mod forces;
pub mod texture;
pub mod wave;
pub mod zone;

pub use body::*;
pub use constants::*;
pub use field::*;
pub use forces::*;
pub use texture::*;
pub use wave::*;
pub use zone::*;
