//! Common structs and math used by smear's kernels and renderer.

mod parity;
mod params;
mod reprojection;

pub use self::parity::*;
pub use self::params::*;
pub use self::reprojection::*;

/// Size of a compute workgroup; every kernel uses 8x8 warps.
pub const WORKGROUP_SIZE: u32 = 8;

/// Default value of [`PrePassParams::max_temporal_blend`] and of the temporal
/// blend factor exposed through the renderer's configuration.
pub const DEFAULT_TEMPORAL_BLEND: f32 = 0.75;
