//! The drawing boundary: the surface contract consumed by the frame
//! pipeline, the always-available CPU raster surface, and the offscreen
//! mask-surface store.

/// Per-nesting-level offscreen mask surfaces.
pub mod mask;
/// CPU raster implementation of [`surface::Surface`].
pub mod pixel;
/// The surface capability contract.
pub mod surface;
