//! Geometry and paint value types consumed by the render pipeline.

/// Axis-aligned bounds with union semantics and a non-existence sentinel.
pub mod bounds;
/// Resolved paints for background and mask fills.
pub mod brush;
