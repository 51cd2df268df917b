use kurbo::Rect;

use crate::graphics::brush::Brush;

/// The raster surface contract consumed by the frame pipeline.
///
/// This is deliberately the small end of a 2D context: scoped state
/// save/restore, a uniform scale, and a brush fill. Elements that paint more
/// than that downcast to their host's concrete surface or carry their own
/// painter; the pipeline itself never needs more.
///
/// `restore` with an empty state stack is a no-op, so the pipeline's
/// restore-on-every-exit-path guarantee cannot underflow a host surface.
pub trait Surface {
    /// Push the current drawing state (accumulated scale).
    fn save(&mut self);

    /// Pop back to the most recently saved state. No-op when nothing is
    /// saved.
    fn restore(&mut self);

    /// Multiply the current uniform scale by `factor`.
    fn scale(&mut self, factor: f64);

    /// Fill `rect` (in current user-space coordinates) with `brush`.
    fn fill_rect(&mut self, rect: Rect, brush: &Brush);

    /// Surface width in pixels.
    fn width(&self) -> u32;

    /// Surface height in pixels.
    fn height(&self) -> u32;
}
