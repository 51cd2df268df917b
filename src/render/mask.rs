use crate::render::pixel::PixelSurface;

/// One nesting level of masking surfaces.
///
/// `mask` receives the mask shape, `back` the masked content; the consumer
/// composites the two. Both start 1×1 — sizing is the consumer's job.
pub struct MaskLevel {
    /// Offscreen surface the mask shape is painted into.
    pub mask: PixelSurface,
    /// Offscreen surface the masked content is painted into.
    pub back: PixelSurface,
}

/// Lazily allocated offscreen surfaces for masked composites, one pair per
/// nesting level.
///
/// Levels are allocated on first request and live until [`MaskStore::remove_all`]
/// (called by registry disposal). A level index may be requested out of
/// order; only that slot is allocated.
#[derive(Default)]
pub struct MaskStore {
    levels: Vec<Option<MaskLevel>>,
}

impl MaskStore {
    /// Empty store, nothing allocated.
    pub fn new() -> Self {
        Self::default()
    }

    /// The mask/back pair for `level`, allocating a 1×1 pair on first use.
    pub fn ensure_level(&mut self, level: usize) -> &mut MaskLevel {
        if self.levels.len() <= level {
            self.levels.resize_with(level + 1, || None);
        }
        self.levels[level].get_or_insert_with(|| MaskLevel {
            mask: PixelSurface::new(1, 1),
            back: PixelSurface::new(1, 1),
        })
    }

    /// The pair for `level` if it has been allocated.
    pub fn level_mut(&mut self, level: usize) -> Option<&mut MaskLevel> {
        self.levels.get_mut(level).and_then(|slot| slot.as_mut())
    }

    /// Take the pair for `level` out of the store, allocating it first if
    /// needed. The slot stays reserved until [`MaskStore::put_level`].
    pub fn take_level(&mut self, level: usize) -> MaskLevel {
        self.ensure_level(level);
        self.levels[level].take().expect("take_level: just ensured")
    }

    /// Return a pair taken with [`MaskStore::take_level`].
    pub fn put_level(&mut self, level: usize, pair: MaskLevel) {
        if self.levels.len() <= level {
            self.levels.resize_with(level + 1, || None);
        }
        self.levels[level] = Some(pair);
    }

    /// Number of allocated levels.
    pub fn allocated(&self) -> usize {
        self.levels.iter().filter(|slot| slot.is_some()).count()
    }

    /// Release every allocated level. Idempotent; safe when none were ever
    /// allocated.
    pub fn remove_all(&mut self) {
        self.levels.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/mask.rs"]
mod tests;
