/// Per-scene duration/position authority.
///
/// Owns nothing but time: how long the scene runs (unbounded by default)
/// and where playback currently stands. The host advances it once per frame;
/// elements never touch it directly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timeline {
    duration: f64,
    position: f64,
}

impl Timeline {
    /// Unbounded timeline at position 0.
    pub fn new() -> Self {
        Self {
            duration: f64::INFINITY,
            position: 0.0,
        }
    }

    /// Timeline bounded to `duration` seconds.
    pub fn with_duration(duration: f64) -> Self {
        let mut t = Self::new();
        t.set_duration(duration);
        t
    }

    /// Total duration in seconds (`f64::INFINITY` when unbounded).
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Set the duration. Non-finite or negative values mean unbounded.
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = if duration.is_finite() && duration >= 0.0 {
            duration
        } else {
            f64::INFINITY
        };
        self.position = self.position.min(self.duration);
    }

    /// Current position in seconds.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Jump to `position`, clamped into `[0, duration]`.
    pub fn seek(&mut self, position: f64) {
        self.position = position.clamp(0.0, self.duration);
    }

    /// Advance by `dt` seconds, saturating at the end. Returns `true` when
    /// the end has been reached.
    pub fn advance(&mut self, dt: f64) -> bool {
        self.position = (self.position + dt).min(self.duration);
        self.is_at_end()
    }

    /// Whether playback stands at the end (never true when unbounded).
    pub fn is_at_end(&self) -> bool {
        self.duration.is_finite() && self.position >= self.duration
    }

    /// Rewind to position 0.
    pub fn reset(&mut self) {
        self.position = 0.0;
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/timeline.rs"]
mod tests;
