use std::time::{Duration, Instant};

/// How often a scheduled face is re-checked for availability.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A font the animation depends on.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FontFace {
    /// Face name registered with the host text system.
    pub face: String,
    /// Where the font file lives; faces without a URL are never loaded.
    pub url: Option<String>,
    /// Optional style ("italic").
    pub style: Option<String>,
    /// Optional weight ("700").
    pub weight: Option<String>,
}

impl FontFace {
    /// Face with a source URL.
    pub fn new(face: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            face: face.into(),
            url: Some(url.into()),
            style: None,
            weight: None,
        }
    }

    /// Set the style.
    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Set the weight.
    pub fn weight(mut self, weight: impl Into<String>) -> Self {
        self.weight = Some(weight.into());
        self
    }

    /// Whether this face needs a load: it has a URL and a name, and the
    /// detector does not see it yet.
    pub fn needs_load(&self, detector: &dyn FontDetector) -> bool {
        self.url.is_some() && !self.face.is_empty() && !detector.detect(&self.face)
    }
}

/// Probes whether a face is available to the host text system.
pub trait FontDetector {
    /// `true` once `face` can be used for rendering.
    fn detect(&self, face: &str) -> bool;
}

/// Receives generated `@font-face` CSS (a document-level style injector or
/// the platform equivalent).
pub trait StyleInjector {
    /// Install `css` so the host starts fetching the declared faces.
    fn inject(&mut self, css: &str);
}

/// Build one `@font-face` block per face that needs loading.
pub fn font_face_css(faces: &[FontFace]) -> String {
    let mut css = String::new();
    for font in faces {
        let Some(url) = &font.url else { continue };
        css.push_str("@font-face { ");
        css.push_str(&format!("font-family: \"{}\"; ", font.face));
        css.push_str(&format!("src: url({url}); "));
        if let Some(style) = &font.style {
            css.push_str(&format!("font-style: {style}; "));
        }
        if let Some(weight) = &font.weight {
            css.push_str(&format!("font-weight: {weight}; "));
        }
        css.push_str("}\n");
    }
    css
}

struct FontPoll {
    face: String,
    interval: Duration,
    next_due: Instant,
}

/// Pending availability polls for scheduled faces.
///
/// The loader never spawns anything: the host ticks [`FontLoader::poll`]
/// from its frame loop, and each scheduled face is re-checked at its
/// interval until detected. Polls belong to the owning registry and are
/// retracted wholesale when it is disposed ([`FontLoader::cancel_all`]).
#[derive(Default)]
pub struct FontLoader {
    polls: Vec<FontPoll>,
}

impl FontLoader {
    /// Loader with no pending polls.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `face` for availability polling at the default interval.
    pub fn schedule(&mut self, face: impl Into<String>) {
        self.schedule_with_interval(face, DEFAULT_POLL_INTERVAL);
    }

    /// Schedule `face` with an explicit interval.
    pub fn schedule_with_interval(&mut self, face: impl Into<String>, interval: Duration) {
        self.polls.push(FontPoll {
            face: face.into(),
            interval,
            next_due: Instant::now(),
        });
    }

    /// Check due polls against `detector`; detected faces are removed from
    /// the pending set and returned.
    pub fn poll(&mut self, detector: &dyn FontDetector) -> Vec<String> {
        self.poll_at(Instant::now(), detector)
    }

    /// [`FontLoader::poll`] with an explicit clock, for deterministic tests.
    pub fn poll_at(&mut self, now: Instant, detector: &dyn FontDetector) -> Vec<String> {
        let mut loaded = Vec::new();
        self.polls.retain_mut(|poll| {
            if now < poll.next_due {
                return true;
            }
            if detector.detect(&poll.face) {
                loaded.push(poll.face.clone());
                false
            } else {
                poll.next_due = now + poll.interval;
                true
            }
        });
        loaded
    }

    /// Retract every pending poll.
    pub fn cancel_all(&mut self) {
        self.polls.clear();
    }

    /// Whether nothing is pending.
    pub fn is_idle(&self) -> bool {
        self.polls.is_empty()
    }

    /// Number of pending polls.
    pub fn pending(&self) -> usize {
        self.polls.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resources/fonts.rs"]
mod tests;
