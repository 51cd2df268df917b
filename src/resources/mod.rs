//! Remote-resource hooks: collection context and font loading.
//!
//! Elements that depend on remote assets (fonts, images, media) report and
//! load them through the hooks on [`crate::scene::node::Element`]; the
//! registry drives the passes and owns the font-loading state. Actual
//! fetching is the host's concern — the runtime only gathers descriptors and
//! tracks availability.

/// Font descriptors, availability polling, and `@font-face` assembly.
pub mod fonts;

pub use fonts::{FontDetector, FontFace, FontLoader, StyleInjector};

use crate::foundation::core::RegistryId;

/// Scope handed to the resource collection/loading passes.
///
/// Identifies which registry is collecting (hosts cache per scope) and an
/// optional base URL that relative descriptors resolve against.
#[derive(Clone, Debug)]
pub struct ResourceContext {
    /// The collecting registry.
    pub scope: RegistryId,
    /// Base URL for relative resource descriptors, if any.
    pub base_url: Option<String>,
}

impl ResourceContext {
    /// Context for `scope` with no base URL.
    pub fn new(scope: RegistryId) -> Self {
        Self {
            scope,
            base_url: None,
        }
    }
}
