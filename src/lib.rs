//! Scenette is a retained-mode 2D scene-graph animation runtime.
//!
//! A tree of drawable elements is registered into an [`Animation`] (or a
//! timeline-bound [`Scene`]), which maintains an ordered root list and a flat
//! id index over the same population. Each frame the host calls
//! [`Animation::render`] with a [`Surface`]; roots paint depth-first in
//! insertion order, each composite walking its own children. Input events are
//! broadcast to every registered element; lifecycle events flow to host
//! subscribers through [`Listeners`]. Remote-resource hooks let elements
//! declare and load fonts and assets before playback.
//!
//! The typical flow:
//!
//! - Build free [`Node`] trees around [`Element`] payloads
//! - [`Animation::add`] them (registration is atomic per tree)
//! - Drive [`Animation::render`] / [`Animation::handle_external`] per frame
//! - [`Animation::dispose`] to tear everything down exactly once
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod events;
pub mod foundation;
pub mod graphics;
pub mod render;
pub mod resources;
pub mod scene;

pub use crate::foundation::core::{ElementId, Point, Rect, RegistryId, Rgba8Premul, Vec2};
pub use crate::foundation::error::{ScenetteError, ScenetteResult};

pub use crate::events::{Event, EventData, EventKind, ListenerId, Listeners};
pub use crate::graphics::bounds::Bounds;
pub use crate::graphics::brush::Brush;
pub use crate::render::mask::{MaskLevel, MaskStore};
pub use crate::render::pixel::PixelSurface;
pub use crate::render::surface::Surface;
pub use crate::resources::{FontDetector, FontFace, FontLoader, ResourceContext, StyleInjector};
pub use crate::scene::animation::Animation;
pub use crate::scene::graph::{NodeSlot, RenderScope, SceneGraph};
pub use crate::scene::node::{Element, Group, Node};
pub use crate::scene::scene::Scene;
pub use crate::scene::timeline::Timeline;
