use std::collections::BTreeMap;
use std::fmt;
use std::ops::ControlFlow;

use kurbo::Rect;

use crate::events::{Event, EventKind, ListenerId, Listeners};
use crate::foundation::core::{ElementId, RegistryId};
use crate::foundation::error::{ScenetteError, ScenetteResult};
use crate::graphics::brush::Brush;
use crate::render::mask::{MaskLevel, MaskStore};
use crate::render::surface::Surface;
use crate::resources::fonts::{FontDetector, FontLoader, StyleInjector, font_face_css};
use crate::resources::{FontFace, ResourceContext};
use crate::scene::graph::{NodeSlot, SceneGraph};
use crate::scene::node::Node;

type Later = Box<dyn FnOnce(&mut Animation)>;

/// The top-level registry: a scene graph plus the frame pipeline, the event
/// router, and resource/font bookkeeping.
///
/// A host builds one animation, adds root nodes, and then drives it once per
/// frame: `render` with the current time, `handle_external` for input,
/// `poll_fonts` while fonts are outstanding. `dispose` tears everything down
/// and leaves the registry unusable.
pub struct Animation {
    graph: SceneGraph,
    /// Display name, "" when unnamed.
    pub name: String,
    /// Declared duration in seconds; `None` until the host or an importer
    /// decides (see [`Animation::DEFAULT_DURATION`]).
    pub duration: Option<f64>,
    /// Stage width in pixels.
    pub width: u32,
    /// Stage height in pixels.
    pub height: u32,
    /// Uniform zoom applied to every frame.
    pub zoom: f64,
    /// Playback speed multiplier (consumed by the host's clock).
    pub speed: f64,
    /// Whether playback restarts after completing.
    pub repeat: bool,
    /// Background paint, filled before the roots render.
    pub background: Option<Brush>,
    /// Free-form metadata carried along from imported definitions.
    pub meta: BTreeMap<String, serde_json::Value>,
    /// Fonts this animation depends on.
    pub fonts: Vec<FontFace>,
    listeners: Listeners,
    font_loader: FontLoader,
    masks: MaskStore,
    laters: Vec<Later>,
    inform_enabled: bool,
    disposed: bool,
}

impl Animation {
    /// Duration assumed when nothing declares one.
    pub const DEFAULT_DURATION: f64 = 10.0;

    /// Empty animation.
    pub fn new() -> Self {
        Self {
            graph: SceneGraph::new(),
            name: String::new(),
            duration: None,
            width: 0,
            height: 0,
            zoom: 1.0,
            speed: 1.0,
            repeat: false,
            background: None,
            meta: BTreeMap::new(),
            fonts: Vec::new(),
            listeners: Listeners::new(),
            font_loader: FontLoader::new(),
            masks: MaskStore::new(),
            laters: Vec::new(),
            inform_enabled: true,
            disposed: false,
        }
    }

    /// This registry's id.
    pub fn id(&self) -> RegistryId {
        self.graph.id()
    }

    /// Set the stage size in pixels.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Resolve and install the background fill from a hex spec.
    pub fn set_background(&mut self, spec: &str) -> ScenetteResult<()> {
        self.background = Some(Brush::fill(spec)?);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Registry surface
    // ------------------------------------------------------------------

    /// Register `node` and every descendant, appending it as a root.
    pub fn add(&mut self, node: Node) -> ScenetteResult<ElementId> {
        if self.disposed {
            return Err(ScenetteError::Disposed);
        }
        self.graph.add(node)
    }

    /// Unregister `id`'s subtree and hand back the freed tree.
    pub fn remove(&mut self, id: ElementId) -> ScenetteResult<Node> {
        self.graph.remove(id)
    }

    /// O(1) lookup in the flat index.
    pub fn find_by_id(&self, id: ElementId) -> Option<&NodeSlot> {
        self.graph.find_by_id(id)
    }

    /// Every registered node named `name`; see [`SceneGraph::find_by_name`].
    pub fn find_by_name(&self, name: &str, scope: Option<ElementId>) -> Vec<ElementId> {
        self.graph.find_by_name(name, scope)
    }

    /// Flat visit over every registered node, no ordering guarantee.
    pub fn visit_elems(&self, visitor: impl FnMut(ElementId, &NodeSlot)) {
        self.graph.visit_elems(visitor);
    }

    /// Visit the roots in order, non-recursive.
    pub fn visit_roots(&self, visitor: impl FnMut(ElementId, &NodeSlot)) {
        self.graph.visit_roots(visitor);
    }

    /// Visit the roots in order with early exit.
    pub fn each(&self, visitor: impl FnMut(ElementId, &NodeSlot) -> ControlFlow<()>) {
        self.graph.each(visitor);
    }

    /// Whether the root list is empty.
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// The underlying registry.
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// The underlying registry, mutably.
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// The furthest time position reported across all roots, `None` for an
    /// empty tree (no defined duration).
    pub fn get_fitting_duration(&self) -> Option<f64> {
        self.graph.fitting_duration()
    }

    // ------------------------------------------------------------------
    // Frame pipeline
    // ------------------------------------------------------------------

    /// Render one frame onto `surface`.
    ///
    /// Surface state is saved up front and restored on every exit path; a
    /// fault from any element's render propagates after the restore, never
    /// swallowed. The `Draw` event fires only after a fully successful pass.
    #[tracing::instrument(skip(self, surface))]
    pub fn render(&mut self, surface: &mut dyn Surface, time: f64, dt: f64) -> ScenetteResult<()> {
        if self.disposed {
            return Err(ScenetteError::Disposed);
        }
        surface.save();
        let result = self.render_frame(surface, time, dt);
        surface.restore();
        result?;
        self.fire(&Event::draw(time));
        Ok(())
    }

    fn render_frame(&mut self, surface: &mut dyn Surface, time: f64, dt: f64) -> ScenetteResult<()> {
        if self.zoom != 1.0 {
            surface.scale(self.zoom);
        }
        if let Some(brush) = self.background {
            let full = Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height));
            surface.fill_rect(full, &brush);
        }
        let roots: Vec<ElementId> = self.graph.roots().to_vec();
        for id in roots {
            self.graph.render_node(id, surface, time, dt, &mut self.masks)?;
        }
        Ok(())
    }

    /// Rewind playback state: re-enable event delivery, then reset every
    /// root's subtree (parent before children).
    pub fn reset(&mut self) {
        self.inform_enabled = true;
        let roots: Vec<ElementId> = self.graph.roots().to_vec();
        for id in roots {
            self.graph.reset_subtree(id);
        }
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Subscribe a host handler to `kind`.
    pub fn subscribe(
        &mut self,
        kind: EventKind,
        handler: impl FnMut(&Event) + 'static,
    ) -> ListenerId {
        self.listeners.subscribe(kind, handler)
    }

    /// Remove one subscription.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Fire `event` to host subscribers; externally-sourced kinds are also
    /// broadcast to every registered element. No-op while event delivery is
    /// muted (see [`Animation::set_inform_enabled`]).
    pub fn fire(&mut self, event: &Event) {
        if !self.inform_enabled {
            return;
        }
        self.listeners.fire(event);
        if event.kind.is_external() {
            self.graph.broadcast(event);
        }
    }

    /// Broadcast an externally-sourced event to every registered element,
    /// root and nested alike. Always reports handled: there is no
    /// hit-testing or propagation stopping at this layer, each element
    /// decides locally whether the event is relevant.
    pub fn handle_external(&mut self, event: &Event) -> bool {
        self.graph.broadcast(event);
        true
    }

    /// Mute or re-enable event delivery ([`Animation::reset`] re-enables).
    pub fn set_inform_enabled(&mut self, enabled: bool) {
        self.inform_enabled = enabled;
    }

    /// Whether event delivery is currently enabled.
    pub fn inform_enabled(&self) -> bool {
        self.inform_enabled
    }

    // ------------------------------------------------------------------
    // Deferred callbacks
    // ------------------------------------------------------------------

    /// Queue `f` to run at the next [`Animation::invoke_all_laters`] —
    /// typically structural mutations deferred out of an active traversal.
    pub fn invoke_later(&mut self, f: impl FnOnce(&mut Animation) + 'static) {
        self.laters.push(Box::new(f));
    }

    /// Run and drain every queued callback, in queue order.
    pub fn invoke_all_laters(&mut self) {
        let laters = std::mem::take(&mut self.laters);
        for f in laters {
            f(self);
        }
    }

    /// Drop every queued callback without running it.
    pub fn clear_all_laters(&mut self) {
        self.laters.clear();
    }

    // ------------------------------------------------------------------
    // Masking surfaces
    // ------------------------------------------------------------------

    /// The mask/back pair for `level`, allocated 1×1 on first use.
    pub fn ensure_mask_level(&mut self, level: usize) -> &mut MaskLevel {
        self.masks.ensure_level(level)
    }

    /// Release every allocated mask level. Idempotent.
    pub fn remove_mask_surfaces(&mut self) {
        self.masks.remove_all();
    }

    /// The mask-surface store.
    pub fn masks(&self) -> &MaskStore {
        &self.masks
    }

    // ------------------------------------------------------------------
    // Remote resources
    // ------------------------------------------------------------------

    /// A resource context scoped to this registry.
    pub fn resource_context(&self) -> ResourceContext {
        ResourceContext::new(self.graph.id())
    }

    /// Gather remote-resource descriptors from every registered element that
    /// reports any, plus this animation's font URLs.
    pub fn collect_remote_resources(&self, ctx: &ResourceContext) -> Vec<String> {
        let mut remotes = Vec::new();
        self.graph.visit_elems(|_, slot| {
            if slot.element().has_remote_resources(ctx) {
                remotes.extend(slot.element().collect_remote_resources(ctx));
            }
        });
        remotes.extend(self.fonts.iter().filter_map(|f| f.url.clone()));
        remotes
    }

    /// Trigger loading on every qualifying element, then start font loading.
    #[tracing::instrument(skip_all)]
    pub fn load_remote_resources(
        &mut self,
        ctx: &ResourceContext,
        injector: &mut dyn StyleInjector,
        detector: &dyn FontDetector,
    ) {
        self.graph.visit_elems_mut(|_, slot| {
            if slot.element().has_remote_resources(ctx) {
                slot.element_mut().load_remote_resources(ctx);
            }
        });
        self.load_fonts(injector, detector);
    }

    /// Inject `@font-face` CSS for every font that needs loading and start
    /// polling for availability. Faces with no URL, no face name, or already
    /// detected are skipped.
    pub fn load_fonts(&mut self, injector: &mut dyn StyleInjector, detector: &dyn FontDetector) {
        if self.fonts.is_empty() {
            return;
        }
        let to_load: Vec<FontFace> = self
            .fonts
            .iter()
            .filter(|f| f.needs_load(detector))
            .cloned()
            .collect();
        if to_load.is_empty() {
            return;
        }
        injector.inject(&font_face_css(&to_load));
        for font in &to_load {
            self.font_loader.schedule(font.face.clone());
        }
    }

    /// Cooperative font-poll tick: re-checks pending faces and fires one
    /// `ResourceLoad` event per face that became available. Returns the
    /// detected faces.
    pub fn poll_fonts(&mut self, detector: &dyn FontDetector) -> Vec<String> {
        let loaded = self.font_loader.poll(detector);
        for face in &loaded {
            self.fire(&Event::message(EventKind::ResourceLoad, face.clone()));
        }
        loaded
    }

    /// Whether no font polls are outstanding.
    pub fn fonts_idle(&self) -> bool {
        self.font_loader.is_idle()
    }

    // ------------------------------------------------------------------
    // Teardown
    // ------------------------------------------------------------------

    /// Tear the registry down: drop every subscription, retract outstanding
    /// font polls, unregister every root (keep-in-tree mode, so the root
    /// list stays stable during the walk) and invoke each freed subtree's
    /// own dispose exactly once, release mask surfaces, and mark the
    /// registry unusable. Safe to call twice; the second call is a no-op.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.listeners.clear();
        self.font_loader.cancel_all();
        let roots: Vec<ElementId> = self.graph.roots().to_vec();
        for id in roots {
            if let Ok(mut freed) = self.graph.unregister(id, true) {
                freed.dispose_all();
            }
        }
        self.graph.clear_tree();
        self.masks.remove_all();
    }

    /// Whether [`Animation::dispose`] has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "[ Animation ]")
        } else {
            write!(f, "[ Animation '{}' ]", self.name)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/animation.rs"]
mod tests;
