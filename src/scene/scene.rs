use std::ops::ControlFlow;

use crate::foundation::core::{ElementId, RegistryId};
use crate::foundation::error::ScenetteResult;
use crate::scene::graph::{NodeSlot, SceneGraph};
use crate::scene::node::Node;
use crate::scene::timeline::Timeline;

/// A timeline-bound registry scope.
///
/// An animation may be cut into scenes, each owning its own element
/// population and timeline and chaining to the next scene when it ends.
/// The registry surface (add/remove/traversal) matches [`SceneGraph`];
/// rendering stays with the owning [`crate::scene::animation::Animation`].
pub struct Scene {
    name: String,
    graph: SceneGraph,
    time: Timeline,
    next: Option<RegistryId>,
}

impl Scene {
    /// Scene with the given duration in seconds, unbounded when `None`.
    pub fn new(name: impl Into<String>, duration: Option<f64>) -> Self {
        Self {
            name: name.into(),
            graph: SceneGraph::new(),
            time: match duration {
                Some(d) => Timeline::with_duration(d),
                None => Timeline::new(),
            },
            next: None,
        }
    }

    /// This scene's registry id.
    pub fn id(&self) -> RegistryId {
        self.graph.id()
    }

    /// Scene name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scene duration in seconds.
    pub fn duration(&self) -> f64 {
        self.time.duration()
    }

    /// Set the scene duration.
    pub fn set_duration(&mut self, duration: f64) {
        self.time.set_duration(duration);
    }

    /// The scene timeline.
    pub fn timeline(&self) -> &Timeline {
        &self.time
    }

    /// The scene timeline, mutably.
    pub fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.time
    }

    /// Chain this scene to another registry.
    pub fn set_next(&mut self, next: RegistryId) {
        self.next = Some(next);
    }

    /// The chained scene, if any.
    pub fn next(&self) -> Option<RegistryId> {
        self.next
    }

    /// Register `node` (and its descendants) as a root of this scene.
    pub fn add(&mut self, node: Node) -> ScenetteResult<ElementId> {
        self.graph.add(node)
    }

    /// Unregister `id`'s subtree, handing back the freed tree.
    pub fn remove(&mut self, id: ElementId) -> ScenetteResult<Node> {
        self.graph.remove(id)
    }

    /// Whether the scene has no roots.
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Flat visit over every registered node, no ordering guarantee.
    pub fn traverse(&self, visitor: impl FnMut(ElementId, &NodeSlot)) {
        self.graph.visit_elems(visitor);
    }

    /// Visit the roots in order with early exit.
    pub fn each(&self, visitor: impl FnMut(ElementId, &NodeSlot) -> ControlFlow<()>) {
        self.graph.each(visitor);
    }

    /// Visit the roots in reverse order with early exit.
    pub fn reverse_each(&self, visitor: impl FnMut(ElementId, &NodeSlot) -> ControlFlow<()>) {
        self.graph.reverse_each(visitor);
    }

    /// The underlying registry.
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// The underlying registry, mutably.
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// Unregister every root without mutating the root list mid-walk,
    /// invoking each freed subtree's own dispose exactly once, then discard
    /// the root list.
    pub fn dispose(&mut self) {
        let roots: Vec<ElementId> = self.graph.roots().to_vec();
        for id in roots {
            if let Ok(mut freed) = self.graph.unregister(id, true) {
                freed.dispose_all();
            }
        }
        self.graph.clear_tree();
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("duration", &self.time.duration())
            .field("graph", &self.graph)
            .finish()
    }
}
