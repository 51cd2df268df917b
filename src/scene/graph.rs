//! The registry core: one owning arena of nodes plus an ordered root list.
//!
//! A graph maintains two views of the same population. `tree` is the ordered
//! sequence of root handles — paint order and root-visit order follow it.
//! `nodes` is the flat id index — presence there *is* registration, and
//! every reachable node of a registered tree is present. The arena owns the
//! nodes outright, so an element can never belong to two registries at once,
//! and unregistration hands the caller back an ordinary free [`Node`] tree.
//!
//! Mutation and traversal are reentrant-unsafe by design: visitors receive
//! slot views, not the graph, and structural changes happen between walks,
//! never inside one. The single exception is disposal, which unregisters
//! roots in a keep-in-tree mode so the root list stays stable while it is
//! walked and can be discarded wholesale afterwards.

use std::collections::{HashMap, HashSet};
use std::ops::ControlFlow;

use smallvec::SmallVec;

use crate::events::Event;
use crate::foundation::core::{ElementId, RegistryId};
use crate::foundation::error::{ScenetteError, ScenetteResult};
use crate::render::mask::{MaskLevel, MaskStore};
use crate::render::surface::Surface;
use crate::scene::node::{Element, Node};

/// A registered node as stored in the arena: the element payload plus the
/// handle links that replace the free tree's inline ownership.
pub struct NodeSlot {
    pub(crate) name: String,
    pub(crate) element: Box<dyn Element>,
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: SmallVec<[ElementId; 4]>,
}

impl NodeSlot {
    /// Node name ("" when unnamed).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The element payload.
    pub fn element(&self) -> &dyn Element {
        &*self.element
    }

    /// The element payload, mutably.
    pub fn element_mut(&mut self) -> &mut dyn Element {
        &mut *self.element
    }

    /// Structural parent handle, `None` for roots.
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// Child handles, in order.
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

/// The scene-graph registry: ordered roots plus the flat id index.
pub struct SceneGraph {
    id: RegistryId,
    tree: Vec<ElementId>,
    nodes: HashMap<ElementId, NodeSlot>,
}

impl SceneGraph {
    /// Empty graph with a fresh registry id.
    pub fn new() -> Self {
        Self {
            id: RegistryId::fresh(),
            tree: Vec::new(),
            nodes: HashMap::new(),
        }
    }

    /// This registry's id (the owner back-reference handed to collaborators).
    pub fn id(&self) -> RegistryId {
        self.id
    }

    /// Register `node` and every descendant, then append it as a root.
    ///
    /// Registration is atomic: the whole batch is validated first
    /// (structure, then id uniqueness against the index and within the
    /// batch), and a failure leaves the graph untouched. A rejected tree is
    /// dropped; its elements were never registered, so their `dispose` does
    /// not run.
    pub fn add(&mut self, node: Node) -> ScenetteResult<ElementId> {
        validate_structure(&node)?;
        let mut batch = HashSet::new();
        self.validate_fresh(&node, &mut batch)?;

        let root = node.id;
        self.commit(node, None);
        self.tree.push(root);
        Ok(root)
    }

    /// Unregister `id` and every descendant, handing back the freed subtree.
    ///
    /// When the node has a structural parent, removal goes through the
    /// parent first — the parent's child list is the parent-local
    /// bookkeeping that must stay consistent. Root removal splices the node
    /// out of the root list (exhaustively; a handle is expected at most
    /// once, but the splice does not rely on it).
    pub fn remove(&mut self, id: ElementId) -> ScenetteResult<Node> {
        let slot = self
            .nodes
            .get(&id)
            .ok_or(ScenetteError::ElementNotRegistered(id))?;
        if let Some(parent) = slot.parent {
            if let Some(parent_slot) = self.nodes.get_mut(&parent) {
                parent_slot.children.retain(|c| *c != id);
            }
        }
        self.unregister(id, false)
    }

    /// Unregister `id`'s subtree, descendants first.
    ///
    /// `keep_in_tree` defers the root-list splice; disposal uses it to walk
    /// `tree` without invalidating the sequence being iterated, discarding
    /// the list wholesale afterwards.
    pub(crate) fn unregister(
        &mut self,
        id: ElementId,
        keep_in_tree: bool,
    ) -> ScenetteResult<Node> {
        if !self.nodes.contains_key(&id) {
            return Err(ScenetteError::ElementNotRegistered(id));
        }
        Ok(self.unregister_subtree(id, keep_in_tree))
    }

    fn unregister_subtree(&mut self, id: ElementId, keep_in_tree: bool) -> Node {
        let child_ids = self
            .nodes
            .get(&id)
            .map(|slot| slot.children.clone())
            .unwrap_or_default();
        let children: Vec<Node> = child_ids
            .into_iter()
            .map(|child| self.unregister_subtree(child, false))
            .collect();
        if !keep_in_tree {
            self.tree.retain(|t| *t != id);
        }
        let slot = self.nodes.remove(&id).expect("unregister: slot present");
        Node::reassemble(id, slot.name, slot.element, children)
    }

    fn validate_fresh(&self, node: &Node, batch: &mut HashSet<ElementId>) -> ScenetteResult<()> {
        if self.nodes.contains_key(&node.id) || !batch.insert(node.id) {
            return Err(ScenetteError::ElementAlreadyRegistered(node.id));
        }
        for child in &node.children {
            self.validate_fresh(child, batch)?;
        }
        Ok(())
    }

    /// Pre-order commit: the parent's slot is inserted before its children's.
    fn commit(&mut self, node: Node, parent: Option<ElementId>) {
        let Node {
            id,
            name,
            element,
            children,
        } = node;
        let child_ids: SmallVec<[ElementId; 4]> = children.iter().map(|c| c.id).collect();
        self.nodes.insert(
            id,
            NodeSlot {
                name,
                element,
                parent,
                children: child_ids,
            },
        );
        for child in children {
            self.commit(child, Some(id));
        }
    }

    /// Whether `id` is currently registered here.
    pub fn is_registered(&self, id: ElementId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of registered nodes (roots and descendants).
    pub fn registered_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the root list is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Root handles, in paint order.
    pub fn roots(&self) -> &[ElementId] {
        &self.tree
    }

    /// O(1) lookup in the flat index.
    pub fn find_by_id(&self, id: ElementId) -> Option<&NodeSlot> {
        self.nodes.get(&id)
    }

    /// Mutable O(1) lookup in the flat index.
    pub fn find_by_id_mut(&mut self, id: ElementId) -> Option<&mut NodeSlot> {
        self.nodes.get_mut(&id)
    }

    /// Every node named `name`, depth-first; `scope` restricts the scan to
    /// one subtree (the scope root included), `None` scans all roots.
    /// Names are not unique by design, so all matches are returned.
    pub fn find_by_name(&self, name: &str, scope: Option<ElementId>) -> Vec<ElementId> {
        let mut found = Vec::new();
        match scope {
            Some(root) => self.collect_named(root, name, &mut found),
            None => {
                for &root in &self.tree {
                    self.collect_named(root, name, &mut found);
                }
            }
        }
        found
    }

    fn collect_named(&self, id: ElementId, name: &str, found: &mut Vec<ElementId>) {
        if let Some(slot) = self.nodes.get(&id) {
            if slot.name == name {
                found.push(id);
            }
            for &child in &slot.children {
                self.collect_named(child, name, found);
            }
        }
    }

    /// Structural parent of a registered node.
    pub fn parent_of(&self, id: ElementId) -> ScenetteResult<Option<ElementId>> {
        self.nodes
            .get(&id)
            .map(|slot| slot.parent)
            .ok_or(ScenetteError::ElementNotRegistered(id))
    }

    /// Visit every registered node, flat, no ordering guarantee.
    pub fn visit_elems(&self, mut visitor: impl FnMut(ElementId, &NodeSlot)) {
        for (&id, slot) in &self.nodes {
            visitor(id, slot);
        }
    }

    /// Visit every registered node mutably, flat, no ordering guarantee.
    pub fn visit_elems_mut(&mut self, mut visitor: impl FnMut(ElementId, &mut NodeSlot)) {
        for (&id, slot) in &mut self.nodes {
            visitor(id, slot);
        }
    }

    /// Visit the roots in order, non-recursive. Roots whose slot has been
    /// purged by a keep-in-tree unregistration are skipped.
    pub fn visit_roots(&self, mut visitor: impl FnMut(ElementId, &NodeSlot)) {
        for &id in &self.tree {
            if let Some(slot) = self.nodes.get(&id) {
                visitor(id, slot);
            }
        }
    }

    /// Visit the roots in order with early exit.
    pub fn each(&self, mut visitor: impl FnMut(ElementId, &NodeSlot) -> ControlFlow<()>) {
        for &id in &self.tree {
            if let Some(slot) = self.nodes.get(&id) {
                if visitor(id, slot).is_break() {
                    break;
                }
            }
        }
    }

    /// Visit the roots in reverse order with early exit.
    pub fn reverse_each(&self, mut visitor: impl FnMut(ElementId, &NodeSlot) -> ControlFlow<()>) {
        for &id in self.tree.iter().rev() {
            if let Some(slot) = self.nodes.get(&id) {
                if visitor(id, slot).is_break() {
                    break;
                }
            }
        }
    }

    /// Broadcast `event` to every registered element.
    pub fn broadcast(&mut self, event: &Event) {
        for slot in self.nodes.values_mut() {
            slot.element.handle_event(event);
        }
    }

    /// Reset every element in `id`'s subtree, parent first.
    pub(crate) fn reset_subtree(&mut self, id: ElementId) {
        let child_ids = match self.nodes.get_mut(&id) {
            Some(slot) => {
                slot.element.reset();
                slot.children.clone()
            }
            None => return,
        };
        for child in child_ids {
            self.reset_subtree(child);
        }
    }

    /// Max of every element's own furthest-time report within `id`'s subtree.
    pub(crate) fn subtree_max_tpos(&self, id: ElementId) -> f64 {
        match self.nodes.get(&id) {
            None => f64::NEG_INFINITY,
            Some(slot) => {
                let mut max = slot.element.max_tpos();
                for &child in &slot.children {
                    max = max.max(self.subtree_max_tpos(child));
                }
                max
            }
        }
    }

    /// The furthest time position over all roots, `None` for an empty tree
    /// (an empty tree has no defined duration).
    pub fn fitting_duration(&self) -> Option<f64> {
        if self.tree.is_empty() {
            return None;
        }
        let mut max = f64::NEG_INFINITY;
        for &root in &self.tree {
            max = max.max(self.subtree_max_tpos(root));
        }
        Some(max)
    }

    /// Render the subtree rooted at `id` by invoking its element's render
    /// contract with a scope over its children.
    ///
    /// The slot is taken out of the arena for the duration of the call and
    /// reinserted on every exit path, so a child fault never loses the node.
    pub(crate) fn render_node(
        &mut self,
        id: ElementId,
        surface: &mut dyn Surface,
        time: f64,
        dt: f64,
        masks: &mut MaskStore,
    ) -> ScenetteResult<()> {
        let mut slot = self
            .nodes
            .remove(&id)
            .ok_or(ScenetteError::ElementNotRegistered(id))?;
        let children = std::mem::take(&mut slot.children);
        let result = {
            let mut scope = RenderScope {
                graph: self,
                masks,
                children: &children,
            };
            slot.element.render(surface, &mut scope, time, dt)
        };
        slot.children = children;
        self.nodes.insert(id, slot);
        result
    }

    pub(crate) fn clear_tree(&mut self) {
        self.tree.clear();
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneGraph")
            .field("id", &self.id)
            .field("roots", &self.tree.len())
            .field("registered", &self.nodes.len())
            .finish()
    }
}

/// View handed to [`Element::render`]: the node's own children plus the
/// mask-surface store, without exposing the rest of the registry.
pub struct RenderScope<'a> {
    graph: &'a mut SceneGraph,
    masks: &'a mut MaskStore,
    children: &'a [ElementId],
}

impl RenderScope<'_> {
    /// Child handles of the rendering node, in order.
    pub fn children(&self) -> &[ElementId] {
        self.children
    }

    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Render every child in order onto `surface`.
    pub fn render_children(
        &mut self,
        surface: &mut dyn Surface,
        time: f64,
        dt: f64,
    ) -> ScenetteResult<()> {
        for &child in self.children {
            self.graph.render_node(child, surface, time, dt, self.masks)?;
        }
        Ok(())
    }

    /// Render one child (which must belong to this node) onto an arbitrary
    /// surface — masked composites paint children into offscreen surfaces.
    pub fn render_child(
        &mut self,
        child: ElementId,
        surface: &mut dyn Surface,
        time: f64,
        dt: f64,
    ) -> ScenetteResult<()> {
        if !self.children.contains(&child) {
            return Err(ScenetteError::validation(format!(
                "element {child} is not a child of the rendering node"
            )));
        }
        self.graph.render_node(child, surface, time, dt, self.masks)
    }

    /// Take the mask/back pair for `level` out of the store (allocating 1×1
    /// surfaces on first use). Pair with [`RenderScope::restore_mask_level`].
    pub fn take_mask_level(&mut self, level: usize) -> MaskLevel {
        self.masks.take_level(level)
    }

    /// Put a taken mask/back pair back.
    pub fn restore_mask_level(&mut self, level: usize, pair: MaskLevel) {
        self.masks.put_level(level, pair);
    }
}

fn validate_structure(node: &Node) -> ScenetteResult<()> {
    if !node.children.is_empty() && !node.element.accepts_children() {
        return Err(ScenetteError::NotAnElementOrClip);
    }
    for child in &node.children {
        validate_structure(child)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph.rs"]
mod tests;
