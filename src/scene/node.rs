use std::fmt;

use crate::events::Event;
use crate::foundation::core::ElementId;
use crate::foundation::error::ScenetteResult;
use crate::render::surface::Surface;
use crate::resources::ResourceContext;
use crate::scene::graph::RenderScope;

/// The capability contract every scene element satisfies.
///
/// An element is the drawable payload of a tree node: it paints itself (and
/// decides whether/when to paint its children through the [`RenderScope`]),
/// rewinds on `reset`, releases host resources on `dispose`, and reports its
/// remote-asset needs. Everything except [`Element::render`] has a default,
/// so leaf elements only implement what they use.
///
/// Rendering a composite is the element's own responsibility: the registry
/// hands it a scope over its children and never second-guesses the order or
/// the surfaces they are painted into (which is what makes masked and
/// clipped composites possible).
pub trait Element {
    /// Paint this element for the frame at `time` (seconds), `dt` seconds
    /// since the previous frame.
    fn render(
        &mut self,
        surface: &mut dyn Surface,
        scope: &mut RenderScope<'_>,
        time: f64,
        dt: f64,
    ) -> ScenetteResult<()>;

    /// Rewind internal animation state to the start of playback.
    fn reset(&mut self) {}

    /// Release host resources. Called exactly once per element when the node
    /// or its registry is disposed.
    fn dispose(&mut self) {}

    /// Whether this element can enumerate and host child nodes. Attaching
    /// children under an element that reports `false` is a structural
    /// violation rejected at registration.
    fn accepts_children(&self) -> bool {
        false
    }

    /// The furthest time position (seconds) this element's own content
    /// reaches. Containers with no intrinsic timing report `0.0`.
    fn max_tpos(&self) -> f64 {
        0.0
    }

    /// Receive a broadcast event. The return value reports whether the
    /// element cared; the router broadcasts regardless.
    fn handle_event(&mut self, _event: &Event) -> bool {
        false
    }

    /// Whether this element depends on remote assets.
    fn has_remote_resources(&self, _ctx: &ResourceContext) -> bool {
        false
    }

    /// Descriptors (typically URLs) of the remote assets this element needs.
    fn collect_remote_resources(&self, _ctx: &ResourceContext) -> Vec<String> {
        Vec::new()
    }

    /// Start loading this element's remote assets.
    fn load_remote_resources(&mut self, _ctx: &ResourceContext) {}
}

/// Plain container element: renders its children in order, nothing else.
pub struct Group;

impl Element for Group {
    fn render(
        &mut self,
        surface: &mut dyn Surface,
        scope: &mut RenderScope<'_>,
        time: f64,
        dt: f64,
    ) -> ScenetteResult<()> {
        scope.render_children(surface, time, dt)
    }

    fn accepts_children(&self) -> bool {
        true
    }
}

/// A free-standing tree member: an element plus its owned children.
///
/// Nodes are built outside any registry and moved into one with
/// `add`; removal hands the subtree back in this form. While free, a node
/// owns its children directly; once registered, the registry's arena owns
/// every node and the tree becomes handle-linked.
pub struct Node {
    pub(crate) id: ElementId,
    pub(crate) name: String,
    pub(crate) element: Box<dyn Element>,
    pub(crate) children: Vec<Node>,
}

impl Node {
    /// Unnamed node around `element`, with a fresh id.
    pub fn new(element: impl Element + 'static) -> Self {
        Self {
            id: ElementId::fresh(),
            name: String::new(),
            element: Box::new(element),
            children: Vec::new(),
        }
    }

    /// Named node around `element`.
    pub fn named(name: impl Into<String>, element: impl Element + 'static) -> Self {
        let mut node = Self::new(element);
        node.name = name.into();
        node
    }

    /// Empty [`Group`] container.
    pub fn group() -> Self {
        Self::new(Group)
    }

    /// Override the id (imported definitions carry stable ids). Duplicates
    /// are rejected at registration, not here.
    pub fn with_id(mut self, id: ElementId) -> Self {
        self.id = id;
        self
    }

    /// Set the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Append `child` (builder form).
    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Append `child`.
    pub fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// This node's id.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// This node's name ("" when unnamed).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct children, in order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// The element payload.
    pub fn element(&self) -> &dyn Element {
        &*self.element
    }

    /// The element payload, mutably.
    pub fn element_mut(&mut self) -> &mut dyn Element {
        &mut *self.element
    }

    /// Depth-one iteration over direct children.
    pub fn each(&self, mut visitor: impl FnMut(&Node)) {
        for child in &self.children {
            visitor(child);
        }
    }

    /// Invoke every element's `dispose` in this subtree, parent first.
    pub fn dispose_all(&mut self) {
        self.element.dispose();
        for child in &mut self.children {
            child.dispose_all();
        }
    }

    pub(crate) fn reassemble(
        id: ElementId,
        name: String,
        element: Box<dyn Element>,
        children: Vec<Node>,
    ) -> Self {
        Self {
            id,
            name,
            element,
            children,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("children", &self.children.len())
            .finish_non_exhaustive()
    }
}
