use super::*;
use crate::events::EventKind;
use crate::render::pixel::PixelSurface;
use crate::scene::node::Group;
use std::cell::RefCell;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<String>>>;

/// Element that logs its lifecycle and optionally hosts children.
struct Probe {
    tag: &'static str,
    log: Log,
    container: bool,
    tpos: f64,
}

impl Probe {
    fn leaf(tag: &'static str, log: &Log) -> Self {
        Self {
            tag,
            log: Rc::clone(log),
            container: false,
            tpos: 0.0,
        }
    }

    fn container(tag: &'static str, log: &Log) -> Self {
        Self {
            container: true,
            ..Self::leaf(tag, log)
        }
    }

    fn timed(tag: &'static str, log: &Log, tpos: f64) -> Self {
        Self {
            tpos,
            ..Self::leaf(tag, log)
        }
    }
}

impl Element for Probe {
    fn render(
        &mut self,
        surface: &mut dyn Surface,
        scope: &mut RenderScope<'_>,
        time: f64,
        dt: f64,
    ) -> ScenetteResult<()> {
        self.log.borrow_mut().push(format!("render:{}", self.tag));
        if self.container {
            scope.render_children(surface, time, dt)?;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.log.borrow_mut().push(format!("reset:{}", self.tag));
    }

    fn dispose(&mut self) {
        self.log.borrow_mut().push(format!("dispose:{}", self.tag));
    }

    fn accepts_children(&self) -> bool {
        self.container
    }

    fn max_tpos(&self) -> f64 {
        self.tpos
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        self.log
            .borrow_mut()
            .push(format!("event:{}:{:?}", self.tag, event.kind));
        true
    }
}

struct Failing;

impl Element for Failing {
    fn render(
        &mut self,
        _surface: &mut dyn Surface,
        _scope: &mut RenderScope<'_>,
        _time: f64,
        _dt: f64,
    ) -> ScenetteResult<()> {
        Err(ScenetteError::render("nope"))
    }
}

fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

#[test]
fn add_registers_the_whole_subtree() {
    let log = log();
    let mut graph = SceneGraph::new();

    let root = Node::named("root", Probe::container("r", &log))
        .child(Node::named("kid", Probe::leaf("a", &log)))
        .child(Node::named("kid", Probe::leaf("b", &log)));
    let (ra, rb) = (root.children()[0].id(), root.children()[1].id());
    let rid = graph.add(root).unwrap();

    assert!(graph.is_registered(rid));
    assert!(graph.is_registered(ra));
    assert!(graph.is_registered(rb));
    assert_eq!(graph.registered_count(), 3);
    assert_eq!(graph.roots(), &[rid]);
    assert_eq!(graph.find_by_id(ra).unwrap().name(), "kid");
    assert_eq!(graph.find_by_id(rid).unwrap().children(), &[ra, rb]);
    assert_eq!(graph.parent_of(ra).unwrap(), Some(rid));
    assert_eq!(graph.parent_of(rid).unwrap(), None);
}

#[test]
fn duplicate_id_fails_without_partial_registration() {
    let log = log();
    let mut graph = SceneGraph::new();
    let taken = graph.add(Node::new(Probe::leaf("a", &log))).unwrap();

    // the duplicate sits deep in the batch, after registrable siblings
    let fresh_sibling = Node::new(Probe::leaf("s", &log));
    let sibling_id = fresh_sibling.id();
    let batch = Node::new(Probe::container("r", &log))
        .child(fresh_sibling)
        .child(Node::new(Probe::leaf("dup", &log)).with_id(taken));

    match graph.add(batch) {
        Err(ScenetteError::ElementAlreadyRegistered(id)) => assert_eq!(id, taken),
        other => panic!("expected ElementAlreadyRegistered, got {other:?}"),
    }

    // nothing from the failed batch leaked in
    assert_eq!(graph.registered_count(), 1);
    assert_eq!(graph.roots().len(), 1);
    assert!(!graph.is_registered(sibling_id));
}

#[test]
fn duplicate_inside_one_batch_is_rejected() {
    let log = log();
    let mut graph = SceneGraph::new();
    let id = ElementId::fresh();
    let batch = Node::new(Probe::container("r", &log))
        .child(Node::new(Probe::leaf("a", &log)).with_id(id))
        .child(Node::new(Probe::leaf("b", &log)).with_id(id));
    assert!(matches!(
        graph.add(batch),
        Err(ScenetteError::ElementAlreadyRegistered(_))
    ));
    assert_eq!(graph.registered_count(), 0);
}

#[test]
fn children_under_a_leaf_element_are_rejected_before_any_mutation() {
    let log = log();
    let mut graph = SceneGraph::new();
    let bad = Node::new(Probe::leaf("leaf", &log)).child(Node::new(Probe::leaf("c", &log)));
    assert!(matches!(
        graph.add(bad),
        Err(ScenetteError::NotAnElementOrClip)
    ));
    assert_eq!(graph.registered_count(), 0);
    assert!(graph.is_empty());
}

#[test]
fn remove_root_unregisters_subtree_and_returns_it() {
    let log = log();
    let mut graph = SceneGraph::new();
    let root = Node::named("r", Probe::container("r", &log))
        .child(Node::named("c1", Probe::leaf("a", &log)))
        .child(Node::named("c2", Probe::leaf("b", &log)));
    let (c1, c2) = (root.children()[0].id(), root.children()[1].id());
    let rid = graph.add(root).unwrap();

    let freed = graph.remove(rid).unwrap();
    assert_eq!(freed.id(), rid);
    assert_eq!(freed.children().len(), 2);
    assert_eq!(freed.children()[0].id(), c1);
    assert_eq!(freed.children()[1].name(), "c2");

    assert!(!graph.is_registered(rid));
    assert!(!graph.is_registered(c1));
    assert!(!graph.is_registered(c2));
    assert!(graph.is_empty());

    // a second remove is a distinct, named fault
    assert!(matches!(
        graph.remove(rid),
        Err(ScenetteError::ElementNotRegistered(id)) if id == rid
    ));
}

#[test]
fn remove_child_goes_through_the_parent() {
    let log = log();
    let mut graph = SceneGraph::new();
    let root = Node::new(Probe::container("r", &log)).child(Node::new(Probe::leaf("a", &log)));
    let child = root.children()[0].id();
    let rid = graph.add(root).unwrap();

    let freed = graph.remove(child).unwrap();
    assert_eq!(freed.id(), child);
    assert!(graph.is_registered(rid));
    assert!(!graph.is_registered(child));
    assert!(graph.find_by_id(rid).unwrap().children().is_empty());
    assert_eq!(graph.roots(), &[rid]);
}

#[test]
fn visit_roots_follows_tree_order_exactly_once() {
    let log = log();
    let mut graph = SceneGraph::new();
    let a = graph.add(Node::new(Probe::leaf("a", &log))).unwrap();
    let b = graph
        .add(Node::new(Probe::container("b", &log)).child(Node::new(Probe::leaf("n", &log))))
        .unwrap();
    let c = graph.add(Node::new(Probe::leaf("c", &log))).unwrap();

    let mut visited = Vec::new();
    graph.visit_roots(|id, _| visited.push(id));
    assert_eq!(visited, vec![a, b, c]);
}

#[test]
fn visit_elems_reaches_every_registered_node() {
    let log = log();
    let mut graph = SceneGraph::new();
    let root = Node::new(Probe::container("r", &log)).child(Node::new(Probe::leaf("a", &log)));
    let nested = root.children()[0].id();
    let rid = graph.add(root).unwrap();

    let mut seen = Vec::new();
    graph.visit_elems(|id, _| seen.push(id));
    seen.sort();
    let mut expected = vec![rid, nested];
    expected.sort();
    assert_eq!(seen, expected);
}

#[test]
fn each_supports_early_exit() {
    let log = log();
    let mut graph = SceneGraph::new();
    let a = graph.add(Node::new(Probe::leaf("a", &log))).unwrap();
    let _b = graph.add(Node::new(Probe::leaf("b", &log))).unwrap();

    let mut visited = Vec::new();
    graph.each(|id, _| {
        visited.push(id);
        ControlFlow::Break(())
    });
    assert_eq!(visited, vec![a]);

    let mut reversed = Vec::new();
    graph.reverse_each(|id, _| {
        reversed.push(id);
        ControlFlow::Continue(())
    });
    assert_eq!(reversed.len(), 2);
    assert_eq!(reversed[1], a);
}

#[test]
fn find_by_name_collects_all_matches_including_the_scope_root() {
    let log = log();
    let mut graph = SceneGraph::new();
    let root = Node::named("hero", Probe::container("r", &log))
        .child(Node::named("hero", Probe::leaf("a", &log)))
        .child(Node::named("extra", Probe::leaf("b", &log)));
    let inner = root.children()[0].id();
    let rid = graph.add(root).unwrap();
    let other = graph
        .add(Node::named("hero", Probe::leaf("c", &log)))
        .unwrap();

    let all = graph.find_by_name("hero", None);
    assert_eq!(all, vec![rid, inner, other]);

    let scoped = graph.find_by_name("hero", Some(rid));
    assert_eq!(scoped, vec![rid, inner]);

    assert!(graph.find_by_name("missing", None).is_empty());
}

#[test]
fn render_recursion_is_the_nodes_responsibility() {
    let log = log();
    let mut graph = SceneGraph::new();
    let root = Node::new(Probe::container("root", &log))
        .child(Node::new(Probe::leaf("a", &log)))
        .child(Node::new(Probe::container("b", &log)).child(Node::new(Probe::leaf("c", &log))));
    let rid = graph.add(root).unwrap();

    let mut surface = PixelSurface::new(2, 2);
    let mut masks = MaskStore::new();
    graph
        .render_node(rid, &mut surface, 0.0, 0.016, &mut masks)
        .unwrap();

    assert_eq!(
        *log.borrow(),
        vec!["render:root", "render:a", "render:b", "render:c"]
    );
}

#[test]
fn render_fault_keeps_the_node_registered() {
    let log = log();
    let mut graph = SceneGraph::new();
    let root = Node::new(Probe::container("root", &log)).child(Node::new(Failing));
    let child = root.children()[0].id();
    let rid = graph.add(root).unwrap();

    let mut surface = PixelSurface::new(2, 2);
    let mut masks = MaskStore::new();
    let err = graph.render_node(rid, &mut surface, 0.0, 0.0, &mut masks);
    assert!(matches!(err, Err(ScenetteError::Render(_))));

    // take-out/put-back reinserted both slots
    assert!(graph.is_registered(rid));
    assert!(graph.is_registered(child));
}

#[test]
fn broadcast_reaches_root_and_nested_elements() {
    let log = log();
    let mut graph = SceneGraph::new();
    let root = Node::new(Probe::container("r", &log)).child(Node::new(Probe::leaf("n", &log)));
    graph.add(root).unwrap();

    graph.broadcast(&Event::pointer(
        EventKind::MouseDown,
        kurbo::Point::new(1.0, 1.0),
        Some(0),
    ));

    let entries = log.borrow();
    assert!(entries.contains(&"event:r:MouseDown".to_string()));
    assert!(entries.contains(&"event:n:MouseDown".to_string()));
}

#[test]
fn fitting_duration_is_the_subtree_max() {
    let log = log();
    let mut graph = SceneGraph::new();
    assert_eq!(graph.fitting_duration(), None);

    let root = Node::new(Probe::container("r", &log))
        .child(Node::new(Probe::timed("c1", &log, 5.0)))
        .child(Node::new(Probe::timed("c2", &log, 7.0)));
    graph.add(root).unwrap();

    assert_eq!(graph.fitting_duration(), Some(7.0));
}

#[test]
fn reset_walks_parent_first() {
    let log = log();
    let mut graph = SceneGraph::new();
    let root = Node::new(Probe::container("r", &log)).child(Node::new(Probe::leaf("a", &log)));
    let rid = graph.add(root).unwrap();

    graph.reset_subtree(rid);
    assert_eq!(*log.borrow(), vec!["reset:r", "reset:a"]);
}

#[test]
fn group_is_a_plain_container() {
    let log = log();
    let mut graph = SceneGraph::new();
    let root = Node::group()
        .child(Node::new(Probe::leaf("a", &log)))
        .child(Node::new(Probe::leaf("b", &log)));
    let rid = graph.add(root).unwrap();

    let mut surface = PixelSurface::new(1, 1);
    let mut masks = MaskStore::new();
    graph
        .render_node(rid, &mut surface, 0.0, 0.0, &mut masks)
        .unwrap();
    assert_eq!(*log.borrow(), vec!["render:a", "render:b"]);

    let _ = Group; // the payload type is public for hosts too
}
