//! The scene graph: element contract, registry, timelines, and the
//! animation/scene registry types that hosts drive.

/// The top-level registry with the frame pipeline and event router.
pub mod animation;
/// The registry core: arena, root list, traversal, render recursion.
pub mod graph;
/// The element capability contract and free node trees.
pub mod node;
/// Timeline-bound registry scopes.
pub mod scene;
/// Per-scene duration/position authority.
pub mod timeline;
