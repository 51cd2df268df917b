use crate::foundation::core::ElementId;

/// Crate-wide result alias.
pub type ScenetteResult<T> = Result<T, ScenetteError>;

/// Faults surfaced by the scene-graph runtime.
///
/// The three registry faults are distinct variants on purpose: calling code
/// is expected to branch on kind (retry after fixing a precondition, ignore a
/// double-remove, and so on). None of them is retried internally.
#[derive(thiserror::Error, Debug)]
pub enum ScenetteError {
    /// The value passed to `add` cannot take part in the tree: it carries
    /// children but its element cannot enumerate or host them.
    #[error("object is not an element or clip")]
    NotAnElementOrClip,

    /// An id in the registered batch is already present in this registry.
    #[error("element {0} is already registered")]
    ElementAlreadyRegistered(ElementId),

    /// The operation requires the element to be registered, and it is not.
    #[error("element {0} is not registered")]
    ElementNotRegistered(ElementId),

    /// The registry has been disposed and no longer accepts work.
    #[error("registry is disposed")]
    Disposed,

    /// A fault raised while rendering a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Invalid input outside the registry faults (bad color spec, bad size).
    #[error("validation error: {0}")]
    Validation(String),

    /// Anything else, carried through unchanged.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScenetteError {
    /// Build a [`ScenetteError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ScenetteError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
