use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The node id does not refer to a live node in this document.
    #[error("node is no longer part of the document")]
    NodeGone,

    #[error("operation requires an element node")]
    NotAnElement,

    #[error("operation requires a text node")]
    NotAText,

    /// Appending a node inside its own subtree.
    #[error("append would make a node its own ancestor")]
    WouldCycle,

    #[error("`{name}` is not a valid attribute name")]
    InvalidName { name: String },
}
