//! Read-only view over a syntax tree.
//!
//! The walker and the path extractor only ever see nodes through
//! [`SyntaxNode`]: a kind tag, the ordered children and, for leaf tokens, the
//! token text. Two implementations ship with the crate:
//!
//! - [`TsNode`] wraps a tree-sitter node together with the source it was
//!   parsed from.
//! - `&OwnedNode` is a small in-memory tree, handy for building synthetic
//!   trees in tests or from other front-ends.

mod owned;
mod ts_node;

pub use owned::OwnedNode;
pub use ts_node::TsNode;

/// A node of an immutable syntax tree.
///
/// Children order is source order and must be stable: it drives both the
/// traversal order and the order in which child patterns are matched.
pub trait SyntaxNode: Clone {
    /// The node's kind tag, drawn from the front-end's closed set of kinds.
    fn kind(&self) -> &str;

    /// The node's children in source order.
    fn children(&self) -> Vec<Self>;

    /// Token text. Only leaf tokens carry text; inner nodes return `None`.
    fn text(&self) -> Option<&str>;
}
