use tree_sitter::Node;

use super::SyntaxNode;
use crate::shared::CodeRange;

/// A tree-sitter node paired with the source text it was parsed from.
#[derive(Debug, Clone, Copy)]
pub struct TsNode<'a> {
    node: Node<'a>,
    source: &'a str,
}

impl<'a> TsNode<'a> {
    pub fn new(node: Node<'a>, source: &'a str) -> Self {
        Self { node, source }
    }

    /// The node's source span.
    pub fn range(&self) -> CodeRange {
        CodeRange::from_node(self.node)
    }
}

impl SyntaxNode for TsNode<'_> {
    fn kind(&self) -> &str {
        self.node.kind()
    }

    fn children(&self) -> Vec<Self> {
        let mut cursor = self.node.walk();
        self.node
            .children(&mut cursor)
            .map(|node| Self {
                node,
                source: self.source,
            })
            .collect()
    }

    fn text(&self) -> Option<&str> {
        if self.node.child_count() > 0 {
            return None;
        }

        self.node.utf8_text(self.source.as_bytes()).ok()
    }
}
