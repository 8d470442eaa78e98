//! Depth-first pattern matching over a whole syntax tree.

use tracing::{debug, trace};

use crate::pattern::{Capture, Category, Registry};
use crate::tree::SyntaxNode;

/// A node matched by a scanner, plus every match found beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult<N> {
    node: N,
    capture: Capture<N>,
    scanner: usize,
    nested: Vec<MatchResult<N>>,
}

impl<N> MatchResult<N> {
    /// The matched node.
    pub fn node(&self) -> &N {
        &self.node
    }

    /// The matched children, shaped by the scanner's category.
    pub fn capture(&self) -> &Capture<N> {
        &self.capture
    }

    pub fn category(&self) -> Category {
        self.capture.category()
    }

    /// Registration index of the scanner that produced this match.
    pub fn scanner(&self) -> usize {
        self.scanner
    }

    /// The matched child subsequence in matching order.
    pub fn matched_children(&self) -> Vec<&N> {
        self.capture.children()
    }

    /// Matches found anywhere below this node, in discovery order.
    pub fn nested(&self) -> &[MatchResult<N>] {
        &self.nested
    }

    /// Number of matches in this subtree, this one included.
    pub fn match_count(&self) -> usize {
        1 + self.nested.iter().map(MatchResult::match_count).sum::<usize>()
    }
}

/// Progress reported while walking, see [`TreeWalker::walk_observed`].
#[derive(Debug)]
pub enum WalkEvent<'a, N> {
    /// A node is visited. Emitted in pre-order; `ordinal` counts visits from 0.
    Enter {
        node: &'a N,
        depth: usize,
        ordinal: usize,
    },
    /// A visited node matched a scanner. Emitted once all of its descendants
    /// have been walked.
    Match {
        node: &'a N,
        depth: usize,
        ordinal: usize,
        scanner: usize,
        category: Category,
    },
}

/// Walks syntax trees, testing every node against a [`Registry`].
#[derive(Debug, Clone, Copy)]
pub struct TreeWalker<'r> {
    registry: &'r Registry,
}

struct Frame<N> {
    node: N,
    depth: usize,
    ordinal: usize,
    children: std::vec::IntoIter<N>,
    found: Vec<MatchResult<N>>,
}

impl<'r> TreeWalker<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Walks the tree under `root` and returns the top-level matches.
    ///
    /// Every node is visited. A node that matches wraps the matches found
    /// among its descendants; a node that does not passes them through
    /// unchanged.
    pub fn walk<N: SyntaxNode>(&self, root: N) -> Vec<MatchResult<N>> {
        self.walk_observed(root, |_| {})
    }

    /// Like [`TreeWalker::walk`], reporting each visit and match to `observer`.
    pub fn walk_observed<N, F>(&self, root: N, mut observer: F) -> Vec<MatchResult<N>>
    where
        N: SyntaxNode,
        F: FnMut(WalkEvent<'_, N>),
    {
        let mut visited = 0;
        let mut stack = vec![enter(root, 0, &mut visited, &mut observer)];

        while let Some(frame) = stack.last_mut() {
            if let Some(child) = frame.children.next() {
                let depth = frame.depth + 1;
                stack.push(enter(child, depth, &mut visited, &mut observer));
                continue;
            }

            let Some(finished) = stack.pop() else {
                break;
            };
            let results = self.settle(finished, &mut observer);

            match stack.last_mut() {
                Some(parent) => parent.found.extend(results),
                None => return results,
            }
        }

        Vec::new()
    }

    fn settle<N, F>(&self, frame: Frame<N>, observer: &mut F) -> Vec<MatchResult<N>>
    where
        N: SyntaxNode,
        F: FnMut(WalkEvent<'_, N>),
    {
        let Some((scanner, capture)) = self.registry.first_match(&frame.node) else {
            return frame.found;
        };

        debug!(
            kind = frame.node.kind(),
            depth = frame.depth,
            scanner,
            category = %capture.category(),
            nested = frame.found.len(),
            "node matched"
        );
        observer(WalkEvent::Match {
            node: &frame.node,
            depth: frame.depth,
            ordinal: frame.ordinal,
            scanner,
            category: capture.category(),
        });

        vec![MatchResult {
            node: frame.node,
            capture,
            scanner,
            nested: frame.found,
        }]
    }
}

fn enter<N, F>(node: N, depth: usize, visited: &mut usize, observer: &mut F) -> Frame<N>
where
    N: SyntaxNode,
    F: FnMut(WalkEvent<'_, N>),
{
    trace!(kind = node.kind(), depth, "visit");

    let ordinal = *visited;
    *visited += 1;
    observer(WalkEvent::Enter {
        node: &node,
        depth,
        ordinal,
    });

    let children = node.children().into_iter();
    Frame {
        node,
        depth,
        ordinal,
        children,
        found: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{Scanner, kind_is};
    use crate::tree::OwnedNode;

    fn leaf(kind: &str) -> OwnedNode {
        OwnedNode::token(kind)
    }

    fn branch<const K: usize>(kind: &str, children: [OwnedNode; K]) -> OwnedNode {
        OwnedNode::branch(kind, children)
    }

    /// `M` nodes with an `id` child are matches; nothing else is.
    fn registry() -> Registry {
        Registry::new().with(Scanner::declaration(kind_is("M"), kind_is("id")))
    }

    fn ids(results: &[MatchResult<&OwnedNode>]) -> Vec<String> {
        results
            .iter()
            .map(|result| result.capture().name().text().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn unmatched_nodes_pass_descendant_matches_through() {
        let tree = branch(
            "root",
            [
                branch("x", [branch("y", [branch("M", [OwnedNode::leaf("id", "a")])])]),
                leaf("noise"),
                branch("M", [OwnedNode::leaf("id", "b")]),
                branch(
                    "x",
                    [branch("x", [branch("x", [branch("M", [OwnedNode::leaf("id", "c")])])])],
                ),
            ],
        );

        let registry = registry();
        let results = TreeWalker::new(&registry).walk(&tree);

        assert_eq!(ids(&results), ["a", "b", "c"]);
        assert!(results.iter().all(|result| result.nested().is_empty()));
    }

    #[test]
    fn matched_nodes_collect_matches_from_every_descendant() {
        // The inner matches hang off an unmatched child and off a matched
        // child's subtree.
        let tree = branch(
            "M",
            [
                OwnedNode::leaf("id", "outer"),
                branch("body", [branch("M", [OwnedNode::leaf("id", "first")])]),
                branch(
                    "M",
                    [
                        OwnedNode::leaf("id", "second"),
                        branch("M", [OwnedNode::leaf("id", "third")]),
                    ],
                ),
            ],
        );

        let registry = registry();
        let results = TreeWalker::new(&registry).walk(&tree);

        assert_eq!(ids(&results), ["outer"]);
        let outer = &results[0];
        assert_eq!(outer.match_count(), 4);
        assert_eq!(ids(outer.nested()), ["first", "second"]);
        assert_eq!(ids(outer.nested()[1].nested()), ["third"]);
        assert!(std::ptr::eq(*outer.node(), &tree));
    }

    #[test]
    fn first_registered_scanner_wins() {
        let registry = Registry::new()
            .with(Scanner::declaration(kind_is("M"), kind_is("id")))
            .with(Scanner::field(kind_is("M"), kind_is("id"), kind_is("ty")));
        let tree = branch("M", [OwnedNode::leaf("id", "a"), leaf("ty")]);

        let results = TreeWalker::new(&registry).walk(&tree);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].scanner(), 0);
        assert_eq!(results[0].category(), Category::Declaration);
        assert_eq!(results[0].matched_children().len(), 1);
    }

    #[test]
    fn nodes_whose_children_do_not_match_contribute_nothing() {
        let tree = branch("root", [branch("M", [leaf("other")]), branch("M", [])]);

        let registry = registry();
        assert!(TreeWalker::new(&registry).walk(&tree).is_empty());
    }

    #[test]
    fn empty_registry_matches_nothing() {
        let tree = branch("M", [OwnedNode::leaf("id", "a")]);
        let registry = Registry::new();

        assert!(TreeWalker::new(&registry).walk(&tree).is_empty());
    }

    #[test]
    fn observer_sees_every_node_in_preorder() {
        let tree = branch(
            "root",
            [
                branch("M", [OwnedNode::leaf("id", "a")]),
                branch("x", [leaf("y")]),
            ],
        );

        let registry = registry();
        let mut visits = Vec::new();
        let mut matches = Vec::new();
        TreeWalker::new(&registry).walk_observed(&tree, |event| match event {
            WalkEvent::Enter {
                node,
                depth,
                ordinal,
            } => visits.push((ordinal, depth, node.kind().to_string())),
            WalkEvent::Match {
                ordinal, category, ..
            } => matches.push((ordinal, category)),
        });

        let expected = [
            (0, 0, "root"),
            (1, 1, "M"),
            (2, 2, "id"),
            (3, 1, "x"),
            (4, 2, "y"),
        ];
        assert_eq!(visits.len(), expected.len());
        for (visit, (ordinal, depth, kind)) in visits.iter().zip(expected) {
            assert_eq!((visit.0, visit.1, visit.2.as_str()), (ordinal, depth, kind));
        }
        assert_eq!(matches, [(1, Category::Declaration)]);
    }

    #[test]
    fn walks_deep_trees_without_recursing() {
        let mut tree = branch("M", [OwnedNode::leaf("id", "bottom")]);
        for _ in 0..5_000 {
            tree = branch("wrap", [tree]);
        }

        let registry = registry();
        let results = TreeWalker::new(&registry).walk(&tree);

        assert_eq!(ids(&results), ["bottom"]);
    }
}
