//! Structural patterns and the ordered registry the walker consults.
//!
//! A [`Scanner`] pairs a node predicate with an ordered list of child
//! predicates. The list's shape is fixed by the scanner's [`Category`], so a
//! successful match always produces a [`Capture`] holding exactly the
//! children that category needs.

mod predicate;
pub mod subsequence;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tree::SyntaxNode;

pub use predicate::{Predicate, all_of, has_child, kind_is};
pub use subsequence::{match_exact, match_subsequence};

/// The kinds of matched nodes the path extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// A named declaration such as an interface. Matched children: `[name]`.
    Declaration,
    /// A named alias of an object shape. Matched children: `[name, shape]`.
    Alias,
    /// A named, typed field. Matched children: `[name, type]`.
    Field,
}

impl fmt::Display for Category {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Declaration => "declaration",
            Self::Alias => "alias",
            Self::Field => "field",
        };
        formatter.write_str(label)
    }
}

/// Child predicates of a scanner, shaped by category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Declaration { name: Predicate },
    Alias { name: Predicate, shape: Predicate },
    Field { name: Predicate, ty: Predicate },
}

impl Pattern {
    pub fn category(&self) -> Category {
        match self {
            Self::Declaration { .. } => Category::Declaration,
            Self::Alias { .. } => Category::Alias,
            Self::Field { .. } => Category::Field,
        }
    }

    /// The child predicates in matching order.
    pub fn child_predicates(&self) -> Vec<&Predicate> {
        match self {
            Self::Declaration { name } => vec![name],
            Self::Alias { name, shape } => vec![name, shape],
            Self::Field { name, ty } => vec![name, ty],
        }
    }

    /// Runs the subsequence matcher over `children`.
    pub fn capture<N: SyntaxNode>(&self, children: &[N]) -> Option<Capture<N>> {
        match self {
            Self::Declaration { name } => {
                let [name] = match_exact(children, [holds(name)])?;
                Some(Capture::Declaration { name })
            }
            Self::Alias { name, shape } => {
                let [name, shape] = match_exact(children, [holds(name), holds(shape)])?;
                Some(Capture::Alias { name, shape })
            }
            Self::Field { name, ty } => {
                let [name, ty] = match_exact(children, [holds(name), holds(ty)])?;
                Some(Capture::Field { name, ty })
            }
        }
    }
}

fn holds<N: SyntaxNode>(predicate: &Predicate) -> impl Fn(&N) -> bool + '_ {
    move |child| predicate.test(child)
}

/// The matched children of a node, shaped by category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture<N> {
    Declaration { name: N },
    Alias { name: N, shape: N },
    Field { name: N, ty: N },
}

impl<N> Capture<N> {
    pub fn category(&self) -> Category {
        match self {
            Self::Declaration { .. } => Category::Declaration,
            Self::Alias { .. } => Category::Alias,
            Self::Field { .. } => Category::Field,
        }
    }

    /// The name token every category carries first.
    pub fn name(&self) -> &N {
        match self {
            Self::Declaration { name } | Self::Alias { name, .. } | Self::Field { name, .. } => {
                name
            }
        }
    }

    /// The matched children in matching order.
    pub fn children(&self) -> Vec<&N> {
        match self {
            Self::Declaration { name } => vec![name],
            Self::Alias { name, shape } => vec![name, shape],
            Self::Field { name, ty } => vec![name, ty],
        }
    }
}

/// A node predicate plus the pattern its children must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanner {
    node: Predicate,
    pattern: Pattern,
}

impl Scanner {
    pub fn new(node: Predicate, pattern: Pattern) -> Self {
        Self { node, pattern }
    }

    /// A declaration identified by a single name child.
    pub fn declaration(node: Predicate, name: Predicate) -> Self {
        Self::new(node, Pattern::Declaration { name })
    }

    /// An alias with a name child followed by a shape child.
    pub fn alias(node: Predicate, name: Predicate, shape: Predicate) -> Self {
        Self::new(node, Pattern::Alias { name, shape })
    }

    /// A field with a name child followed by a type child.
    pub fn field(node: Predicate, name: Predicate, ty: Predicate) -> Self {
        Self::new(node, Pattern::Field { name, ty })
    }

    pub fn node_predicate(&self) -> &Predicate {
        &self.node
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn category(&self) -> Category {
        self.pattern.category()
    }

    /// Tests `node` and, if its predicate holds, matches its children.
    pub fn scan<N: SyntaxNode>(&self, node: &N) -> Option<Capture<N>> {
        if !self.node.test(node) {
            return None;
        }

        self.pattern.capture(&node.children())
    }
}

impl fmt::Display for Scanner {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} {} [", self.category(), self.node)?;
        for (index, predicate) in self.pattern.child_predicates().into_iter().enumerate() {
            if index > 0 {
                formatter.write_str(", ")?;
            }
            write!(formatter, "{predicate}")?;
        }
        formatter.write_str("]")
    }
}

/// Scanners in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    scanners: Vec<Scanner>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a scanner; it is consulted after every scanner added before it.
    pub fn with(mut self, scanner: Scanner) -> Self {
        self.scanners.push(scanner);
        self
    }

    pub fn scanners(&self) -> &[Scanner] {
        &self.scanners
    }

    pub fn len(&self) -> usize {
        self.scanners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scanners.is_empty()
    }

    /// Returns the capture of the first scanner that matches `node`.
    ///
    /// Later scanners are not consulted once one succeeds, even if they
    /// would also match.
    pub fn first_match<N: SyntaxNode>(&self, node: &N) -> Option<(usize, Capture<N>)> {
        self.scanners
            .iter()
            .enumerate()
            .find_map(|(index, scanner)| scanner.scan(node).map(|capture| (index, capture)))
    }
}

impl FromIterator<Scanner> for Registry {
    fn from_iter<I: IntoIterator<Item = Scanner>>(iter: I) -> Self {
        Self {
            scanners: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::OwnedNode;

    fn node(kind: &str, children: &[&str]) -> OwnedNode {
        OwnedNode::branch(kind, children.iter().map(|kind| OwnedNode::token(*kind)))
    }

    #[test]
    fn scanner_requires_node_predicate() {
        let scanner = Scanner::declaration(kind_is("P"), kind_is("A"));

        assert!(scanner.scan(&&node("Q", &["A"])).is_none());
        assert!(scanner.scan(&&node("P", &["A"])).is_some());
    }

    #[test]
    fn capture_keeps_matched_children_in_order() {
        let scanner = Scanner::field(kind_is("P"), kind_is("A"), kind_is("C"));
        let tree = node("P", &["A", "B", "A", "C"]);

        let capture = scanner.scan(&&tree).expect("field should match");
        let matched = capture.children();
        let kinds: Vec<&str> = matched.iter().map(|child| child.kind()).collect();

        assert_eq!(capture.category(), Category::Field);
        assert_eq!(kinds, ["A", "C"]);
        assert!(std::ptr::eq(*matched[0], &tree.children()[0]));
    }

    #[test]
    fn first_scanner_wins() {
        let registry = Registry::new()
            .with(Scanner::declaration(kind_is("P"), kind_is("B")))
            .with(Scanner::alias(kind_is("P"), kind_is("A"), kind_is("B")));
        let tree = node("P", &["A", "B"]);

        let (index, capture) = registry.first_match(&&tree).expect("a scanner should match");
        assert_eq!(index, 0);
        assert_eq!(capture.category(), Category::Declaration);
        assert_eq!(capture.name().kind(), "B");
    }

    #[test]
    fn falls_through_to_later_scanner_when_children_do_not_match() {
        let registry: Registry = [
            Scanner::field(kind_is("P"), kind_is("A"), kind_is("Z")),
            Scanner::field(kind_is("P"), kind_is("A"), kind_is("B")),
        ]
        .into_iter()
        .collect();

        let tree = node("P", &["A", "B"]);

        let (index, capture) = registry
            .first_match(&&tree)
            .expect("second scanner should match");

        assert_eq!(index, 1);
        let Capture::Field { ty, .. } = capture else {
            panic!("expected a field capture");
        };
        assert_eq!(ty.kind(), "B");
    }

    #[test]
    fn displays_scanner_shape() {
        let scanner = Scanner::alias(
            kind_is("type_alias_declaration"),
            kind_is("type_identifier"),
            kind_is("object_type"),
        );

        assert_eq!(
            scanner.to_string(),
            "alias type_alias_declaration [type_identifier, object_type]"
        );
    }
}
