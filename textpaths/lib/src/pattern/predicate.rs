use std::fmt;

use crate::tree::SyntaxNode;

/// A structural test applied to a single node.
///
/// Predicates are plain data so a registry can be built once and applied to
/// trees of any [`SyntaxNode`] implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// The node's kind tag equals the given tag.
    KindIs(String),
    /// At least one direct child satisfies the inner predicate.
    HasChild(Box<Predicate>),
    /// Every inner predicate holds.
    AllOf(Vec<Predicate>),
}

impl Predicate {
    /// Tests `node` against this predicate.
    pub fn test<N: SyntaxNode>(&self, node: &N) -> bool {
        match self {
            Self::KindIs(tag) => node.kind() == tag,
            Self::HasChild(inner) => node.children().iter().any(|child| inner.test(child)),
            Self::AllOf(inner) => inner.iter().all(|predicate| predicate.test(node)),
        }
    }

    /// Combines `self` with `other`; both must hold.
    pub fn and(self, other: Predicate) -> Predicate {
        match self {
            Self::AllOf(mut inner) => {
                inner.push(other);
                Self::AllOf(inner)
            }
            first => Self::AllOf(vec![first, other]),
        }
    }
}

/// Matches nodes whose kind is `tag`.
pub fn kind_is(tag: impl Into<String>) -> Predicate {
    Predicate::KindIs(tag.into())
}

/// Matches nodes with at least one direct child satisfying `predicate`.
pub fn has_child(predicate: Predicate) -> Predicate {
    Predicate::HasChild(Box::new(predicate))
}

/// Matches nodes satisfying every predicate in `predicates`.
pub fn all_of(predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
    Predicate::AllOf(predicates.into_iter().collect())
}

impl fmt::Display for Predicate {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KindIs(tag) => formatter.write_str(tag),
            Self::HasChild(inner) => write!(formatter, "has({inner})"),
            Self::AllOf(inner) => write_joined(formatter, inner, " & "),
        }
    }
}

fn write_joined(
    formatter: &mut fmt::Formatter<'_>,
    predicates: &[Predicate],
    separator: &str,
) -> fmt::Result {
    formatter.write_str("(")?;
    for (index, predicate) in predicates.iter().enumerate() {
        if index > 0 {
            formatter.write_str(separator)?;
        }
        write!(formatter, "{predicate}")?;
    }
    formatter.write_str(")")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::OwnedNode;

    fn annotation(kind: &str) -> OwnedNode {
        OwnedNode::branch(
            "type_annotation",
            [
                OwnedNode::token(":"),
                OwnedNode::branch(kind, [OwnedNode::token("string")]),
            ],
        )
    }

    #[test]
    fn kind_is_compares_tags() {
        let node = OwnedNode::leaf("identifier", "x");
        assert!(kind_is("identifier").test(&&node));
        assert!(!kind_is("property_identifier").test(&&node));
    }

    #[test]
    fn has_child_only_looks_one_level_down() {
        let node = annotation("predefined_type");
        assert!(has_child(kind_is("predefined_type")).test(&&node));
        assert!(!has_child(kind_is("string")).test(&&node));
        assert!(has_child(has_child(kind_is("string"))).test(&&node));
    }

    #[test]
    fn combinators_compose() {
        let textual = kind_is("type_annotation")
            .and(has_child(kind_is("predefined_type").and(has_child(kind_is("string")))));

        assert!(textual.test(&&annotation("predefined_type")));
        assert!(!textual.test(&&annotation("literal_type")));

        let shape = all_of([kind_is("object_type"), has_child(kind_is("{"))]);
        assert!(shape.test(&&OwnedNode::branch("object_type", [OwnedNode::token("{")])));
        assert!(!shape.test(&&OwnedNode::branch("object_type", [])));
        assert!(all_of([]).test(&&OwnedNode::token("{")));
    }

    #[test]
    fn displays_nested_structure() {
        let textual = kind_is("type_annotation")
            .and(has_child(kind_is("predefined_type").and(has_child(kind_is("string")))));

        assert_eq!(
            textual.to_string(),
            "(type_annotation & has((predefined_type & has(string))))"
        );
    }
}
