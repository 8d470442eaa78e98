//! Turns a match forest into the paths of textual fields.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::pattern::{Capture, Predicate};
use crate::tree::SyntaxNode;
use crate::walker::MatchResult;

/// The names leading from a top-level declaration down to a textual field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Joins the segments with `separator`.
    pub fn join(&self, separator: &str) -> String {
        self.0.join(separator)
    }
}

impl<S: Into<String>> FromIterator<S> for FieldPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.join("."))
    }
}

impl PartialEq<[&str]> for FieldPath {
    fn eq(&self, other: &[&str]) -> bool {
        self.0.len() == other.len() && self.0.iter().zip(other).all(|(a, b)| a == b)
    }
}

impl<const K: usize> PartialEq<[&str; K]> for FieldPath {
    fn eq(&self, other: &[&str; K]) -> bool {
        *self == other[..]
    }
}

/// Extracts field paths from match results.
///
/// `textual` decides whether a field's matched type child is the textual
/// primitive; a textual field ends its path, any other field's nested
/// matches are searched instead.
#[derive(Debug, Clone, Copy)]
pub struct PathExtractor<'p> {
    textual: &'p Predicate,
}

impl<'p> PathExtractor<'p> {
    pub fn new(textual: &'p Predicate) -> Self {
        Self { textual }
    }

    /// Lazily yields the paths under `result`, each prefixed by `parent`.
    pub fn extract<'f, N: SyntaxNode>(
        &self,
        result: &'f MatchResult<N>,
        parent: &[String],
    ) -> Paths<'f, 'p, N> {
        Paths {
            stack: vec![(result, parent.to_vec())],
            textual: self.textual,
        }
    }

    /// Lazily yields the paths of a whole forest, in discovery order.
    pub fn extract_all<'f, N: SyntaxNode>(&self, forest: &'f [MatchResult<N>]) -> Paths<'f, 'p, N> {
        Paths {
            stack: forest.iter().rev().map(|result| (result, Vec::new())).collect(),
            textual: self.textual,
        }
    }
}

/// Iterator returned by [`PathExtractor::extract`] and
/// [`PathExtractor::extract_all`].
///
/// The forest is only borrowed, so extraction can be restarted at will.
pub struct Paths<'f, 'p, N> {
    stack: Vec<(&'f MatchResult<N>, Vec<String>)>,
    textual: &'p Predicate,
}

impl<N: SyntaxNode> Iterator for Paths<'_, '_, N> {
    type Item = FieldPath;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((result, mut path)) = self.stack.pop() {
            let capture = result.capture();
            path.push(segment(capture.name()));

            if let Capture::Field { ty, .. } = capture
                && self.textual.test(ty)
            {
                return Some(FieldPath(path));
            }

            self.stack.extend(
                result
                    .nested()
                    .iter()
                    .rev()
                    .map(|nested| (nested, path.clone())),
            );
        }

        None
    }
}

/// The path segment for a matched name node; `<kind>` when it has no text.
pub(crate) fn segment<N: SyntaxNode>(name: &N) -> String {
    match name.text() {
        Some(text) => text.to_string(),
        None => {
            warn!(kind = name.kind(), "matched name node carries no text");
            format!("<{}>", name.kind())
        }
    }
}
