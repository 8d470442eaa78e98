//! Find the textual fields of TypeScript declarations.
//!
//! `textpaths` walks a syntax tree, matches nodes against an ordered
//! [`Registry`] of structural [`Scanner`]s and reports every field whose
//! declared type is `string` as a dotted [`FieldPath`] such as
//! `User.address.street`.
//!
//! The matching machinery ([`pattern`], [`walker`], [`extract`]) is generic
//! over [`SyntaxNode`], so it runs equally on tree-sitter trees and on
//! hand-built [`OwnedNode`] trees.

pub mod error;
pub mod extract;
pub mod file;
pub mod pattern;
pub mod shared;
pub mod tree;
pub mod typescript;
pub mod walker;

pub use error::TextPathsError;
pub use extract::{FieldPath, PathExtractor};
pub use file::{SourceFile, SourceSet};
pub use pattern::{Capture, Category, Predicate, Registry, Scanner};
pub use shared::*;
pub use tree::{OwnedNode, SyntaxNode, TsNode};
pub use walker::{MatchResult, TreeWalker, WalkEvent};
