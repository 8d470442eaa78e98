use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use crate::extract::FieldPath;
use crate::pattern::Category;
use crate::shared::SourceLanguage;

/// A source code range with line/column and byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeRange {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub start_byte: usize,
    pub end_byte: usize,
}

impl CodeRange {
    /// Builds a 1-based range from a tree-sitter node.
    pub fn from_node(node: Node<'_>) -> Self {
        let start = node.start_position();
        let end = node.end_position();

        Self {
            start_line: start.row.saturating_add(1),
            start_column: start.column.saturating_add(1),
            end_line: end.row.saturating_add(1),
            end_column: end.column.saturating_add(1),
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
        }
    }
}

/// A syntax diagnostic derived from parse errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntaxDiagnostic {
    pub message: String,
    pub range: CodeRange,
}

/// Textual field paths found under one top-level match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclarationSummary {
    /// Name of the matched top-level node (interface, alias or field name).
    pub name: String,
    pub category: Category,
    pub range: CodeRange,
    pub paths: Vec<FieldPath>,
}

/// JSON-serializable summary for a single file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSummary {
    pub file: PathBuf,
    pub language: SourceLanguage,
    pub declarations: Vec<DeclarationSummary>,
    pub syntax: Vec<SyntaxDiagnostic>,
}

impl FileSummary {
    /// Iterates over every path in the file, in discovery order.
    pub fn paths(&self) -> impl Iterator<Item = &FieldPath> {
        self.declarations
            .iter()
            .flat_map(|declaration| declaration.paths.iter())
    }
}

/// JSON-serializable summary for a multi-file run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSummary {
    pub root_dir: PathBuf,
    pub files: Vec<FileSummary>,
}
