use std::path::{Path, PathBuf};

use tracing::debug;
use tree_sitter::Parser;

use crate::error::TextPathsError;
use crate::extract::{FieldPath, PathExtractor, segment};
use crate::pattern::Registry;
use crate::shared::{DeclarationSummary, FileSummary, SourceLanguage, SyntaxDiagnostic};
use crate::tree::TsNode;
use crate::typescript;
use crate::walker::{MatchResult, TreeWalker};

/// Represents a parsed source file backed by tree-sitter.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path of the file, as given when it was opened.
    pub file: PathBuf,
    /// The detected language for the file.
    pub language: SourceLanguage,
    source: String,
    tree: tree_sitter::Tree,
}

impl SourceFile {
    /// Creates a new `SourceFile` by reading and parsing the file on disk.
    ///
    /// ## Errors
    /// Returns an error if the file cannot be read, parsed, or is unsupported.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, TextPathsError> {
        Self::with_language(path, None)
    }

    /// Creates a new `SourceFile`, overriding language detection when provided.
    ///
    /// ## Errors
    /// Returns an error if the file cannot be read, parsed, or is unsupported.
    pub fn with_language<P: AsRef<Path>>(
        path: P,
        language: Option<SourceLanguage>,
    ) -> Result<Self, TextPathsError> {
        let file = path.as_ref().to_path_buf();
        let language = match language {
            Some(language) => language,
            None => SourceLanguage::from_path(&file)
                .ok_or_else(|| TextPathsError::UnsupportedLanguage { path: file.clone() })?,
        };

        let source = std::fs::read_to_string(&file).map_err(|source| TextPathsError::Io {
            path: file.clone(),
            source,
        })?;

        Self::from_source(file, language, source)
    }

    /// Parses `source` as if it had been read from `file`.
    ///
    /// ## Errors
    /// Returns an error if tree-sitter cannot produce a tree.
    pub fn from_source<P: Into<PathBuf>, S: Into<String>>(
        file: P,
        language: SourceLanguage,
        source: S,
    ) -> Result<Self, TextPathsError> {
        let file = file.into();
        let source = source.into();

        let mut parser = Parser::new();
        parser
            .set_language(&language.tree_sitter_language())
            .map_err(|_| TextPathsError::UnsupportedLanguage { path: file.clone() })?;

        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| TextPathsError::ParseFailed { path: file.clone() })?;

        debug!(
            file = %file.display(),
            %language,
            bytes = source.len(),
            "parsed source file"
        );

        Ok(Self {
            file,
            language,
            source,
            tree,
        })
    }

    /// The file's source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The root of the syntax tree.
    pub fn root(&self) -> TsNode<'_> {
        TsNode::new(self.tree.root_node(), &self.source)
    }

    /// Provides syntax diagnostics for this file.
    ///
    /// ## Returns
    /// Returns syntax diagnostics derived from tree-sitter error nodes.
    pub fn syntax_diagnostics(&self) -> Vec<SyntaxDiagnostic> {
        let mut diagnostics = Vec::new();
        let root = self.tree.root_node();
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            if node.is_error() || node.is_missing() {
                let message = if node.is_missing() {
                    format!("Missing `{}`", node.kind())
                } else {
                    "Syntax error".to_string()
                };

                diagnostics.push(SyntaxDiagnostic {
                    message,
                    range: TsNode::new(node, &self.source).range(),
                });
            }

            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }

        diagnostics
    }

    /// Walks the file's syntax tree with `registry`.
    pub fn matches(&self, registry: &Registry) -> Vec<MatchResult<TsNode<'_>>> {
        TreeWalker::new(registry).walk(self.root())
    }

    /// Every textual field path in the file, in discovery order.
    pub fn field_paths(&self) -> Vec<FieldPath> {
        let registry = typescript::registry();
        let textual = typescript::textual_type();
        let forest = self.matches(&registry);

        PathExtractor::new(&textual).extract_all(&forest).collect()
    }

    /// Textual field paths grouped by the top-level match they were found under.
    pub fn declarations(&self) -> Vec<DeclarationSummary> {
        let registry = typescript::registry();
        let textual = typescript::textual_type();
        let extractor = PathExtractor::new(&textual);

        self.matches(&registry)
            .iter()
            .map(|result| DeclarationSummary {
                name: segment(result.capture().name()),
                category: result.category(),
                range: result.node().range(),
                paths: extractor.extract(result, &[]).collect(),
            })
            .collect()
    }

    /// Builds the JSON-serializable summary of this file.
    pub fn summary(&self) -> FileSummary {
        FileSummary {
            file: self.file.clone(),
            language: self.language,
            declarations: self.declarations(),
            syntax: self.syntax_diagnostics(),
        }
    }
}
